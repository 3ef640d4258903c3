//! Image verification: confirm each candidate is an openable image container.

use image::{GenericImageView, ImageFormat, ImageReader};
use std::path::Path;

use crate::config::{LimitsConfig, VerifyMode};
use crate::error::{PipelineError, PipelineResult};
use crate::types::{ImageCandidate, ImageProbe, VerificationOutcome};

use super::validate::Validator;

/// Opens candidates and sorts them into verified and failed outcomes.
pub struct ImageVerifier {
    validator: Validator,
    mode: VerifyMode,
}

impl ImageVerifier {
    /// Create a new verifier with the given limits and strictness.
    pub fn new(limits: LimitsConfig, mode: VerifyMode) -> Self {
        Self {
            validator: Validator::new(limits),
            mode,
        }
    }

    /// Verify one candidate. Never fails: errors become
    /// [`VerificationOutcome::Failed`] with the error text as reason.
    pub fn verify(&self, candidate: ImageCandidate) -> VerificationOutcome {
        let result = self
            .validator
            .validate(&candidate.path)
            .and_then(|()| probe(&candidate.path, self.mode));

        match result {
            Ok(probe) => VerificationOutcome::Verified { candidate, probe },
            Err(e) => VerificationOutcome::Failed {
                candidate,
                reason: e.to_string(),
            },
        }
    }
}

/// Open `path`, detect its format from content, and read its dimensions.
///
/// In [`VerifyMode::Header`] the header is parsed and JPEG and PNG
/// containers are walked to their end marker, without decoding pixels. In
/// [`VerifyMode::Decode`] every pixel is decoded. The file is closed before
/// this returns.
pub fn probe(path: &Path, mode: VerifyMode) -> PipelineResult<ImageProbe> {
    let reader = ImageReader::open(path)
        .and_then(|r| r.with_guessed_format())
        .map_err(|e| PipelineError::Decode {
            path: path.to_path_buf(),
            message: format!("Cannot open image: {}", e),
        })?;

    let format = reader
        .format()
        .ok_or_else(|| PipelineError::UnsupportedFormat {
            path: path.to_path_buf(),
            format: path
                .extension()
                .and_then(|e| e.to_str())
                .unwrap_or("unknown")
                .to_string(),
        })?;

    let (width, height) = match mode {
        VerifyMode::Header => reader.into_dimensions(),
        VerifyMode::Decode => reader.decode().map(|image| image.dimensions()),
    }
    .map_err(|e| PipelineError::Decode {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    if mode == VerifyMode::Header {
        check_structure(path, format)?;
    }

    Ok(ImageProbe {
        width,
        height,
        format: format_tag(format),
    })
}

/// Confirm a JPEG or PNG container runs to its end marker.
///
/// Other formats are accepted on their header alone.
fn check_structure(path: &Path, format: ImageFormat) -> PipelineResult<()> {
    let complete: fn(&[u8]) -> bool = match format {
        ImageFormat::Jpeg => jpeg_is_complete,
        ImageFormat::Png => png_is_complete,
        _ => return Ok(()),
    };

    let bytes = std::fs::read(path).map_err(|e| PipelineError::Decode {
        path: path.to_path_buf(),
        message: format!("Cannot read image: {}", e),
    })?;

    if complete(&bytes) {
        Ok(())
    } else {
        Err(PipelineError::Decode {
            path: path.to_path_buf(),
            message: format!(
                "Truncated or corrupt {} data: end of image not reached",
                format_tag(format)
            ),
        })
    }
}

/// Walk JPEG marker segments from SOI until EOI (`FF D9`).
///
/// Segment lengths are followed, so an EOI inside an embedded thumbnail is
/// skipped. Entropy-coded data after SOS is scanned for the next real marker.
fn jpeg_is_complete(bytes: &[u8]) -> bool {
    if !bytes.starts_with(&[0xFF, 0xD8]) {
        return false;
    }
    let len = bytes.len();
    let mut pos = 2;

    loop {
        while pos < len && bytes[pos] != 0xFF {
            pos += 1;
        }
        while pos < len && bytes[pos] == 0xFF {
            pos += 1;
        }
        if pos >= len {
            return false;
        }
        let marker = bytes[pos];
        pos += 1;

        match marker {
            0xD9 => return true,
            // Standalone markers carry no length
            0x00 | 0x01 | 0xD0..=0xD7 => continue,
            _ => {}
        }

        if pos + 2 > len {
            return false;
        }
        let segment = u16::from_be_bytes([bytes[pos], bytes[pos + 1]]) as usize;
        if segment < 2 {
            return false;
        }
        pos += segment;
        if pos > len {
            return false;
        }

        if marker == 0xDA {
            loop {
                while pos < len && bytes[pos] != 0xFF {
                    pos += 1;
                }
                if pos + 1 >= len {
                    return false;
                }
                match bytes[pos + 1] {
                    0x00 | 0xD0..=0xD7 => pos += 2,
                    0xFF => pos += 1,
                    _ => break,
                }
            }
        }
    }
}

/// Walk PNG chunks after the signature until `IEND`.
fn png_is_complete(bytes: &[u8]) -> bool {
    const SIGNATURE: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];
    if !bytes.starts_with(&SIGNATURE) {
        return false;
    }
    let mut pos = SIGNATURE.len();

    while pos + 8 <= bytes.len() {
        let length = u32::from_be_bytes([
            bytes[pos],
            bytes[pos + 1],
            bytes[pos + 2],
            bytes[pos + 3],
        ]);
        let chunk_type = &bytes[pos + 4..pos + 8];
        // length + type + data + crc
        let end = pos + 12 + length as usize;
        if end > bytes.len() {
            return false;
        }
        if chunk_type == b"IEND" {
            return true;
        }
        pos = end;
    }
    false
}

/// Upper-case tag for an image format, as written to the `image_format` column.
pub fn format_tag(format: ImageFormat) -> String {
    match format {
        ImageFormat::Jpeg => "JPEG".to_string(),
        ImageFormat::Png => "PNG".to_string(),
        ImageFormat::WebP => "WEBP".to_string(),
        ImageFormat::Gif => "GIF".to_string(),
        ImageFormat::Tiff => "TIFF".to_string(),
        ImageFormat::Bmp => "BMP".to_string(),
        ImageFormat::Ico => "ICO".to_string(),
        ImageFormat::Pnm => "PNM".to_string(),
        ImageFormat::Avif => "AVIF".to_string(),
        other => format!("{other:?}").to_uppercase(),
    }
}
