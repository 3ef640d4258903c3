//! Concentration parsing from product image file names.

use regex::Regex;
use std::sync::LazyLock;

/// Digits with an optional decimal part, immediately followed by `mg` or `ml`.
/// Case-sensitive: `500MG` does not match.
static CONCENTRATION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\d+(?:\.\d+)?(?:mg|ml)").expect("concentration pattern is valid")
});

/// First concentration token in `file_name`, or an empty string.
///
/// ```
/// use parenteral_core::pipeline::extract_concentration;
///
/// assert_eq!(extract_concentration("drug_500mg_lot1.jpg"), "500mg");
/// assert_eq!(extract_concentration("drug_plain.jpg"), "");
/// ```
pub fn extract_concentration(file_name: &str) -> &str {
    CONCENTRATION
        .find(file_name)
        .map(|m| m.as_str())
        .unwrap_or_default()
}
