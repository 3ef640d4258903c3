//! Metadata pipeline components.
//!
//! - **discovery**: find candidate image files under the scan root
//! - **validate**: cheap pre-checks (existence, size, magic bytes)
//! - **verify**: open each candidate and read its header
//! - **concentration**: parse dose strings from file names
//! - **record**: build one export row per verified image
//! - **processor**: orchestrates the full pipeline

pub mod concentration;
pub mod discovery;
pub mod processor;
pub mod record;
pub mod validate;
pub mod verify;

// Re-exports for convenient access
pub use concentration::extract_concentration;
pub use discovery::{category_for, FileDiscovery};
pub use processor::{MetadataPipeline, RunOutcome};
pub use record::{size_kb, RecordBuilder};
pub use validate::Validator;
pub use verify::{probe, ImageVerifier};
