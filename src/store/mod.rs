//! Credential store layer
//!
//! The exchange orchestrators read and restore credential bundles through the
//! [`CredentialStore`] trait. [`DirectoryStore`] keeps one JSON file per
//! account; [`MemoryStore`] keeps bundles in memory.

pub mod directory;
pub mod file_io;
pub mod memory;

pub use directory::DirectoryStore;
pub use file_io::{write_json_atomic, write_text_atomic};
pub use memory::MemoryStore;

use thiserror::Error;

use crate::error::PorterError;
use crate::models::CredentialBundle;

/// Failure of a single credential store operation
///
/// During import these are recorded per item and never abort the batch.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("I/O error: {0}")]
    Io(String),

    #[error("Invalid filename: {0:?}")]
    InvalidFilename(String),

    #[error("Account not found: {0}")]
    NotFound(String),

    #[error("JSON error: {0}")]
    Json(String),
}

impl From<std::io::Error> for StoreError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err.to_string())
    }
}

impl From<StoreError> for PorterError {
    fn from(err: StoreError) -> Self {
        PorterError::Storage(err.to_string())
    }
}

/// Where account credential bundles live
pub trait CredentialStore {
    /// Every bundle currently held, in a stable order. May be empty.
    fn collect_all(&self) -> Result<Vec<CredentialBundle>, StoreError>;

    /// Write one bundle, replacing any bundle with the same filename
    fn restore_one(&mut self, bundle: &CredentialBundle) -> Result<(), StoreError>;

    fn delete_one(&mut self, filename: &str) -> Result<(), StoreError>;

    /// Remove every bundle and return how many were removed
    fn clear_all(&mut self) -> Result<usize, StoreError>;
}

/// Reject names that would escape the store or cannot be a file
pub(crate) fn check_filename(filename: &str) -> Result<(), StoreError> {
    let invalid = filename.trim().is_empty()
        || filename == "."
        || filename == ".."
        || filename.contains('/')
        || filename.contains('\\')
        || filename.contains('\0');

    if invalid {
        Err(StoreError::InvalidFilename(filename.to_string()))
    } else {
        Ok(())
    }
}

/// Normalize an account name to its bundle filename
pub(crate) fn bundle_filename(name: &str) -> String {
    if name.ends_with(".json") {
        name.to_string()
    } else {
        format!("{}.json", name)
    }
}
