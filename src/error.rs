//! Custom error types for account-porter
//!
//! Call-level failures of export and import live in [`PorterError`]. Failures
//! of a single credential restore are a different type
//! ([`crate::store::StoreError`]) because they are recorded, not propagated.

use thiserror::Error;

/// The main error type for account-porter operations
#[derive(Error, Debug)]
pub enum PorterError {
    /// The credential store holds no bundles, so there is nothing to export
    #[error("No account credentials found, nothing to export")]
    NothingToExport,

    /// The password was rejected by the cipher's password policy
    #[error("Weak password: {0}")]
    WeakPassword(String),

    /// The artifact file exists but holds no content
    #[error("Backup file is empty")]
    EmptyArtifact,

    /// Wrong password or corrupted artifact
    #[error("Decryption failed: {0}")]
    DecryptionFailed(String),

    /// The decrypted snapshot failed validation
    #[error("Incompatible backup file: {}", .0.join("; "))]
    IncompatibleArtifact(Vec<String>),

    /// The decrypted text is not a structurally parseable snapshot
    #[error("Malformed backup file: {0}")]
    MalformedArtifact(String),

    /// No destination or source file was chosen
    #[error("Cancelled: {0}")]
    UserCancelled(String),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// File I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(String),

    /// Credential store errors outside of the per-item restore loop
    #[error("Storage error: {0}")]
    Storage(String),

    /// Encryption errors
    #[error("Encryption error: {0}")]
    Encryption(String),
}

impl PorterError {
    /// Check if this is a user cancellation rather than a failure
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::UserCancelled(_))
    }

    /// Check if this is a decryption failure
    pub fn is_decryption_failure(&self) -> bool {
        matches!(self, Self::DecryptionFailed(_))
    }
}

// Implement From traits for common error types

impl From<std::io::Error> for PorterError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for PorterError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err.to_string())
    }
}

/// Result type alias for account-porter operations
pub type PorterResult<T> = Result<T, PorterError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = PorterError::Config("test error".into());
        assert_eq!(err.to_string(), "Configuration error: test error");
    }

    #[test]
    fn test_incompatible_lists_every_error() {
        let err = PorterError::IncompatibleArtifact(vec![
            "missing formatVersion".into(),
            "missing createdAt".into(),
        ]);
        assert_eq!(
            err.to_string(),
            "Incompatible backup file: missing formatVersion; missing createdAt"
        );
    }

    #[test]
    fn test_cancelled_is_distinct() {
        let err = PorterError::UserCancelled("no destination chosen".into());
        assert!(err.is_cancelled());
        assert!(!PorterError::NothingToExport.is_cancelled());
    }

    #[test]
    fn test_from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: PorterError = io_err.into();
        assert!(matches!(err, PorterError::Io(_)));
    }
}
