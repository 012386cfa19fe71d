//! Credential bundle model
//!
//! One account's credential payload as the credential store keeps it: a
//! filename that doubles as the collision key, an opaque JSON body, and the
//! time it was captured.

use serde::{Deserialize, Serialize};
use std::fmt;

/// One account's credential payload ("backup item")
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CredentialBundle {
    /// Unique, non-empty file name used as the collision key on restore
    pub filename: String,

    /// Opaque structured content, never inspected by the exchange subsystem
    pub content: serde_json::Value,

    /// Capture time in seconds since the Unix epoch
    pub timestamp: i64,
}

impl CredentialBundle {
    pub fn new(filename: impl Into<String>, content: serde_json::Value, timestamp: i64) -> Self {
        Self {
            filename: filename.into(),
            content,
            timestamp,
        }
    }

    /// Account name derived from the filename (extension stripped)
    pub fn account_name(&self) -> &str {
        self.filename
            .strip_suffix(".json")
            .unwrap_or(&self.filename)
    }

    /// Validate the bundle's key
    pub fn validate(&self) -> Result<(), BundleValidationError> {
        if self.filename.trim().is_empty() {
            return Err(BundleValidationError::EmptyFilename);
        }

        Ok(())
    }
}

impl fmt::Display for CredentialBundle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.account_name())
    }
}

/// Validation errors for bundles
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BundleValidationError {
    EmptyFilename,
}

impl fmt::Display for BundleValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyFilename => write!(f, "Backup item filename cannot be empty"),
        }
    }
}

impl std::error::Error for BundleValidationError {}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_account_name_strips_extension() {
        let bundle = CredentialBundle::new("alice@example.com.json", json!({}), 0);
        assert_eq!(bundle.account_name(), "alice@example.com");

        let bare = CredentialBundle::new("bob", json!({}), 0);
        assert_eq!(bare.account_name(), "bob");
    }

    #[test]
    fn test_validation() {
        let bundle = CredentialBundle::new("   ", json!({}), 0);
        assert_eq!(bundle.validate(), Err(BundleValidationError::EmptyFilename));

        let bundle = CredentialBundle::new("a.json", json!({"token": "x"}), 1);
        assert!(bundle.validate().is_ok());
    }

    #[test]
    fn test_serialization_keys() {
        let bundle = CredentialBundle::new("a.json", json!({"token": "x"}), 42);
        let value = serde_json::to_value(&bundle).unwrap();
        assert_eq!(value["filename"], "a.json");
        assert_eq!(value["content"]["token"], "x");
        assert_eq!(value["timestamp"], 42);
    }
}
