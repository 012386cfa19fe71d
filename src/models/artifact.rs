//! Encrypted artifact value object
//!
//! The opaque text the cipher produces over a serialized snapshot. Created
//! once per export and consumed once per import.

use std::fmt;

#[derive(Clone, PartialEq, Eq)]
pub struct EncryptedArtifact(String);

impl EncryptedArtifact {
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whitespace-only content counts as empty
    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

// Ciphertext is not secret, but it is large and useless in logs
impl fmt::Debug for EncryptedArtifact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EncryptedArtifact")
            .field("len", &self.0.len())
            .finish()
    }
}
