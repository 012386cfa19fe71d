//! Cipher provider contract and the password-based implementation
//!
//! The exchange orchestrators only see [`CipherProvider`]. The shipped
//! implementation, [`PasswordCipher`], seals text with Argon2id + AES-256-GCM
//! and writes a self-describing JSON envelope:
//!
//! ```text
//! {
//!   "algorithm": "argon2id-aes256gcm",
//!   "version": 1,
//!   "kdf": { "salt": ..., "memory_cost": ..., "time_cost": ..., "parallelism": ... },
//!   "nonce": ...,
//!   "ciphertext": ...
//! }
//! ```
//!
//! Everything except `nonce` and `ciphertext` is the header, which is
//! authenticated as AES-GCM associated data.

use serde::{Deserialize, Serialize};

use crate::config::settings::{KdfSettings, PasswordPolicy};
use crate::error::{PorterError, PorterResult};
use crate::models::EncryptedArtifact;

use super::encryption::{open, seal, SealedPayload};
use super::key_derivation::{derive_key, KeyDerivationParams};
use super::secure_memory::SecureString;

/// Algorithm identifier recorded in envelopes and snapshot metadata
pub const ALGORITHM_ID: &str = "argon2id-aes256gcm";

/// Envelope layout version
pub const ENVELOPE_VERSION: u8 = 1;

/// Outcome of a password policy check
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PasswordCheck {
    pub is_valid: bool,
    pub message: Option<String>,
}

impl PasswordCheck {
    pub fn accepted() -> Self {
        Self {
            is_valid: true,
            message: None,
        }
    }

    pub fn rejected(message: impl Into<String>) -> Self {
        Self {
            is_valid: false,
            message: Some(message.into()),
        }
    }

    /// Convert into a `WeakPassword` error when rejected
    pub fn into_result(self) -> PorterResult<()> {
        if self.is_valid {
            Ok(())
        } else {
            Err(PorterError::WeakPassword(
                self.message.unwrap_or_else(|| "Password is invalid".to_string()),
            ))
        }
    }
}

/// Password-derived symmetric encryption used for exchange artifacts
pub trait CipherProvider {
    /// Identifier stored in snapshot metadata
    fn algorithm_id(&self) -> &str;

    fn encrypt(&self, plaintext: &str, password: &str) -> PorterResult<EncryptedArtifact>;

    /// Must fail with [`PorterError::DecryptionFailed`] on a wrong password
    /// or corrupted input rather than return garbage
    fn decrypt(&self, artifact: &EncryptedArtifact, password: &str) -> PorterResult<SecureString>;

    fn validate_password(&self, password: &str) -> PasswordCheck;
}

#[derive(Serialize, Deserialize)]
struct ArtifactHeader {
    algorithm: String,
    version: u8,
    kdf: KeyDerivationParams,
}

impl ArtifactHeader {
    fn associated_data(&self) -> PorterResult<Vec<u8>> {
        serde_json::to_vec(self)
            .map_err(|e| PorterError::Encryption(format!("Failed to encode header: {}", e)))
    }
}

#[derive(Serialize, Deserialize)]
struct ArtifactEnvelope {
    #[serde(flatten)]
    header: ArtifactHeader,
    #[serde(flatten)]
    payload: SealedPayload,
}

/// Argon2id + AES-256-GCM cipher with a configurable password policy
#[derive(Debug, Clone, Default)]
pub struct PasswordCipher {
    policy: PasswordPolicy,
    kdf: KdfSettings,
}

impl PasswordCipher {
    pub fn new(policy: PasswordPolicy, kdf: KdfSettings) -> Self {
        Self { policy, kdf }
    }

    pub fn from_settings(settings: &crate::config::Settings) -> Self {
        Self::new(
            settings.password_policy.clone(),
            settings.key_derivation.clone(),
        )
    }
}

impl CipherProvider for PasswordCipher {
    fn algorithm_id(&self) -> &str {
        ALGORITHM_ID
    }

    fn encrypt(&self, plaintext: &str, password: &str) -> PorterResult<EncryptedArtifact> {
        let header = ArtifactHeader {
            algorithm: ALGORITHM_ID.to_string(),
            version: ENVELOPE_VERSION,
            kdf: KeyDerivationParams::generate(&self.kdf),
        };
        let key = derive_key(password, &header.kdf)?;
        let payload = seal(plaintext.as_bytes(), &key, &header.associated_data()?)?;

        let envelope = ArtifactEnvelope { header, payload };

        let text = serde_json::to_string_pretty(&envelope)
            .map_err(|e| PorterError::Encryption(format!("Failed to encode artifact: {}", e)))?;

        Ok(EncryptedArtifact::new(text))
    }

    fn decrypt(&self, artifact: &EncryptedArtifact, password: &str) -> PorterResult<SecureString> {
        let envelope: ArtifactEnvelope = serde_json::from_str(artifact.as_str()).map_err(|_| {
            PorterError::DecryptionFailed("not a recognised encrypted backup".to_string())
        })?;

        let header = &envelope.header;
        if header.algorithm != ALGORITHM_ID {
            return Err(PorterError::DecryptionFailed(format!(
                "unsupported algorithm {}",
                header.algorithm
            )));
        }
        if header.version != ENVELOPE_VERSION {
            return Err(PorterError::DecryptionFailed(format!(
                "unsupported envelope version {}",
                header.version
            )));
        }

        let key = derive_key(password, &header.kdf)
            .map_err(|e| PorterError::DecryptionFailed(e.to_string()))?;
        let aad = header
            .associated_data()
            .map_err(|e| PorterError::DecryptionFailed(e.to_string()))?;

        let plaintext = open(&envelope.payload, &key, &aad)?;

        String::from_utf8(plaintext)
            .map(SecureString::new)
            .map_err(|_| PorterError::DecryptionFailed("decrypted data is not UTF-8".to_string()))
    }

    fn validate_password(&self, password: &str) -> PasswordCheck {
        if password.is_empty() {
            return PasswordCheck::rejected("Password cannot be empty");
        }

        if password.trim().is_empty() {
            return PasswordCheck::rejected("Password cannot be only whitespace");
        }

        let length = password.chars().count();
        if length < self.policy.min_length {
            return PasswordCheck::rejected(format!(
                "Password must be at least {} characters",
                self.policy.min_length
            ));
        }

        PasswordCheck::accepted()
    }
}
