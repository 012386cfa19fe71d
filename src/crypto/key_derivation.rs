//! Key derivation using Argon2id
//!
//! Derives AES-256 keys from backup passwords. Every artifact gets its own
//! random salt, and the parameters travel inside the artifact so it can be
//! opened on a machine with different settings.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHasher, SaltString},
    Argon2, Params,
};
use serde::{Deserialize, Serialize};
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::config::settings::KdfSettings;
use crate::error::{PorterError, PorterResult};

/// Upper bound on memory cost accepted from an artifact (1 GiB)
pub const MAX_MEMORY_COST: u32 = 1024 * 1024;

/// Upper bound on iterations accepted from an artifact
pub const MAX_TIME_COST: u32 = 64;

/// Parameters for key derivation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyDerivationParams {
    /// Salt for key derivation (base64 encoded, no padding)
    pub salt: String,
    /// Memory cost in KiB
    pub memory_cost: u32,
    /// Time cost (iterations)
    pub time_cost: u32,
    /// Parallelism degree
    pub parallelism: u32,
}

impl KeyDerivationParams {
    /// Fresh params with a random salt and the configured cost
    pub fn generate(settings: &KdfSettings) -> Self {
        let salt = SaltString::generate(&mut OsRng);
        Self {
            salt: salt.to_string(),
            memory_cost: settings.memory_cost,
            time_cost: settings.time_cost,
            parallelism: settings.parallelism,
        }
    }

    /// Reject parameters no honest exporter would write
    pub fn check_bounds(&self) -> PorterResult<()> {
        if self.memory_cost > MAX_MEMORY_COST {
            return Err(PorterError::Encryption(format!(
                "Memory cost {} KiB exceeds limit of {} KiB",
                self.memory_cost, MAX_MEMORY_COST
            )));
        }
        if self.time_cost > MAX_TIME_COST {
            return Err(PorterError::Encryption(format!(
                "Time cost {} exceeds limit of {}",
                self.time_cost, MAX_TIME_COST
            )));
        }
        Ok(())
    }
}

/// A derived encryption key, zeroed on drop
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct DerivedKey {
    key: [u8; 32],
}

impl DerivedKey {
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.key
    }
}

/// Derive an encryption key from a password
pub fn derive_key(password: &str, params: &KeyDerivationParams) -> PorterResult<DerivedKey> {
    params.check_bounds()?;

    let salt = SaltString::from_b64(&params.salt)
        .map_err(|e| PorterError::Encryption(format!("Invalid salt: {}", e)))?;

    let argon2_params = Params::new(
        params.memory_cost,
        params.time_cost,
        params.parallelism,
        Some(32), // Output length for AES-256
    )
    .map_err(|e| PorterError::Encryption(format!("Invalid Argon2 parameters: {}", e)))?;

    let argon2 = Argon2::new(
        argon2::Algorithm::Argon2id,
        argon2::Version::V0x13,
        argon2_params,
    );

    let hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| PorterError::Encryption(format!("Key derivation failed: {}", e)))?;

    let hash_output = hash
        .hash
        .ok_or_else(|| PorterError::Encryption("No hash output generated".to_string()))?;

    let hash_bytes = hash_output.as_bytes();
    if hash_bytes.len() < 32 {
        return Err(PorterError::Encryption(
            "Hash output too short for AES-256 key".to_string(),
        ));
    }

    let mut key = [0u8; 32];
    key.copy_from_slice(&hash_bytes[..32]);

    Ok(DerivedKey { key })
}
