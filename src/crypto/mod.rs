//! Cryptographic functions for account-porter
//!
//! Provides AES-256-GCM encryption with Argon2id key derivation behind the
//! [`CipherProvider`] contract used by export and import.

pub mod encryption;
pub mod key_derivation;
pub mod provider;
pub mod secure_memory;

pub use encryption::{open, seal, SealedPayload};
pub use key_derivation::{derive_key, DerivedKey, KeyDerivationParams};
pub use provider::{CipherProvider, PasswordCheck, PasswordCipher, ALGORITHM_ID};
pub use secure_memory::SecureString;
