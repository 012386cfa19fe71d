//! AES-256-GCM sealing of snapshot text
//!
//! The artifact header (algorithm, envelope version, key-derivation
//! parameters) is passed in as associated data. It travels in the clear but
//! is authenticated with the ciphertext, so an edited header fails to open.

use aes_gcm::aead::rand_core::RngCore;
use aes_gcm::{
    aead::{Aead, KeyInit, OsRng, Payload},
    Aes256Gcm, Nonce,
};
use base64::{engine::general_purpose::STANDARD, Engine};
use serde::{Deserialize, Serialize};

use crate::error::{PorterError, PorterResult};

use super::DerivedKey;

/// AES-GCM nonce length in bytes
pub const NONCE_SIZE: usize = 12;

/// Nonce and ciphertext (tag appended), both base64
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SealedPayload {
    pub nonce: String,
    pub ciphertext: String,
}

fn cipher_for(key: &DerivedKey) -> Aes256Gcm {
    Aes256Gcm::new(key.as_bytes().into())
}

/// Seal `plaintext` under `key`, binding `header` as associated data
pub fn seal(plaintext: &[u8], key: &DerivedKey, header: &[u8]) -> PorterResult<SealedPayload> {
    let mut nonce_bytes = [0u8; NONCE_SIZE];
    OsRng.fill_bytes(&mut nonce_bytes);

    let ciphertext = cipher_for(key)
        .encrypt(
            Nonce::from_slice(&nonce_bytes),
            Payload {
                msg: plaintext,
                aad: header,
            },
        )
        .map_err(|e| PorterError::Encryption(format!("Sealing failed: {}", e)))?;

    Ok(SealedPayload {
        nonce: STANDARD.encode(nonce_bytes),
        ciphertext: STANDARD.encode(ciphertext),
    })
}

/// Open a sealed payload
///
/// Every failure is a [`PorterError::DecryptionFailed`]: a wrong key, an
/// edited header and a damaged payload are indistinguishable here.
pub fn open(payload: &SealedPayload, key: &DerivedKey, header: &[u8]) -> PorterResult<Vec<u8>> {
    let nonce_bytes = STANDARD
        .decode(&payload.nonce)
        .map_err(|_| PorterError::DecryptionFailed("nonce is not valid base64".to_string()))?;
    if nonce_bytes.len() != NONCE_SIZE {
        return Err(PorterError::DecryptionFailed(format!(
            "nonce is {} bytes, expected {}",
            nonce_bytes.len(),
            NONCE_SIZE
        )));
    }

    let ciphertext = STANDARD
        .decode(&payload.ciphertext)
        .map_err(|_| PorterError::DecryptionFailed("ciphertext is not valid base64".to_string()))?;

    cipher_for(key)
        .decrypt(
            Nonce::from_slice(&nonce_bytes),
            Payload {
                msg: &ciphertext,
                aad: header,
            },
        )
        .map_err(|_| {
            PorterError::DecryptionFailed("wrong password or corrupted backup".to_string())
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::settings::KdfSettings;
    use crate::crypto::key_derivation::{derive_key, KeyDerivationParams};

    const HEADER: &[u8] = br#"{"algorithm":"argon2id-aes256gcm","version":1}"#;

    fn test_key(password: &str) -> DerivedKey {
        let params = KeyDerivationParams::generate(&KdfSettings::fast());
        derive_key(password, &params).unwrap()
    }

    #[test]
    fn test_seal_then_open() {
        let key = test_key("test_password");
        let sealed = seal(b"{\"items\": []}", &key, HEADER).unwrap();
        assert_eq!(open(&sealed, &key, HEADER).unwrap(), b"{\"items\": []}");
    }

    #[test]
    fn test_fresh_nonce_per_seal() {
        let key = test_key("test_password");
        let first = seal(b"same", &key, HEADER).unwrap();
        let second = seal(b"same", &key, HEADER).unwrap();

        assert_ne!(first.nonce, second.nonce);
        assert_ne!(first.ciphertext, second.ciphertext);
    }

    #[test]
    fn test_edited_header_fails() {
        let key = test_key("test_password");
        let sealed = seal(b"secret", &key, HEADER).unwrap();

        let err = open(&sealed, &key, br#"{"algorithm":"argon2id-aes256gcm","version":2}"#)
            .unwrap_err();
        assert!(err.is_decryption_failure());
    }

    #[test]
    fn test_wrong_key_fails() {
        let sealed = seal(b"secret", &test_key("one"), HEADER).unwrap();
        assert!(open(&sealed, &test_key("two"), HEADER)
            .unwrap_err()
            .is_decryption_failure());
    }

    #[test]
    fn test_damaged_payload_fails() {
        let key = test_key("test_password");
        let mut sealed = seal(b"Hello, World!", &key, HEADER).unwrap();

        let mut ciphertext = STANDARD.decode(&sealed.ciphertext).unwrap();
        ciphertext[0] ^= 0xFF;
        sealed.ciphertext = STANDARD.encode(&ciphertext);
        assert!(open(&sealed, &key, HEADER).unwrap_err().is_decryption_failure());

        sealed.nonce = STANDARD.encode([0u8; 4]);
        let err = open(&sealed, &key, HEADER).unwrap_err();
        assert!(err.to_string().contains("nonce is 4 bytes"));
    }
}
