use aes_gcm::aead::{Aead, KeyInit};
use aes_gcm::Aes256Gcm;
use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use rand::RngCore;
use thiserror::Error;

const FORMAT_VERSION: u8 = 0x01;
const NONCE_LEN: usize = 12;

/// Cryptographic errors
#[derive(Debug, Error)]
pub enum CryptoError {
    #[error("Invalid key: {0}")]
    InvalidKey(String),
    #[error("Encryption failed: {0}")]
    Encryption(String),
    #[error("Decryption failed: {0}")]
    Decryption(String),
    #[error("Invalid data: {0}")]
    InvalidData(String),
}

/// Seals the credential file at rest with AES-256-GCM.
///
/// Sealed output is base64 of `[version_byte][nonce(12)][ciphertext]`.
pub struct CredentialCipher {
    cipher: Aes256Gcm,
}

impl CredentialCipher {
    /// Build a cipher from a 64-character hex key.
    pub fn from_hex(key_hex: &str) -> Result<Self, CryptoError> {
        let key_bytes = hex::decode(key_hex.trim())
            .map_err(|e| CryptoError::InvalidKey(format!("not valid hex: {}", e)))?;

        let key: [u8; 32] = key_bytes.try_into().map_err(|_| {
            CryptoError::InvalidKey("credential key must be 32 bytes (64 hex characters)".to_string())
        })?;

        Ok(Self {
            cipher: Aes256Gcm::new(&key.into()),
        })
    }

    pub fn seal(&self, plaintext: &[u8]) -> Result<String, CryptoError> {
        let mut nonce = [0u8; NONCE_LEN];
        rand::rngs::OsRng.fill_bytes(&mut nonce);

        let ciphertext = self
            .cipher
            .encrypt((&nonce).into(), plaintext)
            .map_err(|e| CryptoError::Encryption(e.to_string()))?;

        let mut sealed = Vec::with_capacity(1 + NONCE_LEN + ciphertext.len());
        sealed.push(FORMAT_VERSION);
        sealed.extend_from_slice(&nonce);
        sealed.extend_from_slice(&ciphertext);

        Ok(BASE64.encode(sealed))
    }

    pub fn open(&self, sealed_b64: &str) -> Result<Vec<u8>, CryptoError> {
        let sealed = BASE64
            .decode(sealed_b64.trim())
            .map_err(|e| CryptoError::InvalidData(format!("not valid base64: {}", e)))?;

        let Some((&version, rest)) = sealed.split_first() else {
            return Err(CryptoError::InvalidData("sealed data is empty".to_string()));
        };
        if version != FORMAT_VERSION {
            return Err(CryptoError::InvalidData(format!(
                "unsupported format version: {}",
                version
            )));
        }
        if rest.len() < NONCE_LEN {
            return Err(CryptoError::InvalidData("sealed data is truncated".to_string()));
        }

        let (nonce, ciphertext) = rest.split_at(NONCE_LEN);
        let nonce: [u8; NONCE_LEN] = nonce
            .try_into()
            .map_err(|_| CryptoError::InvalidData("failed to extract nonce".to_string()))?;

        self.cipher
            .decrypt((&nonce).into(), ciphertext)
            .map_err(|e| CryptoError::Decryption(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const KEY: &str = "0123456789abcdef0123456789abcdef0123456789abcdef0123456789abcdef";

    #[test]
    fn test_seal_open() {
        let cipher = CredentialCipher::from_hex(KEY).expect("valid key");
        let sealed = cipher.seal(b"{\"token\":\"abc\"}").expect("seal failed");
        let opened = cipher.open(&sealed).expect("open failed");

        assert_eq!(opened, b"{\"token\":\"abc\"}");
    }

    #[test]
    fn test_fresh_nonce_per_seal() {
        let cipher = CredentialCipher::from_hex(KEY).expect("valid key");
        let first = cipher.seal(b"same").expect("seal 1 failed");
        let second = cipher.seal(b"same").expect("seal 2 failed");

        assert_ne!(first, second);
    }

    #[test]
    fn test_wrong_key_fails_to_open() {
        let sealer = CredentialCipher::from_hex(KEY).expect("valid key");
        let other = CredentialCipher::from_hex(&"ab".repeat(32)).expect("valid key");
        let sealed = sealer.seal(b"secret").expect("seal failed");

        assert!(matches!(other.open(&sealed), Err(CryptoError::Decryption(_))));
    }

    #[test]
    fn test_short_key_is_rejected() {
        assert!(matches!(
            CredentialCipher::from_hex("abcd"),
            Err(CryptoError::InvalidKey(_))
        ));
    }
}
