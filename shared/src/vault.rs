//! Encryption of broker credentials at rest
//!
//! AES-256-GCM with a key derived from the configured secret via
//! PBKDF2-HMAC-SHA256. Stored form: base64(`nonce || ciphertext`).

use aes_gcm::aead::{Aead, AeadCore, KeyInit, OsRng};
use aes_gcm::{Aes256Gcm, Nonce};
use base64::{engine::general_purpose, Engine as _};
use pbkdf2::pbkdf2_hmac;
use sha2::Sha256;
use thiserror::Error;

const KEY_SALT: &[u8] = b"condor.broker-credentials.v1";
const KEY_ROUNDS: u32 = 100_000;
const NONCE_LEN: usize = 12;

#[derive(Debug, Error)]
pub enum VaultError {
    #[error("credentials secret must not be empty")]
    EmptySecret,
    #[error("encryption failed")]
    Encrypt,
    #[error("stored credential is not valid base64")]
    Encoding(#[from] base64::DecodeError),
    #[error("stored credential is truncated")]
    Truncated,
    #[error("stored credential could not be decrypted")]
    Decrypt,
    #[error("decrypted credential is not valid UTF-8")]
    Utf8(#[from] std::string::FromUtf8Error),
}

#[derive(Clone)]
pub struct CredentialVault {
    cipher: Aes256Gcm,
}

impl CredentialVault {
    pub fn new(secret: &str) -> Result<Self, VaultError> {
        if secret.trim().is_empty() {
            return Err(VaultError::EmptySecret);
        }
        let mut key = [0u8; 32];
        pbkdf2_hmac::<Sha256>(secret.as_bytes(), KEY_SALT, KEY_ROUNDS, &mut key);
        let cipher = Aes256Gcm::new_from_slice(&key).map_err(|_| VaultError::Encrypt)?;
        Ok(Self { cipher })
    }

    pub fn encrypt(&self, plaintext: &str) -> Result<String, VaultError> {
        let nonce = Aes256Gcm::generate_nonce(&mut OsRng);
        let ciphertext = self
            .cipher
            .encrypt(&nonce, plaintext.as_bytes())
            .map_err(|_| VaultError::Encrypt)?;

        let mut stored = Vec::with_capacity(NONCE_LEN + ciphertext.len());
        stored.extend_from_slice(nonce.as_slice());
        stored.extend_from_slice(&ciphertext);
        Ok(general_purpose::STANDARD.encode(stored))
    }

    pub fn decrypt(&self, stored: &str) -> Result<String, VaultError> {
        let bytes = general_purpose::STANDARD.decode(stored.trim())?;
        if bytes.len() <= NONCE_LEN {
            return Err(VaultError::Truncated);
        }
        let (nonce, ciphertext) = bytes.split_at(NONCE_LEN);
        let plaintext = self
            .cipher
            .decrypt(Nonce::from_slice(nonce), ciphertext)
            .map_err(|_| VaultError::Decrypt)?;
        Ok(String::from_utf8(plaintext)?)
    }
}

impl std::fmt::Debug for CredentialVault {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("CredentialVault(..)")
    }
}

/// Show only the last four characters, e.g. `****9f3a`
pub fn mask(secret: &str) -> String {
    let chars: Vec<char> = secret.chars().collect();
    if chars.len() <= 4 {
        return "****".to_string();
    }
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("****{}", tail)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encrypt_then_decrypt() {
        let vault = CredentialVault::new("unit-test-secret").unwrap();
        let stored = vault.encrypt("AKIA-broker-key").unwrap();
        assert_ne!(stored, "AKIA-broker-key");
        assert_eq!(vault.decrypt(&stored).unwrap(), "AKIA-broker-key");
    }

    #[test]
    fn test_nonce_differs_per_encryption() {
        let vault = CredentialVault::new("unit-test-secret").unwrap();
        assert_ne!(vault.encrypt("same").unwrap(), vault.encrypt("same").unwrap());
    }

    #[test]
    fn test_wrong_secret_fails() {
        let stored = CredentialVault::new("secret-a").unwrap().encrypt("key").unwrap();
        let other = CredentialVault::new("secret-b").unwrap();
        assert!(matches!(other.decrypt(&stored), Err(VaultError::Decrypt)));
    }

    #[test]
    fn test_rejects_garbage() {
        let vault = CredentialVault::new("unit-test-secret").unwrap();
        assert!(matches!(vault.decrypt("not base64!"), Err(VaultError::Encoding(_))));
        assert!(matches!(vault.decrypt("AAAA"), Err(VaultError::Truncated)));
        assert!(matches!(CredentialVault::new("  "), Err(VaultError::EmptySecret)));
    }

    #[test]
    fn test_mask() {
        assert_eq!(mask("abcdef123456"), "****3456");
        assert_eq!(mask("abc"), "****");
    }
}
