//! Envelope encryption primitives
//!
//! The payload is encrypted under a random per-object `ContentKey`
//! (AES-128-GCM); the content key is then wrapped under the process-wide
//! `MasterKey` (AES-256-GCM). Both outputs are carried as [`SealedBlob`]s,
//! a versioned base64 text form that fits inside a JSON record.

use crate::{
    keys::{ContentKey, MasterKey, NONCE_SIZE},
    CryptoError, Result,
};
use aes_gcm::{
    aead::Aead as AeadTrait,
    Aes128Gcm, Aes256Gcm, KeyInit,
};
use base64::Engine;
use rand::rngs::OsRng;

/// Current version of the sealed blob format
pub const ENVELOPE_VERSION: u8 = 1;

/// A nonce plus ciphertext, produced by one AEAD operation
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SealedBlob {
    nonce: [u8; NONCE_SIZE],
    ciphertext: Vec<u8>,
}

impl SealedBlob {
    /// Get the nonce bytes
    pub fn nonce(&self) -> &[u8; NONCE_SIZE] {
        &self.nonce
    }

    /// Get the ciphertext bytes
    pub fn ciphertext(&self) -> &[u8] {
        &self.ciphertext
    }

    /// Encode as base64 text: `version || nonce || ciphertext`
    pub fn to_base64(&self) -> String {
        let mut raw = Vec::with_capacity(1 + NONCE_SIZE + self.ciphertext.len());
        raw.push(ENVELOPE_VERSION);
        raw.extend_from_slice(&self.nonce);
        raw.extend_from_slice(&self.ciphertext);
        base64::engine::general_purpose::STANDARD.encode(raw)
    }

    /// Decode from the base64 text form
    pub fn from_base64(s: &str) -> Result<Self> {
        let raw = base64::engine::general_purpose::STANDARD.decode(s.trim())?;
        if raw.len() < 1 + NONCE_SIZE {
            return Err(CryptoError::InvalidBlob(format!(
                "sealed blob too short: {} bytes",
                raw.len()
            )));
        }
        if raw[0] != ENVELOPE_VERSION {
            return Err(CryptoError::InvalidBlob(format!(
                "unsupported sealed blob version {}",
                raw[0]
            )));
        }
        let mut nonce = [0u8; NONCE_SIZE];
        nonce.copy_from_slice(&raw[1..1 + NONCE_SIZE]);
        Ok(Self {
            nonce,
            ciphertext: raw[1 + NONCE_SIZE..].to_vec(),
        })
    }
}

fn random_nonce() -> [u8; NONCE_SIZE] {
    let mut nonce = [0u8; NONCE_SIZE];
    rand::RngCore::fill_bytes(&mut OsRng, &mut nonce);
    nonce
}

/// Encrypt a payload under a content key
pub fn encrypt_payload(plaintext: &[u8], key: &ContentKey) -> Result<SealedBlob> {
    let nonce = random_nonce();
    let cipher = Aes128Gcm::new_from_slice(key.as_bytes())
        .map_err(|e| CryptoError::Encryption(e.to_string()))?;
    let ciphertext = cipher
        .encrypt(aes_gcm::Nonce::from_slice(&nonce), plaintext)
        .map_err(|e| CryptoError::Encryption(e.to_string()))?;
    Ok(SealedBlob { nonce, ciphertext })
}

/// Decrypt a payload under a content key
pub fn decrypt_payload(sealed: &SealedBlob, key: &ContentKey) -> Result<Vec<u8>> {
    let cipher = Aes128Gcm::new_from_slice(key.as_bytes())
        .map_err(|e| CryptoError::Decryption(e.to_string()))?;
    cipher
        .decrypt(
            aes_gcm::Nonce::from_slice(&sealed.nonce),
            sealed.ciphertext.as_slice(),
        )
        .map_err(|e| CryptoError::Decryption(e.to_string()))
}

/// Wrap a content key under the master key
pub fn wrap_key(content_key: &ContentKey, master_key: &MasterKey) -> Result<SealedBlob> {
    let nonce = random_nonce();
    let cipher = Aes256Gcm::new_from_slice(master_key.as_bytes())
        .map_err(|e| CryptoError::Encryption(e.to_string()))?;
    let ciphertext = cipher
        .encrypt(
            aes_gcm::Nonce::from_slice(&nonce),
            content_key.as_bytes().as_slice(),
        )
        .map_err(|e| CryptoError::Encryption(e.to_string()))?;
    Ok(SealedBlob { nonce, ciphertext })
}

/// Unwrap a content key using the master key
///
/// Fails with [`CryptoError::Decryption`] when the master key is wrong or
/// the envelope is corrupted.
pub fn unwrap_key(sealed: &SealedBlob, master_key: &MasterKey) -> Result<ContentKey> {
    let cipher = Aes256Gcm::new_from_slice(master_key.as_bytes())
        .map_err(|e| CryptoError::Decryption(e.to_string()))?;
    let bytes = cipher
        .decrypt(
            aes_gcm::Nonce::from_slice(&sealed.nonce),
            sealed.ciphertext.as_slice(),
        )
        .map_err(|e| CryptoError::Decryption(e.to_string()))?;
    ContentKey::from_bytes(&bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_payload_roundtrip() {
        let key = ContentKey::generate();
        let plaintext = b"Hello, World!";

        let sealed = encrypt_payload(plaintext, &key).unwrap();
        let decrypted = decrypt_payload(&sealed, &key).unwrap();

        assert_eq!(plaintext.as_slice(), decrypted.as_slice());
    }

    #[test]
    fn test_wrap_unwrap_roundtrip() {
        let master = MasterKey::from_passphrase("master").unwrap();
        let content = ContentKey::generate();

        let envelope = wrap_key(&content, &master).unwrap();
        let unwrapped = unwrap_key(&envelope, &master).unwrap();

        assert_eq!(content.as_bytes(), unwrapped.as_bytes());
    }

    #[test]
    fn test_full_envelope_roundtrip() {
        let master = MasterKey::from_passphrase("master").unwrap();
        let content = ContentKey::generate();
        let plaintext = b"payload under envelope";

        let sealed = encrypt_payload(plaintext, &content).unwrap();
        let envelope = wrap_key(&content, &master).unwrap();

        let unwrapped = unwrap_key(&envelope, &master).unwrap();
        let decrypted = decrypt_payload(&sealed, &unwrapped).unwrap();

        assert_eq!(plaintext.as_slice(), decrypted.as_slice());
    }

    #[test]
    fn test_wrong_master_key_fails_to_unwrap() {
        let master = MasterKey::from_passphrase("right").unwrap();
        let wrong = MasterKey::from_passphrase("wrong").unwrap();
        let content = ContentKey::generate();

        let envelope = wrap_key(&content, &master).unwrap();
        let result = unwrap_key(&envelope, &wrong);

        assert!(matches!(result, Err(CryptoError::Decryption(_))));
    }

    #[test]
    fn test_wrong_content_key_fails_to_decrypt() {
        let key = ContentKey::generate();
        let other = ContentKey::generate();

        let sealed = encrypt_payload(b"secret", &key).unwrap();
        let result = decrypt_payload(&sealed, &other);

        assert!(matches!(result, Err(CryptoError::Decryption(_))));
    }

    #[test]
    fn test_tampered_ciphertext_fails() {
        let key = ContentKey::generate();
        let mut sealed = encrypt_payload(b"secret", &key).unwrap();
        sealed.ciphertext[0] ^= 0xFF;

        assert!(decrypt_payload(&sealed, &key).is_err());
    }

    #[test]
    fn test_sealed_blob_base64_roundtrip() {
        let key = ContentKey::generate();
        let sealed = encrypt_payload(b"wire form", &key).unwrap();

        let encoded = sealed.to_base64();
        let decoded = SealedBlob::from_base64(&encoded).unwrap();

        assert_eq!(sealed, decoded);
        assert_eq!(decrypt_payload(&decoded, &key).unwrap(), b"wire form");
    }

    #[test]
    fn test_sealed_blob_rejects_garbage() {
        assert!(SealedBlob::from_base64("not!!base64").is_err());
        // Valid base64 but too short to hold version + nonce
        assert!(SealedBlob::from_base64("AAECAw==").is_err());
    }

    #[test]
    fn test_sealed_blob_rejects_unknown_version() {
        let mut raw = vec![99u8];
        raw.extend_from_slice(&[0u8; NONCE_SIZE]);
        raw.extend_from_slice(b"ciphertext");
        let encoded = base64::engine::general_purpose::STANDARD.encode(raw);
        assert!(matches!(
            SealedBlob::from_base64(&encoded),
            Err(CryptoError::InvalidBlob(_))
        ));
    }

    proptest! {
        #[test]
        fn prop_payload_roundtrip(data in proptest::collection::vec(any::<u8>(), 0..4096)) {
            let key = ContentKey::generate();
            let sealed = encrypt_payload(&data, &key).unwrap();
            let decrypted = decrypt_payload(&sealed, &key).unwrap();
            prop_assert_eq!(data, decrypted);
        }
    }
}
