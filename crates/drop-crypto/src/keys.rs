//! Key material for envelope encryption
//!
//! Two key types exist:
//! - `ContentKey`: a random per-object symmetric key encrypting one payload
//! - `MasterKey`: a fixed process-wide key used only to wrap content keys

use crate::{CryptoError, Result};
use rand::rngs::OsRng;
use sha2::{Digest, Sha256};
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Size of a content key in bytes (128 bits)
pub const CONTENT_KEY_SIZE: usize = 16;

/// Size of the master key in bytes (256 bits)
pub const MASTER_KEY_SIZE: usize = 32;

/// Size of an AEAD nonce in bytes (96 bits)
pub const NONCE_SIZE: usize = 12;

/// A random per-object content key
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct ContentKey {
    key: [u8; CONTENT_KEY_SIZE],
}

impl ContentKey {
    /// Generate a new random content key
    pub fn generate() -> Self {
        let mut key = [0u8; CONTENT_KEY_SIZE];
        rand::RngCore::fill_bytes(&mut OsRng, &mut key);
        Self { key }
    }

    /// Create a content key from raw bytes
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.len() != CONTENT_KEY_SIZE {
            return Err(CryptoError::InvalidKey(format!(
                "content key must be {} bytes, got {}",
                CONTENT_KEY_SIZE,
                bytes.len()
            )));
        }
        let mut key = [0u8; CONTENT_KEY_SIZE];
        key.copy_from_slice(bytes);
        Ok(Self { key })
    }

    /// Get the key bytes
    pub fn as_bytes(&self) -> &[u8; CONTENT_KEY_SIZE] {
        &self.key
    }
}

impl std::fmt::Debug for ContentKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ContentKey(..)")
    }
}

/// The process-wide master key
///
/// Loaded once at startup from configuration. Never persisted alongside a
/// stored object and never handed to the retrieving side except implicitly
/// through a successful unwrap.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct MasterKey {
    key: [u8; MASTER_KEY_SIZE],
}

impl MasterKey {
    /// Derive a master key from a passphrase string
    ///
    /// The passphrase is hashed once with SHA-256 so operators can configure
    /// an arbitrary-length secret.
    pub fn from_passphrase(passphrase: &str) -> Result<Self> {
        if passphrase.is_empty() {
            return Err(CryptoError::InvalidKey(
                "master key passphrase must not be empty".to_string(),
            ));
        }
        let digest = Sha256::digest(passphrase.as_bytes());
        let mut key = [0u8; MASTER_KEY_SIZE];
        key.copy_from_slice(&digest);
        Ok(Self { key })
    }

    /// Create a master key from raw bytes
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.len() != MASTER_KEY_SIZE {
            return Err(CryptoError::InvalidKey(format!(
                "master key must be {} bytes, got {}",
                MASTER_KEY_SIZE,
                bytes.len()
            )));
        }
        let mut key = [0u8; MASTER_KEY_SIZE];
        key.copy_from_slice(bytes);
        Ok(Self { key })
    }

    /// Get the key bytes
    pub fn as_bytes(&self) -> &[u8; MASTER_KEY_SIZE] {
        &self.key
    }
}

impl std::fmt::Debug for MasterKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "MasterKey(..)")
    }
}
