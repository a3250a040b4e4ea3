//! # Drop Crypto
//!
//! Envelope encryption for the Codedrop ephemeral file-sharing system.
//!
//! This crate provides:
//! - **Content keys**: Random 128-bit per-object keys for payload encryption
//! - **Master key**: A fixed process-wide key that only wraps content keys
//! - **Sealed blobs**: A versioned base64 wire form for ciphertexts
//!
//! ## Security Model
//!
//! Each stored object is encrypted under its own content key; the content
//! key travels with the object, wrapped under the master key. The store
//! never sees plaintext or an unwrapped key. A reader that does not hold
//! the master key cannot recover either.
//!
//! ## Example
//!
//! ```rust,ignore
//! use drop_crypto::{ContentKey, MasterKey, envelope};
//!
//! let master = MasterKey::from_passphrase("configured-at-startup")?;
//! let content = ContentKey::generate();
//!
//! let sealed = envelope::encrypt_payload(b"file bytes", &content)?;
//! let wrapped = envelope::wrap_key(&content, &master)?;
//!
//! let key = envelope::unwrap_key(&wrapped, &master)?;
//! let plaintext = envelope::decrypt_payload(&sealed, &key)?;
//! ```

pub mod envelope;
pub mod error;
pub mod keys;

pub use envelope::{
    decrypt_payload, encrypt_payload, unwrap_key, wrap_key, SealedBlob, ENVELOPE_VERSION,
};
pub use error::{CryptoError, Result};
pub use keys::{ContentKey, MasterKey, CONTENT_KEY_SIZE, MASTER_KEY_SIZE, NONCE_SIZE};
