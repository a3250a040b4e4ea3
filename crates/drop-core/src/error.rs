//! Error taxonomy for upload and retrieval

use drop_crypto::CryptoError;
use drop_store::StoreError;
use thiserror::Error;

/// Result type alias using `DropError`
pub type Result<T> = std::result::Result<T, DropError>;

/// Errors surfaced by the lifecycle controller
///
/// Nothing here is retried automatically; a caller may re-invoke the whole
/// operation. `NotFound` deliberately does not distinguish "never existed",
/// "expired", and "already retrieved".
#[derive(Error, Debug)]
pub enum DropError {
    /// The file exceeds the configured maximum upload size
    #[error("file too large: {size} bytes exceeds maximum {max} bytes")]
    SizeLimit { size: u64, max: u64 },

    /// The submitted code is malformed (rejected locally, no store query)
    #[error("invalid code: {0}")]
    InvalidCode(String),

    /// No live object under this code
    #[error("invalid or expired code")]
    NotFound,

    /// The object existed but its expiry deadline has passed
    #[error("file has expired")]
    Expired,

    /// The stored payload is not validly encoded
    #[error("corrupt payload: {0}")]
    Format(String),

    /// Unwrapping or decrypting failed (wrong master key or corrupted data)
    #[error("decryption failed: {0}")]
    Decryption(#[from] CryptoError),

    /// The store backend failed
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// Invalid startup configuration (fatal, checked once at construction)
    #[error("configuration error: {0}")]
    Config(String),
}
