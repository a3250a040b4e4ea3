//! Error types for the drop-store crate

use thiserror::Error;

/// Result type alias using `StoreError`
pub type Result<T> = std::result::Result<T, StoreError>;

/// Errors surfaced by a store backend
///
/// An absent key is NOT an error; `get` returns `Ok(None)` and `remove` of
/// an absent key succeeds. These variants cover genuine backend failures.
#[derive(Error, Debug)]
pub enum StoreError {
    /// HTTP transport error
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// The backend rejected or failed the operation
    #[error("store backend error: {0}")]
    Backend(String),

    /// The backend returned a record we could not decode
    #[error("store serialization error: {0}")]
    Serialization(String),
}
