//! The persisted record shape
//!
//! One record per live code, wire-compatible with the JSON form the remote
//! key-value store holds:
//!
//! ```json
//! {
//!   "code": "Q9042Y",
//!   "fileName": "report.pdf",
//!   "fileSize": 35226,
//!   "fileType": "application/pdf",
//!   "data": "<encoded or ciphertext string>",
//!   "encryptedKey": "<wrapped content key, only when encrypted>",
//!   "uploadedAt": 1683717045813,
//!   "expiresAt": 1683721245813
//! }
//! ```

use serde::{Deserialize, Serialize};

/// The stored payload, either plain transport encoding or ciphertext
///
/// Modeled as a tagged variant so retrieval logic is exhaustive instead of
/// sniffing for an optional field. On the wire the variants flatten into
/// `data` plus an `encryptedKey` that is only present for encrypted records.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Payload {
    /// Ciphertext plus the wrapped per-object content key
    #[serde(rename_all = "camelCase")]
    Encrypted {
        /// Sealed payload ciphertext (base64 text form)
        data: String,
        /// Content key wrapped under the master key (base64 text form)
        encrypted_key: String,
    },
    /// Transport-encoded plaintext (`data:<mime>;base64,...`)
    Plain {
        /// The encoded payload
        data: String,
    },
}

impl Payload {
    /// Whether this payload carries a wrapped content key
    pub fn is_encrypted(&self) -> bool {
        matches!(self, Payload::Encrypted { .. })
    }
}

/// One stored object, keyed by its share code
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectRecord {
    /// The 6-character share code, doubling as the lookup key
    pub code: String,
    /// Original file name
    pub file_name: String,
    /// Size in bytes before transport encoding
    pub file_size: u64,
    /// Declared MIME type
    pub file_type: String,
    /// The payload, plain or encrypted
    #[serde(flatten)]
    pub payload: Payload,
    /// Upload timestamp, milliseconds since the epoch
    pub uploaded_at: i64,
    /// Expiry deadline, milliseconds since the epoch; immutable once set
    pub expires_at: i64,
}

impl ObjectRecord {
    /// Whether the record has passed its expiry deadline
    pub fn is_expired(&self, now_ms: i64) -> bool {
        now_ms >= self.expires_at
    }

    /// Milliseconds until expiry (zero when already expired)
    pub fn remaining_ms(&self, now_ms: i64) -> i64 {
        (self.expires_at - now_ms).max(0)
    }
}
