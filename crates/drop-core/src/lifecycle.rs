//! The per-object lifecycle state machine
//!
//! Each stored object moves `Uploading -> Stored -> {Retrieved, Expired}`.
//! The single deletion on first successful read or first observed expiry is
//! what enforces at-most-once retrieval; the per-object expiry task is
//! advisory cleanup on top, since retrieval re-checks the deadline itself.

use crate::{
    code::ShareCode,
    codec,
    config::DropConfig,
    DropError, Result,
};
use bytes::Bytes;
use dashmap::DashMap;
use drop_crypto::{envelope, ContentKey, CryptoError, SealedBlob};
use drop_store::{ObjectRecord, ObjectStore, Payload, StoreError};
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

/// Attempts at drawing a non-colliding code before giving up
const MAX_CODE_ATTEMPTS: usize = 16;

/// Receipt handed back after a successful upload
#[derive(Clone, Debug)]
pub struct UploadReceipt {
    /// The share code, the only credential a recipient needs
    pub code: ShareCode,
    /// Upload timestamp, milliseconds since the epoch
    pub uploaded_at: i64,
    /// Expiry deadline, milliseconds since the epoch
    pub expires_at: i64,
}

/// A retrieved file, decoded and decrypted
#[derive(Clone, Debug)]
pub struct RetrievedFile {
    /// The original file bytes
    pub bytes: Bytes,
    /// The original file name
    pub file_name: String,
    /// The declared MIME type
    pub mime_type: String,
}

/// The lifecycle controller
///
/// Orchestrates upload (code -> encrypt -> persist -> schedule expiry) and
/// retrieval (validate -> fetch -> expiry check -> decrypt -> deliver ->
/// delete) against any [`ObjectStore`] backend.
pub struct DropService<S: ObjectStore> {
    store: Arc<S>,
    config: DropConfig,
    sweepers: Arc<DashMap<String, JoinHandle<()>>>,
}

impl<S: ObjectStore + 'static> DropService<S> {
    /// Create a new service over a store backend
    pub fn new(store: S, config: DropConfig) -> Self {
        Self {
            store: Arc::new(store),
            config,
            sweepers: Arc::new(DashMap::new()),
        }
    }

    /// Access the underlying store
    pub fn store(&self) -> &S {
        self.store.as_ref()
    }

    /// Access the configuration
    pub fn config(&self) -> &DropConfig {
        &self.config
    }

    /// Upload a file, returning the share code and expiry deadline
    ///
    /// No partial state is created on failure: the size check runs before
    /// anything else, and a failed `put` leaves nothing behind.
    pub async fn upload(
        &self,
        bytes: &[u8],
        file_name: &str,
        mime_type: &str,
    ) -> Result<UploadReceipt> {
        let size = bytes.len() as u64;
        if size > self.config.max_file_size {
            return Err(DropError::SizeLimit {
                size,
                max: self.config.max_file_size,
            });
        }

        let code = self.allocate_code().await?;
        let encoded = codec::encode(bytes, mime_type);

        let payload = match self.config.master_key {
            Some(ref master_key) => {
                let content_key = ContentKey::generate();
                let sealed = envelope::encrypt_payload(encoded.as_bytes(), &content_key)?;
                let wrapped = envelope::wrap_key(&content_key, master_key)?;
                Payload::Encrypted {
                    data: sealed.to_base64(),
                    encrypted_key: wrapped.to_base64(),
                }
            }
            None => Payload::Plain { data: encoded },
        };

        let uploaded_at = now_ms();
        let expires_at = uploaded_at + self.config.expiry_ms();
        let record = ObjectRecord {
            code: code.as_str().to_string(),
            file_name: file_name.to_string(),
            file_size: size,
            file_type: mime_type.to_string(),
            payload,
            uploaded_at,
            expires_at,
        };

        self.store.put(&record).await?;
        self.schedule_sweep(&code);

        debug!(code = %code, size, expires_at, "stored object");
        Ok(UploadReceipt {
            code,
            uploaded_at,
            expires_at,
        })
    }

    /// Retrieve a file by share code
    ///
    /// Succeeds at most once per code: the record is deleted after the
    /// first successful decode. Decryption and format failures leave the
    /// record in place so a transient fault can be retried.
    pub async fn retrieve(&self, code: &str) -> Result<RetrievedFile> {
        let code = ShareCode::parse(code)?;

        let record = self
            .store
            .get(code.as_str())
            .await?
            .ok_or(DropError::NotFound)?;

        if record.is_expired(now_ms()) {
            self.store.remove(code.as_str()).await?;
            self.cancel_sweep(code.as_str());
            return Err(DropError::Expired);
        }

        let encoded = match record.payload {
            Payload::Plain { data } => data,
            Payload::Encrypted {
                data,
                encrypted_key,
            } => {
                let master_key = self.config.master_key.as_ref().ok_or_else(|| {
                    DropError::Decryption(CryptoError::InvalidKey(
                        "record is encrypted but no master key is configured".to_string(),
                    ))
                })?;
                let content_key =
                    envelope::unwrap_key(&SealedBlob::from_base64(&encrypted_key)?, master_key)?;
                let plaintext =
                    envelope::decrypt_payload(&SealedBlob::from_base64(&data)?, &content_key)?;
                String::from_utf8(plaintext)
                    .map_err(|_| DropError::Format("decrypted payload is not text".to_string()))?
            }
        };

        let (bytes, _) = codec::decode(&encoded)?;

        // First successful read wins; this removal is the only thing
        // enforcing at-most-once. With an atomic `take`, a reader that lost
        // the race sees `None` here and reports the object gone.
        if self.store.take(code.as_str()).await?.is_none() {
            self.cancel_sweep(code.as_str());
            return Err(DropError::NotFound);
        }
        self.cancel_sweep(code.as_str());

        debug!(code = %code, "object retrieved and removed");
        Ok(RetrievedFile {
            bytes: Bytes::from(bytes),
            file_name: record.file_name,
            mime_type: record.file_type,
        })
    }

    /// Draw codes until one is free in the store
    async fn allocate_code(&self) -> Result<ShareCode> {
        for _ in 0..MAX_CODE_ATTEMPTS {
            let code = ShareCode::generate();
            if self.store.get(code.as_str()).await?.is_none() {
                return Ok(code);
            }
            debug!(code = %code, "share code collision, regenerating");
        }
        Err(DropError::Store(StoreError::Backend(format!(
            "could not allocate a unique code in {} attempts",
            MAX_CODE_ATTEMPTS
        ))))
    }

    /// Spawn the advisory expiry task for one object
    ///
    /// Failures are logged and swallowed; the expiry check at retrieval
    /// time is the authoritative guard.
    fn schedule_sweep(&self, code: &ShareCode) {
        let store = Arc::clone(&self.store);
        let sweepers = Arc::clone(&self.sweepers);
        let key = code.as_str().to_string();
        let delay = self.config.expiry;

        let task_key = key.clone();
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            if let Err(e) = store.remove(&task_key).await {
                warn!(code = %task_key, error = %e, "expiry sweep failed");
            } else {
                debug!(code = %task_key, "expired object swept");
            }
            sweepers.remove(&task_key);
        });
        self.sweepers.insert(key, handle);
    }

    /// Cancel a pending expiry task; removal is idempotent anyway, so this
    /// is an optimization, not a correctness requirement
    fn cancel_sweep(&self, code: &str) {
        if let Some((_, handle)) = self.sweepers.remove(code) {
            handle.abort();
        }
    }

    /// Number of pending expiry tasks
    pub fn pending_sweeps(&self) -> usize {
        self.sweepers.len()
    }
}

impl<S: ObjectStore> Drop for DropService<S> {
    fn drop(&mut self) {
        for entry in self.sweepers.iter() {
            entry.value().abort();
        }
    }
}

fn now_ms() -> i64 {
    chrono::Utc::now().timestamp_millis()
}
