//! # Drop Store
//!
//! Object store adapter for the Codedrop ephemeral file-sharing system.
//!
//! This crate provides:
//! - **Record model**: The persisted unit, one JSON record per live code
//! - **ObjectStore trait**: put/get/remove against any key-value backend
//! - **MemoryStore**: DashMap-backed store for tests and demos
//! - **RestStore**: Remote JSON REST key-value database over HTTP
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │          Lifecycle Controller           │
//! ├─────────────────────────────────────────┤
//! │           ObjectStore Trait             │
//! ├────────────────────┬────────────────────┤
//! │     RestStore      │    MemoryStore     │
//! ├────────────────────┴────────────────────┤
//! │        Remote key-value database        │
//! └─────────────────────────────────────────┘
//! ```

pub mod error;
pub mod memory;
pub mod record;
pub mod rest;

pub use error::{Result, StoreError};
pub use memory::MemoryStore;
pub use record::{ObjectRecord, Payload};
pub use rest::{RestConfig, RestStore};

use async_trait::async_trait;

/// Trait for object store backends
///
/// Absence is a normal outcome throughout: an expired, never-written, or
/// already-consumed code looks identical from the outside.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Create a record under its code
    async fn put(&self, record: &ObjectRecord) -> Result<()>;

    /// Fetch a record by code; `None` when absent
    async fn get(&self, code: &str) -> Result<Option<ObjectRecord>>;

    /// Delete a record; idempotent, absent keys are fine
    async fn remove(&self, code: &str) -> Result<()>;

    /// Fetch and delete in one step
    ///
    /// The default is a plain get-then-remove, which leaves a narrow window
    /// where two readers both observe the record. Backends with an atomic
    /// primitive should override it.
    async fn take(&self, code: &str) -> Result<Option<ObjectRecord>> {
        match self.get(code).await? {
            Some(record) => {
                self.remove(code).await?;
                Ok(Some(record))
            }
            None => Ok(None),
        }
    }
}
