//! Service configuration
//!
//! Immutable after construction: loaded once, validated once, passed to the
//! lifecycle controller. A missing master key is a fatal startup error, not
//! a per-request one.

use crate::{DropError, Result};
use drop_crypto::MasterKey;
use std::time::Duration;

/// Environment variable holding the master key passphrase
pub const MASTER_KEY_ENV: &str = "DROP_MASTER_KEY";

/// Default maximum upload size (20 MiB)
pub const DEFAULT_MAX_FILE_SIZE: u64 = 20 * 1024 * 1024;

/// Default expiry window (69 minutes)
pub const DEFAULT_EXPIRY: Duration = Duration::from_secs(69 * 60);

/// Lifecycle controller configuration
#[derive(Clone, Debug)]
pub struct DropConfig {
    /// Maximum upload size in bytes
    pub max_file_size: u64,
    /// How long a stored object lives before expiry
    pub expiry: Duration,
    /// Master key for envelope encryption; `None` stores payloads in plain
    /// transport encoding
    pub master_key: Option<MasterKey>,
}

impl Default for DropConfig {
    fn default() -> Self {
        Self {
            max_file_size: DEFAULT_MAX_FILE_SIZE,
            expiry: DEFAULT_EXPIRY,
            master_key: None,
        }
    }
}

impl DropConfig {
    /// Create a config with defaults and no encryption
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an encrypting config, reading the master key from the
    /// environment
    ///
    /// Fails fast when `DROP_MASTER_KEY` is absent or empty; the process
    /// must not serve any request in that state.
    pub fn from_env() -> Result<Self> {
        let passphrase = std::env::var(MASTER_KEY_ENV)
            .map_err(|_| DropError::Config(format!("{} is not set", MASTER_KEY_ENV)))?;
        let master_key = MasterKey::from_passphrase(&passphrase)
            .map_err(|e| DropError::Config(e.to_string()))?;
        Ok(Self {
            master_key: Some(master_key),
            ..Default::default()
        })
    }

    /// Set the maximum upload size
    pub fn with_max_file_size(mut self, bytes: u64) -> Self {
        self.max_file_size = bytes;
        self
    }

    /// Set the expiry window
    pub fn with_expiry(mut self, expiry: Duration) -> Self {
        self.expiry = expiry;
        self
    }

    /// Enable encryption under the given master key
    pub fn with_master_key(mut self, master_key: MasterKey) -> Self {
        self.master_key = Some(master_key);
        self
    }

    /// Whether envelope encryption is enabled
    pub fn encryption_enabled(&self) -> bool {
        self.master_key.is_some()
    }

    /// The expiry window in milliseconds
    pub fn expiry_ms(&self) -> i64 {
        self.expiry.as_millis() as i64
    }
}
