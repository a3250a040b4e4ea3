//! # Drop Core
//!
//! Lifecycle engine for the Codedrop ephemeral file-sharing system.
//!
//! This crate provides:
//! - **Codec**: data-URL transport encoding with MIME type recovery
//! - **Share codes**: 6-character collision-checked identifiers
//! - **Configuration**: size limit, expiry window, master key (fail-fast)
//! - **Lifecycle controller**: upload/retrieve with at-most-once delivery
//!   and time-based expiry
//!
//! ## Object lifecycle
//!
//! ```text
//! Uploading ──put──> Stored ──first successful read──> Retrieved
//!                      │
//!                      └────── now >= expiresAt ──────> Expired
//! ```
//!
//! An object leaves the store exactly once, through whichever terminal
//! transition happens first.
//!
//! ## Example
//!
//! ```rust,ignore
//! use drop_core::{DropConfig, DropService};
//! use drop_store::MemoryStore;
//!
//! let service = DropService::new(MemoryStore::new(), DropConfig::from_env()?);
//!
//! let receipt = service.upload(&bytes, "report.pdf", "application/pdf").await?;
//! println!("share code: {}", receipt.code);
//!
//! let file = service.retrieve(receipt.code.as_str()).await?;
//! ```

pub mod code;
pub mod codec;
pub mod config;
pub mod error;
pub mod human;
pub mod lifecycle;

pub use code::{ShareCode, CODE_ALPHABET, CODE_LENGTH};
pub use config::{DropConfig, DEFAULT_EXPIRY, DEFAULT_MAX_FILE_SIZE, MASTER_KEY_ENV};
pub use error::{DropError, Result};
pub use human::{format_file_size, format_remaining};
pub use lifecycle::{DropService, RetrievedFile, UploadReceipt};
