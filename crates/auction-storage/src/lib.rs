//! Key-value store abstraction for reliability counters and pub/sub.
//!
//! The production backing store lives outside this workspace; the core
//! only depends on this trait plus the in-memory implementation used by
//! tests and local runs.

pub mod keys;
pub mod memory;
pub mod timed;

pub use memory::MemoryStore;
pub use timed::TimedStore;

use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Channel the winning quote is published on after every auction round.
pub const RFQ_CHANNEL: &str = "rfq";

#[derive(Debug, Error, PartialEq)]
pub enum StorageError {
	#[error("operation timed out after {0}ms")]
	Timeout(u64),
	#[error("backend error: {0}")]
	Backend(String),
}

pub type StorageResult<T> = Result<T, StorageError>;

/// Minimal key-value contract the auction core relies on.
#[async_trait]
pub trait KvStore: Send + Sync {
	async fn get(&self, key: &str) -> StorageResult<Option<String>>;

	async fn set_with_ttl(&self, key: &str, value: &str, ttl_secs: u64) -> StorageResult<()>;

	/// Increment a counter, optionally refreshing its TTL. Returns the new
	/// value.
	async fn incr(&self, key: &str, ttl_secs: Option<u64>) -> StorageResult<i64>;

	/// Best-effort publish; no delivery guarantee is required.
	async fn publish(&self, channel: &str, message: &str) -> StorageResult<()>;
}

/// Shared handle to a store.
pub type SharedStore = Arc<dyn KvStore>;
