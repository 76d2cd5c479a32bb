//! Operation-timeout wrapper.
//!
//! Every store call races a short timer so a slow backend can never stall
//! the auction path; a lost race surfaces as `StorageError::Timeout`.

use crate::{KvStore, StorageError, StorageResult};
use async_trait::async_trait;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tracing::warn;

/// Default per-operation timeout.
pub const DEFAULT_OP_TIMEOUT_MS: u64 = 200;

pub struct TimedStore {
	inner: Arc<dyn KvStore>,
	op_timeout: Duration,
}

impl TimedStore {
	pub fn new(inner: Arc<dyn KvStore>) -> Self {
		Self::with_timeout(inner, Duration::from_millis(DEFAULT_OP_TIMEOUT_MS))
	}

	pub fn with_timeout(inner: Arc<dyn KvStore>, op_timeout: Duration) -> Self {
		Self { inner, op_timeout }
	}

	async fn race<T, F>(&self, op: &'static str, fut: F) -> StorageResult<T>
	where
		F: Future<Output = StorageResult<T>> + Send,
	{
		match tokio::time::timeout(self.op_timeout, fut).await {
			Ok(result) => result,
			Err(_) => {
				warn!(op, "store operation timed out");
				Err(StorageError::Timeout(self.op_timeout.as_millis() as u64))
			}
		}
	}
}

#[async_trait]
impl KvStore for TimedStore {
	async fn get(&self, key: &str) -> StorageResult<Option<String>> {
		self.race("get", self.inner.get(key)).await
	}

	async fn set_with_ttl(&self, key: &str, value: &str, ttl_secs: u64) -> StorageResult<()> {
		self.race("set", self.inner.set_with_ttl(key, value, ttl_secs))
			.await
	}

	async fn incr(&self, key: &str, ttl_secs: Option<u64>) -> StorageResult<i64> {
		self.race("incr", self.inner.incr(key, ttl_secs)).await
	}

	async fn publish(&self, channel: &str, message: &str) -> StorageResult<()> {
		self.race("publish", self.inner.publish(channel, message))
			.await
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::MemoryStore;

	struct StalledStore;

	#[async_trait]
	impl KvStore for StalledStore {
		async fn get(&self, _key: &str) -> StorageResult<Option<String>> {
			tokio::time::sleep(Duration::from_secs(3600)).await;
			Ok(None)
		}

		async fn set_with_ttl(&self, _: &str, _: &str, _: u64) -> StorageResult<()> {
			Ok(())
		}

		async fn incr(&self, _: &str, _: Option<u64>) -> StorageResult<i64> {
			Ok(0)
		}

		async fn publish(&self, _: &str, _: &str) -> StorageResult<()> {
			Ok(())
		}
	}

	#[tokio::test]
	async fn test_timeout_maps_to_error() {
		let store = TimedStore::with_timeout(Arc::new(StalledStore), Duration::from_millis(10));
		assert_eq!(store.get("k").await, Err(StorageError::Timeout(10)));
	}

	#[tokio::test]
	async fn test_fast_backend_passes_through() {
		let store = TimedStore::new(Arc::new(MemoryStore::new()));
		store.set_with_ttl("k", "v", 60).await.unwrap();
		assert_eq!(store.get("k").await.unwrap(), Some("v".to_string()));
	}
}
