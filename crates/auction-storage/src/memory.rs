//! In-memory store used by tests and single-process deployments.

use crate::{KvStore, StorageResult};
use async_trait::async_trait;
use dashmap::DashMap;
use std::time::{Duration, Instant};
use tokio::sync::broadcast;
use tracing::debug;

struct Entry {
	value: String,
	expires_at: Option<Instant>,
}

impl Entry {
	fn is_expired(&self) -> bool {
		self.expires_at.is_some_and(|at| Instant::now() >= at)
	}
}

/// Dashmap-backed store with TTL expiry on read and a broadcast channel
/// standing in for pub/sub.
pub struct MemoryStore {
	entries: DashMap<String, Entry>,
	publisher: broadcast::Sender<(String, String)>,
}

impl Default for MemoryStore {
	fn default() -> Self {
		Self::new()
	}
}

impl MemoryStore {
	pub fn new() -> Self {
		let (publisher, _) = broadcast::channel(64);
		Self {
			entries: DashMap::new(),
			publisher,
		}
	}

	/// Subscribe to published messages as `(channel, payload)` pairs.
	pub fn subscribe(&self) -> broadcast::Receiver<(String, String)> {
		self.publisher.subscribe()
	}
}

#[async_trait]
impl KvStore for MemoryStore {
	async fn get(&self, key: &str) -> StorageResult<Option<String>> {
		if let Some(entry) = self.entries.get(key) {
			if entry.is_expired() {
				drop(entry);
				self.entries.remove(key);
				return Ok(None);
			}
			return Ok(Some(entry.value.clone()));
		}
		Ok(None)
	}

	async fn set_with_ttl(&self, key: &str, value: &str, ttl_secs: u64) -> StorageResult<()> {
		self.entries.insert(
			key.to_string(),
			Entry {
				value: value.to_string(),
				expires_at: Some(Instant::now() + Duration::from_secs(ttl_secs)),
			},
		);
		Ok(())
	}

	async fn incr(&self, key: &str, ttl_secs: Option<u64>) -> StorageResult<i64> {
		let mut entry = self.entries.entry(key.to_string()).or_insert(Entry {
			value: "0".to_string(),
			expires_at: None,
		});
		let next = entry.value.parse::<i64>().unwrap_or(0) + 1;
		entry.value = next.to_string();
		if let Some(ttl) = ttl_secs {
			entry.expires_at = Some(Instant::now() + Duration::from_secs(ttl));
		}
		Ok(next)
	}

	async fn publish(&self, channel: &str, message: &str) -> StorageResult<()> {
		debug!(channel, "publish ({} bytes)", message.len());
		// no subscribers is fine for a best-effort channel
		let _ = self
			.publisher
			.send((channel.to_string(), message.to_string()));
		Ok(())
	}
}
