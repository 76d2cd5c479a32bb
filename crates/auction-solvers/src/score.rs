//! Solver reliability scoring.
//!
//! The score is derived from success/failure counters maintained by the
//! post-auction outcome reporter. The scorer itself only reads, under a
//! short timeout so a slow store can never stall quoting.

use auction_storage::keys::{solver_failure_key, solver_success_key};
use auction_storage::{SharedStore, StorageResult};
use auction_types::ChainId;
use std::time::Duration;
use tracing::{debug, warn};

/// Internal budget for the two counter reads.
pub const SCORE_TIMEOUT_MS: u64 = 100;

/// Score returned when counters are unreachable.
pub const SCORE_UNKNOWN: f64 = -1.0;

pub struct ReliabilityScorer {
	store: SharedStore,
	timeout: Duration,
}

impl ReliabilityScorer {
	pub fn new(store: SharedStore) -> Self {
		Self {
			store,
			timeout: Duration::from_millis(SCORE_TIMEOUT_MS),
		}
	}

	pub fn with_timeout(mut self, timeout: Duration) -> Self {
		self.timeout = timeout;
		self
	}

	/// `1 - failures/(failures+successes)` in `[0,1]`; `0` when both
	/// counters are empty; `-1` when the store cannot answer in time.
	pub async fn score(&self, chain_id: ChainId, solver: &str) -> f64 {
		let read = async {
			let failures = self.store.get(&solver_failure_key(chain_id, solver)).await?;
			let successes = self.store.get(&solver_success_key(chain_id, solver)).await?;
			Ok::<_, auction_storage::StorageError>((parse_counter(failures), parse_counter(successes)))
		};

		let (failures, successes) = match tokio::time::timeout(self.timeout, read).await {
			Ok(Ok(counts)) => counts,
			Ok(Err(e)) => {
				warn!(solver, "score read failed: {}", e);
				return SCORE_UNKNOWN;
			}
			Err(_) => {
				warn!(solver, "score read timed out");
				return SCORE_UNKNOWN;
			}
		};

		let total = failures + successes;
		if total == 0.0 {
			return 0.0;
		}
		let score = 1.0 - failures / total;
		debug!(
			solver,
			failures, successes, score, "reliability score resolved"
		);
		score
	}

	/// Report one swap outcome. Counter maintenance is the only write this
	/// crate performs; it runs after auctions, never inside them.
	pub async fn record_outcome(
		&self,
		chain_id: ChainId,
		solver: &str,
		success: bool,
		ttl_secs: u64,
	) -> StorageResult<i64> {
		let key = if success {
			solver_success_key(chain_id, solver)
		} else {
			solver_failure_key(chain_id, solver)
		};
		self.store.incr(&key, Some(ttl_secs)).await
	}
}

fn parse_counter(raw: Option<String>) -> f64 {
	raw.and_then(|v| v.parse::<f64>().ok()).unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
	use super::*;
	use async_trait::async_trait;
	use auction_storage::{KvStore, MemoryStore, StorageError};
	use std::sync::Arc;

	#[tokio::test]
	async fn test_score_from_counters() {
		let store = Arc::new(MemoryStore::new());
		let scorer = ReliabilityScorer::new(store.clone());
		let chain = ChainId(137);

		// 1 failure, 3 successes => 0.75
		scorer.record_outcome(chain, "odos", false, 60).await.unwrap();
		for _ in 0..3 {
			scorer.record_outcome(chain, "odos", true, 60).await.unwrap();
		}
		assert!((scorer.score(chain, "odos").await - 0.75).abs() < 1e-9);
	}

	#[tokio::test]
	async fn test_empty_counters_score_zero() {
		let scorer = ReliabilityScorer::new(Arc::new(MemoryStore::new()));
		assert_eq!(scorer.score(ChainId(137), "nobody").await, 0.0);
	}

	struct SlowStore;

	#[async_trait]
	impl KvStore for SlowStore {
		async fn get(&self, _: &str) -> Result<Option<String>, StorageError> {
			tokio::time::sleep(Duration::from_secs(60)).await;
			Ok(None)
		}

		async fn set_with_ttl(&self, _: &str, _: &str, _: u64) -> Result<(), StorageError> {
			Ok(())
		}

		async fn incr(&self, _: &str, _: Option<u64>) -> Result<i64, StorageError> {
			Ok(0)
		}

		async fn publish(&self, _: &str, _: &str) -> Result<(), StorageError> {
			Ok(())
		}
	}

	#[tokio::test]
	async fn test_timeout_scores_unknown() {
		let scorer = ReliabilityScorer::new(Arc::new(SlowStore))
			.with_timeout(Duration::from_millis(10));
		assert_eq!(scorer.score(ChainId(137), "odos").await, SCORE_UNKNOWN);
	}
}
