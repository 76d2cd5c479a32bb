//! Token price oracle with stable-token shortcuts and layered caching.

use crate::{OracleError, OracleResult};
use async_trait::async_trait;
use auction_storage::{keys::price_key, SharedStore};
use auction_types::{is_native, unix_now, Address, ChainId, TokenPrice};
use dashmap::DashMap;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// In-process cache freshness window.
const PRICE_TTL: Duration = Duration::from_secs(15 * 60);
/// TTL for prices written through to the shared store.
const PRICE_STORE_TTL_SECS: u64 = 60 * 60;

/// External price fetch. Implementations call out to the price APIs; the
/// oracle below never does.
#[async_trait]
pub trait PriceSource: Send + Sync {
	async fn fetch_price(&self, chain_id: ChainId, token: Address) -> OracleResult<TokenPrice>;
}

/// Chain-scoped price oracle.
///
/// Resolution order: configured stable tokens at 1 USD, the in-process TTL
/// cache, the shared store, then the external source (with write-through).
pub struct PriceOracle {
	chain_id: ChainId,
	w_token: Address,
	stable_tokens: Vec<Address>,
	source: Arc<dyn PriceSource>,
	cache: DashMap<Address, TokenPrice>,
	store: Option<SharedStore>,
}

impl PriceOracle {
	pub fn new(
		chain_id: ChainId,
		w_token: Address,
		stable_tokens: Vec<Address>,
		source: Arc<dyn PriceSource>,
	) -> Self {
		Self {
			chain_id,
			w_token,
			stable_tokens,
			source,
			cache: DashMap::new(),
			store: None,
		}
	}

	pub fn with_store(mut self, store: SharedStore) -> Self {
		self.store = Some(store);
		self
	}

	pub async fn token_price(&self, token: Address) -> OracleResult<TokenPrice> {
		// native quotes price as the wrapped token
		let token = if is_native(&token) { self.w_token } else { token };

		if self.stable_tokens.contains(&token) {
			return Ok(TokenPrice::stable(unix_now()));
		}

		if let Some(cached) = self.cache.get(&token) {
			let age = unix_now().saturating_sub(cached.timestamp);
			if age < PRICE_TTL.as_secs() {
				return Ok(*cached);
			}
		}

		if let Some(store) = &self.store {
			if let Ok(Some(raw)) = store.get(&price_key(self.chain_id, &token)).await {
				if let Ok(price) = serde_json::from_str::<TokenPrice>(&raw) {
					debug!(%token, "price from shared store");
					self.cache.insert(token, price);
					return Ok(price);
				}
			}
		}

		let price = self.source.fetch_price(self.chain_id, token).await?;
		if price.price_usd <= 0.0 {
			return Err(OracleError::PriceUnavailable(format!("{:#x}", token)));
		}

		self.cache.insert(token, price);
		if let Some(store) = &self.store {
			match serde_json::to_string(&price) {
				Ok(raw) => {
					if let Err(e) = store
						.set_with_ttl(&price_key(self.chain_id, &token), &raw, PRICE_STORE_TTL_SECS)
						.await
					{
						warn!(%token, "price write-through failed: {}", e);
					}
				}
				Err(e) => warn!(%token, "price serialization failed: {}", e),
			}
		}
		Ok(price)
	}
}
