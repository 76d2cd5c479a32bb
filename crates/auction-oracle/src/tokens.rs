//! ERC-20 metadata resolution with an indefinite per-address cache.

use crate::OracleResult;
use async_trait::async_trait;
use auction_types::{is_native, Address, TokenData};
use dashmap::DashMap;
use std::sync::Arc;
use tracing::warn;

/// On-chain metadata lookup. Implementations own the RPC plumbing.
#[async_trait]
pub trait Erc20Source: Send + Sync {
	async fn fetch(&self, address: Address) -> OracleResult<TokenData>;
}

/// Caching metadata repository.
///
/// Metadata never changes, so entries live for the process lifetime.
/// Lookup failures degrade to an 18-decimal placeholder instead of failing
/// the quote that needed them.
pub struct TokenRepository {
	native: TokenData,
	source: Arc<dyn Erc20Source>,
	cache: DashMap<Address, TokenData>,
}

impl TokenRepository {
	pub fn new(native: TokenData, source: Arc<dyn Erc20Source>) -> Self {
		Self {
			native,
			source,
			cache: DashMap::new(),
		}
	}

	pub async fn resolve(&self, address: Address) -> TokenData {
		if is_native(&address) {
			return self.native.clone();
		}
		if let Some(cached) = self.cache.get(&address) {
			return cached.clone();
		}
		match self.source.fetch(address).await {
			Ok(token) => {
				self.cache.insert(address, token.clone());
				token
			}
			Err(e) => {
				warn!(%address, "erc20 lookup failed: {}", e);
				TokenData::unknown(address)
			}
		}
	}

	/// Output-token decimals; native resolves to the native token's.
	pub async fn decimals(&self, address: Address) -> u8 {
		self.resolve(address).await.decimals
	}
}
