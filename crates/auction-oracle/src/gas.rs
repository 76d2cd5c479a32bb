//! Native gas price source.

use crate::OracleResult;
use async_trait::async_trait;
use auction_types::{ChainId, U256};

/// Current network gas price in wei.
#[async_trait]
pub trait GasPriceSource: Send + Sync {
	async fn max_fee_per_gas(&self, chain_id: ChainId) -> OracleResult<U256>;
}

/// Constant gas price, for tests and chains with pinned pricing.
pub struct FixedGasPrice(pub U256);

#[async_trait]
impl GasPriceSource for FixedGasPrice {
	async fn max_fee_per_gas(&self, _chain_id: ChainId) -> OracleResult<U256> {
		Ok(self.0)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[tokio::test]
	async fn test_fixed_source() {
		let source = FixedGasPrice(U256::from(30_000_000_000u64));
		assert_eq!(
			source.max_fee_per_gas(ChainId(137)).await.unwrap(),
			U256::from(30_000_000_000u64)
		);
	}
}
