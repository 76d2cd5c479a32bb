//! Token metadata and pricing types.

use crate::common::{Address, Timestamp};
use serde::{Deserialize, Serialize};

/// ERC-20 metadata, resolved once and cached indefinitely per address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenData {
	pub address: Address,
	pub symbol: String,
	pub decimals: u8,
}

impl TokenData {
	/// Fallback metadata when the on-chain lookup fails.
	pub fn unknown(address: Address) -> Self {
		Self {
			address,
			symbol: String::new(),
			decimals: 18,
		}
	}
}

/// Oracle price snapshot for one token.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenPrice {
	pub price_usd: f64,
	pub price_native: f64,
	pub timestamp: Timestamp,
}

impl TokenPrice {
	pub fn stable(timestamp: Timestamp) -> Self {
		Self {
			price_usd: 1.0,
			price_native: 1.0,
			timestamp,
		}
	}
}

/// Zero address doubles as the native-token marker in RFQs.
pub fn is_native(address: &Address) -> bool {
	address.is_zero()
}
