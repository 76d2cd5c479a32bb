//! Auction-level failure taxonomy.

use crate::common::SessionId;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Stable error codes returned to callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AuctionErrorCode {
	// Policy rejections - pre-dispatch, no side effects
	MaxSlippageExceeded,
	NativeInNotSupported,
	TokenBlocked,
	GovernanceTokenBlocked,
	PayNotSupported,
	BelowDollarThreshold,
	// Aggregate failures - nothing usable survived the round
	QuoteNoResults,
	NoResults,
	QuoteAuctionFailed,
	SwapAuctionFailed,
}

impl AuctionErrorCode {
	pub fn as_str(&self) -> &'static str {
		match self {
			AuctionErrorCode::MaxSlippageExceeded => "maxSlippageExceeded",
			AuctionErrorCode::NativeInNotSupported => "nativeInNotSupported",
			AuctionErrorCode::TokenBlocked => "tokenBlocked",
			AuctionErrorCode::GovernanceTokenBlocked => "governanceTokenBlocked",
			AuctionErrorCode::PayNotSupported => "payNotSupported",
			AuctionErrorCode::BelowDollarThreshold => "belowDollarThreshold",
			AuctionErrorCode::QuoteNoResults => "quoteNoResults",
			AuctionErrorCode::NoResults => "noResults",
			AuctionErrorCode::QuoteAuctionFailed => "quoteAuctionFailed",
			AuctionErrorCode::SwapAuctionFailed => "swapAuctionFailed",
		}
	}
}

/// Structured auction failure: a stable code plus machine-readable detail.
///
/// Every failure path out of the orchestrator produces one of these; there
/// is no silent failure mode.
#[derive(Debug, Clone, Error, Serialize, Deserialize)]
#[error("[{session_id}] {}", .code.as_str())]
#[serde(rename_all = "camelCase")]
pub struct AuctionError {
	#[serde(rename = "error")]
	pub code: AuctionErrorCode,
	pub session_id: SessionId,
	#[serde(default, skip_serializing_if = "serde_json::Value::is_null")]
	pub error_data: serde_json::Value,
}

impl AuctionError {
	pub fn new(code: AuctionErrorCode, session_id: SessionId) -> Self {
		Self {
			code,
			session_id,
			error_data: serde_json::Value::Null,
		}
	}

	pub fn with_data(mut self, data: serde_json::Value) -> Self {
		self.error_data = data;
		self
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_error_wire_shape() {
		let err = AuctionError::new(
			AuctionErrorCode::MaxSlippageExceeded,
			SessionId::from("abc"),
		)
		.with_data(serde_json::json!({ "slippage": 7.5 }));
		let json = serde_json::to_value(&err).unwrap();
		assert_eq!(json["error"], "maxSlippageExceeded");
		assert_eq!(json["sessionId"], "abc");
		assert_eq!(json["errorData"]["slippage"], 7.5);
	}
}
