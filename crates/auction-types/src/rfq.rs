//! The canonical swap request.

use crate::common::{Address, SessionId, U256};
use crate::serde_amount::parse_amount;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Caller-supplied expected output amount, used as a sanity baseline.
///
/// Two sentinel encodings disable the baseline: `"0"` (the UI produced no
/// quote) and `"-1"` (race condition, no baseline available). Both switch
/// the auction into external-liquidity mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UiAmount {
	/// `"0"` - no UI quote for this pair
	#[default]
	None,
	/// `"-1"` - request raced ahead of the UI baseline
	Race,
	/// A trusted UI reference amount
	Amount(U256),
}

impl UiAmount {
	/// Whether the plausibility collar must be skipped.
	pub fn is_sentinel(&self) -> bool {
		!matches!(self, UiAmount::Amount(_))
	}

	pub fn amount(&self) -> Option<U256> {
		match self {
			UiAmount::Amount(a) => Some(*a),
			_ => None,
		}
	}
}

impl fmt::Display for UiAmount {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			UiAmount::None => write!(f, "0"),
			UiAmount::Race => write!(f, "-1"),
			UiAmount::Amount(a) => write!(f, "{}", a),
		}
	}
}

impl Serialize for UiAmount {
	fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
		serializer.serialize_str(&self.to_string())
	}
}

impl<'de> Deserialize<'de> for UiAmount {
	fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
		let s = String::deserialize(deserializer)?;
		match s.trim() {
			"" | "0" => Ok(UiAmount::None),
			"-1" => Ok(UiAmount::Race),
			other => parse_amount(other)
				.map(UiAmount::Amount)
				.map_err(serde::de::Error::custom),
		}
	}
}

/// Request for Quote - one inbound swap request.
///
/// Immutable after entry except for default-filling `slippage` and
/// `session_id` during validation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Rfq {
	pub user: Address,
	pub in_token: Address,
	pub out_token: Address,
	#[serde(with = "crate::serde_amount")]
	pub in_amount: U256,
	/// UI reference output amount, `"0"`/`"-1"` sentinels disable it
	#[serde(default)]
	pub out_amount: UiAmount,
	/// Slippage tolerance in percent (`0.5` = 0.5%)
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub slippage: Option<f64>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub session_id: Option<SessionId>,
}

impl Rfq {
	/// Effective slippage in percent; callers fill the default at entry.
	pub fn slippage_pct(&self) -> f64 {
		self.slippage.unwrap_or(0.0)
	}

	pub fn session(&self) -> SessionId {
		self.session_id.clone().unwrap_or_else(SessionId::unassigned)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_ui_amount_sentinels() {
		let none: UiAmount = serde_json::from_str(r#""0""#).unwrap();
		assert_eq!(none, UiAmount::None);
		assert!(none.is_sentinel());

		let race: UiAmount = serde_json::from_str(r#""-1""#).unwrap();
		assert_eq!(race, UiAmount::Race);
		assert!(race.is_sentinel());

		let amt: UiAmount = serde_json::from_str(r#""1000""#).unwrap();
		assert_eq!(amt, UiAmount::Amount(U256::from(1000u64)));
		assert!(!amt.is_sentinel());
		assert_eq!(serde_json::to_string(&amt).unwrap(), r#""1000""#);
	}

	#[test]
	fn test_rfq_defaults() {
		let rfq: Rfq = serde_json::from_str(
			r#"{
				"user": "0x3ab2102b833d1b97bae643cc46e6bd3d65dde65d",
				"inToken": "0x2791bca1f2de4661ed88a30c99a7a9449aa84174",
				"outToken": "0xc2132d05d31c914a87c6611c10748aeb04b58e8f",
				"inAmount": "5000000"
			}"#,
		)
		.unwrap();
		assert_eq!(rfq.out_amount, UiAmount::None);
		assert!(rfq.slippage.is_none());
		assert_eq!(rfq.session().as_str(), "-1");
	}
}
