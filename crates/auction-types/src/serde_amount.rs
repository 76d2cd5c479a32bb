//! Serde helpers for base-unit token amounts.
//!
//! Amounts travel the wire as decimal strings (`"1250000000000000000"`),
//! never as JSON numbers, so precision survives every hop.

use alloy_primitives::U256;
use serde::{self, Deserialize, Deserializer, Serializer};

pub fn serialize<S>(amount: &U256, serializer: S) -> Result<S::Ok, S::Error>
where
	S: Serializer,
{
	serializer.serialize_str(&amount.to_string())
}

pub fn deserialize<'de, D>(deserializer: D) -> Result<U256, D::Error>
where
	D: Deserializer<'de>,
{
	let s = String::deserialize(deserializer)?;
	parse_amount(&s).map_err(serde::de::Error::custom)
}

/// Parse a decimal-string amount.
pub fn parse_amount(s: &str) -> Result<U256, String> {
	U256::from_str_radix(s.trim(), 10).map_err(|e| format!("invalid amount {:?}: {}", s, e))
}
