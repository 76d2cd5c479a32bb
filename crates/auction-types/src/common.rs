//! Common types used throughout the auction system.

use serde::{Deserialize, Serialize};
use std::fmt;

// Re-export commonly used ethereum types
pub use alloy_primitives::{Address, U256};

/// Timestamp (Unix seconds)
pub type Timestamp = u64;

/// Current Unix time in seconds.
pub fn unix_now() -> Timestamp {
	std::time::SystemTime::now()
		.duration_since(std::time::UNIX_EPOCH)
		.map(|d| d.as_secs())
		.unwrap_or(0)
}

/// Chain identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChainId(pub u64);

impl fmt::Display for ChainId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}", self.0)
	}
}

impl From<u64> for ChainId {
	fn from(id: u64) -> Self {
		Self(id)
	}
}

/// Session identifier threaded through every artifact of one auction round.
///
/// `"-1"` marks a request that arrived without an assigned session.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(String);

impl SessionId {
	pub fn generate() -> Self {
		Self(uuid::Uuid::new_v4().to_string())
	}

	pub fn unassigned() -> Self {
		Self("-1".to_string())
	}

	pub fn as_str(&self) -> &str {
		&self.0
	}
}

impl fmt::Display for SessionId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}", self.0)
	}
}

impl From<String> for SessionId {
	fn from(s: String) -> Self {
		Self(s)
	}
}

impl From<&str> for SessionId {
	fn from(s: &str) -> Self {
		Self(s.to_string())
	}
}

/// Basis points per whole unit.
pub const BPS: u64 = 10_000;

/// Convert a percentage (e.g. `0.5` meaning 0.5%) to basis points.
pub fn pct_to_bps(pct: f64) -> u64 {
	(pct * 100.0).round().max(0.0) as u64
}

/// Scale an amount by a basis-point factor: `amount * bps / 10_000`.
pub fn mul_bps(amount: U256, bps: u64) -> U256 {
	amount * U256::from(bps) / U256::from(BPS)
}
