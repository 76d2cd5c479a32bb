//! Aggregate view of one auction round.

use crate::common::U256;
use crate::quote::Quote;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Per-solver error map accumulated during a round, for diagnostics.
pub type ErrorMap = BTreeMap<String, String>;

/// Per-quote audit record emitted for telemetry after a round.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteAudit {
	pub exchange: String,
	#[serde(with = "crate::serde_amount")]
	pub amount_out: U256,
	/// Output amount formatted to token decimals
	pub amount_out_f: String,
	#[serde(with = "crate::serde_amount")]
	pub gas_cost: U256,
	pub gas_cost_f: String,
	#[serde(with = "crate::serde_amount")]
	pub gas_units: U256,
	#[serde(with = "crate::serde_amount")]
	pub simulate_amount_out: U256,
	/// Seconds the solver took to answer
	pub elapsed: f64,
}

/// The ranked winner merged with the full round context.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuctionResult {
	/// The winning quote; its session id is the round's session id
	#[serde(flatten)]
	pub best: Quote,
	/// All surviving quotes, ranked
	pub quotes: Vec<Quote>,
	/// Per-solver failures observed this round
	pub updated_error_types: ErrorMap,
	/// Audit records for every surviving quote
	pub auction_data: Vec<QuoteAudit>,
	pub in_token_usd: f64,
	pub out_token_usd: f64,
}
