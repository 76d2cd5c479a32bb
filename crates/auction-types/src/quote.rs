//! One solver's answer to an RFQ - success or typed failure.

use crate::common::{SessionId, U256};
use crate::rfq::Rfq;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Per-solver quote failure. Scoped to a single quote, never aborts a batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "detail", rename_all = "camelCase")]
pub enum QuoteError {
	/// Solver missed the per-call auction timeout
	Timeout,
	/// The outbound HTTP request itself failed
	FetchFailed,
	/// Provider returned an error payload or an unusable result
	Provider(String),
	/// Provider responded with an empty result set
	NoResults,
	/// Gas cost converted to zero output-token units - pricing failure
	GasCostOutputTokenZero,
	/// Gas cost exceeded the configured fraction of the output amount
	GasCostToHigh,
	/// The order builder rejected the winning amounts
	OrderBuild(String),
}

impl QuoteError {
	/// Stable wire code recorded in per-solver error maps.
	pub fn code(&self) -> String {
		match self {
			QuoteError::Timeout => "timeout".to_string(),
			QuoteError::FetchFailed => "fetchFailed".to_string(),
			QuoteError::Provider(msg) => msg.clone(),
			QuoteError::NoResults => "noResults".to_string(),
			QuoteError::GasCostOutputTokenZero => "gasCostOutputTokenZero".to_string(),
			QuoteError::GasCostToHigh => "gasCostToHigh".to_string(),
			QuoteError::OrderBuild(msg) => format!("orderBuildFailed: {}", msg),
		}
	}
}

impl fmt::Display for QuoteError {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}", self.code())
	}
}

/// Executable call data attached to a swap-phase quote.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FillData {
	#[serde(default)]
	pub to: String,
	#[serde(default)]
	pub data: String,
	#[serde(default)]
	pub solver_id: String,
}

/// Canonical comparable quote, one per (RFQ, solver) pair per round.
///
/// Never mutated after the normalizer returns it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Quote {
	pub session_id: SessionId,
	/// Solver that produced this quote
	pub exchange: String,
	#[serde(with = "crate::serde_amount")]
	pub out_amount: U256,
	#[serde(with = "crate::serde_amount")]
	pub min_amount_out: U256,
	/// Gas cost converted to output-token base units
	#[serde(with = "crate::serde_amount")]
	pub gas_cost_output_token: U256,
	#[serde(with = "crate::serde_amount")]
	pub gas_units: U256,
	/// Provider-simulated output amount, zero when the provider did not simulate
	#[serde(with = "crate::serde_amount")]
	pub simulate_amount_out: U256,
	/// Reliability score in `[0,1]`, `-1` when unknown
	pub score: f64,
	/// Wall-clock time the normalizer spent on this solver, milliseconds
	pub elapsed_ms: u64,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub error: Option<QuoteError>,
	/// Provider-specific raw route payload, kept for auditing
	#[serde(default)]
	pub raw: serde_json::Value,
	#[serde(default)]
	pub fill_data: FillData,
	#[serde(default)]
	pub serialized_order: String,
	#[serde(default)]
	pub permit_data: serde_json::Value,
	pub out_token_price: f64,
}

impl Quote {
	/// A typed failure quote for one solver.
	pub fn failed(rfq: &Rfq, solver: &str, error: QuoteError, elapsed_ms: u64) -> Self {
		Self {
			session_id: rfq.session(),
			exchange: solver.to_string(),
			out_amount: U256::ZERO,
			min_amount_out: U256::ZERO,
			gas_cost_output_token: U256::ZERO,
			gas_units: U256::ZERO,
			simulate_amount_out: U256::ZERO,
			score: -1.0,
			elapsed_ms,
			error: Some(error),
			raw: serde_json::Value::Null,
			fill_data: FillData::default(),
			serialized_order: String::new(),
			permit_data: serde_json::Value::Null,
			out_token_price: 0.0,
		}
	}

	pub fn is_error(&self) -> bool {
		self.error.is_some()
	}
}
