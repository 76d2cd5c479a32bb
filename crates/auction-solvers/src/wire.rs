//! The solver RFQ wire protocol.
//!
//! Every provider speaks the same envelope: a double-encoded `dataStr`
//! carrying the order batch, and a `result` array whose first entry holds
//! the route. Provider-specific detail stays inside `route.rawData`.

use auction_types::{Address, FillData, QuoteError, Rfq, SessionId, U256};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Outbound request envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SolverRequestBody {
	/// JSON-encoded [`SolverRequestData`]
	pub data_str: String,
	pub session_id: SessionId,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SolverRequestData {
	pub network: String,
	pub dex: String,
	pub filler: Address,
	pub path_finder_params: Value,
	pub orders: Vec<WireOrder>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireOrder {
	pub id: String,
	pub src_token: Address,
	#[serde(with = "auction_types::serde_amount")]
	pub amount_in: U256,
	pub dst_token: Address,
	pub user: Address,
}

impl SolverRequestBody {
	/// Assemble the envelope for one RFQ.
	pub fn build(
		chain_name: &str,
		dex: &str,
		filler: Address,
		rfq: &Rfq,
		path_finder_params: Option<Value>,
	) -> Result<Self, QuoteError> {
		let data = SolverRequestData {
			network: chain_name.to_lowercase(),
			dex: dex.to_lowercase(),
			filler,
			path_finder_params: path_finder_params.unwrap_or_else(|| Value::Object(Default::default())),
			orders: vec![WireOrder {
				id: format!(
					"{:#x}-{:#x}-{:#x}-{}",
					rfq.user, rfq.in_token, rfq.out_token, rfq.in_amount
				),
				src_token: rfq.in_token,
				amount_in: rfq.in_amount,
				dst_token: rfq.out_token,
				user: rfq.user,
			}],
		};
		let data_str = serde_json::to_string(&data)
			.map_err(|e| QuoteError::Provider(format!("request encode: {}", e)))?;
		Ok(Self {
			data_str,
			session_id: rfq.session(),
		})
	}
}

/// Raw response envelope. Kept permissive; providers disagree on details.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SolverResponse {
	#[serde(default)]
	pub error: Option<String>,
	#[serde(default)]
	pub error_message: Option<String>,
	#[serde(default)]
	pub result: Option<Vec<SolverResult>>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SolverResult {
	#[serde(default)]
	pub success: bool,
	#[serde(default)]
	pub error_message: Option<String>,
	#[serde(default)]
	pub route: Option<RouteData>,
	#[serde(default)]
	pub fill_data: Option<FillData>,
	#[serde(default)]
	pub simulated_swap_result: Option<SimulatedSwap>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteData {
	/// Decimal string or number, provider dependent
	#[serde(default)]
	pub amount_out: Value,
	/// Provider-specific payload; gas figures hide in here
	#[serde(default)]
	pub raw_data: Value,
	#[serde(default)]
	pub solver_gas_units: Option<Value>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulatedSwap {
	#[serde(default)]
	pub out_amount: Value,
}

/// Parse a provider-supplied numeric field that may arrive as a decimal
/// string, a float string, or a JSON number.
pub fn value_to_u256(value: &Value) -> Option<U256> {
	match value {
		Value::String(s) => {
			let s = s.trim();
			// truncate any fractional part the provider sneaks in
			let integral = s.split('.').next().unwrap_or("");
			U256::from_str_radix(integral, 10).ok()
		}
		Value::Number(n) => {
			if let Some(u) = n.as_u64() {
				Some(U256::from(u))
			} else {
				let f = n.as_f64()?;
				if !f.is_finite() || f < 0.0 {
					return None;
				}
				Some(U256::from(f as u128))
			}
		}
		_ => None,
	}
}

impl SolverResponse {
	/// Normalize into the usable first result or a typed error, applying
	/// the shared rejection rules: an `error` field, a missing or empty
	/// `result`, or `success=false`.
	pub fn normalized(&self) -> Result<&SolverResult, QuoteError> {
		if let Some(error) = &self.error {
			return Err(QuoteError::Provider(error.clone()));
		}
		let results = match &self.result {
			Some(r) if !r.is_empty() => r,
			_ => return Err(QuoteError::NoResults),
		};
		let first = &results[0];
		if !first.success {
			let message = first
				.error_message
				.clone()
				.or_else(|| self.error_message.clone())
				.unwrap_or_else(|| "generalError".to_string());
			return Err(QuoteError::Provider(message));
		}
		if first.route.is_none() {
			return Err(QuoteError::Provider("generalError".to_string()));
		}
		Ok(first)
	}

	/// The route's output amount in base units.
	pub fn out_amount(&self) -> Result<U256, QuoteError> {
		let result = self.normalized()?;
		let route = result.route.as_ref().ok_or(QuoteError::NoResults)?;
		value_to_u256(&route.amount_out)
			.ok_or_else(|| QuoteError::Provider("unparsable amountOut".to_string()))
	}
}
