//! Per-provider gas-unit extraction.
//!
//! Raw response shapes differ across providers, so each solver registers an
//! explicit [`GasUnitsRule`] at configuration time. Extraction failures are
//! reported, never silently nulled.

use crate::wire::{value_to_u256, SolverResponse};
use auction_config::GasUnitsRule;
use auction_types::{QuoteError, U256};

/// Pull the gas-units figure out of a solver response using its rule.
pub fn extract_gas_units(rule: &GasUnitsRule, response: &SolverResponse) -> Result<U256, QuoteError> {
	let missing = |what: &str| QuoteError::Provider(format!("gas units missing: {}", what));

	if let GasUnitsRule::Fixed(units) = rule {
		return Ok(U256::from(*units));
	}

	let route = response
		.normalized()?
		.route
		.as_ref()
		.ok_or_else(|| missing("route"))?;

	match rule {
		GasUnitsRule::RawDataField(field) => value_to_u256(
			route
				.raw_data
				.get(field)
				.ok_or_else(|| missing(field))?,
		)
		.ok_or_else(|| missing(field)),
		GasUnitsRule::RawDataPath(path) => {
			let mut cursor = &route.raw_data;
			for segment in path {
				cursor = cursor
					.get(segment)
					.ok_or_else(|| missing(&path.join(".")))?;
			}
			value_to_u256(cursor).ok_or_else(|| missing(&path.join(".")))
		}
		GasUnitsRule::FeeEntryAmount(index) => {
			let amount = route
				.raw_data
				.get("fee")
				.and_then(|fees| fees.get(*index))
				.and_then(|entry| entry.get("amount"))
				.ok_or_else(|| missing("fee entry"))?;
			value_to_u256(amount).ok_or_else(|| missing("fee entry"))
		}
		GasUnitsRule::RouteSolverGasUnits => {
			let units = route
				.solver_gas_units
				.as_ref()
				.ok_or_else(|| missing("solverGasUnits"))?;
			value_to_u256(units).ok_or_else(|| missing("solverGasUnits"))
		}
		GasUnitsRule::Fixed(_) => unreachable!("handled above"),
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn response(route: serde_json::Value) -> SolverResponse {
		serde_json::from_value(serde_json::json!({
			"result": [{ "success": true, "route": route }]
		}))
		.unwrap()
	}

	#[test]
	fn test_raw_data_field() {
		let resp = response(serde_json::json!({
			"amountOut": "100",
			"rawData": { "gasCost": "210000" }
		}));
		let rule = GasUnitsRule::RawDataField("gasCost".to_string());
		assert_eq!(
			extract_gas_units(&rule, &resp).unwrap(),
			U256::from(210_000u64)
		);
	}

	#[test]
	fn test_nested_path() {
		let resp = response(serde_json::json!({
			"amountOut": "100",
			"rawData": { "trade": { "gasEstimate": 185000 } }
		}));
		let rule =
			GasUnitsRule::RawDataPath(vec!["trade".to_string(), "gasEstimate".to_string()]);
		assert_eq!(
			extract_gas_units(&rule, &resp).unwrap(),
			U256::from(185_000u64)
		);
	}

	#[test]
	fn test_fee_entry() {
		let resp = response(serde_json::json!({
			"amountOut": "100",
			"rawData": { "fee": [
				{ "amount": "7" },
				{ "amount": "42000000000000000" }
			] }
		}));
		let rule = GasUnitsRule::FeeEntryAmount(1);
		assert_eq!(
			extract_gas_units(&rule, &resp).unwrap(),
			U256::from(42_000_000_000_000_000u64)
		);
	}

	#[test]
	fn test_route_solver_gas_units() {
		let resp = response(serde_json::json!({
			"amountOut": "100",
			"solverGasUnits": "333000",
			"rawData": {}
		}));
		assert_eq!(
			extract_gas_units(&GasUnitsRule::RouteSolverGasUnits, &resp).unwrap(),
			U256::from(333_000u64)
		);
	}

	#[test]
	fn test_fixed_ignores_response() {
		let resp = SolverResponse::default();
		assert_eq!(
			extract_gas_units(&GasUnitsRule::Fixed(500_000), &resp).unwrap(),
			U256::from(500_000u64)
		);
	}

	#[test]
	fn test_missing_field_is_reported() {
		let resp = response(serde_json::json!({ "amountOut": "100", "rawData": {} }));
		let rule = GasUnitsRule::RawDataField("gasCost".to_string());
		assert!(extract_gas_units(&rule, &resp).is_err());
	}
}
