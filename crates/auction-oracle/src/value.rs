//! Unit conversions between base-unit amounts, native gas cost and USD.

use crate::{OracleError, OracleResult, PriceOracle, TokenRepository};
use auction_types::{Address, U256};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use tracing::debug;

/// Scale used when carrying the price ratio through integer math.
const RATIO_SCALE: u64 = 1_000_000_000_000; // 1e12

fn u256_to_f64(amount: U256) -> f64 {
	amount.to_string().parse::<f64>().unwrap_or(f64::MAX)
}

pub fn pow10(exp: u8) -> U256 {
	U256::from(10u64).pow(U256::from(exp))
}

/// Format a base-unit amount to a human-readable decimal string with seven
/// fraction digits, the precision the audit records carry.
pub fn format_units(amount: U256, decimals: u8) -> String {
	let scale = pow10(decimals);
	let whole = amount / scale;
	let frac = amount % scale;
	// carry the fraction at 7 digits regardless of token decimals
	let frac_scaled = if decimals > 7 {
		frac / pow10(decimals - 7)
	} else {
		frac * pow10(7 - decimals)
	};
	format!("{}.{:07}", whole, frac_scaled.to::<u64>())
}

/// Convert a native-denominated amount (wei) into output-token base units
/// using the USD price ratio.
///
/// `out = native × native_usd / out_usd × 10^out_decimals / 10^18`
pub fn convert_native_amount(
	native_amount: U256,
	native_price_usd: f64,
	out_price_usd: f64,
	out_decimals: u8,
) -> OracleResult<U256> {
	if out_price_usd <= 0.0 || native_price_usd <= 0.0 {
		return Err(OracleError::Conversion(format!(
			"non-positive price ratio {} / {}",
			native_price_usd, out_price_usd
		)));
	}
	let native = Decimal::try_from(native_price_usd)
		.map_err(|e| OracleError::Conversion(e.to_string()))?;
	let out =
		Decimal::try_from(out_price_usd).map_err(|e| OracleError::Conversion(e.to_string()))?;
	if out.is_zero() {
		return Err(OracleError::Conversion(
			"output price rounds to zero".to_string(),
		));
	}
	let ratio_scaled = (native / out * Decimal::from(RATIO_SCALE))
		.trunc()
		.to_u128()
		.ok_or_else(|| OracleError::Conversion("price ratio out of range".to_string()))?;

	let result = native_amount * U256::from(ratio_scaled) * pow10(out_decimals)
		/ U256::from(RATIO_SCALE)
		/ pow10(18);
	Ok(result)
}

/// USD value of a token amount, `None` when the token cannot be priced.
pub async fn dollar_value(
	oracle: &PriceOracle,
	tokens: &TokenRepository,
	amount: U256,
	token: Address,
) -> Option<f64> {
	let price = match oracle.token_price(token).await {
		Ok(p) => p,
		Err(e) => {
			debug!(%token, "dollar value unavailable: {}", e);
			return None;
		}
	};
	let decimals = tokens.decimals(token).await;
	let units = u256_to_f64(amount) / 10f64.powi(decimals as i32);
	Some(units * price.price_usd)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_format_units() {
		// 1.5 of an 18-decimal token
		let amount = U256::from(1_500_000_000_000_000_000u128);
		assert_eq!(format_units(amount, 18), "1.5000000");
		// 6-decimal token
		assert_eq!(format_units(U256::from(2_500_000u64), 6), "2.5000000");
		assert_eq!(format_units(U256::ZERO, 18), "0.0000000");
	}

	#[test]
	fn test_convert_same_price_same_decimals() {
		// 0.01 native at equal prices and 18 decimals is the identity
		let wei = U256::from(10_000_000_000_000_000u128);
		let out = convert_native_amount(wei, 2.0, 2.0, 18).unwrap();
		assert_eq!(out, wei);
	}

	#[test]
	fn test_convert_scales_by_price_and_decimals() {
		// 1 native at $500 into a $1 6-decimal token = 500 * 1e6 units
		let one_native = pow10(18);
		let out = convert_native_amount(one_native, 500.0, 1.0, 6).unwrap();
		assert_eq!(out, U256::from(500_000_000u64));
	}

	#[test]
	fn test_convert_rejects_bad_prices() {
		assert!(convert_native_amount(pow10(18), 0.0, 1.0, 18).is_err());
		assert!(convert_native_amount(pow10(18), 1.0, 0.0, 18).is_err());
	}
}
