//! Dutch order builder.

use crate::codec::OrderCodec;
use auction_config::{AuctionParams, DexDeployment};
use auction_types::{
	mul_bps, pct_to_bps, unix_now, ChainId, DutchOrderDescriptor, OrderError, OrderInput,
	OrderOutput, Rfq, UiAmount, U256, BPS,
};
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, warn};

/// Slippage floor applied to the decay keep-factor, bps (0.1%).
const MIN_SLIPPAGE_BPS: u64 = 10;

/// Share of the surplus returned to the user when the auction beats the UI
/// estimate: one tenth.
const SAVINGS_SHARE_DIVISOR: u64 = 10;

/// A built order plus the user-facing amounts derived from it.
#[derive(Debug, Clone)]
pub struct BuiltOrder {
	pub user_out_amount: U256,
	pub user_min_out_amount: U256,
	pub gas_out_amount: U256,
	/// Reference price backing the round, for telemetry
	pub reference_price: U256,
	pub serialized_order: String,
	pub permit_data: Value,
	pub descriptor: DutchOrderDescriptor,
}

/// Seam for deployments that plug in their own order generation.
pub trait OrderGenerator: Send + Sync {
	fn create_order(
		&self,
		rfq: &Rfq,
		slippage_pct: f64,
		solver_out: U256,
		gas_out: U256,
		solver_name: &str,
	) -> Result<BuiltOrder, OrderError>;
}

pub struct OrderBuilder {
	chain_id: ChainId,
	params: AuctionParams,
	dex: DexDeployment,
	codec: Arc<dyn OrderCodec>,
}

impl OrderBuilder {
	pub fn new(
		chain_id: ChainId,
		params: AuctionParams,
		dex: DexDeployment,
		codec: Arc<dyn OrderCodec>,
	) -> Self {
		Self {
			chain_id,
			params,
			dex,
			codec,
		}
	}
}

impl OrderGenerator for OrderBuilder {
	fn create_order(
		&self,
		rfq: &Rfq,
		slippage_pct: f64,
		solver_out: U256,
		gas_out: U256,
		solver_name: &str,
	) -> Result<BuiltOrder, OrderError> {
		// configuration caps slippage well below 100%, this is the
		// arithmetic backstop
		let slippage_bps = pct_to_bps(slippage_pct).min(BPS - 1);

		// External-liquidity mode: no UI baseline to trust, so the
		// reference derives from the solver's own price reduced by the
		// configured tolerance and the gas cost.
		let external_liquidity = rfq.out_amount.is_sentinel();
		let ui_amount = match rfq.out_amount {
			UiAmount::Amount(amount) => amount,
			_ => {
				let keep = BPS - pct_to_bps(self.params.external_liquidity_slippage);
				let derived = mul_bps(solver_out, keep).saturating_sub(gas_out);
				debug!(
					solver = solver_name,
					derived = %derived,
					"external liquidity reference derived"
				);
				derived
			}
		};

		let reference_price = if external_liquidity {
			ui_amount
		} else {
			// UI price grossed up by slippage, net of gas
			(ui_amount * U256::from(BPS) / U256::from(BPS - slippage_bps))
				.saturating_sub(gas_out)
		};

		// Savings sharing: the auction found a better price than the UI
		// estimated, so a slice of the surplus goes back to the user.
		let savings_output = if !external_liquidity && solver_out > ui_amount {
			let surplus = solver_out - ui_amount;
			let share = (surplus / U256::from(SAVINGS_SHARE_DIVISOR)).max(U256::ONE);
			warn!(
				"[{}] savings cashback {} (solver {} over ui {})",
				rfq.session(),
				share,
				solver_out,
				ui_amount
			);
			Some(OrderOutput {
				token: rfq.out_token,
				recipient: rfq.user,
				start_amount: share,
				// some tokens revert on zero-value transfers
				end_amount: U256::ONE,
			})
		} else {
			None
		};

		let keep_bps = BPS - slippage_bps.max(MIN_SLIPPAGE_BPS);

		let out_after_gas = solver_out
			.checked_sub(gas_out)
			.ok_or(OrderError::NegativeAmountAfterGas)?;

		// Price decays from a slightly generous start down to the
		// worst-acceptable amount over the window.
		let start_amount = mul_bps(out_after_gas, 2 * BPS - keep_bps);
		let end_amount = out_after_gas;

		let now = unix_now();
		let deadline = now + self.params.order_duration_secs;
		let decay_start_time = now + self.params.decay_start_offset_secs;
		let decay_end_time = decay_start_time + self.params.decay_duration_secs;

		let mut outputs = vec![
			// gas reimbursement, fixed, paid to the treasury
			OrderOutput::fixed(rfq.out_token, self.dex.treasury, gas_out),
			OrderOutput {
				token: rfq.out_token,
				recipient: rfq.user,
				start_amount,
				end_amount,
			},
		];
		if let Some(savings) = savings_output {
			outputs.push(savings);
		}

		let descriptor = DutchOrderDescriptor {
			reactor: self.dex.reactor,
			swapper: rfq.user,
			exclusive_filler: self.dex.executor,
			exclusivity_override_bps: 0,
			additional_validation_contract: self.dex.executor,
			nonce: now,
			deadline,
			decay_start_time,
			decay_end_time,
			input: OrderInput {
				token: rfq.in_token,
				start_amount: rfq.in_amount,
				end_amount: rfq.in_amount,
			},
			outputs,
		};
		descriptor.validate()?;

		let serialized_order = self.codec.serialize(&descriptor);
		let permit_data = self.codec.permit_data(&descriptor, self.chain_id);

		// Both user-facing amounts are the solver amount scaled by the
		// keep factor; external-liquidity mode also nets out the gas.
		let mut user_out_amount = mul_bps(solver_out, keep_bps);
		if external_liquidity {
			user_out_amount = user_out_amount.saturating_sub(gas_out);
		}

		Ok(BuiltOrder {
			user_out_amount,
			user_min_out_amount: user_out_amount,
			gas_out_amount: gas_out,
			reference_price,
			serialized_order,
			permit_data,
			descriptor,
		})
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::codec::AbiOrderCodec;
	use auction_config::presets;
	use auction_types::{Address, SessionId};

	fn builder() -> OrderBuilder {
		let config = presets::quickswap().unwrap();
		OrderBuilder::new(
			config.chain_id(),
			config.params.clone(),
			config.dex.clone(),
			Arc::new(AbiOrderCodec),
		)
	}

	fn rfq(ui: UiAmount, slippage: f64) -> Rfq {
		Rfq {
			user: Address::repeat_byte(0x11),
			in_token: Address::repeat_byte(0x22),
			out_token: Address::repeat_byte(0x33),
			in_amount: U256::from(1_000_000u64),
			out_amount: ui,
			slippage: Some(slippage),
			session_id: Some(SessionId::from("order-test")),
		}
	}

	#[test]
	fn test_decay_monotonic_and_windowed() {
		let order = builder()
			.create_order(
				&rfq(UiAmount::Amount(U256::from(100_000u64)), 1.0),
				1.0,
				U256::from(100_000u64),
				U256::from(2_000u64),
				"odos",
			)
			.unwrap();

		let d = &order.descriptor;
		assert!(d.decay_start_time < d.decay_end_time);
		assert!(d.decay_end_time <= d.deadline);

		// primary output decays downward
		let primary = &d.outputs[1];
		assert!(primary.start_amount >= primary.end_amount);
		assert_eq!(primary.end_amount, U256::from(98_000u64));
		// keep = 9900 bps -> start = 98_000 * 1.01
		assert_eq!(primary.start_amount, U256::from(98_980u64));
	}

	#[test]
	fn test_gas_output_goes_to_treasury() {
		let b = builder();
		let order = b
			.create_order(
				&rfq(UiAmount::Amount(U256::from(100_000u64)), 0.5),
				0.5,
				U256::from(100_000u64),
				U256::from(1_500u64),
				"odos",
			)
			.unwrap();
		let gas = &order.descriptor.outputs[0];
		assert_eq!(gas.start_amount, U256::from(1_500u64));
		assert_eq!(gas.start_amount, gas.end_amount);
		assert_eq!(gas.recipient, presets::quickswap_deployment().treasury);
	}

	#[test]
	fn test_savings_share_is_ten_percent_with_floor() {
		// solver 110, ui 100 => savings output of 1
		let order = builder()
			.create_order(
				&rfq(UiAmount::Amount(U256::from(100u64)), 1.0),
				1.0,
				U256::from(110u64),
				U256::ZERO,
				"odos",
			)
			.unwrap();
		let savings = order.descriptor.outputs.last().unwrap();
		assert_eq!(order.descriptor.outputs.len(), 3);
		assert_eq!(savings.start_amount, U256::from(1u64));
		assert_eq!(savings.end_amount, U256::from(1u64));

		// larger surplus: 10% of it
		let order = builder()
			.create_order(
				&rfq(UiAmount::Amount(U256::from(1_000_000u64)), 1.0),
				1.0,
				U256::from(1_200_000u64),
				U256::ZERO,
				"odos",
			)
			.unwrap();
		let savings = order.descriptor.outputs.last().unwrap();
		assert_eq!(savings.start_amount, U256::from(20_000u64));
	}

	#[test]
	fn test_no_savings_in_external_liquidity_mode() {
		let order = builder()
			.create_order(
				&rfq(UiAmount::None, 1.0),
				1.0,
				U256::from(1_200_000u64),
				U256::from(10_000u64),
				"odos",
			)
			.unwrap();
		assert_eq!(order.descriptor.outputs.len(), 2);
		// keep = 9900; external mode also nets gas out of the user amount
		let expected = mul_bps(U256::from(1_200_000u64), 9_900) - U256::from(10_000u64);
		assert_eq!(order.user_out_amount, expected);
	}

	#[test]
	fn test_negative_after_gas_is_fatal() {
		let err = builder()
			.create_order(
				&rfq(UiAmount::Amount(U256::from(100u64)), 1.0),
				1.0,
				U256::from(100u64),
				U256::from(101u64),
				"odos",
			)
			.unwrap_err();
		assert_eq!(err, OrderError::NegativeAmountAfterGas);
	}

	#[test]
	fn test_serialization_present() {
		let order = builder()
			.create_order(
				&rfq(UiAmount::Amount(U256::from(100_000u64)), 1.0),
				1.0,
				U256::from(100_000u64),
				U256::from(1_000u64),
				"odos",
			)
			.unwrap();
		assert!(order.serialized_order.starts_with("0x"));
		assert_eq!(order.permit_data["domain"]["name"], "Permit2");
	}
}
