//! Dutch-decay order descriptor.
//!
//! The guaranteed payout decays linearly from `start_amount` to
//! `end_amount` over the decay window, letting the exclusive filler
//! improve on the worst-acceptable price before expiry.

use crate::common::{Address, Timestamp, U256};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum OrderError {
	#[error("decay window invalid: start {start} end {end} deadline {deadline}")]
	InvalidDecayWindow {
		start: Timestamp,
		end: Timestamp,
		deadline: Timestamp,
	},
	#[error("output amount after gas is negative")]
	NegativeAmountAfterGas,
}

/// Fixed-amount order input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderInput {
	pub token: Address,
	#[serde(with = "crate::serde_amount")]
	pub start_amount: U256,
	#[serde(with = "crate::serde_amount")]
	pub end_amount: U256,
}

/// One order output leg. Equal start and end amounts mean no decay.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderOutput {
	pub token: Address,
	pub recipient: Address,
	#[serde(with = "crate::serde_amount")]
	pub start_amount: U256,
	#[serde(with = "crate::serde_amount")]
	pub end_amount: U256,
}

impl OrderOutput {
	pub fn fixed(token: Address, recipient: Address, amount: U256) -> Self {
		Self {
			token,
			recipient,
			start_amount: amount,
			end_amount: amount,
		}
	}

	/// Linearly interpolated amount at `at`, clamped to the window.
	pub fn resolve_at(&self, decay_start: Timestamp, decay_end: Timestamp, at: Timestamp) -> U256 {
		if at <= decay_start || self.start_amount <= self.end_amount {
			return self.start_amount;
		}
		if at >= decay_end {
			return self.end_amount;
		}
		let span = U256::from(decay_end - decay_start);
		let elapsed = U256::from(at - decay_start);
		let drop = (self.start_amount - self.end_amount) * elapsed / span;
		self.start_amount - drop
	}
}

/// Complete Dutch order: fixed input, ordered outputs, decay timing.
///
/// Output order is significant: gas reimbursement first, the primary user
/// output second, the optional savings output last.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DutchOrderDescriptor {
	pub reactor: Address,
	pub swapper: Address,
	pub exclusive_filler: Address,
	pub exclusivity_override_bps: u64,
	pub additional_validation_contract: Address,
	pub nonce: u64,
	pub deadline: Timestamp,
	pub decay_start_time: Timestamp,
	pub decay_end_time: Timestamp,
	pub input: OrderInput,
	pub outputs: Vec<OrderOutput>,
}

impl DutchOrderDescriptor {
	/// Enforces `decay_start < decay_end <= deadline`.
	pub fn validate(&self) -> Result<(), OrderError> {
		if self.decay_start_time >= self.decay_end_time || self.decay_end_time > self.deadline {
			return Err(OrderError::InvalidDecayWindow {
				start: self.decay_start_time,
				end: self.decay_end_time,
				deadline: self.deadline,
			});
		}
		Ok(())
	}

	/// Resolved output amounts at a point in time.
	pub fn resolve_at(&self, at: Timestamp) -> Vec<U256> {
		self.outputs
			.iter()
			.map(|o| o.resolve_at(self.decay_start_time, self.decay_end_time, at))
			.collect()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn descriptor(outputs: Vec<OrderOutput>) -> DutchOrderDescriptor {
		DutchOrderDescriptor {
			reactor: Address::ZERO,
			swapper: Address::ZERO,
			exclusive_filler: Address::ZERO,
			exclusivity_override_bps: 0,
			additional_validation_contract: Address::ZERO,
			nonce: 1,
			deadline: 1_000_180,
			decay_start_time: 1_000_010,
			decay_end_time: 1_000_045,
			input: OrderInput {
				token: Address::ZERO,
				start_amount: U256::from(100u64),
				end_amount: U256::from(100u64),
			},
			outputs,
		}
	}

	#[test]
	fn test_decay_window_invariant() {
		let mut order = descriptor(vec![]);
		assert!(order.validate().is_ok());

		order.decay_end_time = order.decay_start_time;
		assert!(order.validate().is_err());

		order.decay_end_time = order.deadline + 1;
		assert!(order.validate().is_err());
	}

	#[test]
	fn test_linear_resolution() {
		let out = OrderOutput {
			token: Address::ZERO,
			recipient: Address::ZERO,
			start_amount: U256::from(1_010u64),
			end_amount: U256::from(1_000u64),
		};
		// before, midpoint, after
		assert_eq!(out.resolve_at(100, 200, 50), U256::from(1_010u64));
		assert_eq!(out.resolve_at(100, 200, 150), U256::from(1_005u64));
		assert_eq!(out.resolve_at(100, 200, 300), U256::from(1_000u64));
	}

	#[test]
	fn test_fixed_output_never_decays() {
		let out = OrderOutput::fixed(Address::ZERO, Address::ZERO, U256::from(42u64));
		assert_eq!(out.resolve_at(100, 200, 150), U256::from(42u64));
	}
}
