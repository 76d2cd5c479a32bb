//! Order serialization and permit payloads.
//!
//! The settlement layer owns the authoritative order format; this codec
//! produces the ABI-encoded order bytes and the Permit2 typed-data payload
//! the signer expects.

use alloy_primitives::{address, Address, U256};
use alloy_sol_types::{sol, SolValue};
use auction_types::{ChainId, DutchOrderDescriptor};
use serde_json::{json, Value};

/// Canonical Permit2 deployment, shared across chains.
pub const PERMIT2: Address = address!("000000000022d473030f116ddee9f6b43ac78ba3");

sol! {
	struct SolDutchInput {
		address token;
		uint256 startAmount;
		uint256 endAmount;
	}

	struct SolDutchOutput {
		address token;
		address recipient;
		uint256 startAmount;
		uint256 endAmount;
	}

	struct SolDutchOrder {
		address reactor;
		address swapper;
		uint256 nonce;
		uint256 deadline;
		uint256 decayStartTime;
		uint256 decayEndTime;
		address exclusiveFiller;
		uint256 exclusivityOverrideBps;
		address additionalValidationContract;
		SolDutchInput input;
		SolDutchOutput[] outputs;
	}
}

/// Encoder seam so deployments can swap in the external order library.
pub trait OrderCodec: Send + Sync {
	fn serialize(&self, order: &DutchOrderDescriptor) -> String;
	fn permit_data(&self, order: &DutchOrderDescriptor, chain_id: ChainId) -> Value;
}

/// Default ABI encoder.
pub struct AbiOrderCodec;

impl OrderCodec for AbiOrderCodec {
	fn serialize(&self, order: &DutchOrderDescriptor) -> String {
		let encoded = SolDutchOrder {
			reactor: order.reactor,
			swapper: order.swapper,
			nonce: U256::from(order.nonce),
			deadline: U256::from(order.deadline),
			decayStartTime: U256::from(order.decay_start_time),
			decayEndTime: U256::from(order.decay_end_time),
			exclusiveFiller: order.exclusive_filler,
			exclusivityOverrideBps: U256::from(order.exclusivity_override_bps),
			additionalValidationContract: order.additional_validation_contract,
			input: SolDutchInput {
				token: order.input.token,
				startAmount: order.input.start_amount,
				endAmount: order.input.end_amount,
			},
			outputs: order
				.outputs
				.iter()
				.map(|o| SolDutchOutput {
					token: o.token,
					recipient: o.recipient,
					startAmount: o.start_amount,
					endAmount: o.end_amount,
				})
				.collect(),
		}
		.abi_encode();
		format!("0x{}", hex::encode(encoded))
	}

	fn permit_data(&self, order: &DutchOrderDescriptor, chain_id: ChainId) -> Value {
		json!({
			"domain": {
				"name": "Permit2",
				"chainId": chain_id.0,
				"verifyingContract": format!("{:#x}", PERMIT2),
			},
			"values": {
				"permitted": {
					"token": format!("{:#x}", order.input.token),
					"amount": order.input.start_amount.to_string(),
				},
				"spender": format!("{:#x}", order.reactor),
				"nonce": order.nonce.to_string(),
				"deadline": order.deadline.to_string(),
			},
		})
	}
}
