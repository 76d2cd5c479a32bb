//! Key layout shared with the external counter maintainers.

use auction_types::{Address, ChainId};

pub fn solver_success_key(chain_id: ChainId, solver: &str) -> String {
	format!("solvers:{}:success:{}", chain_id, solver)
}

pub fn solver_failure_key(chain_id: ChainId, solver: &str) -> String {
	format!("solvers:{}:failure:{}", chain_id, solver)
}

pub fn price_key(chain_id: ChainId, token: &Address) -> String {
	format!("price2:{}:{:#x}", chain_id, token)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_key_layout() {
		assert_eq!(
			solver_success_key(ChainId(137), "odos"),
			"solvers:137:success:odos"
		);
		assert_eq!(
			solver_failure_key(ChainId(56), "manifold"),
			"solvers:56:failure:manifold"
		);
		assert!(price_key(ChainId(137), &Address::ZERO).starts_with("price2:137:0x0000"));
	}
}
