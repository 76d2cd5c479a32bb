//! Configured solver set for one chain.

use auction_config::{CommonConfig, ParamRule, SolverKind, SolverSpec};
use auction_types::{ChainId, Rfq, U256};
use serde_json::Value;

/// One configured liquidity source bound to its chain.
#[derive(Debug, Clone)]
pub struct Solver {
	pub spec: SolverSpec,
	pub chain_id: ChainId,
}

impl Solver {
	pub fn name(&self) -> &str {
		&self.spec.name
	}

	pub fn kind(&self) -> SolverKind {
		self.spec.kind
	}

	pub fn disabled(&self) -> bool {
		self.spec.disabled
	}

	/// Off-chain solvers only commit in the last-look round; they never
	/// race in the swap-phase batch.
	pub fn last_look_only(&self) -> bool {
		self.spec.kind == SolverKind::Offchain
	}

	/// Endpoint for a call. Price-only calls to off-chain solvers (and to
	/// everyone when lite quoting is on) go to the negotiated `/quote`
	/// endpoint instead of `/getBids`.
	pub fn quote_url(&self, with_execution_data: bool, use_lite_quote: bool) -> String {
		let lite = !with_execution_data
			&& (use_lite_quote || self.spec.kind == SolverKind::Offchain);
		if lite {
			self.spec.url.replace("getBids", "quote")
		} else {
			self.spec.url.clone()
		}
	}

	/// Dynamic per-request extra parameters derived from the RFQ's UI
	/// reference amount, merged over the solver's static extras.
	pub fn extra_params(&self, rfq: &Rfq) -> Option<Value> {
		let dynamic = self
			.spec
			.extra_params
			.map(|rule| rule.render(&rfq.out_amount.to_string()));
		merge_params(self.spec.extra.clone(), dynamic)
	}

	/// Dutch-baseline parameters for the last-look round.
	pub fn dutch_params(&self, baseline: U256) -> Option<Value> {
		let rule: ParamRule = self.spec.dutch_params?;
		merge_params(
			self.spec.extra.clone(),
			Some(rule.render(&baseline.to_string())),
		)
	}
}

fn merge_params(base: Option<Value>, overlay: Option<Value>) -> Option<Value> {
	match (base, overlay) {
		(None, None) => None,
		(Some(v), None) | (None, Some(v)) => Some(v),
		(Some(Value::Object(mut base)), Some(Value::Object(overlay))) => {
			base.extend(overlay);
			Some(Value::Object(base))
		}
		(_, Some(overlay)) => Some(overlay),
	}
}

/// All solvers configured for a chain, in configuration order.
pub struct SolverRegistry {
	chain_id: ChainId,
	solvers: Vec<Solver>,
}

impl SolverRegistry {
	pub fn from_config(config: &CommonConfig) -> Self {
		let chain_id = config.chain_id();
		let solvers = config
			.chain
			.solvers
			.iter()
			.map(|spec| Solver {
				spec: spec.clone(),
				chain_id,
			})
			.collect();
		Self { chain_id, solvers }
	}

	pub fn chain_id(&self) -> ChainId {
		self.chain_id
	}

	pub fn get(&self, name: &str) -> Option<&Solver> {
		self.solvers.iter().find(|s| s.name() == name)
	}

	/// Quote-phase dispatch set. A non-empty force list restricts dispatch
	/// to exactly that set and overrides per-solver disable flags.
	pub fn eligible(&self, force: &[String]) -> Vec<&Solver> {
		self.solvers
			.iter()
			.filter(|s| {
				let forced = force.iter().any(|f| f == s.name());
				if !force.is_empty() {
					forced
				} else {
					!s.disabled()
				}
			})
			.collect()
	}

	/// Swap-phase dispatch set: eligibility minus last-look-only solvers.
	pub fn swap_eligible(&self, force: &[String]) -> Vec<&Solver> {
		self.eligible(force)
			.into_iter()
			.filter(|s| !s.last_look_only())
			.collect()
	}

	/// The solver used to price native→output directly when oracle
	/// conversion fails.
	pub fn default_pricing_solver(&self) -> Option<&Solver> {
		self.get("paraswap").or_else(|| {
			self.solvers
				.iter()
				.find(|s| !s.disabled() && s.kind() == SolverKind::Onchain)
		})
	}
}
