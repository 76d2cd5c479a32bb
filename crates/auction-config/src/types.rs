//! Configuration types for the auction service.

use auction_types::{Address, AuctionErrorCode, ChainId, TokenData, U256};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
	#[error("validation error: {0}")]
	Validation(String),
	#[error("file not found: {0}")]
	FileNotFound(String),
	#[error("parse error: {0}")]
	Parse(String),
	#[error("unknown deployment: {0}")]
	UnknownDeployment(String),
}

/// Tunable auction parameters. Chain presets start from `Default` and
/// deployments override individual fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AuctionParams {
	/// Slippage applied when the RFQ carries none, percent
	pub default_slippage: f64,
	/// Requests above this slippage are rejected, percent
	pub max_slippage: f64,
	/// Slippage used when no UI baseline exists, percent
	pub external_liquidity_slippage: f64,
	/// Requests below this notional value are rejected, USD
	pub min_dollar_value_threshold: f64,
	/// Reject when gas cost exceeds this fraction of the output amount
	pub out_amount_gas_threshold: f64,
	/// Overhead added to every solver's reported gas units
	pub base_gas_units: u64,
	/// Quote-phase per-solver budget, milliseconds
	pub auction_timeout_ms: u64,
	/// Swap-phase per-solver budget; larger because execution call data
	/// rides along
	pub auction_with_data_timeout_ms: u64,
	/// Order deadline offset, seconds
	pub order_duration_secs: u64,
	/// Decay begins this long after order creation, seconds
	pub decay_start_offset_secs: u64,
	/// Length of the decay window, seconds
	pub decay_duration_secs: u64,
	/// Route quote-phase calls to the off-chain price endpoint
	pub use_lite_quote: bool,
	/// TTL on reliability counters, seconds
	pub solver_score_ttl_secs: u64,
	/// Global multiplier applied to the native gas cost
	#[serde(skip_serializing_if = "Option::is_none")]
	pub custom_gas_factor: Option<f64>,
	/// Pin the native gas cost instead of computing it, wei
	#[serde(skip_serializing_if = "Option::is_none")]
	pub fixed_gas_cost: Option<U256>,
}

impl Default for AuctionParams {
	fn default() -> Self {
		Self {
			default_slippage: 0.1,
			max_slippage: 6.0,
			external_liquidity_slippage: 1.0,
			min_dollar_value_threshold: 30.0,
			out_amount_gas_threshold: 0.1,
			base_gas_units: 500_000,
			auction_timeout_ms: 6_000,
			auction_with_data_timeout_ms: 8_000,
			order_duration_secs: 180,
			decay_start_offset_secs: 10,
			decay_duration_secs: 35,
			use_lite_quote: false,
			solver_score_ttl_secs: 3_600,
			custom_gas_factor: None,
			fixed_gas_cost: None,
		}
	}
}

/// Why a token is refused service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum BlockReason {
	Blocked,
	Governance,
	PayNotSupported,
}

impl BlockReason {
	pub fn error_code(&self) -> AuctionErrorCode {
		match self {
			BlockReason::Blocked => AuctionErrorCode::TokenBlocked,
			BlockReason::Governance => AuctionErrorCode::GovernanceTokenBlocked,
			BlockReason::PayNotSupported => AuctionErrorCode::PayNotSupported,
		}
	}
}

/// Chain-scoped token deny-list entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockedToken {
	pub address: Address,
	pub reason: BlockReason,
}

/// Which side of the quoting contract a solver implements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SolverKind {
	/// Quotes synchronously against the shared public endpoint style
	Onchain,
	/// Negotiated quoting with a distinct price endpoint and an optional
	/// last-look round
	Offchain,
}

/// How a dynamic per-request parameter object is generated for a solver.
///
/// Declarative so it round-trips through configuration files; the original
/// expressed these as per-solver closures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ParamRule {
	/// `{"baselineOutAmount": <amount>}`
	BaselineOutAmount,
	/// `{"minOutAmount": <amount>}`
	MinOutAmount,
}

impl ParamRule {
	pub fn render(&self, amount: &str) -> serde_json::Value {
		match self {
			ParamRule::BaselineOutAmount => serde_json::json!({ "baselineOutAmount": amount }),
			ParamRule::MinOutAmount => serde_json::json!({ "minOutAmount": amount }),
		}
	}
}

/// Where a provider hides its gas-units figure in the raw route payload.
///
/// Registered per solver and checked at configuration time, so an unknown
/// provider fails fast instead of extracting nothing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", tag = "rule", content = "arg")]
pub enum GasUnitsRule {
	/// `route.rawData.<field>`
	RawDataField(String),
	/// Nested path under `route.rawData`
	RawDataPath(Vec<String>),
	/// `route.rawData.fee[<index>].amount` (index 0 carries FOT fees)
	FeeEntryAmount(usize),
	/// `route.solverGasUnits`
	RouteSolverGasUnits,
	/// Provider never reports units; use this constant
	Fixed(u64),
}

/// How the extracted figure converts to a native gas cost.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum GasCostMode {
	/// units × current max fee per gas
	#[default]
	Units,
	/// the extracted figure is already a native-denominated cost
	Native,
	/// configured `swap_gas_units` × current max fee per gas
	FixedUnits,
}

/// One configured liquidity source.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SolverSpec {
	pub name: String,
	pub kind: SolverKind,
	pub url: String,
	#[serde(default)]
	pub disabled: bool,
	pub gas_rule: GasUnitsRule,
	#[serde(default)]
	pub gas_cost_mode: GasCostMode,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub swap_gas_units: Option<u64>,
	/// Static extra parameters forwarded on every request
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub extra: Option<serde_json::Value>,
	/// Dynamic parameters derived from the RFQ's UI reference amount
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub extra_params: Option<ParamRule>,
	/// Dutch-baseline parameters used only in the last-look round
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub dutch_params: Option<ParamRule>,
}

/// Per-chain configuration preset.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChainConfig {
	pub chain_id: ChainId,
	pub chain_name: String,
	pub native: TokenData,
	pub w_token: TokenData,
	/// Tokens always priced at 1 USD, skipping the oracle
	#[serde(default)]
	pub stable_tokens: Vec<Address>,
	#[serde(default)]
	pub blocked_tokens: Vec<BlockedToken>,
	pub params: AuctionParams,
	pub solvers: Vec<SolverSpec>,
}

/// Sparse per-deployment parameter overrides, applied on top of the chain
/// preset. Explicit fields instead of the original's implicit merge order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ParamOverrides {
	pub min_dollar_value_threshold: Option<f64>,
	pub external_liquidity_slippage: Option<f64>,
	pub out_amount_gas_threshold: Option<f64>,
	pub decay_start_offset_secs: Option<u64>,
	pub decay_duration_secs: Option<u64>,
}

impl ParamOverrides {
	pub fn apply(&self, params: &mut AuctionParams) {
		if let Some(v) = self.min_dollar_value_threshold {
			params.min_dollar_value_threshold = v;
		}
		if let Some(v) = self.external_liquidity_slippage {
			params.external_liquidity_slippage = v;
		}
		if let Some(v) = self.out_amount_gas_threshold {
			params.out_amount_gas_threshold = v;
		}
		if let Some(v) = self.decay_start_offset_secs {
			params.decay_start_offset_secs = v;
		}
		if let Some(v) = self.decay_duration_secs {
			params.decay_duration_secs = v;
		}
	}
}

/// One DEX deployment on one chain.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DexDeployment {
	/// DEX name sent to solvers in the wire request
	pub name: String,
	/// Receives the gas-reimbursement output
	pub treasury: Address,
	/// Exclusive filler / executor contract
	pub executor: Address,
	/// Settlement reactor contract
	pub reactor: Address,
	pub fee_address: Address,
	/// Solver allowed a last-look round on this deployment
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub last_look_solver: Option<String>,
	#[serde(default)]
	pub overrides: ParamOverrides,
}

/// Fully composed, validated configuration for one auction service.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommonConfig {
	pub chain: ChainConfig,
	pub dex: DexDeployment,
	pub params: AuctionParams,
	#[serde(default)]
	pub filler_api_key: String,
	/// Non-empty restricts dispatch to exactly this set
	#[serde(default)]
	pub force_solvers: Vec<String>,
}

impl CommonConfig {
	/// Compose a chain preset with a deployment layer and validate.
	pub fn compose(chain: ChainConfig, dex: DexDeployment) -> Result<Self, ConfigError> {
		let mut params = chain.params.clone();
		dex.overrides.apply(&mut params);
		let config = Self {
			chain,
			dex,
			params,
			filler_api_key: String::new(),
			force_solvers: Vec::new(),
		};
		config.validate()?;
		Ok(config)
	}

	pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
		self.filler_api_key = key.into();
		self
	}

	pub fn with_force_solvers(mut self, solvers: Vec<String>) -> Self {
		self.force_solvers = solvers;
		self
	}

	pub fn chain_id(&self) -> ChainId {
		self.chain.chain_id
	}

	pub fn solver(&self, name: &str) -> Option<&SolverSpec> {
		self.chain.solvers.iter().find(|s| s.name == name)
	}

	pub fn blocked_reason(&self, token: &Address) -> Option<BlockReason> {
		self.chain
			.blocked_tokens
			.iter()
			.find(|b| b.address == *token)
			.map(|b| b.reason)
	}

	pub fn validate(&self) -> Result<(), ConfigError> {
		let p = &self.params;
		if p.max_slippage <= 0.0 || p.default_slippage > p.max_slippage {
			return Err(ConfigError::Validation(format!(
				"slippage bounds invalid: default {} max {}",
				p.default_slippage, p.max_slippage
			)));
		}
		if p.decay_duration_secs == 0
			|| p.decay_start_offset_secs + p.decay_duration_secs > p.order_duration_secs
		{
			return Err(ConfigError::Validation(format!(
				"decay window {}+{}s exceeds order duration {}s",
				p.decay_start_offset_secs, p.decay_duration_secs, p.order_duration_secs
			)));
		}
		if self.chain.solvers.is_empty() {
			return Err(ConfigError::Validation("no solvers configured".to_string()));
		}
		for spec in &self.chain.solvers {
			if matches!(spec.gas_cost_mode, GasCostMode::FixedUnits)
				&& spec.swap_gas_units.is_none()
			{
				return Err(ConfigError::Validation(format!(
					"solver {} uses fixedUnits gas mode without swapGasUnits",
					spec.name
				)));
			}
		}
		if let Some(name) = &self.dex.last_look_solver {
			match self.solver(name) {
				None => {
					return Err(ConfigError::Validation(format!(
						"last-look solver {} is not configured",
						name
					)))
				}
				Some(spec) => {
					if spec.kind != SolverKind::Offchain || spec.dutch_params.is_none() {
						return Err(ConfigError::Validation(format!(
							"last-look solver {} must be off-chain with dutch params",
							name
						)));
					}
				}
			}
		}
		for forced in &self.force_solvers {
			if self.solver(forced).is_none() {
				return Err(ConfigError::Validation(format!(
					"forced solver {} is not configured",
					forced
				)));
			}
		}
		Ok(())
	}
}
