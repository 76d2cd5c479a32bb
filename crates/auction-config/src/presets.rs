//! Built-in chain presets and deployment layers.
//!
//! Composition is explicit: a chain preset carries the chain-wide defaults
//! and solver set, a deployment function layers DEX-specific overrides on
//! top via [`CommonConfig::compose`].

use crate::types::*;
use alloy_primitives::{address, Address};
use auction_types::{ChainId, TokenData};

/// Executor address authorized to fill orders.
const EXECUTOR: Address = address!("3ab2102b833d1b97bae643cc46e6bd3d65dde65d");
/// Exclusive-Dutch reactor the orders settle against.
const REACTOR: Address = address!("00000011f84b9aa48e5f8aa8b9897600006289be");

fn native_token() -> TokenData {
	TokenData {
		address: Address::ZERO,
		symbol: "native".to_string(),
		decimals: 18,
	}
}

fn w_token(symbol: &str, address: Address) -> TokenData {
	TokenData {
		address,
		symbol: symbol.to_string(),
		decimals: 18,
	}
}

fn onchain(name: &str, url: &str, gas_rule: GasUnitsRule) -> SolverSpec {
	SolverSpec {
		name: name.to_string(),
		kind: SolverKind::Onchain,
		url: url.to_string(),
		disabled: false,
		gas_rule,
		gas_cost_mode: GasCostMode::Units,
		swap_gas_units: None,
		extra: None,
		extra_params: None,
		dutch_params: None,
	}
}

fn paraswap(url: &str) -> SolverSpec {
	onchain(
		"paraswap",
		url,
		GasUnitsRule::RawDataField("gasCost".to_string()),
	)
}

fn odos(url: &str) -> SolverSpec {
	onchain(
		"odos",
		url,
		GasUnitsRule::RawDataField("gasEstimate".to_string()),
	)
}

fn rango(url: &str) -> SolverSpec {
	// fee[0] carries FOT fees; index 1 is the gas figure, already
	// denominated in native units
	SolverSpec {
		gas_cost_mode: GasCostMode::Native,
		..onchain("rango", url, GasUnitsRule::FeeEntryAmount(1))
	}
}

fn openocean(url: &str) -> SolverSpec {
	onchain(
		"openocean",
		url,
		GasUnitsRule::RawDataPath(vec!["data".to_string(), "estimatedGas".to_string()]),
	)
}

fn bebop(url: &str) -> SolverSpec {
	onchain("bebop", url, GasUnitsRule::RouteSolverGasUnits)
}

const PARASWAP_URL: &str = "https://clob-taker-paraswap-49d0d7fa5af9.herokuapp.com/getBids";
const ODOS_URL: &str = "https://clob-taker-odos-6e16140d766f.herokuapp.com/getBids";
const RANGO_URL: &str = "https://clob-taker-rango-9efa32bb61a1.herokuapp.com/getBids";
const OPENOCEAN_URL: &str = "https://clob-taker-openocean-13433c2259af.herokuapp.com/getBids";
const BEBOP_URL: &str = "https://clob-taker-bebop-59b71fcb90d3.herokuapp.com/getBids";
const MANIFOLD_URL: &str = "https://clob-taker-manifold-d96876edee4d.herokuapp.com/getBids";
const JST_URL: &str = "https://clob-taker-clob-72394ea70c65.herokuapp.com/getBids";
const PANCAKE_URL: &str = "https://clob-taker-orbs-8437c0a3eb69.herokuapp.com/getBids";
const MAGPIE_URL: &str = "https://clob-taker-magpie-2a20d3d257ff.herokuapp.com/getBids";

pub fn polygon() -> ChainConfig {
	ChainConfig {
		chain_id: ChainId(137),
		chain_name: "polygon".to_string(),
		native: native_token(),
		w_token: w_token(
			"wmatic",
			address!("0d500b1d8e8ef31e21c99d1db9a6444d3adf1270"),
		),
		stable_tokens: vec![
			address!("c2132d05d31c914a87c6611c10748aeb04b58e8f"), // USDT
			address!("2791bca1f2de4661ed88a30c99a7a9449aa84174"), // USDC
		],
		blocked_tokens: vec![BlockedToken {
			address: address!("e580074a10360404af3abfe2d524d5806d993ea3"), // PAY
			reason: BlockReason::PayNotSupported,
		}],
		params: AuctionParams::default(),
		solvers: vec![
			paraswap(PARASWAP_URL),
			SolverSpec {
				extra: Some(serde_json::json!({ "sourceBlacklist": ["Swaap V2"] })),
				..odos(ODOS_URL)
			},
			rango(RANGO_URL),
			openocean(OPENOCEAN_URL),
			bebop(BEBOP_URL),
			SolverSpec {
				name: "manifold".to_string(),
				kind: SolverKind::Offchain,
				url: MANIFOLD_URL.to_string(),
				disabled: false,
				gas_rule: GasUnitsRule::Fixed(500_000),
				gas_cost_mode: GasCostMode::Units,
				swap_gas_units: Some(500_000),
				extra: None,
				extra_params: Some(ParamRule::BaselineOutAmount),
				dutch_params: Some(ParamRule::BaselineOutAmount),
			},
			SolverSpec {
				name: "jst".to_string(),
				kind: SolverKind::Offchain,
				url: JST_URL.to_string(),
				disabled: false,
				gas_rule: GasUnitsRule::Fixed(501_000),
				gas_cost_mode: GasCostMode::Units,
				swap_gas_units: Some(600_000),
				extra: None,
				extra_params: None,
				dutch_params: Some(ParamRule::MinOutAmount),
			},
		],
	}
}

pub fn bsc() -> ChainConfig {
	ChainConfig {
		chain_id: ChainId(56),
		chain_name: "bsc".to_string(),
		native: native_token(),
		w_token: w_token("wbnb", address!("bb4cdb9cbd36b01bd1cbaebf2de08d9173bc095c")),
		stable_tokens: vec![
			address!("e9e7cea3dedca5984780bafc599bd69add087d56"), // BUSD
			address!("55d398326f99059ff775485246999027b3197955"), // USDT
			address!("8ac76a51cc950d9822d68b83fe1ad97b32cd580d"), // USDC
		],
		blocked_tokens: vec![
			BlockedToken {
				address: address!("0b15ddf19d47e6a86a56148fb4afffc6929bcb89"), // IDIA
				reason: BlockReason::Blocked,
			},
			BlockedToken {
				address: address!("f4c8e32eadec4bfe97e0f595add0f4450a863a11"),
				reason: BlockReason::Governance,
			},
			BlockedToken {
				address: address!("cdc3a010a3473c0c4b2cb03d8489d6ba387b83cd"),
				reason: BlockReason::Governance,
			},
		],
		params: AuctionParams {
			base_gas_units: 300_000,
			..AuctionParams::default()
		},
		solvers: vec![
			paraswap(PARASWAP_URL),
			onchain(
				"pancake",
				PANCAKE_URL,
				GasUnitsRule::RawDataPath(vec!["trade".to_string(), "gasEstimate".to_string()]),
			),
			rango(RANGO_URL),
			openocean(OPENOCEAN_URL),
			bebop(BEBOP_URL),
			SolverSpec {
				name: "manifold".to_string(),
				kind: SolverKind::Offchain,
				url: MANIFOLD_URL.to_string(),
				disabled: false,
				gas_rule: GasUnitsRule::Fixed(500_000),
				gas_cost_mode: GasCostMode::Units,
				swap_gas_units: Some(500_000),
				extra: None,
				extra_params: Some(ParamRule::BaselineOutAmount),
				dutch_params: Some(ParamRule::BaselineOutAmount),
			},
		],
	}
}

pub fn base() -> ChainConfig {
	ChainConfig {
		chain_id: ChainId(8453),
		chain_name: "base".to_string(),
		native: native_token(),
		w_token: w_token("weth", address!("4200000000000000000000000000000000000006")),
		stable_tokens: vec![
			address!("833589fcd6edb6e08f4c7c32d4f71b54bda02913"), // USDbC
		],
		blocked_tokens: vec![],
		params: AuctionParams {
			// 1e14 wei flat; the rollup's own gas is negligible next to
			// the L1 data fee
			fixed_gas_cost: Some(auction_types::U256::from(100_000_000_000_000u64)),
			..AuctionParams::default()
		},
		solvers: vec![
			paraswap(PARASWAP_URL),
			odos(ODOS_URL),
			rango(RANGO_URL),
			openocean(OPENOCEAN_URL),
		],
	}
}

pub fn fantom() -> ChainConfig {
	ChainConfig {
		chain_id: ChainId(250),
		chain_name: "fantom".to_string(),
		native: native_token(),
		w_token: w_token("wftm", address!("21be370d5312f44cb42ce377bc9b8a0cef1a4c83")),
		stable_tokens: vec![
			address!("1b6382dbdea11d97f24495c9a90b7c88469134a4"), // USDC
		],
		blocked_tokens: vec![],
		params: AuctionParams {
			base_gas_units: 300_000,
			..AuctionParams::default()
		},
		solvers: vec![
			paraswap(PARASWAP_URL),
			odos(ODOS_URL),
			rango(RANGO_URL),
			openocean(OPENOCEAN_URL),
			bebop(BEBOP_URL),
			SolverSpec {
				swap_gas_units: Some(500_000),
				gas_cost_mode: GasCostMode::FixedUnits,
				..onchain("magpie", MAGPIE_URL, GasUnitsRule::Fixed(500_000))
			},
		],
	}
}

pub fn quickswap_deployment() -> DexDeployment {
	DexDeployment {
		name: "QuickSwap".to_string(),
		treasury: address!("aa9c9f1cd814ad4284ef1f6c30500563f27339ac"),
		executor: EXECUTOR,
		reactor: REACTOR,
		fee_address: address!("aa9c9f1cd814ad4284ef1f6c30500563f27339ac"),
		last_look_solver: Some("manifold".to_string()),
		overrides: ParamOverrides::default(),
	}
}

pub fn thena_deployment() -> DexDeployment {
	DexDeployment {
		name: "Thena".to_string(),
		treasury: address!("be2dae039bb3b92e8f457e69bfd6543604a297f2"),
		executor: EXECUTOR,
		reactor: REACTOR,
		fee_address: address!("be2dae039bb3b92e8f457e69bfd6543604a297f2"),
		last_look_solver: None,
		overrides: ParamOverrides {
			min_dollar_value_threshold: Some(5.0),
			external_liquidity_slippage: Some(1.5),
			..ParamOverrides::default()
		},
	}
}

pub fn intentx_deployment() -> DexDeployment {
	DexDeployment {
		name: "Intentx".to_string(),
		treasury: address!("7da1bf5b4c36b8f32cdc4a1e1965703d244fe258"),
		executor: EXECUTOR,
		reactor: REACTOR,
		fee_address: address!("7da1bf5b4c36b8f32cdc4a1e1965703d244fe258"),
		last_look_solver: None,
		overrides: ParamOverrides {
			min_dollar_value_threshold: Some(1.0),
			external_liquidity_slippage: Some(1.5),
			out_amount_gas_threshold: Some(0.15),
			..ParamOverrides::default()
		},
	}
}

pub fn spooky_deployment() -> DexDeployment {
	DexDeployment {
		name: "spookyswap".to_string(),
		treasury: address!("86aae245b1fe38c5b105dca3662562eb4d69eb8a"),
		executor: EXECUTOR,
		reactor: REACTOR,
		fee_address: address!("86aae245b1fe38c5b105dca3662562eb4d69eb8a"),
		last_look_solver: None,
		overrides: ParamOverrides {
			min_dollar_value_threshold: Some(10.0),
			external_liquidity_slippage: Some(1.5),
			out_amount_gas_threshold: Some(0.15),
			..ParamOverrides::default()
		},
	}
}

pub fn quickswap() -> Result<CommonConfig, ConfigError> {
	CommonConfig::compose(polygon(), quickswap_deployment())
}

pub fn thena() -> Result<CommonConfig, ConfigError> {
	CommonConfig::compose(bsc(), thena_deployment())
}

pub fn intentx() -> Result<CommonConfig, ConfigError> {
	CommonConfig::compose(base(), intentx_deployment())
}

pub fn spooky() -> Result<CommonConfig, ConfigError> {
	CommonConfig::compose(fantom(), spooky_deployment())
}

/// Deployment lookup for a chain id.
pub fn for_chain(chain_id: ChainId) -> Result<CommonConfig, ConfigError> {
	match chain_id.0 {
		137 => quickswap(),
		56 => thena(),
		8453 => intentx(),
		250 => spooky(),
		other => Err(ConfigError::UnknownDeployment(format!("chain {}", other))),
	}
}
