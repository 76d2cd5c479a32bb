//! The auction orchestrator.
//!
//! Fans an RFQ out to every eligible solver under a per-call timeout race,
//! filters implausible or failed answers, ranks the survivors, and emits
//! the winner plus best-effort telemetry. The batch always waits for every
//! race to settle; the auction's value is comparing all competitive
//! prices, not minimizing latency to the first answer.

use crate::service::AuctionService;
use auction_oracle::{dollar_value, format_units};
use auction_storage::RFQ_CHANNEL;
use auction_types::{
	is_native, AuctionError, AuctionErrorCode, AuctionResult, ErrorMap, Quote, QuoteAudit,
	QuoteError, Rfq, SessionId, UiAmount, U256,
};
use futures::future::join_all;
use serde_json::json;
use std::time::Duration;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
	Quote,
	Swap,
}

/// The plausibility collar: a quote is rejected when its output is not
/// strictly below 1.5x the UI reference - stale or bogus pricing.
fn collar_rejects(out_amount: U256, ui_amount: U256) -> bool {
	out_amount * U256::from(2u8) >= ui_amount * U256::from(3u8)
}

fn quote_phase_keep(quote: &Quote, ui: &UiAmount) -> bool {
	if quote.error.is_some() || quote.out_amount.is_zero() || quote.simulate_amount_out.is_zero()
	{
		return false;
	}
	let Some(ui_amount) = ui.amount() else {
		// sentinel reference: no baseline to collar against
		return true;
	};
	if quote.out_amount < quote.gas_cost_output_token {
		warn!(
			"[{}] {} gas cost {} exceeds quoted amount {}",
			quote.session_id, quote.exchange, quote.gas_cost_output_token, quote.out_amount
		);
		return false;
	}
	if collar_rejects(quote.out_amount, ui_amount) {
		warn!(
			"[{}] {} quoted {} above 1.5x ui reference {}",
			quote.session_id, quote.exchange, quote.out_amount, ui_amount
		);
		return false;
	}
	true
}

fn swap_phase_keep(quote: &Quote, ui: &UiAmount) -> bool {
	if quote.error.is_some() || quote.out_amount.is_zero() {
		return false;
	}
	let Some(ui_amount) = ui.amount() else {
		return true;
	};
	if collar_rejects(quote.out_amount, ui_amount) {
		warn!(
			"[{}] {} quoted {} above 1.5x ui reference {}",
			quote.session_id, quote.exchange, quote.out_amount, ui_amount
		);
		return false;
	}
	true
}

/// Per-solver failure map for diagnostics and the aggregate error payload.
fn collect_errors(results: &[Quote], ui: &UiAmount) -> ErrorMap {
	let mut map = ErrorMap::new();
	for quote in results {
		if let Some(error) = &quote.error {
			map.insert(quote.exchange.clone(), error.code());
		} else if quote.out_amount.is_zero() {
			map.insert(quote.exchange.clone(), "ZeroAmount".to_string());
		} else if let Some(ui_amount) = ui.amount() {
			if collar_rejects(quote.out_amount, ui_amount) {
				map.insert(quote.exchange.clone(), "OutOfRange".to_string());
			}
		}
	}
	map
}

impl AuctionService {
	/// Quote-phase auction: price discovery, no execution call data.
	pub async fn quote_auction(&self, mut rfq: Rfq) -> Result<AuctionResult, AuctionError> {
		if rfq.session_id.is_none() {
			rfq.session_id = Some(SessionId::generate());
		}
		let session = rfq.session();

		self.validate(&mut rfq).await?;
		debug!("[{}] quote auction rfq: {:?}", session, rfq);

		let results = self.race_quotes(&rfq, Phase::Quote).await;
		let ui = rfq.out_amount;

		let mut quotes: Vec<Quote> = results
			.iter()
			.filter(|q| quote_phase_keep(q, &ui))
			.cloned()
			.collect();
		let updated_error_types = collect_errors(&results, &ui);

		if quotes.is_empty() {
			warn!(
				"[{}] quote auction produced no usable routes: {:?}",
				session, updated_error_types
			);
			let code = if updated_error_types.is_empty() {
				AuctionErrorCode::QuoteNoResults
			} else {
				AuctionErrorCode::QuoteAuctionFailed
			};
			return Err(AuctionError::new(code, session)
				.with_data(json!(updated_error_types)));
		}

		// highest output wins; ties keep batch order
		quotes.sort_by(|a, b| b.out_amount.cmp(&a.out_amount));
		let best = quotes[0].clone();
		info!(
			"[{}] quote auction winner {} at {} (score {})",
			session, best.exchange, best.out_amount, best.score
		);

		let auction_data = self.audit_records(&rfq, &quotes).await;
		self.publish_winner(&rfq, &best, &auction_data);

		let (in_token_usd, out_token_usd) = self.usd_values(&rfq).await;

		Ok(AuctionResult {
			best,
			quotes,
			updated_error_types,
			auction_data,
			in_token_usd,
			out_token_usd,
		})
	}

	/// Swap-phase auction: executable quotes, reliability ranking, and the
	/// chain-gated last-look round.
	pub async fn swap_auction(&self, mut rfq: Rfq) -> Result<AuctionResult, AuctionError> {
		if rfq.session_id.is_none() {
			rfq.session_id = Some(SessionId::generate());
		}
		let session = rfq.session();
		if !rfq.slippage.is_some_and(|s| s > 0.0) {
			rfq.slippage = Some(self.config.params.default_slippage);
		}
		debug!("[{}] swap auction rfq: {:?}", session, rfq);

		let results = self.race_quotes(&rfq, Phase::Swap).await;
		let ui = rfq.out_amount;

		let mut quotes: Vec<Quote> = results
			.iter()
			.filter(|q| swap_phase_keep(q, &ui))
			.cloned()
			.collect();
		let updated_error_types = collect_errors(&results, &ui);

		if quotes.is_empty() {
			warn!(
				"[{}] swap auction produced no usable routes: {:?}",
				session, updated_error_types
			);
			let code = if updated_error_types.is_empty() {
				AuctionErrorCode::NoResults
			} else {
				AuctionErrorCode::SwapAuctionFailed
			};
			return Err(AuctionError::new(code, session)
				.with_data(json!(updated_error_types)));
		}

		// most reliable solver wins; unknown (-1) sorts last
		quotes.sort_by(|a, b| b.score.total_cmp(&a.score));
		let mut best = quotes[0].clone();
		info!(
			"[{}] swap auction winner {} at {} (score {})",
			session, best.exchange, best.out_amount, best.score
		);

		let auction_data = self.audit_records(&rfq, &quotes).await;

		// Last look: the privileged maker sees the best competing price
		// and replaces the winner on any non-error answer. The override is
		// deliberately not re-collared.
		if let Some(name) = self.config.dex.last_look_solver.clone() {
			if let Some(solver) = self.registry.get(&name) {
				let params = solver.dutch_params(best.out_amount);
				info!(
					"[{}] last look via {} with baseline {}",
					session, name, best.out_amount
				);
				let last_look = self.normalizer.quote_lite(&rfq, solver, params).await;
				match &last_look.error {
					None => {
						warn!(
							"[{}] last look override: {} at {} replaces {}",
							session, last_look.exchange, last_look.out_amount, best.exchange
						);
						best = last_look;
					}
					Some(e) => {
						debug!("[{}] last look declined: {}", session, e.code());
					}
				}
			}
		}

		Ok(AuctionResult {
			best,
			quotes,
			updated_error_types,
			auction_data,
			in_token_usd: 0.0,
			out_token_usd: 0.0,
		})
	}

	/// Pre-dispatch policy validation. Fails fast; nothing is dispatched
	/// and no side effects run on rejection.
	async fn validate(&self, rfq: &mut Rfq) -> Result<(), AuctionError> {
		let session = rfq.session();
		let params = &self.config.params;

		let slippage = match rfq.slippage {
			Some(s) if s > 0.0 => s,
			_ => {
				warn!(
					"[{}] slippage not set, defaulting to {}",
					session, params.default_slippage
				);
				params.default_slippage
			}
		};
		rfq.slippage = Some(slippage);

		if slippage > params.max_slippage {
			warn!(
				"[{}] slippage {} above ceiling {}",
				session, slippage, params.max_slippage
			);
			return Err(
				AuctionError::new(AuctionErrorCode::MaxSlippageExceeded, session)
					.with_data(json!({ "slippage": slippage })),
			);
		}

		if rfq.out_amount.is_sentinel() {
			rfq.slippage = Some(params.external_liquidity_slippage);
		}

		if is_native(&rfq.in_token) {
			warn!("[{}] native input token is not quotable", session);
			return Err(
				AuctionError::new(AuctionErrorCode::NativeInNotSupported, session)
					.with_data(json!({ "nativeIn": "not supported" })),
			);
		}

		for (token, side) in [(rfq.in_token, "inToken"), (rfq.out_token, "outToken")] {
			if let Some(reason) = self.config.blocked_reason(&token) {
				warn!("[{}] {} {:#x} is deny-listed", session, side, token);
				return Err(AuctionError::new(reason.error_code(), session)
					.with_data(json!({ "token": format!("{:#x}", token), "side": side })));
			}
		}

		if params.min_dollar_value_threshold > 0.0 {
			match dollar_value(&self.prices, &self.tokens, rfq.in_amount, rfq.in_token).await {
				Some(value) if value < params.min_dollar_value_threshold => {
					warn!(
						"[{}] notional value {} below floor {}",
						session, value, params.min_dollar_value_threshold
					);
					return Err(
						AuctionError::new(AuctionErrorCode::BelowDollarThreshold, session)
							.with_data(json!({ "minDollarValue": value })),
					);
				}
				Some(_) => {}
				None => {
					warn!(
						"[{}] input token unpriceable, skipping notional floor",
						session
					);
				}
			}
		}

		Ok(())
	}

	/// Dispatch one normalizer call per eligible solver, each racing a
	/// timer. A lost race substitutes a synthetic timeout quote; the
	/// spawned call itself keeps running and its late result is discarded.
	async fn race_quotes(&self, rfq: &Rfq, phase: Phase) -> Vec<Quote> {
		let (solvers, timeout_ms) = match phase {
			Phase::Quote => (
				self.registry.eligible(&self.config.force_solvers),
				self.config.params.auction_timeout_ms,
			),
			Phase::Swap => (
				self.registry.swap_eligible(&self.config.force_solvers),
				self.config.params.auction_with_data_timeout_ms,
			),
		};

		let tasks = solvers.into_iter().map(|solver| {
			let solver = solver.clone();
			let rfq = rfq.clone();
			let normalizer = self.normalizer.clone();
			async move {
				let name = solver.name().to_string();
				let fallback_rfq = rfq.clone();
				let handle = tokio::spawn(async move {
					match phase {
						Phase::Quote => {
							let extra = solver.extra_params(&rfq);
							normalizer.quote(&rfq, &solver, false, true, extra).await
						}
						Phase::Swap => normalizer.quote(&rfq, &solver, true, false, None).await,
					}
				});
				match tokio::time::timeout(Duration::from_millis(timeout_ms), handle).await {
					Ok(Ok(quote)) => quote,
					Ok(Err(e)) => {
						warn!(
							"[{}] {} quote task failed: {}",
							fallback_rfq.session(),
							name,
							e
						);
						Quote::failed(
							&fallback_rfq,
							&name,
							QuoteError::Provider("generalError".to_string()),
							timeout_ms,
						)
					}
					Err(_) => {
						warn!(
							"[{}] {} auction timeout after {}ms",
							fallback_rfq.session(),
							name,
							timeout_ms
						);
						Quote::failed(&fallback_rfq, &name, QuoteError::Timeout, timeout_ms)
					}
				}
			}
		});

		join_all(tasks).await
	}

	async fn audit_records(&self, rfq: &Rfq, quotes: &[Quote]) -> Vec<QuoteAudit> {
		let out_decimals = self.tokens.decimals(rfq.out_token).await;
		quotes
			.iter()
			.map(|q| QuoteAudit {
				exchange: q.exchange.clone(),
				amount_out: q.out_amount,
				amount_out_f: format_units(q.out_amount, out_decimals),
				gas_cost: q.gas_cost_output_token,
				gas_cost_f: format_units(q.gas_cost_output_token, out_decimals),
				gas_units: q.gas_units,
				simulate_amount_out: q.simulate_amount_out,
				elapsed: q.elapsed_ms as f64 / 1000.0,
			})
			.collect()
	}

	/// Best-effort publish of the winning quote; detached from the result
	/// path, failures only log.
	fn publish_winner(&self, rfq: &Rfq, best: &Quote, auction_data: &[QuoteAudit]) {
		let mut payload = match serde_json::to_value(best) {
			Ok(serde_json::Value::Object(map)) => map,
			_ => return,
		};
		payload.insert("sessionId".to_string(), json!(rfq.session()));
		payload.insert("auctionData".to_string(), json!(auction_data));
		payload.insert("rfq".to_string(), json!(rfq));

		let store = self.store.clone();
		let session = rfq.session();
		tokio::spawn(async move {
			let message = serde_json::Value::Object(payload).to_string();
			if let Err(e) = store.publish(RFQ_CHANNEL, &message).await {
				debug!("[{}] rfq publish failed: {}", session, e);
			}
		});
	}

	async fn usd_values(&self, rfq: &Rfq) -> (f64, f64) {
		let in_usd = match self.prices.token_price(rfq.in_token).await {
			Ok(p) => p.price_usd,
			Err(_) => 0.0,
		};
		let out_usd = match self.prices.token_price(rfq.out_token).await {
			Ok(p) => p.price_usd,
			Err(_) => 0.0,
		};
		(in_usd, out_usd)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use alloy_primitives::Address;
	use async_trait::async_trait;
	use auction_config::{
		AuctionParams, BlockReason, BlockedToken, ChainConfig, CommonConfig, DexDeployment,
		GasCostMode, GasUnitsRule, ParamOverrides, ParamRule, SolverKind, SolverSpec,
	};
	use auction_solvers::{RfqApi, SolverRequestBody, SolverResponse};
	use auction_storage::MemoryStore;
	use auction_types::{ChainId, TokenData};
	use std::collections::HashMap;
	use std::sync::{Arc, Mutex};
	use std::time::Instant;

	const W_TOKEN: u8 = 0xee;
	const BLOCKED: u8 = 0xb1;

	#[derive(Clone)]
	enum Stub {
		Respond(SolverResponse),
		RespondAfter(Duration, SolverResponse),
		Fail(QuoteError),
	}

	struct StubApi {
		behaviors: HashMap<String, Stub>,
		requests: Mutex<Vec<(String, String)>>,
	}

	impl StubApi {
		fn new(behaviors: Vec<(&str, Stub)>) -> Arc<Self> {
			Arc::new(Self {
				behaviors: behaviors
					.into_iter()
					.map(|(k, v)| (k.to_string(), v))
					.collect(),
				requests: Mutex::new(Vec::new()),
			})
		}

		fn requests_for(&self, solver: &str) -> Vec<String> {
			self.requests
				.lock()
				.unwrap()
				.iter()
				.filter(|(url, _)| url.contains(solver))
				.map(|(_, body)| body.clone())
				.collect()
		}
	}

	#[async_trait]
	impl RfqApi for StubApi {
		async fn call(
			&self,
			url: &str,
			body: &SolverRequestBody,
		) -> Result<SolverResponse, QuoteError> {
			self.requests
				.lock()
				.unwrap()
				.push((url.to_string(), body.data_str.clone()));
			let behavior = self
				.behaviors
				.iter()
				.find(|(name, _)| url.contains(name.as_str()))
				.map(|(_, b)| b.clone());
			match behavior {
				Some(Stub::Respond(resp)) => Ok(resp),
				Some(Stub::RespondAfter(delay, resp)) => {
					tokio::time::sleep(delay).await;
					Ok(resp)
				}
				Some(Stub::Fail(e)) => Err(e),
				None => Err(QuoteError::FetchFailed),
			}
		}
	}

	fn ok_response(amount: u64, simulate: u64) -> SolverResponse {
		serde_json::from_value(json!({
			"result": [{
				"success": true,
				"route": { "amountOut": amount.to_string(), "rawData": {} },
				"simulatedSwapResult": { "outAmount": simulate.to_string() },
				"fillData": { "to": "0xabc", "data": "0xdead", "solverId": "sid" }
			}]
		}))
		.unwrap()
	}

	fn onchain_spec(name: &str) -> SolverSpec {
		SolverSpec {
			name: name.to_string(),
			kind: SolverKind::Onchain,
			url: format!("http://{}/getBids", name),
			disabled: false,
			gas_rule: GasUnitsRule::Fixed(100_000),
			gas_cost_mode: GasCostMode::Units,
			swap_gas_units: None,
			extra: None,
			extra_params: None,
			dutch_params: None,
		}
	}

	fn test_config(solver_names: &[&str]) -> CommonConfig {
		let w_token = Address::repeat_byte(W_TOKEN);
		CommonConfig {
			chain: ChainConfig {
				chain_id: ChainId(137),
				chain_name: "testnet".to_string(),
				native: TokenData {
					address: Address::ZERO,
					symbol: "native".to_string(),
					decimals: 18,
				},
				w_token: TokenData {
					address: w_token,
					symbol: "wtest".to_string(),
					decimals: 18,
				},
				stable_tokens: vec![w_token],
				blocked_tokens: vec![BlockedToken {
					address: Address::repeat_byte(BLOCKED),
					reason: BlockReason::Blocked,
				}],
				params: AuctionParams {
					auction_timeout_ms: 200,
					auction_with_data_timeout_ms: 300,
					min_dollar_value_threshold: 0.0,
					// gas paid in the (wrapped-native) output token directly
					fixed_gas_cost: Some(U256::from(1_000u64)),
					..AuctionParams::default()
				},
				solvers: solver_names.iter().map(|n| onchain_spec(n)).collect(),
			},
			dex: DexDeployment {
				name: "testdex".to_string(),
				treasury: Address::repeat_byte(0x77),
				executor: Address::repeat_byte(0x88),
				reactor: Address::repeat_byte(0x99),
				fee_address: Address::repeat_byte(0x77),
				last_look_solver: None,
				overrides: ParamOverrides::default(),
			},
			params: AuctionParams {
				auction_timeout_ms: 200,
				auction_with_data_timeout_ms: 300,
				min_dollar_value_threshold: 0.0,
				fixed_gas_cost: Some(U256::from(1_000u64)),
				..AuctionParams::default()
			},
			filler_api_key: String::new(),
			force_solvers: Vec::new(),
		}
	}

	fn service(config: CommonConfig, api: Arc<StubApi>) -> AuctionService {
		AuctionService::builder()
			.with_config(config)
			.with_api(api)
			.build()
			.unwrap()
	}

	fn rfq(ui: UiAmount) -> Rfq {
		Rfq {
			user: Address::repeat_byte(0x11),
			in_token: Address::repeat_byte(0x33),
			out_token: Address::repeat_byte(W_TOKEN),
			in_amount: U256::from(1_000_000_000u64),
			out_amount: ui,
			slippage: Some(1.0),
			session_id: Some(SessionId::from("test-session")),
		}
	}

	/// user-facing amount for a raw solver amount at 1% slippage
	fn scaled(raw: u64) -> U256 {
		auction_types::mul_bps(U256::from(raw), 9_900)
	}

	#[test]
	fn test_collar_boundary() {
		// rejected iff out >= 1.5 x ui
		assert!(collar_rejects(U256::from(150u64), U256::from(100u64)));
		assert!(!collar_rejects(U256::from(149u64), U256::from(100u64)));
		assert!(collar_rejects(U256::from(151u64), U256::from(100u64)));
	}

	#[tokio::test]
	async fn test_validation_order_slippage_first() {
		let api = StubApi::new(vec![]);
		let svc = service(test_config(&["a"]), api);
		// native in-token AND excessive slippage: slippage wins
		let mut request = rfq(UiAmount::None);
		request.in_token = Address::ZERO;
		request.slippage = Some(7.5);
		let err = svc.quote_auction(request).await.unwrap_err();
		assert_eq!(err.code, AuctionErrorCode::MaxSlippageExceeded);
		assert_eq!(err.error_data["slippage"], 7.5);
	}

	#[tokio::test]
	async fn test_native_input_rejected() {
		let api = StubApi::new(vec![]);
		let svc = service(test_config(&["a"]), api);
		let mut request = rfq(UiAmount::None);
		request.in_token = Address::ZERO;
		let err = svc.quote_auction(request).await.unwrap_err();
		assert_eq!(err.code, AuctionErrorCode::NativeInNotSupported);
	}

	#[tokio::test]
	async fn test_blocked_token_rejected() {
		let api = StubApi::new(vec![]);
		let svc = service(test_config(&["a"]), api);
		let mut request = rfq(UiAmount::None);
		request.in_token = Address::repeat_byte(BLOCKED);
		let err = svc.quote_auction(request).await.unwrap_err();
		assert_eq!(err.code, AuctionErrorCode::TokenBlocked);
	}

	#[tokio::test]
	async fn test_quote_phase_ranks_by_out_amount() {
		let api = StubApi::new(vec![
			("solver-a", Stub::Respond(ok_response(100_000_000, 100_000_000))),
			("solver-b", Stub::Respond(ok_response(150_000_000, 150_000_000))),
			("solver-c", Stub::Respond(ok_response(90_000_000, 90_000_000))),
		]);
		let svc = service(test_config(&["solver-a", "solver-b", "solver-c"]), api);

		let result = svc
			.quote_auction(rfq(UiAmount::Amount(U256::from(100_000_000u64))))
			.await
			.unwrap();

		let order: Vec<&str> = result.quotes.iter().map(|q| q.exchange.as_str()).collect();
		assert_eq!(order, vec!["solver-b", "solver-a", "solver-c"]);
		assert_eq!(result.best.exchange, "solver-b");
		// raw 150m scaled by the 1% slippage keep-factor
		assert_eq!(result.best.out_amount, scaled(150_000_000));
	}

	#[tokio::test]
	async fn test_collar_filters_overpriced_quote() {
		// ui 100m: a quote scaling to >= 150m is out of range
		let api = StubApi::new(vec![
			("solver-a", Stub::Respond(ok_response(200_000_000, 200_000_000))),
			("solver-b", Stub::Respond(ok_response(120_000_000, 120_000_000))),
		]);
		let svc = service(test_config(&["solver-a", "solver-b"]), api);

		let result = svc
			.quote_auction(rfq(UiAmount::Amount(U256::from(100_000_000u64))))
			.await
			.unwrap();

		assert_eq!(result.quotes.len(), 1);
		assert_eq!(result.best.exchange, "solver-b");
		assert_eq!(
			result.updated_error_types.get("solver-a"),
			Some(&"OutOfRange".to_string())
		);
	}

	#[tokio::test]
	async fn test_sentinel_reference_skips_collar_and_overrides_slippage() {
		let api = StubApi::new(vec![(
			"solver-a",
			Stub::Respond(ok_response(100_000_000, 100_000_000)),
		)]);
		let svc = service(test_config(&["solver-a"]), api);

		for ui in [UiAmount::None, UiAmount::Race] {
			let result = svc.quote_auction(rfq(ui)).await.unwrap();
			// external-liquidity mode: slippage overridden to 1%,
			// keep = 9900, gas netted out of the user amount
			let expected = scaled(100_000_000) - U256::from(1_000u64);
			assert_eq!(result.best.out_amount, expected);
		}
	}

	#[tokio::test]
	async fn test_timeout_bound_and_synthetic_quote() {
		let api = StubApi::new(vec![
			(
				"slow",
				Stub::RespondAfter(
					Duration::from_secs(10),
					ok_response(999_000_000, 999_000_000),
				),
			),
			("fast", Stub::Respond(ok_response(100_000_000, 100_000_000))),
		]);
		let svc = service(test_config(&["slow", "fast"]), api);

		let started = Instant::now();
		let result = svc.quote_auction(rfq(UiAmount::None)).await.unwrap();

		// batch settles at the per-call timeout, not the slow solver
		assert!(started.elapsed() < Duration::from_secs(2));
		assert_eq!(result.best.exchange, "fast");
		assert_eq!(
			result.updated_error_types.get("slow"),
			Some(&"timeout".to_string())
		);
	}

	#[tokio::test]
	async fn test_empty_batch_distinction() {
		// all transport failures: errors recorded -> auction failed
		let api = StubApi::new(vec![
			("solver-a", Stub::Fail(QuoteError::FetchFailed)),
			("solver-b", Stub::Fail(QuoteError::FetchFailed)),
		]);
		let svc = service(test_config(&["solver-a", "solver-b"]), api);
		let err = svc.quote_auction(rfq(UiAmount::None)).await.unwrap_err();
		assert_eq!(err.code, AuctionErrorCode::QuoteAuctionFailed);
		assert_eq!(err.error_data["solver-a"], "fetchFailed");

		// valid-looking answers with zero simulation: dropped without an
		// error entry -> no results at all
		let api = StubApi::new(vec![(
			"solver-a",
			Stub::Respond(ok_response(100_000_000, 0)),
		)]);
		let svc = service(test_config(&["solver-a"]), api);
		let err = svc.quote_auction(rfq(UiAmount::None)).await.unwrap_err();
		assert_eq!(err.code, AuctionErrorCode::QuoteNoResults);
	}

	#[tokio::test]
	async fn test_gas_affordability_guard() {
		let mut config = test_config(&["solver-a"]);
		// gas eats half the output: above the 10% threshold
		config.params.fixed_gas_cost = Some(U256::from(50_000_000u64));
		let api = StubApi::new(vec![(
			"solver-a",
			Stub::Respond(ok_response(100_000_000, 100_000_000)),
		)]);
		let svc = service(config, api);

		let err = svc.quote_auction(rfq(UiAmount::None)).await.unwrap_err();
		assert_eq!(err.code, AuctionErrorCode::QuoteAuctionFailed);
		assert_eq!(err.error_data["solver-a"], "gasCostToHigh");
	}

	#[tokio::test]
	async fn test_forced_solver_restricts_dispatch() {
		let api = StubApi::new(vec![
			("solver-a", Stub::Respond(ok_response(100_000_000, 100_000_000))),
			("solver-b", Stub::Respond(ok_response(500_000_000, 500_000_000))),
		]);
		let mut config = test_config(&["solver-a", "solver-b"]);
		config.force_solvers = vec!["solver-a".to_string()];
		let svc = service(config, api.clone());

		let result = svc.quote_auction(rfq(UiAmount::None)).await.unwrap();
		assert_eq!(result.quotes.len(), 1);
		assert_eq!(result.best.exchange, "solver-a");
		assert!(api.requests_for("solver-b").is_empty());
	}

	#[tokio::test]
	async fn test_swap_phase_ranks_by_score() {
		let store = Arc::new(MemoryStore::new());
		let scorer = auction_solvers::ReliabilityScorer::new(store.clone());
		let chain = ChainId(137);
		// a: 0.2, b: 0.9, c: 0.5
		for (solver, successes, failures) in
			[("solver-a", 1, 4), ("solver-b", 9, 1), ("solver-c", 1, 1)]
		{
			for _ in 0..successes {
				scorer.record_outcome(chain, solver, true, 600).await.unwrap();
			}
			for _ in 0..failures {
				scorer.record_outcome(chain, solver, false, 600).await.unwrap();
			}
		}

		let api = StubApi::new(vec![
			("solver-a", Stub::Respond(ok_response(100_000_000, 0))),
			("solver-b", Stub::Respond(ok_response(90_000_000, 0))),
			("solver-c", Stub::Respond(ok_response(95_000_000, 0))),
		]);
		let svc = AuctionService::builder()
			.with_config(test_config(&["solver-a", "solver-b", "solver-c"]))
			.with_api(api)
			.with_store(store)
			.build()
			.unwrap();

		let result = svc.swap_auction(rfq(UiAmount::None)).await.unwrap();
		let order: Vec<&str> = result.quotes.iter().map(|q| q.exchange.as_str()).collect();
		assert_eq!(order, vec!["solver-b", "solver-c", "solver-a"]);
		assert!((result.best.score - 0.9).abs() < 1e-9);
	}

	fn config_with_last_look(names: &[&str], maker: &str) -> CommonConfig {
		let mut config = test_config(names);
		config.chain.solvers.push(SolverSpec {
			name: maker.to_string(),
			kind: SolverKind::Offchain,
			url: format!("http://{}/getBids", maker),
			disabled: false,
			gas_rule: GasUnitsRule::Fixed(500_000),
			gas_cost_mode: GasCostMode::Units,
			swap_gas_units: Some(500_000),
			extra: None,
			extra_params: Some(ParamRule::BaselineOutAmount),
			dutch_params: Some(ParamRule::BaselineOutAmount),
		});
		config.dex.last_look_solver = Some(maker.to_string());
		config
	}

	#[tokio::test]
	async fn test_last_look_override_replaces_winner() {
		let api = StubApi::new(vec![
			("solver-a", Stub::Respond(ok_response(100_000_000, 0))),
			("maker", Stub::Respond(ok_response(104_000_000, 0))),
		]);
		let svc = service(config_with_last_look(&["solver-a"], "maker"), api.clone());

		let result = svc.swap_auction(rfq(UiAmount::None)).await.unwrap();
		assert_eq!(result.best.exchange, "maker");
		// lite quote carries the raw solver amount
		assert_eq!(result.best.out_amount, U256::from(104_000_000u64));

		// the maker saw the current best amount as its baseline; the swap
		// race runs without gas adjustment, so nothing is netted out
		let maker_requests = api.requests_for("maker");
		assert_eq!(maker_requests.len(), 1);
		let expected_baseline = scaled(100_000_000);
		assert!(maker_requests[0].contains(&format!(
			"\"baselineOutAmount\":\"{}\"",
			expected_baseline
		)));
	}

	#[tokio::test]
	async fn test_last_look_error_keeps_winner() {
		let api = StubApi::new(vec![
			("solver-a", Stub::Respond(ok_response(100_000_000, 0))),
			("maker", Stub::Fail(QuoteError::FetchFailed)),
		]);
		let svc = service(config_with_last_look(&["solver-a"], "maker"), api);

		let result = svc.swap_auction(rfq(UiAmount::None)).await.unwrap();
		assert_eq!(result.best.exchange, "solver-a");
	}

	#[tokio::test]
	async fn test_last_look_solver_never_races_in_swap_batch() {
		let api = StubApi::new(vec![
			("solver-a", Stub::Respond(ok_response(100_000_000, 0))),
			("maker", Stub::Fail(QuoteError::FetchFailed)),
		]);
		let svc = service(config_with_last_look(&["solver-a"], "maker"), api.clone());

		svc.swap_auction(rfq(UiAmount::None)).await.unwrap();
		// exactly one maker call: the last look, not the batch race
		assert_eq!(api.requests_for("maker").len(), 1);
	}

	#[tokio::test]
	async fn test_winner_is_published() {
		let store = Arc::new(MemoryStore::new());
		let mut rx = store.subscribe();
		let api = StubApi::new(vec![(
			"solver-a",
			Stub::Respond(ok_response(100_000_000, 100_000_000)),
		)]);
		let svc = AuctionService::builder()
			.with_config(test_config(&["solver-a"]))
			.with_api(api)
			.with_store(store)
			.build()
			.unwrap();

		svc.quote_auction(rfq(UiAmount::None)).await.unwrap();

		let (channel, payload) =
			tokio::time::timeout(Duration::from_secs(1), rx.recv())
				.await
				.unwrap()
				.unwrap();
		assert_eq!(channel, RFQ_CHANNEL);
		let value: serde_json::Value = serde_json::from_str(&payload).unwrap();
		assert_eq!(value["sessionId"], "test-session");
		assert_eq!(value["exchange"], "solver-a");
		assert!(value["rfq"].is_object());
	}

	#[tokio::test]
	async fn test_same_rfq_is_idempotent() {
		let api = StubApi::new(vec![
			("solver-a", Stub::Respond(ok_response(100_000_000, 100_000_000))),
			("solver-b", Stub::Respond(ok_response(120_000_000, 120_000_000))),
		]);
		let svc = service(test_config(&["solver-a", "solver-b"]), api);

		let first = svc.quote_auction(rfq(UiAmount::None)).await.unwrap();
		let second = svc.quote_auction(rfq(UiAmount::None)).await.unwrap();
		assert_eq!(first.best.exchange, second.best.exchange);
		assert_eq!(first.best.out_amount, second.best.out_amount);
	}

	#[tokio::test]
	async fn test_audit_records_cover_survivors() {
		let api = StubApi::new(vec![
			("solver-a", Stub::Respond(ok_response(100_000_000, 100_000_000))),
			("solver-b", Stub::Fail(QuoteError::FetchFailed)),
		]);
		let svc = service(test_config(&["solver-a", "solver-b"]), api);

		let result = svc.quote_auction(rfq(UiAmount::None)).await.unwrap();
		assert_eq!(result.auction_data.len(), 1);
		let audit = &result.auction_data[0];
		assert_eq!(audit.exchange, "solver-a");
		assert_eq!(audit.gas_cost, U256::from(1_000u64));
		assert!(!audit.amount_out_f.is_empty());
	}
}
