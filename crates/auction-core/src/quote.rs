//! Quote normalization and gas adjustment.
//!
//! One call per (RFQ, solver) pair: issue the raw request, convert the
//! heterogeneous provider response into a canonical [`Quote`], price the
//! gas cost in output-token units, and delegate order construction. Every
//! failure is caught and becomes a typed error quote; nothing here throws
//! past the batch.

use auction_config::{CommonConfig, GasCostMode};
use auction_oracle::{convert_native_amount, GasPriceSource, PriceOracle, TokenRepository};
use auction_solvers::{
	extract_gas_units, value_to_u256, ReliabilityScorer, RfqApi, Solver, SolverRegistry,
	SolverRequestBody,
};
use auction_order::OrderGenerator;
use auction_types::{is_native, mul_bps, Quote, QuoteError, Rfq, U256, BPS};
use serde_json::Value;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Per-solver quote pipeline with its injected collaborators.
#[derive(Clone)]
pub struct Normalizer {
	pub(crate) config: Arc<CommonConfig>,
	pub(crate) registry: Arc<SolverRegistry>,
	pub(crate) api: Arc<dyn RfqApi>,
	pub(crate) tokens: Arc<TokenRepository>,
	pub(crate) prices: Arc<PriceOracle>,
	pub(crate) gas_price: Arc<dyn GasPriceSource>,
	pub(crate) scorer: Arc<ReliabilityScorer>,
	pub(crate) orders: Arc<dyn OrderGenerator>,
}

impl Normalizer {
	/// Full normalization: raw request, gas adjustment, order building.
	pub async fn quote(
		&self,
		rfq: &Rfq,
		solver: &Solver,
		include_execution_data: bool,
		apply_gas_adjustment: bool,
		extra_params: Option<Value>,
	) -> Quote {
		let start = Instant::now();
		let elapsed = |s: &Instant| s.elapsed().as_millis() as u64;

		let url = solver.quote_url(include_execution_data, self.config.params.use_lite_quote);
		let (response, out_token) = tokio::join!(
			self.call_solver(rfq, solver, &url, extra_params),
			self.tokens.resolve(rfq.out_token)
		);

		let response = match response {
			Ok(r) => r,
			Err(e) => return Quote::failed(rfq, solver.name(), e, elapsed(&start)),
		};

		let out_amount = match response.out_amount() {
			Ok(a) => a,
			Err(e) => return Quote::failed(rfq, solver.name(), e, elapsed(&start)),
		};

		// permissive normalization already vetted result[0]
		let result = match response.normalized() {
			Ok(r) => r.clone(),
			Err(e) => return Quote::failed(rfq, solver.name(), e, elapsed(&start)),
		};

		let simulate_amount_out = result
			.simulated_swap_result
			.as_ref()
			.and_then(|s| value_to_u256(&s.out_amount))
			.unwrap_or(U256::ZERO);

		let mut gas_units = U256::ZERO;
		let mut gas_cost_output_token = U256::ZERO;

		if apply_gas_adjustment {
			let extracted = match extract_gas_units(&solver.spec.gas_rule, &response) {
				Ok(units) => units,
				Err(e) => return Quote::failed(rfq, solver.name(), e, elapsed(&start)),
			};
			gas_units = extracted + U256::from(self.config.params.base_gas_units);

			let mut gas_cost_native =
				match self.native_gas_cost(solver, extracted, gas_units).await {
					Ok(cost) => cost,
					Err(e) => return Quote::failed(rfq, solver.name(), e, elapsed(&start)),
				};

			if let Some(factor) = self.config.params.custom_gas_factor {
				gas_cost_native = mul_bps(gas_cost_native, (factor * BPS as f64).round() as u64);
			}
			if let Some(fixed) = self.config.params.fixed_gas_cost {
				gas_cost_native = fixed;
			}

			debug!(
				"[{}] [{}] gas units {} native cost {}",
				rfq.session(),
				solver.name(),
				gas_units,
				gas_cost_native
			);

			gas_cost_output_token = self
				.gas_to_output_token(rfq, solver, gas_cost_native, out_token.decimals)
				.await;

			if gas_cost_output_token.is_zero() {
				warn!(
					"[{}] [{}] gas cost converted to zero output units",
					rfq.session(),
					solver.name()
				);
				return Quote::failed(
					rfq,
					solver.name(),
					QuoteError::GasCostOutputTokenZero,
					elapsed(&start),
				);
			}

			// affordability guard: gas / out > threshold
			let threshold_bps =
				(self.config.params.out_amount_gas_threshold * BPS as f64).round() as u64;
			if gas_cost_output_token * U256::from(BPS) > out_amount * U256::from(threshold_bps) {
				warn!(
					"[{}] [{}] gas {} / out {} above threshold {}",
					rfq.session(),
					solver.name(),
					gas_cost_output_token,
					out_amount,
					self.config.params.out_amount_gas_threshold
				);
				return Quote::failed(
					rfq,
					solver.name(),
					QuoteError::GasCostToHigh,
					elapsed(&start),
				);
			}
		}

		let score = self
			.scorer
			.score(self.registry.chain_id(), solver.name())
			.await;

		let out_token_price = match self.prices.token_price(rfq.out_token).await {
			Ok(p) => p.price_usd,
			Err(_) => 0.0,
		};

		let raw = serde_json::json!({ "route": result.route });
		let fill_data = result.fill_data.clone().unwrap_or_default();

		// Order construction can reject the amounts; that failure stays
		// scoped to this solver's quote.
		let built = match self.orders.create_order(
			rfq,
			rfq.slippage_pct(),
			out_amount,
			gas_cost_output_token,
			solver.name(),
		) {
			Ok(built) => built,
			Err(e) => {
				warn!(
					"[{}] [{}] order build failed: {}",
					rfq.session(),
					solver.name(),
					e
				);
				let mut quote = Quote::failed(
					rfq,
					solver.name(),
					QuoteError::OrderBuild(e.to_string()),
					elapsed(&start),
				);
				quote.out_amount = out_amount;
				quote.gas_cost_output_token = gas_cost_output_token;
				quote.raw = raw;
				return quote;
			}
		};

		info!(
			"[{}] [{}] out {} simulated {} gas {}",
			rfq.session(),
			solver.name(),
			built.user_out_amount,
			simulate_amount_out,
			gas_cost_output_token
		);

		Quote {
			session_id: rfq.session(),
			exchange: solver.name().to_string(),
			out_amount: built.user_out_amount,
			min_amount_out: built.user_min_out_amount,
			gas_cost_output_token,
			gas_units,
			simulate_amount_out,
			score,
			elapsed_ms: elapsed(&start),
			error: None,
			raw,
			fill_data,
			serialized_order: built.serialized_order,
			permit_data: built.permit_data,
			out_token_price,
		}
	}

	/// Lite normalization for the last-look round: raw solver amount, no
	/// gas adjustment, no order building.
	pub async fn quote_lite(
		&self,
		rfq: &Rfq,
		solver: &Solver,
		extra_params: Option<Value>,
	) -> Quote {
		let start = Instant::now();
		let elapsed = |s: &Instant| s.elapsed().as_millis() as u64;

		let url = solver.quote_url(true, false);
		let response = match self.call_solver(rfq, solver, &url, extra_params).await {
			Ok(r) => r,
			Err(e) => return Quote::failed(rfq, solver.name(), e, elapsed(&start)),
		};

		let out_amount = match response.out_amount() {
			Ok(a) => a,
			Err(e) => return Quote::failed(rfq, solver.name(), e, elapsed(&start)),
		};
		let result = match response.normalized() {
			Ok(r) => r.clone(),
			Err(e) => return Quote::failed(rfq, solver.name(), e, elapsed(&start)),
		};

		let score = self
			.scorer
			.score(self.registry.chain_id(), solver.name())
			.await;

		debug!(
			"[{}] [{}] lite quote out {}",
			rfq.session(),
			solver.name(),
			out_amount
		);

		Quote {
			session_id: rfq.session(),
			exchange: solver.name().to_string(),
			out_amount,
			min_amount_out: out_amount,
			gas_cost_output_token: U256::ZERO,
			gas_units: U256::ZERO,
			simulate_amount_out: U256::ZERO,
			score,
			elapsed_ms: elapsed(&start),
			error: None,
			raw: serde_json::json!({ "route": result.route }),
			fill_data: result.fill_data.unwrap_or_default(),
			serialized_order: String::new(),
			permit_data: Value::Null,
			out_token_price: 0.0,
		}
	}

	async fn call_solver(
		&self,
		rfq: &Rfq,
		solver: &Solver,
		url: &str,
		extra_params: Option<Value>,
	) -> Result<auction_solvers::SolverResponse, QuoteError> {
		let params = match extra_params {
			Some(p) => Some(p),
			None => solver.spec.extra.clone(),
		};
		let body = SolverRequestBody::build(
			&self.config.chain.chain_name,
			&self.config.dex.name,
			self.config.dex.executor,
			rfq,
			params,
		)?;
		self.api.call(url, &body).await
	}

	/// Convert extracted gas figures into a native-denominated cost.
	async fn native_gas_cost(
		&self,
		solver: &Solver,
		extracted: U256,
		total_units: U256,
	) -> Result<U256, QuoteError> {
		let fee_per_gas = self
			.gas_price
			.max_fee_per_gas(self.registry.chain_id())
			.await
			.map_err(|e| QuoteError::Provider(format!("gas price unavailable: {}", e)))?;

		Ok(match solver.spec.gas_cost_mode {
			GasCostMode::Units => total_units * fee_per_gas,
			// provider reports a native-denominated figure; only the base
			// overhead still needs pricing
			GasCostMode::Native => {
				extracted + U256::from(self.config.params.base_gas_units) * fee_per_gas
			}
			GasCostMode::FixedUnits => {
				U256::from(solver.spec.swap_gas_units.unwrap_or(0)) * fee_per_gas
			}
		})
	}

	/// Native gas cost -> output-token units.
	///
	/// Same-token shortcut when the output is native or wrapped-native;
	/// price-ratio conversion otherwise; a direct native->output quote from
	/// the default pricing solver as the fallback. Failures resolve to zero
	/// and are caught by the zero-gas guard upstream.
	async fn gas_to_output_token(
		&self,
		rfq: &Rfq,
		solver: &Solver,
		gas_cost_native: U256,
		out_decimals: u8,
	) -> U256 {
		let out_token = rfq.out_token;
		if is_native(&out_token) || out_token == self.config.chain.w_token.address {
			return gas_cost_native;
		}

		let converted = async {
			let native_price = self
				.prices
				.token_price(self.config.chain.w_token.address)
				.await?;
			let out_price = self.prices.token_price(out_token).await?;
			convert_native_amount(
				gas_cost_native,
				native_price.price_usd,
				out_price.price_usd,
				out_decimals,
			)
		}
		.await;

		match converted {
			Ok(amount) => amount,
			Err(e) => {
				warn!(
					"[{}] [{}] oracle gas conversion failed ({}), asking default pricing solver",
					rfq.session(),
					solver.name(),
					e
				);
				self.gas_fallback_quote(rfq, gas_cost_native).await
			}
		}
	}

	async fn gas_fallback_quote(&self, rfq: &Rfq, gas_cost_native: U256) -> U256 {
		let Some(pricing_solver) = self.registry.default_pricing_solver() else {
			return U256::ZERO;
		};
		let native_rfq = Rfq {
			user: rfq.user,
			in_token: self.config.chain.w_token.address,
			out_token: rfq.out_token,
			in_amount: gas_cost_native,
			out_amount: auction_types::UiAmount::None,
			slippage: None,
			session_id: rfq.session_id.clone(),
		};
		let url = pricing_solver.quote_url(false, self.config.params.use_lite_quote);
		match self
			.call_solver(&native_rfq, pricing_solver, &url, None)
			.await
		{
			Ok(response) => response.out_amount().unwrap_or(U256::ZERO),
			Err(e) => {
				warn!(
					"[{}] gas fallback quote failed via {}: {}",
					rfq.session(),
					pricing_solver.name(),
					e
				);
				U256::ZERO
			}
		}
	}
}
