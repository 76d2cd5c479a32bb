//! Composition root for the auction service.

use crate::quote::Normalizer;
use auction_config::{CommonConfig, ConfigError};
use auction_oracle::{
	Erc20Source, GasPriceSource, FixedGasPrice, OracleError, OracleResult, PriceOracle,
	PriceSource, TokenRepository,
};
use auction_order::{AbiOrderCodec, OrderBuilder, OrderGenerator};
use auction_solvers::{HttpRfqClient, ReliabilityScorer, RfqApi, SolverRegistry};
use auction_storage::{KvStore, MemoryStore, SharedStore, TimedStore};
use auction_types::{Address, ChainId, TokenData, TokenPrice, U256};
use async_trait::async_trait;
use std::sync::Arc;

/// Placeholder sources for collaborators that were not wired in; they fail
/// softly so the corresponding fallback paths engage.
struct UnconfiguredPriceSource;

#[async_trait]
impl PriceSource for UnconfiguredPriceSource {
	async fn fetch_price(&self, _: ChainId, token: Address) -> OracleResult<TokenPrice> {
		Err(OracleError::PriceUnavailable(format!("{:#x}", token)))
	}
}

struct UnconfiguredErc20Source;

#[async_trait]
impl Erc20Source for UnconfiguredErc20Source {
	async fn fetch(&self, _: Address) -> OracleResult<TokenData> {
		Err(OracleError::Source("erc20 source not configured".to_string()))
	}
}

/// The assembled auction service. Owns the process-wide caches through its
/// collaborators; everything is injected here, never module-level state.
pub struct AuctionService {
	pub(crate) config: Arc<CommonConfig>,
	pub(crate) registry: Arc<SolverRegistry>,
	pub(crate) normalizer: Normalizer,
	pub(crate) store: SharedStore,
	pub(crate) tokens: Arc<TokenRepository>,
	pub(crate) prices: Arc<PriceOracle>,
}

impl AuctionService {
	pub fn builder() -> AuctionServiceBuilder {
		AuctionServiceBuilder::default()
	}

	pub fn config(&self) -> &CommonConfig {
		&self.config
	}

	pub fn registry(&self) -> &SolverRegistry {
		&self.registry
	}
}

/// Builder wiring the collaborators together.
///
/// Only the configuration is mandatory. The RFQ transport defaults to the
/// HTTP client keyed with the configured filler API key; the store defaults
/// to the in-memory implementation behind the operation-timeout wrapper;
/// price and metadata sources default to soft-failing placeholders; the gas
/// source defaults to a 30 gwei constant.
#[derive(Default)]
pub struct AuctionServiceBuilder {
	config: Option<CommonConfig>,
	api: Option<Arc<dyn RfqApi>>,
	store: Option<Arc<dyn KvStore>>,
	price_source: Option<Arc<dyn PriceSource>>,
	erc20_source: Option<Arc<dyn Erc20Source>>,
	gas_source: Option<Arc<dyn GasPriceSource>>,
	orders: Option<Arc<dyn OrderGenerator>>,
}

impl AuctionServiceBuilder {
	pub fn with_config(mut self, config: CommonConfig) -> Self {
		self.config = Some(config);
		self
	}

	pub fn with_api(mut self, api: Arc<dyn RfqApi>) -> Self {
		self.api = Some(api);
		self
	}

	pub fn with_store(mut self, store: Arc<dyn KvStore>) -> Self {
		self.store = Some(store);
		self
	}

	pub fn with_price_source(mut self, source: Arc<dyn PriceSource>) -> Self {
		self.price_source = Some(source);
		self
	}

	pub fn with_erc20_source(mut self, source: Arc<dyn Erc20Source>) -> Self {
		self.erc20_source = Some(source);
		self
	}

	pub fn with_gas_source(mut self, source: Arc<dyn GasPriceSource>) -> Self {
		self.gas_source = Some(source);
		self
	}

	pub fn with_order_generator(mut self, orders: Arc<dyn OrderGenerator>) -> Self {
		self.orders = Some(orders);
		self
	}

	pub fn build(self) -> Result<AuctionService, ConfigError> {
		let config = self
			.config
			.ok_or_else(|| ConfigError::Validation("configuration is required".to_string()))?;
		config.validate()?;
		let config = Arc::new(config);

		let backing = self
			.store
			.unwrap_or_else(|| Arc::new(MemoryStore::new()));
		let store: SharedStore = Arc::new(TimedStore::new(backing));

		let registry = Arc::new(SolverRegistry::from_config(&config));

		let api = self
			.api
			.unwrap_or_else(|| Arc::new(HttpRfqClient::new(config.filler_api_key.clone())));

		let tokens = Arc::new(TokenRepository::new(
			config.chain.native.clone(),
			self.erc20_source
				.unwrap_or_else(|| Arc::new(UnconfiguredErc20Source)),
		));

		let prices = Arc::new(
			PriceOracle::new(
				config.chain_id(),
				config.chain.w_token.address,
				config.chain.stable_tokens.clone(),
				self.price_source
					.unwrap_or_else(|| Arc::new(UnconfiguredPriceSource)),
			)
			.with_store(store.clone()),
		);

		let gas_price = self
			.gas_source
			.unwrap_or_else(|| Arc::new(FixedGasPrice(U256::from(30_000_000_000u64))));

		let scorer = Arc::new(ReliabilityScorer::new(store.clone()));

		let orders = self.orders.unwrap_or_else(|| {
			Arc::new(OrderBuilder::new(
				config.chain_id(),
				config.params.clone(),
				config.dex.clone(),
				Arc::new(AbiOrderCodec),
			))
		});

		let normalizer = Normalizer {
			config: config.clone(),
			registry: registry.clone(),
			api,
			tokens: tokens.clone(),
			prices: prices.clone(),
			gas_price,
			scorer,
			orders,
		};

		Ok(AuctionService {
			config,
			registry,
			normalizer,
			store,
			tokens,
			prices,
		})
	}
}
