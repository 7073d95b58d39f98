//! Client facade wiring configuration, cache, clock, and transport into resource clients.

// self
use crate::{
	_prelude::*,
	api::{AreaApi, OrderApi, PriceApi, StoreApi},
	auth::{RefreshedToken, TokenCache, TokenSecret},
	clock::{Clock, SystemClock},
	config::ClientConfig,
	error::ConfigError,
	executor::RequestExecutor,
	flows::Authenticator,
	http::HttpTransport,
	rate_limit::RateLimiter,
	store::{CacheStore, MemoryStore},
};

/// Entry point for the courier API.
///
/// One instance holds one set of credentials and one logical token cache. Resource clients are
/// cheap borrowed handles, so callers can request them per call.
pub struct PathaoCourier {
	config: ClientConfig,
	executor: RequestExecutor,
}
impl PathaoCourier {
	/// Builds a client with the reqwest transport, an in-memory cache, and the system clock.
	#[cfg(feature = "reqwest")]
	pub fn new(config: ClientConfig) -> Result<Self> {
		Self::builder(config).build()
	}

	/// Loads [`ClientConfig::from_env`] and builds a client with default collaborators.
	#[cfg(feature = "reqwest")]
	pub fn from_env() -> Result<Self> {
		Self::new(ClientConfig::from_env()?)
	}

	/// Starts a builder for injecting a cache, clock, or transport.
	pub fn builder(config: ClientConfig) -> PathaoCourierBuilder {
		PathaoCourierBuilder::new(config)
	}

	/// Order creation and tracking.
	pub fn order(&self) -> OrderApi<'_> {
		OrderApi::new(&self.executor)
	}

	/// Store management.
	pub fn store(&self) -> StoreApi<'_> {
		StoreApi::new(&self.executor)
	}

	/// Price calculation, defaulting `store_id` from the configuration.
	pub fn price(&self) -> PriceApi<'_> {
		PriceApi::new(&self.executor, self.config.store_id)
	}

	/// Geography lookups (unauthenticated unless opted in).
	pub fn area(&self) -> AreaApi<'_> {
		AreaApi::new(&self.executor)
	}

	/// Returns a fresh bearer token, issuing a password grant when the cache has none.
	pub async fn access_token(&self) -> Result<TokenSecret> {
		self.executor.authenticator().authenticate().await
	}

	/// Exchanges a refresh token for a new bearer token and caches the result.
	pub async fn refresh_token(&self, refresh_token: &str) -> Result<RefreshedToken> {
		self.executor.authenticator().refresh(refresh_token).await
	}

	/// Shared request pipeline, for endpoints without a dedicated client.
	pub fn executor(&self) -> &RequestExecutor {
		&self.executor
	}

	/// Configuration the client was built from.
	pub fn config(&self) -> &ClientConfig {
		&self.config
	}
}
impl Debug for PathaoCourier {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("PathaoCourier")
			.field("environment", &self.config.environment)
			.field("executor", &self.executor)
			.finish()
	}
}

/// Builder for [`PathaoCourier`].
pub struct PathaoCourierBuilder {
	config: ClientConfig,
	store: Option<Arc<dyn CacheStore>>,
	clock: Option<Arc<dyn Clock>>,
	transport: Option<Arc<dyn HttpTransport>>,
}
impl PathaoCourierBuilder {
	fn new(config: ClientConfig) -> Self {
		Self { config, store: None, clock: None, transport: None }
	}

	/// Uses `store` for the token cache and rate-limit counters.
	pub fn store(mut self, store: Arc<dyn CacheStore>) -> Self {
		self.store = Some(store);

		self
	}

	/// Uses `clock` for token freshness and rate-limit buckets.
	pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
		self.clock = Some(clock);

		self
	}

	/// Sends requests through `transport` instead of the built-in reqwest client.
	pub fn transport(mut self, transport: Arc<dyn HttpTransport>) -> Self {
		self.transport = Some(transport);

		self
	}

	/// Assembles the client.
	///
	/// Without an explicit store, an in-memory cache driven by the chosen clock is created.
	pub fn build(self) -> Result<PathaoCourier> {
		let Self { config, store, clock, transport } = self;
		let clock = clock.unwrap_or_else(|| Arc::new(SystemClock));
		let store = store.unwrap_or_else(|| Arc::new(MemoryStore::with_clock(clock.clone())));
		let transport = match transport {
			Some(transport) => transport,
			None => default_transport(&config)?,
		};
		let base_url = config.base_url()?;
		let cache = TokenCache::new(store.clone(), clock.clone(), &config.cache_prefix);
		let authenticator = Authenticator::new(
			transport.clone(),
			&base_url,
			config.credentials.clone(),
			config.token_ttl,
			cache,
		)?;
		let limiter = RateLimiter::new(store, clock, config.cache_prefix.clone(), config.rate_limit);
		let executor = RequestExecutor::new(transport, base_url, limiter, authenticator);

		Ok(PathaoCourier { config, executor })
	}
}
impl Debug for PathaoCourierBuilder {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("PathaoCourierBuilder")
			.field("config", &self.config)
			.field("store_set", &self.store.is_some())
			.field("clock_set", &self.clock.is_some())
			.field("transport_set", &self.transport.is_some())
			.finish()
	}
}

#[cfg(feature = "reqwest")]
fn default_transport(config: &ClientConfig) -> Result<Arc<dyn HttpTransport>, ConfigError> {
	Ok(Arc::new(crate::http::ReqwestTransport::new(config.timeout)?))
}

#[cfg(not(feature = "reqwest"))]
fn default_transport(config: &ClientConfig) -> Result<Arc<dyn HttpTransport>, ConfigError> {
	let _ = config;

	Err(ConfigError::MissingTransport)
}
