//! Client configuration: credentials, target environment, and limiter settings.
//!
//! Configuration is plain data. Build it with [`ClientConfig::new`] and the `with_*` setters, or
//! load it from `PATHAO_*` environment variables (and an optional `.env` file) with
//! [`ClientConfig::from_env`].

// std
use std::env;
// self
use crate::{_prelude::*, auth::TokenSecret, error::ConfigError, http::DEFAULT_TIMEOUT};

/// Sandbox API host.
pub const SANDBOX_BASE_URL: &str = "https://courier-api-sandbox.pathao.com";
/// Production API host.
pub const PRODUCTION_BASE_URL: &str = "https://api-hermes.pathao.com";
/// Default cache key prefix shared by the token cache and rate-limit counters.
pub const DEFAULT_CACHE_PREFIX: &str = "pathao_courier_";
/// Token lifetime assumed when the token endpoint omits `expires_in` (five days).
///
/// This mirrors the lifetime the API has historically issued; it is not documented upstream.
pub const DEFAULT_TOKEN_TTL: i64 = 432_000;
/// Default per-endpoint ceiling.
pub const DEFAULT_REQUESTS_PER_MINUTE: u32 = 60;

/// `true` selects the sandbox host.
pub const ENV_SANDBOX: &str = "PATHAO_SANDBOX";
/// OAuth client identifier.
pub const ENV_CLIENT_ID: &str = "PATHAO_CLIENT_ID";
/// OAuth client secret.
pub const ENV_CLIENT_SECRET: &str = "PATHAO_CLIENT_SECRET";
/// Merchant login.
pub const ENV_USERNAME: &str = "PATHAO_USERNAME";
/// Merchant password.
pub const ENV_PASSWORD: &str = "PATHAO_PASSWORD";
/// Default merchant store id.
pub const ENV_STORE_ID: &str = "PATHAO_STORE_ID";
/// Base URL override.
pub const ENV_BASE_URL: &str = "PATHAO_BASE_URL";
/// Enables or disables rate limiting.
pub const ENV_RATE_LIMIT_ENABLED: &str = "PATHAO_RATE_LIMIT_ENABLED";
/// Per-endpoint, per-minute request ceiling.
pub const ENV_RATE_LIMIT_PER_MINUTE: &str = "PATHAO_RATE_LIMIT_PER_MINUTE";
/// Fallback token lifetime in seconds.
pub const ENV_TOKEN_TTL: &str = "PATHAO_TOKEN_TTL";

/// Merchant credentials used for every grant. `Debug` output redacts the secrets.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Credentials {
	/// OAuth client identifier.
	pub client_id: String,
	/// OAuth client secret.
	pub client_secret: TokenSecret,
	/// Merchant login, usually an email address.
	pub username: String,
	/// Merchant password.
	pub password: TokenSecret,
}
impl Credentials {
	/// Bundles the four credential values.
	pub fn new(
		client_id: impl Into<String>,
		client_secret: impl Into<String>,
		username: impl Into<String>,
		password: impl Into<String>,
	) -> Self {
		Self {
			client_id: client_id.into(),
			client_secret: TokenSecret::new(client_secret),
			username: username.into(),
			password: TokenSecret::new(password),
		}
	}
}

/// API host selection.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Environment {
	/// Sandbox host for integration testing.
	Sandbox,
	/// Live host.
	#[default]
	Production,
}
impl Environment {
	/// Maps the `sandbox` flag onto an environment.
	pub const fn from_sandbox_flag(sandbox: bool) -> Self {
		if sandbox { Self::Sandbox } else { Self::Production }
	}

	/// Base URL of the environment's host.
	pub const fn base_url(self) -> &'static str {
		match self {
			Self::Sandbox => SANDBOX_BASE_URL,
			Self::Production => PRODUCTION_BASE_URL,
		}
	}
}

/// Fixed-window limiter settings.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct RateLimitConfig {
	/// When `false`, requests are never counted or rejected.
	pub enabled: bool,
	/// Ceiling per endpoint per calendar minute.
	pub requests_per_minute: u32,
}
impl Default for RateLimitConfig {
	fn default() -> Self {
		Self { enabled: true, requests_per_minute: DEFAULT_REQUESTS_PER_MINUTE }
	}
}

/// Complete configuration for one courier client.
#[derive(Clone, Debug)]
pub struct ClientConfig {
	/// Merchant credentials.
	pub credentials: Credentials,
	/// Target environment.
	pub environment: Environment,
	/// Overrides the environment's host (proxies, mock servers).
	pub base_url: Option<Url>,
	/// Store used by price calculations when the query omits one.
	pub store_id: Option<u64>,
	/// Prefix for every cache key written by the client.
	pub cache_prefix: String,
	/// Token lifetime in seconds assumed when the token endpoint omits `expires_in`.
	pub token_ttl: i64,
	/// Rate limiter settings.
	pub rate_limit: RateLimitConfig,
	/// Timeout for the built-in HTTP transport.
	pub timeout: Duration,
}
impl ClientConfig {
	/// Creates a configuration with default limits for `environment`.
	pub fn new(credentials: Credentials, environment: Environment) -> Self {
		Self {
			credentials,
			environment,
			base_url: None,
			store_id: None,
			cache_prefix: DEFAULT_CACHE_PREFIX.into(),
			token_ttl: DEFAULT_TOKEN_TTL,
			rate_limit: RateLimitConfig::default(),
			timeout: DEFAULT_TIMEOUT,
		}
	}

	/// Loads a `.env` file when present, then reads the `PATHAO_*` environment variables.
	pub fn from_env() -> Result<Self, ConfigError> {
		// A missing .env file is normal in deployed environments.
		let _ = dotenv::dotenv();

		Self::from_lookup(|name| env::var(name).ok())
	}

	/// Builds a configuration from an arbitrary variable source.
	///
	/// Credentials are required; every other variable falls back to its default when unset or
	/// empty.
	pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
	where
		F: Fn(&str) -> Option<String>,
	{
		let get = |name: &'static str| {
			lookup(name).map(|value| value.trim().to_owned()).filter(|value| !value.is_empty())
		};
		let required = |name: &'static str| get(name).ok_or(ConfigError::MissingVariable { name });
		let credentials = Credentials::new(
			required(ENV_CLIENT_ID)?,
			required(ENV_CLIENT_SECRET)?,
			required(ENV_USERNAME)?,
			required(ENV_PASSWORD)?,
		);
		let sandbox = get(ENV_SANDBOX).map(|v| parse_flag(ENV_SANDBOX, v)).transpose()?;
		let mut config =
			Self::new(credentials, Environment::from_sandbox_flag(sandbox.unwrap_or(false)));

		if let Some(value) = get(ENV_BASE_URL) {
			config.base_url = Some(
				Url::parse(&value)
					.map_err(|_| ConfigError::InvalidVariable { name: ENV_BASE_URL, value })?,
			);
		}
		if let Some(value) = get(ENV_STORE_ID) {
			config.store_id = Some(parse_number(ENV_STORE_ID, value)?);
		}
		if let Some(value) = get(ENV_RATE_LIMIT_ENABLED) {
			config.rate_limit.enabled = parse_flag(ENV_RATE_LIMIT_ENABLED, value)?;
		}
		if let Some(value) = get(ENV_RATE_LIMIT_PER_MINUTE) {
			let limit: u32 = parse_number(ENV_RATE_LIMIT_PER_MINUTE, value.clone())?;

			if limit == 0 {
				return Err(ConfigError::InvalidVariable { name: ENV_RATE_LIMIT_PER_MINUTE, value });
			}

			config.rate_limit.requests_per_minute = limit;
		}
		if let Some(value) = get(ENV_TOKEN_TTL) {
			let ttl: i64 = parse_number(ENV_TOKEN_TTL, value.clone())?;

			if ttl <= 0 {
				return Err(ConfigError::InvalidVariable { name: ENV_TOKEN_TTL, value });
			}

			config.token_ttl = ttl;
		}

		Ok(config)
	}

	/// Overrides the API host.
	pub fn with_base_url(mut self, base_url: Url) -> Self {
		self.base_url = Some(base_url);

		self
	}

	/// Sets the default store used by price calculations.
	pub fn with_store_id(mut self, store_id: u64) -> Self {
		self.store_id = Some(store_id);

		self
	}

	/// Replaces the limiter settings.
	pub fn with_rate_limit(mut self, rate_limit: RateLimitConfig) -> Self {
		self.rate_limit = rate_limit;

		self
	}

	/// Overrides the fallback token lifetime (seconds).
	pub fn with_token_ttl(mut self, seconds: i64) -> Self {
		self.token_ttl = seconds;

		self
	}

	/// Overrides the cache key prefix.
	pub fn with_cache_prefix(mut self, prefix: impl Into<String>) -> Self {
		self.cache_prefix = prefix.into();

		self
	}

	/// Overrides the built-in transport's request timeout.
	pub fn with_timeout(mut self, timeout: Duration) -> Self {
		self.timeout = timeout;

		self
	}

	/// Effective API host: the override when set, otherwise the environment's host.
	pub fn base_url(&self) -> Result<Url, ConfigError> {
		match &self.base_url {
			Some(url) => Ok(url.clone()),
			None => Ok(Url::parse(self.environment.base_url())?),
		}
	}
}

fn parse_flag(name: &'static str, value: String) -> Result<bool, ConfigError> {
	match value.to_ascii_lowercase().as_str() {
		"1" | "true" | "yes" | "on" => Ok(true),
		"0" | "false" | "no" | "off" => Ok(false),
		_ => Err(ConfigError::InvalidVariable { name, value }),
	}
}

fn parse_number<T>(name: &'static str, value: String) -> Result<T, ConfigError>
where
	T: FromStr,
{
	value.parse().map_err(|_| ConfigError::InvalidVariable { name, value })
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
		let map = pairs
			.iter()
			.map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
			.collect::<HashMap<_, _>>();

		move |name| map.get(name).cloned()
	}

	const CREDENTIALS: [(&str, &str); 4] = [
		(ENV_CLIENT_ID, "id"),
		(ENV_CLIENT_SECRET, "secret"),
		(ENV_USERNAME, "merchant@example.com"),
		(ENV_PASSWORD, "hunter2"),
	];

	#[test]
	fn defaults_apply_when_only_credentials_are_set() {
		let config = ClientConfig::from_lookup(lookup(&CREDENTIALS))
			.expect("Credentials alone should produce a config.");

		assert_eq!(config.environment, Environment::Production);
		assert_eq!(config.store_id, None);
		assert_eq!(config.cache_prefix, DEFAULT_CACHE_PREFIX);
		assert_eq!(config.token_ttl, DEFAULT_TOKEN_TTL);
		assert_eq!(config.rate_limit, RateLimitConfig::default());
		assert_eq!(config.timeout, Duration::seconds(30));
		assert_eq!(
			config.base_url().expect("Production URL should parse.").as_str(),
			"https://api-hermes.pathao.com/"
		);
	}

	#[test]
	fn optional_variables_are_parsed() {
		let mut pairs = CREDENTIALS.to_vec();

		pairs.extend([
			(ENV_SANDBOX, "true"),
			(ENV_STORE_ID, "149"),
			(ENV_RATE_LIMIT_ENABLED, "0"),
			(ENV_RATE_LIMIT_PER_MINUTE, "30"),
			(ENV_TOKEN_TTL, "3600"),
		]);

		let config = ClientConfig::from_lookup(lookup(&pairs)).expect("Config should parse.");

		assert_eq!(config.environment, Environment::Sandbox);
		assert_eq!(config.store_id, Some(149));
		assert_eq!(config.rate_limit, RateLimitConfig { enabled: false, requests_per_minute: 30 });
		assert_eq!(config.token_ttl, 3_600);
		assert_eq!(
			config.base_url().expect("Sandbox URL should parse.").as_str(),
			"https://courier-api-sandbox.pathao.com/"
		);
	}

	#[test]
	fn missing_and_invalid_variables_are_reported() {
		let err = ClientConfig::from_lookup(lookup(&CREDENTIALS[..3]))
			.expect_err("A missing password must fail.");

		assert!(matches!(err, ConfigError::MissingVariable { name: ENV_PASSWORD }));

		let mut pairs = CREDENTIALS.to_vec();

		pairs.push((ENV_STORE_ID, "main"));

		let err = ClientConfig::from_lookup(lookup(&pairs)).expect_err("A non-numeric store id must fail.");

		assert!(matches!(err, ConfigError::InvalidVariable { name: ENV_STORE_ID, .. }));
	}

	#[test]
	fn credentials_debug_redacts_secrets() {
		let rendered = format!("{:?}", Credentials::new("id", "secret", "user", "hunter2"));

		assert!(rendered.contains("id"));
		assert!(!rendered.contains("secret\""));
		assert!(!rendered.contains("hunter2"));
	}
}
