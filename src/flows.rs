//! Token endpoint flows: cached password grants and explicit refresh-token grants.
//!
//! [`Authenticator`] owns the token cache and the transport used for the token endpoint. The
//! password grant runs under a single-flight guard, so concurrent callers that all miss the
//! cache share one token request instead of racing each other.

pub mod common;
pub mod password;
pub mod refresh;

pub use common::TOKEN_PATH;

// self
use crate::{
	_prelude::*,
	auth::TokenCache,
	config::Credentials,
	error::ConfigError,
	http::HttpTransport,
};

/// Obtains bearer tokens for one set of merchant credentials.
pub struct Authenticator {
	transport: Arc<dyn HttpTransport>,
	token_url: Url,
	credentials: Credentials,
	token_ttl: i64,
	cache: TokenCache,
	grant_guard: AsyncMutex<()>,
}
impl Authenticator {
	/// Creates an authenticator issuing tokens from `base_url` + [`TOKEN_PATH`].
	///
	/// `token_ttl` is the lifetime in seconds assumed when a token response omits `expires_in`.
	pub fn new(
		transport: Arc<dyn HttpTransport>,
		base_url: &Url,
		credentials: Credentials,
		token_ttl: i64,
		cache: TokenCache,
	) -> Result<Self, ConfigError> {
		let token_url = base_url.join(TOKEN_PATH)?;

		Ok(Self { transport, token_url, credentials, token_ttl, cache, grant_guard: AsyncMutex::new(()) })
	}

	/// Token cache populated by both grant flows.
	pub fn cache(&self) -> &TokenCache {
		&self.cache
	}

	/// Absolute token endpoint URL.
	pub fn token_url(&self) -> &Url {
		&self.token_url
	}
}
impl Debug for Authenticator {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("Authenticator")
			.field("token_url", &self.token_url.as_str())
			.field("client_id", &self.credentials.client_id)
			.field("username", &self.credentials.username)
			.field("token_ttl", &self.token_ttl)
			.field("cache", &self.cache)
			.finish()
	}
}
