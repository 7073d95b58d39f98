//! Cached bearer token records and the expiry-aware token cache.

// self
use crate::{
	_prelude::*,
	auth::TokenSecret,
	clock::Clock,
	store::{CacheStore, CacheValue},
};

/// Safety margin applied both when a token is stored and when it is read back.
pub const FRESHNESS_MARGIN: Duration = Duration::seconds(300);

/// Cache key suffix under which the bearer token is stored.
pub const ACCESS_TOKEN_KEY: &str = "access_token";

/// Bearer token persisted in the cache together with its absolute expiry.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CachedToken {
	/// Bearer token value.
	pub token: TokenSecret,
	/// Instant after which the token must not be used.
	#[serde(with = "time::serde::timestamp")]
	pub expires_at: OffsetDateTime,
}
impl CachedToken {
	/// Returns `true` while `now` plus [`FRESHNESS_MARGIN`] is still before the expiry.
	pub fn is_fresh_at(&self, now: OffsetDateTime) -> bool {
		now + FRESHNESS_MARGIN < self.expires_at
	}
}

/// Outcome of a successful refresh-token grant.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RefreshedToken {
	/// Newly issued bearer token.
	pub access_token: TokenSecret,
	/// Refresh token returned by the API, or the caller's token when none was returned.
	pub refresh_token: TokenSecret,
	/// Lifetime of the new bearer token in seconds.
	pub expires_in: i64,
}

/// Token cache layered over a [`CacheStore`].
#[derive(Clone)]
pub struct TokenCache {
	store: Arc<dyn CacheStore>,
	clock: Arc<dyn Clock>,
	key: String,
}
impl TokenCache {
	/// Creates a cache storing its token under `{prefix}access_token`.
	pub fn new(store: Arc<dyn CacheStore>, clock: Arc<dyn Clock>, prefix: &str) -> Self {
		Self { store, clock, key: format!("{prefix}{ACCESS_TOKEN_KEY}") }
	}

	/// Cache key holding the token.
	pub fn key(&self) -> &str {
		&self.key
	}

	/// Returns the cached token only while it is still fresh.
	pub async fn get_token(&self) -> Result<Option<TokenSecret>> {
		let now = self.clock.now();
		let cached = self.store.get(&self.key).await?.and_then(CacheValue::into_token);

		Ok(cached.filter(|record| record.is_fresh_at(now)).map(|record| record.token))
	}

	/// Stores `token` so it expires [`FRESHNESS_MARGIN`] before the server-side lifetime.
	///
	/// Returns the cached record, or `None` when the adjusted lifetime is not positive or does
	/// not fit the calendar, in which case nothing is cached.
	pub async fn store(&self, token: TokenSecret, expires_in: i64) -> Result<Option<CachedToken>> {
		let now = self.clock.now();
		let Some(lifetime) = Duration::seconds(expires_in).checked_sub(FRESHNESS_MARGIN) else {
			return Ok(None);
		};

		if !lifetime.is_positive() {
			return Ok(None);
		}

		let Some(expires_at) = now.checked_add(lifetime) else {
			return Ok(None);
		};
		let record = CachedToken { token, expires_at };

		self.store.put(&self.key, CacheValue::Token(record.clone()), lifetime).await?;

		Ok(Some(record))
	}
}
impl Debug for TokenCache {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("TokenCache").field("key", &self.key).finish()
	}
}
