//! Fixed-window, per-endpoint request ceiling backed by the shared [`CacheStore`].
//!
//! Each endpoint path gets one counter per calendar minute (UTC). Counters expire two minutes
//! after their last increment, so old windows clean themselves up and nothing carries over
//! between minutes.

// crates.io
use base64::{Engine as _, engine::general_purpose::STANDARD_NO_PAD};
use sha2::{Digest, Sha256};
// self
use crate::{_prelude::*, clock::Clock, config::RateLimitConfig, store::CacheStore};

/// Lifetime of a per-minute counter entry.
pub const COUNTER_TTL: Duration = Duration::minutes(2);

/// Per-endpoint request limiter.
#[derive(Clone)]
pub struct RateLimiter {
	store: Arc<dyn CacheStore>,
	clock: Arc<dyn Clock>,
	prefix: String,
	config: RateLimitConfig,
}
impl RateLimiter {
	/// Creates a limiter whose counters live under `prefix` in `store`.
	pub fn new(
		store: Arc<dyn CacheStore>,
		clock: Arc<dyn Clock>,
		prefix: impl Into<String>,
		config: RateLimitConfig,
	) -> Self {
		Self { store, clock, prefix: prefix.into(), config }
	}

	/// Active limiter settings.
	pub fn config(&self) -> RateLimitConfig {
		self.config
	}

	/// Counts one request against `endpoint`, failing once the current minute is exhausted.
	///
	/// A rejected request leaves the counter untouched. When limiting is disabled this never
	/// touches the cache.
	pub async fn check_and_increment(&self, endpoint: &str) -> Result<()> {
		if !self.config.enabled {
			return Ok(());
		}

		let limit = self.config.requests_per_minute;
		let key = self.key_at(endpoint, self.clock.now());

		match self.store.increment_within(&key, u64::from(limit), COUNTER_TTL).await? {
			Some(_) => Ok(()),
			None => Err(Error::RateLimited { limit }),
		}
	}

	/// Cache key for `endpoint` in the minute bucket containing `now`.
	pub fn key_at(&self, endpoint: &str, now: OffsetDateTime) -> String {
		format!(
			"{}rate_limit_{}_{}",
			self.prefix,
			endpoint_fingerprint(endpoint),
			now.unix_timestamp().div_euclid(60)
		)
	}
}
impl Debug for RateLimiter {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("RateLimiter")
			.field("prefix", &self.prefix)
			.field("config", &self.config)
			.finish()
	}
}

fn endpoint_fingerprint(endpoint: &str) -> String {
	let mut hasher = Sha256::new();

	hasher.update(endpoint.as_bytes());

	let digest = hasher.finalize();

	STANDARD_NO_PAD.encode(digest)
}

#[cfg(test)]
mod tests {
	// crates.io
	use time::macros;
	// self
	use super::*;
	use crate::{
		clock::ManualClock,
		store::{CacheValue, MemoryStore},
	};

	fn limiter(config: RateLimitConfig) -> (RateLimiter, Arc<MemoryStore>, Arc<ManualClock>) {
		let clock = Arc::new(ManualClock::new(macros::datetime!(2025-01-01 12:00:10 UTC)));
		let store = Arc::new(MemoryStore::with_clock(clock.clone()));

		(RateLimiter::new(store.clone(), clock.clone(), "pathao_courier_", config), store, clock)
	}

	#[test]
	fn keys_bucket_by_calendar_minute() {
		let (limiter, _, _) = limiter(RateLimitConfig::default());
		let first = limiter.key_at("/aladdin/api/v1/orders", macros::datetime!(2025-01-01 12:00:00 UTC));
		let same = limiter.key_at("/aladdin/api/v1/orders", macros::datetime!(2025-01-01 12:00:59 UTC));
		let next = limiter.key_at("/aladdin/api/v1/orders", macros::datetime!(2025-01-01 12:01:00 UTC));
		let other = limiter.key_at("/aladdin/api/v1/stores", macros::datetime!(2025-01-01 12:00:00 UTC));

		assert_eq!(first, same);
		assert_ne!(first, next);
		assert_ne!(first, other);
		assert!(first.starts_with("pathao_courier_rate_limit_"));
		assert!(first.ends_with("_28928880"));
	}

	#[tokio::test]
	async fn ceiling_rejects_without_incrementing_and_resets_next_minute() {
		let (limiter, store, clock) =
			limiter(RateLimitConfig { enabled: true, requests_per_minute: 3 });

		for _ in 0..3 {
			limiter.check_and_increment("/x").await.expect("Requests under the ceiling pass.");
		}

		let err = limiter
			.check_and_increment("/x")
			.await
			.expect_err("The request above the ceiling must fail.");

		assert!(matches!(err, Error::RateLimited { limit: 3 }));

		let key = limiter.key_at("/x", clock.now());
		let count = store
			.get(&key)
			.await
			.expect("Counter lookup should succeed.")
			.and_then(CacheValue::into_counter);

		assert_eq!(count, Some(3));

		clock.advance(Duration::seconds(50));

		limiter.check_and_increment("/x").await.expect("A new minute starts a fresh window.");
	}

	#[tokio::test]
	async fn disabled_limiter_never_touches_the_cache() {
		let (limiter, store, _) =
			limiter(RateLimitConfig { enabled: false, requests_per_minute: 1 });

		for _ in 0..5 {
			limiter.check_and_increment("/x").await.expect("Disabled limiter always passes.");
		}

		assert!(store.is_empty());
	}
}
