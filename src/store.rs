//! Key/value cache contract backing the token cache and rate-limit counters, plus built-in
//! implementations.

pub mod file;
pub mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

// self
use crate::{_prelude::*, auth::CachedToken};

/// Boxed future returned by [`CacheStore`] operations.
pub type StoreFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, StoreError>> + 'a + Send>>;

/// Key/value cache with per-entry expiry, supplied by the host.
///
/// Entries whose TTL has elapsed must read back as absent. A `put` with a non-positive TTL
/// removes the key.
pub trait CacheStore
where
	Self: Send + Sync,
{
	/// Fetches the live value stored under `key`, if any.
	fn get<'a>(&'a self, key: &'a str) -> StoreFuture<'a, Option<CacheValue>>;

	/// Stores `value` under `key` for `ttl`.
	fn put<'a>(&'a self, key: &'a str, value: CacheValue, ttl: Duration) -> StoreFuture<'a, ()>;

	/// Increments the counter under `key` unless it already reached `ceiling`.
	///
	/// Returns the new count, or `None` when the ceiling was reached (the counter is left
	/// untouched). Each successful increment resets the entry's TTL to `ttl`. The default
	/// implementation composes [`get`](Self::get) and [`put`](Self::put) and is therefore not
	/// atomic; stores shared by concurrent callers should override it.
	fn increment_within<'a>(
		&'a self,
		key: &'a str,
		ceiling: u64,
		ttl: Duration,
	) -> StoreFuture<'a, Option<u64>> {
		Box::pin(async move {
			let current = self.get(key).await?.and_then(CacheValue::into_counter).unwrap_or(0);

			if current >= ceiling {
				return Ok(None);
			}

			let next = current + 1;

			self.put(key, CacheValue::Counter(next), ttl).await?;

			Ok(Some(next))
		})
	}
}

/// Values the client keeps in a [`CacheStore`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum CacheValue {
	/// Cached bearer token with its absolute expiry.
	Token(CachedToken),
	/// Rate-limit request counter.
	Counter(u64),
}
impl CacheValue {
	/// Returns the token payload, if this is a token entry.
	pub fn into_token(self) -> Option<CachedToken> {
		match self {
			Self::Token(token) => Some(token),
			Self::Counter(_) => None,
		}
	}

	/// Returns the counter payload, if this is a counter entry.
	pub fn into_counter(self) -> Option<u64> {
		match self {
			Self::Counter(count) => Some(count),
			Self::Token(_) => None,
		}
	}
}

/// Error type produced by [`CacheStore`] implementations.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ThisError)]
pub enum StoreError {
	/// Serialization failures surfaced by the backend.
	#[error("Serialization error: {message}.")]
	Serialization {
		/// Human-readable error payload.
		message: String,
	},
	/// Backend-level failure for the storage engine.
	#[error("Backend failure: {message}.")]
	Backend {
		/// Human-readable error payload.
		message: String,
	},
}

/// Entry stored by the built-in backends alongside its absolute expiry.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct StoredEntry {
	pub(crate) value: CacheValue,
	#[serde(with = "time::serde::timestamp")]
	pub(crate) expires_at: OffsetDateTime,
}
impl StoredEntry {
	pub(crate) fn new(
		value: CacheValue,
		now: OffsetDateTime,
		ttl: Duration,
	) -> Result<Self, StoreError> {
		let expires_at = now.checked_add(ttl).ok_or_else(|| StoreError::Backend {
			message: format!("TTL of {ttl} overflows the supported time range"),
		})?;

		Ok(Self { value, expires_at })
	}

	pub(crate) fn is_live_at(&self, now: OffsetDateTime) -> bool {
		now < self.expires_at
	}
}

/// Shared `put` logic for backends that hold their map under one write lock.
///
/// Expired entries are evicted on every write so the map only holds live keys.
pub(crate) fn put_locked(
	map: &mut HashMap<String, StoredEntry>,
	key: &str,
	value: CacheValue,
	now: OffsetDateTime,
	ttl: Duration,
) -> Result<(), StoreError> {
	map.retain(|_, entry| entry.is_live_at(now));

	if ttl.is_positive() {
		map.insert(key.to_owned(), StoredEntry::new(value, now, ttl)?);
	} else {
		map.remove(key);
	}

	Ok(())
}

/// Shared `increment_within` logic for backends that hold their map under one write lock.
pub(crate) fn increment_locked(
	map: &mut HashMap<String, StoredEntry>,
	key: &str,
	ceiling: u64,
	now: OffsetDateTime,
	ttl: Duration,
) -> Result<Option<u64>, StoreError> {
	map.retain(|_, entry| entry.is_live_at(now));

	let current = map
		.get(key)
		.filter(|entry| entry.is_live_at(now))
		.and_then(|entry| entry.value.clone().into_counter())
		.unwrap_or(0);

	if current >= ceiling {
		return Ok(None);
	}

	let next = current + 1;

	put_locked(map, key, CacheValue::Counter(next), now, ttl)?;

	Ok(Some(next))
}
