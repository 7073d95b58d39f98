//! Thread-safe in-memory [`CacheStore`] implementation for single-process deployments and tests.

// self
use crate::{
	_prelude::*,
	clock::{Clock, SystemClock},
	store::{self, CacheStore, CacheValue, StoreError, StoreFuture, StoredEntry},
};

type StoreMap = Arc<RwLock<HashMap<String, StoredEntry>>>;

/// Thread-safe cache that keeps entries in-process, expiring them against a [`Clock`].
#[derive(Clone)]
pub struct MemoryStore {
	map: StoreMap,
	clock: Arc<dyn Clock>,
}
impl MemoryStore {
	/// Creates an empty store that evaluates expiry with `clock`.
	pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
		Self { map: Default::default(), clock }
	}

	/// Number of entries that are still live.
	pub fn len(&self) -> usize {
		let now = self.clock.now();

		self.map.read().values().filter(|entry| entry.is_live_at(now)).count()
	}

	/// Returns true when no live entries remain.
	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}

	/// Drops every expired entry.
	pub fn purge_expired(&self) {
		let now = self.clock.now();

		self.map.write().retain(|_, entry| entry.is_live_at(now));
	}

	fn get_now(&self, key: &str) -> Option<CacheValue> {
		let now = self.clock.now();

		self.map
			.read()
			.get(key)
			.filter(|entry| entry.is_live_at(now))
			.map(|entry| entry.value.clone())
	}

	fn put_now(&self, key: &str, value: CacheValue, ttl: Duration) -> Result<(), StoreError> {
		let now = self.clock.now();

		store::put_locked(&mut self.map.write(), key, value, now, ttl)
	}
}
impl Default for MemoryStore {
	fn default() -> Self {
		Self::with_clock(Arc::new(SystemClock))
	}
}
impl Debug for MemoryStore {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("MemoryStore").field("entries", &self.map.read().len()).finish()
	}
}
impl CacheStore for MemoryStore {
	fn get<'a>(&'a self, key: &'a str) -> StoreFuture<'a, Option<CacheValue>> {
		Box::pin(async move { Ok(self.get_now(key)) })
	}

	fn put<'a>(&'a self, key: &'a str, value: CacheValue, ttl: Duration) -> StoreFuture<'a, ()> {
		Box::pin(async move { self.put_now(key, value, ttl) })
	}

	fn increment_within<'a>(
		&'a self,
		key: &'a str,
		ceiling: u64,
		ttl: Duration,
	) -> StoreFuture<'a, Option<u64>> {
		Box::pin(async move {
			let now = self.clock.now();
			let mut guard = self.map.write();

			store::increment_locked(&mut guard, key, ceiling, now, ttl)
		})
	}
}
