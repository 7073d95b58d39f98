//! Simple file-backed [`CacheStore`] so cached tokens survive process restarts.

// std
use std::{
	fs::{self, File},
	io::Write,
	path::{Path, PathBuf},
};
// self
use crate::{
	_prelude::*,
	clock::{Clock, SystemClock},
	store::{self, CacheStore, CacheValue, StoreError, StoreFuture, StoredEntry},
};

/// Persists cache entries to a JSON file after each mutation.
///
/// Expired entries are dropped whenever the file is rewritten.
#[derive(Clone)]
pub struct FileStore {
	path: PathBuf,
	inner: Arc<RwLock<HashMap<String, StoredEntry>>>,
	clock: Arc<dyn Clock>,
}
impl FileStore {
	/// Opens (or creates) a store at the provided path, eagerly loading existing data.
	pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
		Self::open_with_clock(path, Arc::new(SystemClock))
	}

	/// Same as [`open`](Self::open) but evaluates expiry with `clock`.
	pub fn open_with_clock(
		path: impl Into<PathBuf>,
		clock: Arc<dyn Clock>,
	) -> Result<Self, StoreError> {
		let path = path.into();

		Self::ensure_parent_exists(&path)?;

		let snapshot = if path.exists() { Self::load_snapshot(&path)? } else { HashMap::new() };

		Ok(Self { path, inner: Arc::new(RwLock::new(snapshot)), clock })
	}

	/// Location of the backing file.
	pub fn path(&self) -> &Path {
		&self.path
	}

	fn load_snapshot(path: &Path) -> Result<HashMap<String, StoredEntry>, StoreError> {
		if !path.exists() {
			return Ok(HashMap::new());
		}

		let metadata = path.metadata().map_err(|e| StoreError::Backend {
			message: format!("Failed to inspect {}: {e}", path.display()),
		})?;

		if metadata.len() == 0 {
			return Ok(HashMap::new());
		}

		let bytes = fs::read(path).map_err(|e| StoreError::Backend {
			message: format!("Failed to read {}: {e}", path.display()),
		})?;

		serde_json::from_slice(&bytes).map_err(|e| StoreError::Serialization {
			message: format!("Failed to parse {}: {e}", path.display()),
		})
	}

	fn ensure_parent_exists(path: &Path) -> Result<(), StoreError> {
		if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
			fs::create_dir_all(parent).map_err(|e| StoreError::Backend {
				message: format!("Failed to create store directory {}: {e}", parent.display()),
			})?;
		}
		Ok(())
	}

	fn persist_locked(
		&self,
		contents: &mut HashMap<String, StoredEntry>,
		now: OffsetDateTime,
	) -> Result<(), StoreError> {
		contents.retain(|_, entry| entry.is_live_at(now));

		Self::ensure_parent_exists(&self.path)?;

		let serialized =
			serde_json::to_vec_pretty(&*contents).map_err(|e| StoreError::Serialization {
				message: format!("Failed to serialize store snapshot: {e}"),
			})?;
		let mut tmp_path = self.path.clone();

		tmp_path.set_extension("tmp");

		{
			let mut file = File::create(&tmp_path).map_err(|e| StoreError::Backend {
				message: format!("Failed to create {}: {e}", tmp_path.display()),
			})?;

			file.write_all(&serialized).map_err(|e| StoreError::Backend {
				message: format!("Failed to write {}: {e}", tmp_path.display()),
			})?;
			file.sync_all().map_err(|e| StoreError::Backend {
				message: format!("Failed to sync {}: {e}", tmp_path.display()),
			})?;
		}

		fs::rename(&tmp_path, &self.path).map_err(|e| StoreError::Backend {
			message: format!("Failed to replace {}: {e}", self.path.display()),
		})
	}
}
impl Debug for FileStore {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("FileStore").field("path", &self.path).finish()
	}
}
impl CacheStore for FileStore {
	fn get<'a>(&'a self, key: &'a str) -> StoreFuture<'a, Option<CacheValue>> {
		Box::pin(async move {
			let now = self.clock.now();

			Ok(self
				.inner
				.read()
				.get(key)
				.filter(|entry| entry.is_live_at(now))
				.map(|entry| entry.value.clone()))
		})
	}

	fn put<'a>(&'a self, key: &'a str, value: CacheValue, ttl: Duration) -> StoreFuture<'a, ()> {
		Box::pin(async move {
			let now = self.clock.now();
			let mut guard = self.inner.write();

			store::put_locked(&mut guard, key, value, now, ttl)?;

			self.persist_locked(&mut guard, now)
		})
	}

	fn increment_within<'a>(
		&'a self,
		key: &'a str,
		ceiling: u64,
		ttl: Duration,
	) -> StoreFuture<'a, Option<u64>> {
		Box::pin(async move {
			let now = self.clock.now();
			let mut guard = self.inner.write();
			let outcome = store::increment_locked(&mut guard, key, ceiling, now, ttl)?;

			if outcome.is_some() {
				self.persist_locked(&mut guard, now)?;
			}

			Ok(outcome)
		})
	}
}
