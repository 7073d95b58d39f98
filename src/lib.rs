//! Typed async client for the Pathao courier merchant API: cached password-grant tokens,
//! fixed-window rate limiting, and one error type for every failure path.
//!
//! Every resource client (orders, stores, price plans, geography) funnels through the single
//! [`executor::RequestExecutor`], which enforces the per-endpoint rate limit, obtains a bearer
//! token from the [`flows::Authenticator`] when needed, and normalizes responses into
//! [`serde_json::Value`] or [`error::Error`].

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod api;
pub mod auth;
pub mod clock;
pub mod config;
pub mod courier;
pub mod error;
pub mod executor;
pub mod flows;
pub mod http;
pub mod obs;
pub mod rate_limit;
pub mod store;
#[cfg(all(any(test, feature = "test"), feature = "reqwest"))]
#[doc(hidden)]
pub mod _preludet {
	//! Re-exports and fixtures shared by unit and integration tests; compiled under `cfg(test)`
	//! or the `test` feature.

	pub use crate::_prelude::*;

	// self
	use crate::{
		clock::{Clock, ManualClock},
		config::{ClientConfig, Credentials, Environment},
		courier::PathaoCourier,
		store::{CacheStore, MemoryStore},
	};

	/// Client identifier used by test fixtures.
	pub const TEST_CLIENT_ID: &str = "client-test";
	/// Client secret used by test fixtures.
	pub const TEST_CLIENT_SECRET: &str = "secret-test";
	/// Merchant username used by test fixtures.
	pub const TEST_USERNAME: &str = "merchant@example.com";
	/// Merchant password used by test fixtures.
	pub const TEST_PASSWORD: &str = "password-test";

	/// Everything a test needs to drive a courier client against a mock server.
	pub struct TestCourier {
		/// Client under test.
		pub courier: PathaoCourier,
		/// Cache backing the token cache and rate limiter.
		pub store: Arc<MemoryStore>,
		/// Clock shared by the client and the cache.
		pub clock: Arc<ManualClock>,
	}

	/// Builds a test configuration pointed at `base_url`.
	pub fn test_config(base_url: &str) -> ClientConfig {
		let credentials =
			Credentials::new(TEST_CLIENT_ID, TEST_CLIENT_SECRET, TEST_USERNAME, TEST_PASSWORD);

		ClientConfig::new(credentials, Environment::Sandbox)
			.with_base_url(Url::parse(base_url).expect("Mock server URL should parse."))
	}

	/// Builds a courier client for `config` backed by an in-memory cache and a manual clock
	/// starting at 2025-01-01 12:00:30 UTC.
	pub fn build_test_courier_with(config: ClientConfig) -> TestCourier {
		let clock = Arc::new(ManualClock::new(time::macros::datetime!(2025-01-01 12:00:30 UTC)));
		let shared_clock: Arc<dyn Clock> = clock.clone();
		let store = Arc::new(MemoryStore::with_clock(shared_clock.clone()));
		let shared_store: Arc<dyn CacheStore> = store.clone();
		let courier = PathaoCourier::builder(config)
			.store(shared_store)
			.clock(shared_clock)
			.build()
			.expect("Failed to build courier client for tests.");

		TestCourier { courier, store, clock }
	}

	/// Builds a courier client against `base_url` with default limits.
	pub fn build_test_courier(base_url: &str) -> TestCourier {
		build_test_courier_with(test_config(base_url))
	}
}

mod _prelude {
	pub use std::{
		collections::HashMap,
		error::Error as StdError,
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		future::Future,
		pin::Pin,
		str::FromStr,
		sync::Arc,
	};

	pub use async_lock::Mutex as AsyncMutex;
	pub use parking_lot::{Mutex, RwLock};
	pub use serde::{Deserialize, Serialize};
	pub use serde_json::Value;
	pub use thiserror::Error as ThisError;
	pub use time::{Duration, OffsetDateTime};
	pub use url::Url;

	pub use crate::error::{Error, Result};
}

#[cfg(feature = "reqwest")] pub use reqwest;
pub use serde_json;
pub use url;
#[cfg(test)] use {color_eyre as _, httpmock as _};
