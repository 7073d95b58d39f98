//! Geography lookups: cities, zones, and areas.

// self
use crate::{
	_prelude::*,
	api::API_PREFIX,
	executor::{ApiRequest, RequestExecutor},
};

/// City, zone, and area listings.
///
/// Lookups are sent without a bearer token unless [`authenticated`](Self::authenticated) is
/// used. They still count against the rate limit.
#[derive(Clone, Copy, Debug)]
pub struct AreaApi<'a> {
	executor: &'a RequestExecutor,
	requires_auth: bool,
}
impl<'a> AreaApi<'a> {
	/// Creates a client that sends lookups without authentication.
	pub fn new(executor: &'a RequestExecutor) -> Self {
		Self { executor, requires_auth: false }
	}

	/// Attaches a bearer token to every lookup made through the returned handle.
	pub fn authenticated(self) -> Self {
		Self { requires_auth: true, ..self }
	}

	/// Lists delivery cities.
	pub async fn cities(&self) -> Result<Value> {
		self.get(format!("{API_PREFIX}/city-list")).await
	}

	/// Lists the zones of `city_id`.
	pub async fn zones(&self, city_id: u64) -> Result<Value> {
		self.get(format!("{API_PREFIX}/cities/{city_id}/zone-list")).await
	}

	/// Lists the areas of `zone_id`.
	pub async fn areas(&self, zone_id: u64) -> Result<Value> {
		self.get(format!("{API_PREFIX}/zones/{zone_id}/area-list")).await
	}

	async fn get(&self, path: String) -> Result<Value> {
		self.executor.execute(ApiRequest::get(path).with_auth(self.requires_auth)).await
	}
}
