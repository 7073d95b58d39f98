//! Merchant store management.

// self
use crate::{
	_prelude::*,
	api::{self, API_PREFIX, validate},
	executor::{ApiRequest, RequestExecutor},
};

/// Body for [`StoreApi::create`].
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewStore {
	/// Store name, 3 to 50 characters.
	pub name: String,
	/// Contact person, 3 to 50 characters.
	pub contact_name: String,
	/// Contact phone; must contain exactly 11 digits.
	pub contact_number: String,
	/// Secondary contact phone.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub secondary_contact: Option<String>,
	/// Pickup address, 15 to 120 characters.
	pub address: String,
	/// City id from [`AreaApi::cities`](crate::api::AreaApi::cities).
	pub city_id: u64,
	/// Zone id from [`AreaApi::zones`](crate::api::AreaApi::zones).
	pub zone_id: u64,
	/// Area id from [`AreaApi::areas`](crate::api::AreaApi::areas).
	pub area_id: u64,
}

/// Store creation and lookup.
#[derive(Clone, Copy, Debug)]
pub struct StoreApi<'a> {
	executor: &'a RequestExecutor,
}
impl<'a> StoreApi<'a> {
	/// Creates a client over `executor`.
	pub fn new(executor: &'a RequestExecutor) -> Self {
		Self { executor }
	}

	/// Registers a pickup store.
	pub async fn create<T>(&self, store: &T) -> Result<Value>
	where
		T: ?Sized + Serialize,
	{
		let body = api::to_body(store)?;

		validate::store(&body)?;

		self.executor.execute(ApiRequest::post(format!("{API_PREFIX}/stores"), body)).await
	}

	/// Lists the merchant's stores.
	pub async fn list(&self) -> Result<Value> {
		self.executor.execute(ApiRequest::get(format!("{API_PREFIX}/stores"))).await
	}

	/// Fetches one store.
	pub async fn info(&self, store_id: u64) -> Result<Value> {
		self.executor.execute(ApiRequest::get(format!("{API_PREFIX}/stores/{store_id}"))).await
	}
}
