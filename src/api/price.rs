//! Delivery price calculation.

// self
use crate::{
	_prelude::*,
	api::{self, API_PREFIX, validate},
	executor::{ApiRequest, RequestExecutor},
};

/// Body for [`PriceApi::calculate`].
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PriceQuery {
	/// Pickup store; the configured default is used when `None`.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub store_id: Option<u64>,
	/// [`ITEM_DOCUMENT`](crate::api::ITEM_DOCUMENT) or [`ITEM_PARCEL`](crate::api::ITEM_PARCEL).
	pub item_type: u32,
	/// [`DELIVERY_NORMAL`](crate::api::DELIVERY_NORMAL) or
	/// [`DELIVERY_ON_DEMAND`](crate::api::DELIVERY_ON_DEMAND).
	pub delivery_type: u32,
	/// Weight in kilograms, 0.5 to 10.
	pub item_weight: f64,
	/// Destination city.
	pub recipient_city: u64,
	/// Destination zone.
	pub recipient_zone: u64,
}

/// Price-plan lookups.
#[derive(Clone, Copy, Debug)]
pub struct PriceApi<'a> {
	executor: &'a RequestExecutor,
	default_store_id: Option<u64>,
}
impl<'a> PriceApi<'a> {
	/// Creates a client that fills `store_id` from `default_store_id` when a query omits it.
	pub fn new(executor: &'a RequestExecutor, default_store_id: Option<u64>) -> Self {
		Self { executor, default_store_id }
	}

	/// Calculates the delivery charge for a parcel.
	pub async fn calculate<T>(&self, query: &T) -> Result<Value>
	where
		T: ?Sized + Serialize,
	{
		let mut body = api::to_body(query)?;

		validate::object(&body)?;

		let store_missing = body.get("store_id").is_none_or(Value::is_null);

		if let (true, Some(store_id)) = (store_missing, self.default_store_id) {
			body["store_id"] = store_id.into();
		}

		validate::price(&body)?;

		self.executor
			.execute(ApiRequest::post(format!("{API_PREFIX}/merchant/price-plan"), body))
			.await
	}
}
