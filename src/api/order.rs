//! Order creation and tracking.

// self
use crate::{
	_prelude::*,
	api::{self, API_PREFIX, validate},
	executor::{ApiRequest, RequestExecutor},
};

/// Body for [`OrderApi::create`] and [`OrderApi::create_bulk`].
///
/// Optional fields are omitted from the request when `None`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct NewOrder {
	/// Pickup store.
	pub store_id: u64,
	/// Merchant-side reference.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub merchant_order_id: Option<String>,
	/// Recipient name, 3 to 100 characters.
	pub recipient_name: String,
	/// Recipient phone; must contain exactly 11 digits.
	pub recipient_phone: String,
	/// Secondary recipient phone.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub recipient_secondary_phone: Option<String>,
	/// Delivery address, 10 to 220 characters.
	pub recipient_address: String,
	/// Destination city; inferred from the address when absent.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub recipient_city: Option<u64>,
	/// Destination zone.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub recipient_zone: Option<u64>,
	/// Destination area.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub recipient_area: Option<u64>,
	/// [`DELIVERY_NORMAL`](crate::api::DELIVERY_NORMAL) or
	/// [`DELIVERY_ON_DEMAND`](crate::api::DELIVERY_ON_DEMAND).
	pub delivery_type: u32,
	/// [`ITEM_DOCUMENT`](crate::api::ITEM_DOCUMENT) or [`ITEM_PARCEL`](crate::api::ITEM_PARCEL).
	pub item_type: u32,
	/// Delivery note for the rider.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub special_instruction: Option<String>,
	/// Number of items.
	pub item_quantity: u32,
	/// Weight in kilograms, 0.5 to 10.
	pub item_weight: f64,
	/// Parcel contents.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub item_description: Option<String>,
	/// Cash to collect on delivery.
	pub amount_to_collect: u64,
}

/// Order creation and lookup.
#[derive(Clone, Copy, Debug)]
pub struct OrderApi<'a> {
	executor: &'a RequestExecutor,
}
impl<'a> OrderApi<'a> {
	/// Creates a client over `executor`.
	pub fn new(executor: &'a RequestExecutor) -> Self {
		Self { executor }
	}

	/// Creates one order.
	pub async fn create<T>(&self, order: &T) -> Result<Value>
	where
		T: ?Sized + Serialize,
	{
		let body = api::to_body(order)?;

		validate::order(&body)?;

		self.executor.execute(ApiRequest::post(format!("{API_PREFIX}/orders"), body)).await
	}

	/// Creates several orders in one call. Every order is validated before anything is sent.
	pub async fn create_bulk<T>(&self, orders: &[T]) -> Result<Value>
	where
		T: Serialize,
	{
		let mut bodies = Vec::with_capacity(orders.len());

		for order in orders {
			let body = api::to_body(order)?;

			validate::order(&body)?;
			bodies.push(body);
		}

		let body = serde_json::json!({ "orders": bodies });

		self.executor.execute(ApiRequest::post(format!("{API_PREFIX}/orders/bulk"), body)).await
	}

	/// Short status summary for a consignment.
	pub async fn info(&self, consignment_id: &str) -> Result<Value> {
		validate::consignment_id(consignment_id)?;

		self.executor
			.execute(ApiRequest::get(format!("{API_PREFIX}/orders/{consignment_id}/info")))
			.await
	}

	/// Full details for a consignment.
	pub async fn details(&self, consignment_id: &str) -> Result<Value> {
		validate::consignment_id(consignment_id)?;

		self.executor.execute(ApiRequest::get(format!("{API_PREFIX}/orders/{consignment_id}"))).await
	}
}
