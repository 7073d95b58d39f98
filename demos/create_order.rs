//! Creates an order against a local mock of the courier API, showing token caching and the
//! typed order payload.

// crates.io
use color_eyre::Result;
use httpmock::prelude::*;
use serde_json::json;
use url::Url;
// self
use pathao_courier::{
	api::{DELIVERY_NORMAL, ITEM_PARCEL, NewOrder},
	config::{ClientConfig, Credentials, Environment},
	courier::PathaoCourier,
	flows::TOKEN_PATH,
};

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;

	let server = MockServer::start_async().await;
	let token_mock = server
		.mock_async(|when, then| {
			when.method(POST).path(TOKEN_PATH);
			then.status(200).json_body(json!({
				"token_type": "Bearer",
				"expires_in": 432000,
				"access_token": "demo-access",
				"refresh_token": "demo-refresh"
			}));
		})
		.await;
	let order_mock = server
		.mock_async(|when, then| {
			when.method(POST).path("/aladdin/api/v1/orders");
			then.status(200).json_body(json!({
				"message": "Order Created Successfully",
				"type": "success",
				"code": 200,
				"data": {
					"consignment_id": "DL121224VS8TTJ",
					"merchant_order_id": "INV-1001",
					"order_status": "Pending",
					"delivery_fee": 80
				}
			}));
		})
		.await;
	let credentials =
		Credentials::new("demo-client", "demo-secret", "merchant@example.com", "demo-password");
	let config = ClientConfig::new(credentials, Environment::Sandbox)
		.with_base_url(Url::parse(&server.base_url())?)
		.with_store_id(149);
	let courier = PathaoCourier::new(config)?;
	let order = NewOrder {
		store_id: 149,
		merchant_order_id: Some("INV-1001".into()),
		recipient_name: "Rahim Uddin".into(),
		recipient_phone: "01712345678".into(),
		recipient_address: "House 12, Road 5, Dhanmondi, Dhaka".into(),
		delivery_type: DELIVERY_NORMAL,
		item_type: ITEM_PARCEL,
		item_quantity: 1,
		item_weight: 0.5,
		amount_to_collect: 900,
		..Default::default()
	};

	for _ in 0..2 {
		let created = courier.order().create(&order).await?;

		println!("Created consignment {}.", created["data"]["consignment_id"]);
	}

	// Both orders shared one password grant.
	token_mock.assert_calls_async(1).await;
	order_mock.assert_calls_async(2).await;

	let invalid = NewOrder { recipient_phone: "12345".into(), ..order };

	match courier.order().create(&invalid).await {
		Err(e) => println!("Rejected locally (code {}): {}.", e.code(), e.message()),
		Ok(_) => println!("Unexpectedly accepted an invalid order."),
	}

	Ok(())
}
