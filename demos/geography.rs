//! Walks the city, zone, and area listings of a local mock API, then shows the per-minute rate
//! limit rejecting a burst.

// crates.io
use color_eyre::Result;
use httpmock::prelude::*;
use serde_json::json;
use url::Url;
// self
use pathao_courier::{
	config::{ClientConfig, Credentials, Environment, RateLimitConfig},
	courier::PathaoCourier,
	error::Error,
};

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;

	let server = MockServer::start_async().await;

	server
		.mock_async(|when, then| {
			when.method(GET).path("/aladdin/api/v1/city-list");
			then.status(200).json_body(json!({
				"data": { "data": [{ "city_id": 1, "city_name": "Dhaka" }] }
			}));
		})
		.await;
	server
		.mock_async(|when, then| {
			when.method(GET).path("/aladdin/api/v1/cities/1/zone-list");
			then.status(200).json_body(json!({
				"data": { "data": [{ "zone_id": 298, "zone_name": "Dhanmondi" }] }
			}));
		})
		.await;
	server
		.mock_async(|when, then| {
			when.method(GET).path("/aladdin/api/v1/zones/298/area-list");
			then.status(200).json_body(json!({
				"data": { "data": [{ "area_id": 37, "area_name": "Road 5" }] }
			}));
		})
		.await;

	let credentials =
		Credentials::new("demo-client", "demo-secret", "merchant@example.com", "demo-password");
	let config = ClientConfig::new(credentials, Environment::Sandbox)
		.with_base_url(Url::parse(&server.base_url())?)
		.with_rate_limit(RateLimitConfig { enabled: true, requests_per_minute: 3 });
	let courier = PathaoCourier::new(config)?;
	let area = courier.area();

	println!("Cities: {}", area.cities().await?["data"]["data"]);
	println!("Zones: {}", area.zones(1).await?["data"]["data"]);
	println!("Areas: {}", area.areas(298).await?["data"]["data"]);

	for attempt in 1..=4 {
		match area.cities().await {
			Ok(_) => println!("City lookup {attempt} accepted."),
			Err(Error::RateLimited { limit }) => {
				println!("City lookup {attempt} rejected: ceiling of {limit} per minute reached.")
			},
			Err(e) => return Err(e.into()),
		}
	}

	Ok(())
}
