// std
use std::{env, fs, process};
// crates.io
use httpmock::prelude::*;
use serde_json::json;
// self
use pathao_courier::{
	_preludet::*,
	clock::{Clock, ManualClock},
	courier::PathaoCourier,
	flows::TOKEN_PATH,
	store::{CacheStore, FileStore},
};

#[tokio::test]
async fn file_store_keeps_tokens_across_client_restarts() {
	let server = MockServer::start_async().await;
	let token_mock = server
		.mock_async(|when, then| {
			when.method(POST).path(TOKEN_PATH);
			then.status(200).json_body(json!({ "access_token": "persisted", "expires_in": 3600 }));
		})
		.await;
	let path = env::temp_dir().join(format!("pathao_courier_restart_{}.json", process::id()));
	let _ = fs::remove_file(&path);
	let clock: Arc<dyn Clock> =
		Arc::new(ManualClock::new(time::macros::datetime!(2025-01-01 08:00 UTC)));
	let build = || {
		let store: Arc<dyn CacheStore> = Arc::new(
			FileStore::open_with_clock(&path, clock.clone()).expect("File store should open."),
		);

		PathaoCourier::builder(test_config(&server.base_url()))
			.store(store)
			.clock(clock.clone())
			.build()
			.expect("Courier should build over a file store.")
	};
	let first = build();

	assert_eq!(first.access_token().await.expect("Grant should succeed.").expose(), "persisted");

	drop(first);

	let second = build();

	assert_eq!(
		second.access_token().await.expect("Token should load from disk.").expose(),
		"persisted"
	);

	token_mock.assert_calls_async(1).await;

	fs::remove_file(&path).expect("Temporary store file should be removable.");
}
