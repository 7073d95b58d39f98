//! Password grant with cache reuse and a single-flight guard.

// self
use crate::{
	_prelude::*,
	auth::TokenSecret,
	flows::{Authenticator, common::GrantMessages},
	obs::{self, Operation},
};

const MESSAGES: GrantMessages = GrantMessages {
	rejected: "Failed to authenticate with Pathao API",
	malformed: "Failed to get access token: Invalid response from Pathao API",
};

impl Authenticator {
	/// Returns a fresh bearer token, issuing a password grant only when the cache has none.
	pub async fn authenticate(&self) -> Result<TokenSecret> {
		if let Some(token) = self.cached_token().await? {
			return Ok(token);
		}

		let _singleflight = self.grant_guard.lock().await;

		// Another caller may have finished a grant while this one waited.
		if let Some(token) = self.cached_token().await? {
			return Ok(token);
		}

		obs::observe(Operation::PasswordGrant, "authenticate", async {
			let body = serde_json::json!({
				"client_id": self.credentials.client_id,
				"client_secret": self.credentials.client_secret.expose(),
				"username": self.credentials.username,
				"password": self.credentials.password.expose(),
				"grant_type": "password",
			});
			let grant = self.request_token(body, MESSAGES).await?;
			let cached = self.cache.store(grant.access_token.clone(), grant.expires_in).await?;

			obs::log_token_issued(Operation::PasswordGrant, grant.expires_in, cached.is_some());

			Ok(grant.access_token)
		})
		.await
	}

	async fn cached_token(&self) -> Result<Option<TokenSecret>> {
		let token = self.cache.get_token().await?;

		if token.is_some() {
			obs::log_token_cache_hit(self.cache.key());
		}

		Ok(token)
	}
}
