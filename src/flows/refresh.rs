//! Refresh-token grant that replaces the cached bearer token.

// self
use crate::{
	_prelude::*,
	auth::RefreshedToken,
	error::ValidationError,
	flows::{Authenticator, common::GrantMessages},
	obs::{self, Operation},
};

const MESSAGES: GrantMessages = GrantMessages {
	rejected: "Failed to refresh access token",
	malformed: "Failed to refresh access token: Invalid response from Pathao API",
};

impl Authenticator {
	/// Exchanges `refresh_token` for a new bearer token and caches it.
	///
	/// When the response carries no new refresh token, the caller's token is echoed back.
	pub async fn refresh(&self, refresh_token: &str) -> Result<RefreshedToken> {
		if refresh_token.trim().is_empty() {
			return Err(ValidationError::MissingField { field: "refresh_token" }.into());
		}

		let _singleflight = self.grant_guard.lock().await;

		obs::observe(Operation::RefreshGrant, "refresh", async {
			let body = serde_json::json!({
				"client_id": self.credentials.client_id,
				"client_secret": self.credentials.client_secret.expose(),
				"refresh_token": refresh_token,
				"grant_type": "refresh_token",
			});
			let grant = self.request_token(body, MESSAGES).await?;
			let cached = self.cache.store(grant.access_token.clone(), grant.expires_in).await?;

			obs::log_token_issued(Operation::RefreshGrant, grant.expires_in, cached.is_some());

			Ok(RefreshedToken {
				access_token: grant.access_token,
				refresh_token: grant.refresh_token.unwrap_or_else(|| refresh_token.into()),
				expires_in: grant.expires_in,
			})
		})
		.await
	}
}
