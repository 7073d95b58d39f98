//! Shared token endpoint plumbing: request construction, response parsing, and error mapping.

// self
use crate::{
	_prelude::*,
	auth::TokenSecret,
	flows::Authenticator,
	http::{HttpRequest, HttpResponse, Method},
	obs,
};

/// Token endpoint path, relative to the API host.
pub const TOKEN_PATH: &str = "/aladdin/api/v1/issue-token";

/// Messages used when a grant fails without a usable API message.
#[derive(Clone, Copy, Debug)]
pub(crate) struct GrantMessages {
	/// Fallback when a rejection body carries no `message`.
	pub(crate) rejected: &'static str,
	/// Used when a success body lacks `access_token`.
	pub(crate) malformed: &'static str,
}

/// Token fields extracted from a successful grant response.
#[derive(Clone, Debug)]
pub(crate) struct TokenGrant {
	pub(crate) access_token: TokenSecret,
	pub(crate) refresh_token: Option<TokenSecret>,
	pub(crate) expires_in: i64,
}

impl Authenticator {
	/// Posts `body` to the token endpoint and parses the grant.
	pub(crate) async fn request_token(
		&self,
		body: Value,
		messages: GrantMessages,
	) -> Result<TokenGrant> {
		let request = HttpRequest::new(Method::Post, self.token_url.clone())
			.header("Accept", "application/json")
			.header("Content-Type", "application/json")
			.json(&body);
		let response = match self.transport.send(request).await {
			Ok(response) => response,
			Err(e) => {
				obs::log_network_error(TOKEN_PATH, &e);

				return Err(e.into());
			},
		};

		parse_grant(&response, messages, self.token_ttl)
	}
}

/// Interprets a token endpoint response.
pub(crate) fn parse_grant(
	response: &HttpResponse,
	messages: GrantMessages,
	fallback_ttl: i64,
) -> Result<TokenGrant> {
	let body = serde_json::from_slice::<Value>(&response.body).ok();

	if !response.is_success() {
		let message = body
			.as_ref()
			.and_then(|b| b.get("message"))
			.and_then(Value::as_str)
			.unwrap_or(messages.rejected)
			.to_owned();

		obs::log_api_error(TOKEN_PATH, Method::Post.as_str(), response.status, &message, &response.text());

		return Err(Error::Authentication { message, status: Some(response.status) });
	}

	let malformed = || Error::Authentication { message: messages.malformed.into(), status: None };
	let body = body.ok_or_else(malformed)?;
	let access_token = body.get("access_token").and_then(Value::as_str).ok_or_else(malformed)?;
	let refresh_token = body.get("refresh_token").and_then(Value::as_str).map(TokenSecret::new);
	let expires_in = body.get("expires_in").and_then(lifetime_seconds).unwrap_or(fallback_ttl);

	Ok(TokenGrant { access_token: TokenSecret::new(access_token), refresh_token, expires_in })
}

fn lifetime_seconds(value: &Value) -> Option<i64> {
	match value {
		Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
		Value::String(s) => s.trim().parse().ok(),
		_ => None,
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	const MESSAGES: GrantMessages =
		GrantMessages { rejected: "Failed to authenticate", malformed: "Invalid response" };

	#[test]
	fn successful_grant_uses_fallback_lifetime_when_absent() {
		let response = HttpResponse::new(200, br#"{"access_token":"abc","token_type":"Bearer"}"#.to_vec());
		let grant = parse_grant(&response, MESSAGES, 432_000).expect("Grant should parse.");

		assert_eq!(grant.access_token.expose(), "abc");
		assert_eq!(grant.expires_in, 432_000);
		assert!(grant.refresh_token.is_none());
	}

	#[test]
	fn string_lifetimes_are_accepted() {
		let response = HttpResponse::new(
			200,
			br#"{"access_token":"abc","refresh_token":"r","expires_in":"3600"}"#.to_vec(),
		);
		let grant = parse_grant(&response, MESSAGES, 1).expect("Grant should parse.");

		assert_eq!(grant.expires_in, 3_600);
		assert_eq!(grant.refresh_token.as_ref().map(TokenSecret::expose), Some("r"));
	}

	#[test]
	fn extreme_lifetimes_parse_without_panicking() {
		let bodies: [&[u8]; 2] = [
			br#"{"access_token":"abc","expires_in":-9223372036854775808}"#,
			br#"{"access_token":"abc","expires_in":-1e300}"#,
		];

		for body in bodies {
			let grant = parse_grant(&HttpResponse::new(200, body.to_vec()), MESSAGES, 1)
				.expect("Grant should parse.");

			assert_eq!(grant.expires_in, i64::MIN);
		}
	}

	#[test]
	fn missing_access_token_is_an_authentication_error() {
		let bodies: [&[u8]; 3] = [br#"{"expires_in":3600}"#, b"<html>", b""];

		for body in bodies {
			let err = parse_grant(&HttpResponse::new(200, body.to_vec()), MESSAGES, 1)
				.expect_err("A grant without access_token must fail.");

			assert_eq!(err.message(), "Invalid response");
			assert_eq!(err.code(), 0);
		}
	}

	#[test]
	fn rejection_prefers_api_message_and_keeps_status() {
		let err = parse_grant(
			&HttpResponse::new(401, br#"{"message":"Invalid credentials"}"#.to_vec()),
			MESSAGES,
			1,
		)
		.expect_err("A 401 must fail.");

		assert!(matches!(err, Error::Authentication { status: Some(401), .. }));
		assert_eq!(err.message(), "Invalid credentials");

		let err = parse_grant(&HttpResponse::new(500, b"oops".to_vec()), MESSAGES, 1)
			.expect_err("A 500 must fail.");

		assert_eq!(err.message(), "Failed to authenticate");
		assert_eq!(err.code(), 500);
	}
}
