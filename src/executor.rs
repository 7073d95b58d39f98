//! Single request execution path shared by every resource client.
//!
//! [`RequestExecutor::execute`] enforces the per-endpoint rate limit, attaches a bearer token
//! when the request needs one, sends the call through the configured [`HttpTransport`], and
//! normalizes the outcome into either the response JSON or an [`Error`].

// self
use crate::{
	_prelude::*,
	error::ConfigError,
	flows::Authenticator,
	http::{HttpRequest, HttpResponse, HttpTransport, Method},
	obs::{self, Operation},
	rate_limit::RateLimiter,
};

const DEFAULT_API_MESSAGE: &str = "API request failed";

/// Describes one API call.
#[derive(Clone, Debug, PartialEq)]
pub struct ApiRequest {
	/// HTTP method.
	pub method: Method,
	/// Endpoint path relative to the API host, e.g. `/aladdin/api/v1/stores`.
	pub path: String,
	/// JSON body, sent only when present.
	pub body: Option<Value>,
	/// Whether a bearer token must be attached.
	pub requires_auth: bool,
}
impl ApiRequest {
	/// Authenticated `GET` without a body.
	pub fn get(path: impl Into<String>) -> Self {
		Self { method: Method::Get, path: path.into(), body: None, requires_auth: true }
	}

	/// Authenticated `POST` carrying `body`.
	pub fn post(path: impl Into<String>, body: Value) -> Self {
		Self { method: Method::Post, path: path.into(), body: Some(body), requires_auth: true }
	}

	/// Sets whether a bearer token is attached.
	pub fn with_auth(mut self, requires_auth: bool) -> Self {
		self.requires_auth = requires_auth;

		self
	}
}

/// Rate-limited, authenticated request pipeline.
pub struct RequestExecutor {
	transport: Arc<dyn HttpTransport>,
	base_url: Url,
	limiter: RateLimiter,
	authenticator: Authenticator,
}
impl RequestExecutor {
	/// Assembles an executor from its collaborators.
	pub fn new(
		transport: Arc<dyn HttpTransport>,
		base_url: Url,
		limiter: RateLimiter,
		authenticator: Authenticator,
	) -> Self {
		Self { transport, base_url, limiter, authenticator }
	}

	/// Authenticator used for bearer tokens.
	pub fn authenticator(&self) -> &Authenticator {
		&self.authenticator
	}

	/// Limiter consulted before every call.
	pub fn limiter(&self) -> &RateLimiter {
		&self.limiter
	}

	/// API host every path is resolved against.
	pub fn base_url(&self) -> &Url {
		&self.base_url
	}

	/// Executes `request` and returns the decoded response body.
	///
	/// Successful responses are returned verbatim (an empty body becomes [`Value::Null`]).
	/// A rate-limit rejection returns before any token lookup or HTTP traffic. No retries are
	/// attempted.
	pub async fn execute(&self, request: ApiRequest) -> Result<Value> {
		obs::observe(Operation::ApiRequest, "execute", async {
			self.limiter.check_and_increment(&request.path).await?;

			let url = self.base_url.join(&request.path).map_err(ConfigError::from)?;
			let mut http = HttpRequest::new(request.method, url)
				.header("Accept", "application/json")
				.header("Content-Type", "application/json");

			if request.requires_auth {
				let token = self.authenticator.authenticate().await?;

				http = http.header("Authorization", format!("Bearer {}", token.expose()));
			}
			if let Some(body) = &request.body {
				http = http.json(body);
			}

			let response = match self.transport.send(http).await {
				Ok(response) => response,
				Err(e) => {
					obs::log_network_error(&request.path, &e);

					return Err(e.into());
				},
			};

			normalize_response(&request, response)
		})
		.await
	}
}
impl Debug for RequestExecutor {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("RequestExecutor")
			.field("base_url", &self.base_url.as_str())
			.field("limiter", &self.limiter)
			.field("authenticator", &self.authenticator)
			.finish()
	}
}

fn normalize_response(request: &ApiRequest, response: HttpResponse) -> Result<Value> {
	let status = response.status;

	if response.is_success() {
		if response.body.iter().all(u8::is_ascii_whitespace) {
			return Ok(Value::Null);
		}

		let mut deserializer = serde_json::Deserializer::from_slice(&response.body);

		return serde_path_to_error::deserialize(&mut deserializer)
			.map_err(|source| Error::Decode { status, source });
	}

	let body = serde_json::from_slice::<Value>(&response.body).ok();
	let message = body
		.as_ref()
		.and_then(|b| b.get("message"))
		.and_then(Value::as_str)
		.unwrap_or(DEFAULT_API_MESSAGE)
		.to_owned();
	let errors = body
		.as_ref()
		.and_then(|b| b.get("errors"))
		.filter(|e| !e.is_null())
		.cloned()
		.unwrap_or_else(|| Value::Object(Default::default()));

	obs::log_api_error(&request.path, request.method.as_str(), status, &message, &response.text());

	Err(Error::Api { message, status, errors })
}
