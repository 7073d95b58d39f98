//! Transport primitives for calls against the courier API.
//!
//! The crate talks to the network only through [`HttpTransport`], using its own
//! [`HttpRequest`]/[`HttpResponse`] types so hosts can plug in a custom HTTP stack (or a
//! recording double in tests). With the default `reqwest` feature, [`ReqwestTransport`] is the
//! built-in implementation.

// self
use crate::{_prelude::*, error::TransportError};

/// Timeout applied to every request by the built-in transport.
pub const DEFAULT_TIMEOUT: Duration = Duration::seconds(30);

/// Boxed future returned by [`HttpTransport::send`].
pub type TransportFuture<'a> =
	Pin<Box<dyn Future<Output = Result<HttpResponse, TransportError>> + 'a + Send>>;

/// Abstraction over HTTP stacks able to deliver a single request.
///
/// Implementations resolve with an [`HttpResponse`] for every status code, including 4xx and
/// 5xx. Only failures that prevent a response (connection refused, DNS, timeout) are reported as
/// [`TransportError`].
pub trait HttpTransport
where
	Self: 'static + Send + Sync,
{
	/// Sends `request` and resolves with the raw response.
	fn send(&self, request: HttpRequest) -> TransportFuture<'_>;
}

/// HTTP methods used by the courier API.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Method {
	/// `GET`
	Get,
	/// `POST`
	Post,
}
impl Method {
	/// Returns the canonical upper-case method name.
	pub const fn as_str(self) -> &'static str {
		match self {
			Method::Get => "GET",
			Method::Post => "POST",
		}
	}
}
impl Display for Method {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Fully resolved request handed to an [`HttpTransport`].
#[derive(Clone, PartialEq, Eq)]
pub struct HttpRequest {
	/// Request method.
	pub method: Method,
	/// Absolute target URL.
	pub url: Url,
	/// Header name/value pairs in insertion order.
	pub headers: Vec<(String, String)>,
	/// Serialized request body.
	pub body: Option<Vec<u8>>,
}
impl HttpRequest {
	/// Creates a request without headers or body.
	pub fn new(method: Method, url: Url) -> Self {
		Self { method, url, headers: Vec::new(), body: None }
	}

	/// Appends a header.
	pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
		self.headers.push((name.into(), value.into()));

		self
	}

	/// Sets a JSON body.
	pub fn json(mut self, body: &Value) -> Self {
		self.body = Some(body.to_string().into_bytes());

		self
	}

	/// Returns the first header matching `name`, compared case-insensitively.
	pub fn header_value(&self, name: &str) -> Option<&str> {
		self.headers
			.iter()
			.find(|(key, _)| key.eq_ignore_ascii_case(name))
			.map(|(_, value)| value.as_str())
	}
}
impl Debug for HttpRequest {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		let headers = self
			.headers
			.iter()
			.map(|(name, value)| {
				if name.eq_ignore_ascii_case("authorization") {
					(name.as_str(), "<redacted>")
				} else {
					(name.as_str(), value.as_str())
				}
			})
			.collect::<Vec<_>>();

		f.debug_struct("HttpRequest")
			.field("method", &self.method)
			.field("url", &self.url.as_str())
			.field("headers", &headers)
			.field("body_len", &self.body.as_ref().map(Vec::len))
			.finish()
	}
}

/// Raw response returned by an [`HttpTransport`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HttpResponse {
	/// HTTP status code.
	pub status: u16,
	/// Response body bytes.
	pub body: Vec<u8>,
}
impl HttpResponse {
	/// Creates a response from its parts.
	pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
		Self { status, body: body.into() }
	}

	/// Returns `true` for 2xx statuses.
	pub fn is_success(&self) -> bool {
		(200..300).contains(&self.status)
	}

	/// Body decoded as UTF-8, replacing invalid sequences.
	pub fn text(&self) -> String {
		String::from_utf8_lossy(&self.body).into_owned()
	}
}

/// Thin wrapper around [`reqwest::Client`] so shared HTTP behavior lives in one place.
#[cfg(feature = "reqwest")]
#[derive(Clone, Debug)]
pub struct ReqwestTransport(reqwest::Client);
#[cfg(feature = "reqwest")]
impl ReqwestTransport {
	/// Builds a client that aborts requests after `timeout`.
	pub fn new(timeout: Duration) -> Result<Self, crate::error::ConfigError> {
		let client = reqwest::Client::builder().timeout(timeout.unsigned_abs()).build()?;

		Ok(Self(client))
	}

	/// Wraps an existing reqwest [`Client`](reqwest::Client); its own timeout settings apply.
	pub fn with_client(client: reqwest::Client) -> Self {
		Self(client)
	}
}
#[cfg(feature = "reqwest")]
impl AsRef<reqwest::Client> for ReqwestTransport {
	fn as_ref(&self) -> &reqwest::Client {
		&self.0
	}
}
#[cfg(feature = "reqwest")]
impl HttpTransport for ReqwestTransport {
	fn send(&self, request: HttpRequest) -> TransportFuture<'_> {
		Box::pin(async move {
			let method = match request.method {
				Method::Get => reqwest::Method::GET,
				Method::Post => reqwest::Method::POST,
			};
			let mut builder = self.0.request(method, request.url);

			for (name, value) in request.headers {
				builder = builder.header(name, value);
			}
			if let Some(body) = request.body {
				builder = builder.body(body);
			}

			let response = builder.send().await?;
			let status = response.status().as_u16();
			let body = response.bytes().await?.to_vec();

			Ok(HttpResponse { status, body })
		})
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn request_builder_collects_headers_and_body() {
		let url = Url::parse("https://courier-api-sandbox.pathao.com/aladdin/api/v1/city-list")
			.expect("Fixture URL should parse.");
		let request = HttpRequest::new(Method::Post, url)
			.header("Accept", "application/json")
			.header("Authorization", "Bearer secret-token")
			.json(&serde_json::json!({ "store_id": 1 }));

		assert_eq!(request.header_value("accept"), Some("application/json"));
		assert_eq!(request.body.as_deref(), Some(&b"{\"store_id\":1}"[..]));

		let rendered = format!("{request:?}");

		assert!(rendered.contains("<redacted>"));
		assert!(!rendered.contains("secret-token"));
	}

	#[test]
	fn response_success_covers_2xx_only() {
		assert!(HttpResponse::new(200, Vec::new()).is_success());
		assert!(HttpResponse::new(204, Vec::new()).is_success());
		assert!(!HttpResponse::new(302, Vec::new()).is_success());
		assert!(!HttpResponse::new(422, b"{}".to_vec()).is_success());
	}
}
