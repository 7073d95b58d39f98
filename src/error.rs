//! Client-level error types shared by the executor, grant flows, caches, and resource clients.

// self
use crate::_prelude::*;

/// Client-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Canonical client error exposed by public APIs.
///
/// Every failure path (input validation, authentication, rate limiting, HTTP status errors,
/// and transport failures) surfaces through this one type. [`Error::message`],
/// [`Error::code`], and [`Error::errors`] give a uniform view regardless of the variant.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Client-side input validation failed before any network or cache access.
	#[error(transparent)]
	Validation(#[from] ValidationError),
	/// The token endpoint rejected the credentials or returned an unusable response.
	#[error("{message}")]
	Authentication {
		/// API-supplied or client-generated reason.
		message: String,
		/// HTTP status returned by the token endpoint, when one was received.
		status: Option<u16>,
	},
	/// The per-minute request ceiling for an endpoint was reached; no HTTP call was made.
	#[error("Rate limit exceeded. Maximum {limit} requests per minute.")]
	RateLimited {
		/// Configured per-minute ceiling.
		limit: u32,
	},
	/// The API answered with a non-success status.
	#[error("{message}")]
	Api {
		/// API-supplied message, or a generic fallback.
		message: String,
		/// HTTP status code.
		status: u16,
		/// Structured validation details from the response body.
		errors: Value,
	},
	/// No HTTP response was received.
	#[error(transparent)]
	Transport(#[from] TransportError),
	/// A successful response carried a body that is not valid JSON.
	#[error("API returned a malformed JSON body.")]
	Decode {
		/// HTTP status of the response.
		status: u16,
		/// Structured parsing failure.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
	},
	/// Cache backend failure.
	#[error("{0}")]
	Storage(
		#[from]
		#[source]
		crate::store::StoreError,
	),
	/// Local configuration problem.
	#[error(transparent)]
	Config(#[from] ConfigError),
}
impl Error {
	/// Human-readable message, identical to the `Display` output.
	pub fn message(&self) -> String {
		self.to_string()
	}

	/// Numeric code: the HTTP status when a response was received, the OS error code for
	/// transport failures that carry one, and `0` otherwise.
	pub fn code(&self) -> i64 {
		match self {
			Self::Authentication { status, .. } => status.map(i64::from).unwrap_or(0),
			Self::Api { status, .. } | Self::Decode { status, .. } => i64::from(*status),
			Self::Transport(err) => err.code(),
			_ => 0,
		}
	}

	/// Structured error details returned by the API; an empty object for every other variant.
	pub fn errors(&self) -> Value {
		match self {
			Self::Api { errors, .. } => errors.clone(),
			_ => Value::Object(Default::default()),
		}
	}

	/// HTTP status associated with the failure, if a response was received.
	pub fn status(&self) -> Option<u16> {
		match self {
			Self::Authentication { status, .. } => *status,
			Self::Api { status, .. } | Self::Decode { status, .. } => Some(*status),
			_ => None,
		}
	}
}

/// Input validation failures raised by resource clients.
#[derive(Clone, Debug, PartialEq, Eq, ThisError)]
pub enum ValidationError {
	/// A required field was absent.
	#[error("Required field '{field}' is missing")]
	MissingField {
		/// Wire name of the missing field.
		field: &'static str,
	},
	/// A field failed a range, length, or membership check.
	#[error("{message}")]
	InvalidField {
		/// Wire name of the offending field.
		field: &'static str,
		/// Description of the accepted values.
		message: String,
	},
}
impl ValidationError {
	/// Builds an [`InvalidField`](Self::InvalidField) error.
	pub fn invalid(field: &'static str, message: impl Into<String>) -> Self {
		Self::InvalidField { field, message: message.into() }
	}

	/// Wire name of the field that failed validation.
	pub fn field(&self) -> &'static str {
		match self {
			Self::MissingField { field } | Self::InvalidField { field, .. } => field,
		}
	}
}

/// Transport-level failure: the request never produced an HTTP response.
#[derive(Debug, ThisError)]
#[error("Network error: {message}")]
pub struct TransportError {
	message: String,
	code: i64,
	#[source]
	source: Option<BoxError>,
}
impl TransportError {
	/// Creates a transport failure from a plain message.
	pub fn new(message: impl Into<String>) -> Self {
		Self { message: message.into(), code: 0, source: None }
	}

	/// Wraps a transport-specific error, flattening its source chain into the message and
	/// capturing the first OS error code found along the chain.
	pub fn network(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		let message = source_chain_message(&src);
		let code = os_error_code(&src).unwrap_or(0);

		Self { message, code, source: Some(Box::new(src)) }
	}

	/// Overrides the numeric code.
	pub fn with_code(mut self, code: i64) -> Self {
		self.code = code;

		self
	}

	/// Underlying failure text, without the `Network error:` prefix.
	pub fn cause(&self) -> &str {
		&self.message
	}

	/// Underlying numeric code, or `0` when none is known.
	pub fn code(&self) -> i64 {
		self.code
	}
}
#[cfg(feature = "reqwest")]
impl From<reqwest::Error> for TransportError {
	fn from(e: reqwest::Error) -> Self {
		Self::network(e)
	}
}

/// Configuration and construction failures.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// HTTP client could not be constructed.
	#[error("HTTP client could not be constructed.")]
	HttpClientBuild {
		/// Underlying transport builder failure.
		#[source]
		source: BoxError,
	},
	/// A base URL could not be parsed or joined with an endpoint path.
	#[error("Base URL is invalid.")]
	InvalidBaseUrl {
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// The client was built without an HTTP transport.
	#[error("No HTTP transport was configured; enable the `reqwest` feature or supply one.")]
	MissingTransport,
	/// A required environment variable is absent or empty.
	#[error("Environment variable `{name}` is not set.")]
	MissingVariable {
		/// Variable name.
		name: &'static str,
	},
	/// An environment variable could not be parsed.
	#[error("Environment variable `{name}` has an invalid value: {value}.")]
	InvalidVariable {
		/// Variable name.
		name: &'static str,
		/// Raw value that failed to parse.
		value: String,
	},
}
impl ConfigError {
	/// Wraps a transport's builder failure inside [`ConfigError`].
	pub fn http_client_build(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::HttpClientBuild { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<reqwest::Error> for ConfigError {
	fn from(e: reqwest::Error) -> Self {
		Self::http_client_build(e)
	}
}
impl From<url::ParseError> for ConfigError {
	fn from(source: url::ParseError) -> Self {
		Self::InvalidBaseUrl { source }
	}
}

fn source_chain_message(err: &(dyn std::error::Error + 'static)) -> String {
	let mut message = err.to_string();
	let mut current = err.source();

	while let Some(inner) = current {
		let text = inner.to_string();

		if !message.contains(&text) {
			message.push_str(": ");
			message.push_str(&text);
		}

		current = inner.source();
	}

	message
}

fn os_error_code(err: &(dyn std::error::Error + 'static)) -> Option<i64> {
	let mut current = Some(err);

	while let Some(inner) = current {
		if let Some(code) =
			inner.downcast_ref::<std::io::Error>().and_then(std::io::Error::raw_os_error)
		{
			return Some(i64::from(code));
		}

		current = inner.source();
	}

	None
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[derive(Debug)]
	struct Outer(std::io::Error);
	impl Display for Outer {
		fn fmt(&self, f: &mut Formatter) -> FmtResult {
			f.write_str("error sending request")
		}
	}
	impl StdError for Outer {
		fn source(&self) -> Option<&(dyn StdError + 'static)> {
			Some(&self.0)
		}
	}

	#[test]
	fn api_error_exposes_message_code_and_errors() {
		let errors = serde_json::json!({ "zone_id": ["required"] });
		let err = Error::Api { message: "Invalid zone".into(), status: 422, errors: errors.clone() };

		assert_eq!(err.message(), "Invalid zone");
		assert_eq!(err.code(), 422);
		assert_eq!(err.status(), Some(422));
		assert_eq!(err.errors(), errors);
	}

	#[test]
	fn validation_errors_carry_zero_code() {
		let err: Error = ValidationError::MissingField { field: "store_id" }.into();

		assert_eq!(err.message(), "Required field 'store_id' is missing");
		assert_eq!(err.code(), 0);
		assert_eq!(err.errors(), serde_json::json!({}));
	}

	#[test]
	fn rate_limit_message_names_ceiling() {
		let err = Error::RateLimited { limit: 60 };

		assert_eq!(err.message(), "Rate limit exceeded. Maximum 60 requests per minute.");
		assert_eq!(err.status(), None);
	}

	#[test]
	fn transport_error_flattens_chain_and_keeps_source() {
		let io = std::io::Error::from_raw_os_error(111);
		let expected_io_text = io.to_string();
		let err: Error = TransportError::network(Outer(io)).into();
		let message = err.message();

		assert!(message.starts_with("Network error: error sending request"));
		assert!(message.contains(&expected_io_text));
		assert_eq!(err.code(), 111);
		assert!(StdError::source(&err).is_some(), "Transport errors should expose their cause.");
	}
}
