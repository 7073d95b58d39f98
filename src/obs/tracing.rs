// self
use crate::{_prelude::*, obs::Operation};

/// Type alias that resolves to an instrumented future when tracing is enabled.
#[cfg(feature = "tracing")]
pub type InstrumentedOperation<F> = tracing::instrument::Instrumented<F>;
/// Passthrough future type when tracing is disabled.
#[cfg(not(feature = "tracing"))]
pub type InstrumentedOperation<F> = F;

/// A span builder used by the executor and grant flows.
#[derive(Clone, Debug)]
pub struct OperationSpan {
	#[cfg(feature = "tracing")]
	span: tracing::Span,
}
impl OperationSpan {
	/// Creates a new span tagged with the provided operation + stage.
	pub fn new(operation: Operation, stage: &'static str) -> Self {
		#[cfg(feature = "tracing")]
		{
			let span =
				tracing::info_span!("pathao_courier.request", operation = operation.as_str(), stage);

			Self { span }
		}
		#[cfg(not(feature = "tracing"))]
		{
			let _ = (operation, stage);

			Self {}
		}
	}

	/// Instruments an async block without holding a guard across `.await` points.
	pub fn instrument<Fut>(&self, fut: Fut) -> InstrumentedOperation<Fut>
	where
		Fut: Future,
	{
		#[cfg(feature = "tracing")]
		{
			use tracing::Instrument;

			fut.instrument(self.span.clone())
		}
		#[cfg(not(feature = "tracing"))]
		{
			fut
		}
	}
}

/// Emits a debug event when a cached bearer token is reused.
pub(crate) fn log_token_cache_hit(key: &str) {
	#[cfg(feature = "tracing")]
	tracing::debug!(key, "Reusing cached access token.");
	#[cfg(not(feature = "tracing"))]
	let _ = key;
}

/// Emits a debug event after the token endpoint issued a new bearer token.
pub(crate) fn log_token_issued(operation: Operation, expires_in: i64, cached: bool) {
	#[cfg(feature = "tracing")]
	tracing::debug!(operation = operation.as_str(), expires_in, cached, "Issued access token.");
	#[cfg(not(feature = "tracing"))]
	let _ = (operation, expires_in, cached);
}

/// Emits an error event for a non-success API response.
pub(crate) fn log_api_error(endpoint: &str, method: &str, status: u16, message: &str, body: &str) {
	#[cfg(feature = "tracing")]
	tracing::error!(endpoint, method, status, message, body, "Pathao API error.");
	#[cfg(not(feature = "tracing"))]
	let _ = (endpoint, method, status, message, body);
}

/// Emits an error event for a request that never produced a response.
pub(crate) fn log_network_error(endpoint: &str, error: &dyn Display) {
	#[cfg(feature = "tracing")]
	tracing::error!(endpoint, error = %error, "Pathao API network error.");
	#[cfg(not(feature = "tracing"))]
	let _ = (endpoint, error);
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[tokio::test]
	async fn instrument_wraps_future() {
		let span = OperationSpan::new(Operation::ApiRequest, "instrument_wraps_future");
		let value = span.instrument(async { 42 }).await;

		assert_eq!(value, 42);
	}

	#[test]
	fn log_helpers_accept_structured_fields() {
		log_token_cache_hit("pathao_courier_access_token");
		log_token_issued(Operation::PasswordGrant, 3_600, true);
		log_api_error("/aladdin/api/v1/orders", "POST", 422, "Invalid zone", "{}");
		log_network_error("/aladdin/api/v1/orders", &"connection refused");
	}
}
