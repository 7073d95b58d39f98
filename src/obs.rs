//! Optional observability helpers for API calls and grant flows.
//!
//! # Feature Flags
//!
//! - Enable `tracing` (default) to emit structured spans named `pathao_courier.request` with the
//!   `operation` and `stage` fields, debug events for token cache activity, and error events for
//!   failed API calls.
//! - Enable `metrics` to increment the `pathao_courier_request_total` counter for every
//!   attempt/success/failure, labeled by `operation` + `outcome`.

mod metrics;
mod tracing;

pub use metrics::*;
pub use tracing::*;

// self
use crate::_prelude::*;

/// Operation kinds observed by the client.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Operation {
	/// Password grant against the token endpoint.
	PasswordGrant,
	/// Refresh-token grant against the token endpoint.
	RefreshGrant,
	/// Resource call routed through the request executor.
	ApiRequest,
}
impl Operation {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			Operation::PasswordGrant => "password_grant",
			Operation::RefreshGrant => "refresh_grant",
			Operation::ApiRequest => "api_request",
		}
	}
}
impl Display for Operation {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Outcome labels recorded for each attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Outcome {
	/// Entry to an operation.
	Attempt,
	/// Successful completion.
	Success,
	/// Failure propagated back to the caller.
	Failure,
}
impl Outcome {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			Outcome::Attempt => "attempt",
			Outcome::Success => "success",
			Outcome::Failure => "failure",
		}
	}
}
impl Display for Outcome {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Records the attempt and its final outcome around `fut`, inside a span for `operation`.
pub(crate) async fn observe<T, Fut>(operation: Operation, stage: &'static str, fut: Fut) -> Result<T>
where
	Fut: Future<Output = Result<T>>,
{
	let span = OperationSpan::new(operation, stage);

	record_outcome(operation, Outcome::Attempt);

	let result = span.instrument(fut).await;

	record_outcome(operation, if result.is_ok() { Outcome::Success } else { Outcome::Failure });

	result
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn labels_are_stable() {
		assert_eq!(Operation::PasswordGrant.to_string(), "password_grant");
		assert_eq!(Operation::ApiRequest.as_str(), "api_request");
		assert_eq!(Outcome::Failure.to_string(), "failure");
	}

	#[tokio::test]
	async fn observe_passes_results_through() {
		let ok = observe(Operation::ApiRequest, "test", async { Ok(7) }).await;

		assert_eq!(ok.expect("Observed future should succeed."), 7);

		let err = observe::<(), _>(Operation::RefreshGrant, "test", async {
			Err(Error::RateLimited { limit: 1 })
		})
		.await;

		assert!(matches!(err, Err(Error::RateLimited { limit: 1 })));
	}
}
