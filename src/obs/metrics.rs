//! Request counters exported through the `metrics` facade.
//!
//! Every grant and API call bumps [`REQUEST_COUNTER`] twice: once on attempt, then once on
//! success or failure. Without the `metrics` feature nothing is emitted.

// self
use crate::obs::{Operation, Outcome};

/// Counter name, labelled by `operation` and `outcome`.
pub const REQUEST_COUNTER: &str = "pathao_courier_request_total";

/// Bumps [`REQUEST_COUNTER`] for one `operation` stage.
#[cfg(feature = "metrics")]
pub fn record_outcome(operation: Operation, outcome: Outcome) {
	metrics::counter!(
		REQUEST_COUNTER,
		"operation" => operation.as_str(),
		"outcome" => outcome.as_str()
	)
	.increment(1);
}

/// Bumps [`REQUEST_COUNTER`] for one `operation` stage.
#[cfg(not(feature = "metrics"))]
pub fn record_outcome(_: Operation, _: Outcome) {}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn record_outcome_without_recorder_is_harmless() {
		for operation in [Operation::PasswordGrant, Operation::RefreshGrant, Operation::ApiRequest] {
			for outcome in [Outcome::Attempt, Outcome::Success, Outcome::Failure] {
				record_outcome(operation, outcome);
			}
		}

		assert!(REQUEST_COUNTER.ends_with("_total"));
	}
}
