//! Time sources consulted by the token cache, rate limiter, and in-memory stores.

// self
use crate::_prelude::*;

/// Source of the current instant.
///
/// Token freshness, rate-limit buckets, and cache expiry all read time through this trait so
/// hosts can drive them deterministically.
pub trait Clock
where
	Self: Send + Sync,
{
	/// Returns the current UTC instant.
	fn now(&self) -> OffsetDateTime;
}

/// Wall clock backed by [`OffsetDateTime::now_utc`].
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;
impl Clock for SystemClock {
	fn now(&self) -> OffsetDateTime {
		OffsetDateTime::now_utc()
	}
}

/// Manually driven clock for tests and simulations.
#[derive(Debug)]
pub struct ManualClock(RwLock<OffsetDateTime>);
impl ManualClock {
	/// Creates a clock frozen at `instant`.
	pub fn new(instant: OffsetDateTime) -> Self {
		Self(RwLock::new(instant))
	}

	/// Moves the clock to `instant`.
	pub fn set(&self, instant: OffsetDateTime) {
		*self.0.write() = instant;
	}

	/// Moves the clock forward by `delta`.
	pub fn advance(&self, delta: Duration) {
		let mut guard = self.0.write();

		*guard += delta;
	}
}
impl Default for ManualClock {
	fn default() -> Self {
		Self::new(OffsetDateTime::UNIX_EPOCH)
	}
}
impl Clock for ManualClock {
	fn now(&self) -> OffsetDateTime {
		*self.0.read()
	}
}

#[cfg(test)]
mod tests {
	// crates.io
	use time::macros;
	// self
	use super::*;

	#[test]
	fn manual_clock_advances_and_resets() {
		let clock = ManualClock::new(macros::datetime!(2025-01-01 00:00 UTC));

		clock.advance(Duration::minutes(90));

		assert_eq!(clock.now(), macros::datetime!(2025-01-01 01:30 UTC));

		clock.set(macros::datetime!(2024-06-01 00:00 UTC));

		assert_eq!(clock.now(), macros::datetime!(2024-06-01 00:00 UTC));
	}
}
