#![forbid(unsafe_code)]

use std::fmt;
use uuid::Uuid;

/// Written in count columns whose value is not measured (e.g. `numEntities`).
pub const UNKNOWN_COUNT: i64 = -1;

/// Stands in for a duration (seconds) or storage size the harness did not report.
pub const MISSING_MEASUREMENT: u64 = 99_999_999;

/// Tags every row produced by one aggregator invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BatchId(Uuid);

impl BatchId {
	pub fn new() -> Self { Self(Uuid::new_v4()) }
	pub fn as_uuid(&self) -> &Uuid { &self.0 }
}

impl Default for BatchId {
	fn default() -> Self { Self::new() }
}

impl From<Uuid> for BatchId {
	fn from(u: Uuid) -> Self { Self(u) }
}

impl fmt::Display for BatchId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "{}", self.0.hyphenated()) }
}

/// Elapsed wall time in whole milliseconds, never below 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct ElapsedMs(pub u64);

impl ElapsedMs {
	/// `max(secs * 1000, 1)` truncated toward zero. NaN and negatives clamp to 1,
	/// oversized values saturate.
	pub fn from_secs(secs: f64) -> Self {
		let ms = (secs * 1000.0).max(1.0);
		Self(ms as u64)
	}

	/// Elapsed time written when the source file carries no duration.
	pub fn missing() -> Self { Self::from_secs(MISSING_MEASUREMENT as f64) }

	pub fn as_millis(&self) -> u64 { self.0 }
}

impl fmt::Display for ElapsedMs {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "{}", self.0) }
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn elapsed_truncates_and_clamps() {
		assert_eq!(ElapsedMs::from_secs(0.0023).as_millis(), 2);
		assert_eq!(ElapsedMs::from_secs(0.0001).as_millis(), 1);
		assert_eq!(ElapsedMs::from_secs(0.0).as_millis(), 1);
		assert_eq!(ElapsedMs::from_secs(-3.0).as_millis(), 1);
		assert_eq!(ElapsedMs::from_secs(f64::NAN).as_millis(), 1);
		assert_eq!(ElapsedMs::from_secs(12.5).as_millis(), 12_500);
	}

	#[test]
	fn missing_elapsed_is_scaled_sentinel() {
		assert_eq!(ElapsedMs::missing().as_millis(), 99_999_999_000);
	}

	#[test]
	fn batch_id_display_is_hyphenated() {
		let id = BatchId::from(Uuid::nil());
		assert_eq!(id.to_string(), "00000000-0000-0000-0000-000000000000");
		assert_ne!(BatchId::new(), BatchId::new());
	}
}
