//! Order outcome records and reliability aggregates
//!
//! Outcomes are append-only. The outcome recorder is the only writer; the
//! scoring engine reads the per-provider reliability aggregate on subsequent
//! routing requests, closing the feedback loop.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Durable record of one order's result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderOutcome {
	pub order_id: String,

	pub provider_id: String,

	pub success: bool,

	/// Order value in minor units
	pub total_minor: i64,

	/// Commission earned in minor units
	pub commission_minor: i64,

	pub cancelled: bool,

	pub recorded_at: DateTime<Utc>,
}

impl OrderOutcome {
	pub fn new(
		order_id: impl Into<String>,
		provider_id: impl Into<String>,
		success: bool,
		total_minor: i64,
		commission_minor: i64,
	) -> Self {
		Self {
			order_id: order_id.into(),
			provider_id: provider_id.into(),
			success,
			total_minor,
			commission_minor,
			cancelled: false,
			recorded_at: Utc::now(),
		}
	}

	pub fn cancelled(mut self) -> Self {
		self.cancelled = true;
		self
	}
}

/// Rolling confirmation statistics for one provider over a trailing window
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderReliability {
	pub provider_id: String,

	/// Attempts observed within the window
	pub attempts: u64,

	/// Successful confirmations within the window
	pub successes: u64,
}

impl ProviderReliability {
	pub fn empty(provider_id: impl Into<String>) -> Self {
		Self {
			provider_id: provider_id.into(),
			attempts: 0,
			successes: 0,
		}
	}

	/// Success rate in 0.0..=1.0, or `None` when there is no history.
	///
	/// Callers map `None` to a neutral default so new providers are neither
	/// punished nor favored.
	pub fn success_rate(&self) -> Option<f64> {
		if self.attempts == 0 {
			None
		} else {
			Some(self.successes as f64 / self.attempts as f64)
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_no_history_has_no_rate() {
		let reliability = ProviderReliability::empty("freshmart");
		assert_eq!(reliability.success_rate(), None);
	}

	#[test]
	fn test_success_rate() {
		let reliability = ProviderReliability {
			provider_id: "freshmart".to_string(),
			attempts: 4,
			successes: 3,
		};
		assert_eq!(reliability.success_rate(), Some(0.75));
	}
}
