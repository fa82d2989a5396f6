//! Confirmation session models
//!
//! The confirmation orchestrator drives a routing decision through its state
//! machine: attempt the primary, classify failures, fail over at most once.
//! Every attempt is recorded before the orchestrator returns.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

pub mod request;
pub mod response;

pub use request::ConfirmationRequest;
pub use response::ConfirmationResponse;

use crate::adapters::{ErrorClass, ProviderOrder};

/// States of one confirmation session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConfirmationState {
	/// Decision issued, no confirmation attempted yet
	Quoted,
	/// An order placement is in flight
	Confirming,
	/// An order was placed
	Confirmed,
	/// User-caused failure; no failover, retrying would reproduce it
	FailedNonRetryable,
	/// Retryable failure with no (or exhausted) alternatives
	FailedTerminal,
}

impl ConfirmationState {
	pub fn is_terminal(&self) -> bool {
		matches!(
			self,
			ConfirmationState::Confirmed
				| ConfirmationState::FailedNonRetryable
				| ConfirmationState::FailedTerminal
		)
	}
}

/// Outcome of one confirmation attempt against one provider
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttemptOutcome {
	Success,
	Failure,
}

/// Record of one order placement attempt
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfirmAttempt {
	pub attempt_id: String,

	/// Routing decision this attempt belongs to
	pub decision_id: String,

	pub provider_id: String,

	pub outcome: AttemptOutcome,

	/// Classification of the failure, absent on success
	#[serde(skip_serializing_if = "Option::is_none")]
	pub error_class: Option<ErrorClass>,

	/// Short failure description, absent on success
	#[serde(skip_serializing_if = "Option::is_none")]
	pub error_summary: Option<String>,

	pub duration_ms: u64,

	/// Provider-assigned order id on success
	#[serde(skip_serializing_if = "Option::is_none")]
	pub order_id: Option<String>,

	pub attempted_at: DateTime<Utc>,
}

impl ConfirmAttempt {
	pub fn success(
		decision_id: impl Into<String>,
		provider_id: impl Into<String>,
		order_id: impl Into<String>,
		duration_ms: u64,
	) -> Self {
		Self {
			attempt_id: Uuid::new_v4().to_string(),
			decision_id: decision_id.into(),
			provider_id: provider_id.into(),
			outcome: AttemptOutcome::Success,
			error_class: None,
			error_summary: None,
			duration_ms,
			order_id: Some(order_id.into()),
			attempted_at: Utc::now(),
		}
	}

	pub fn failure(
		decision_id: impl Into<String>,
		provider_id: impl Into<String>,
		error_class: ErrorClass,
		error_summary: impl Into<String>,
		duration_ms: u64,
	) -> Self {
		Self {
			attempt_id: Uuid::new_v4().to_string(),
			decision_id: decision_id.into(),
			provider_id: provider_id.into(),
			outcome: AttemptOutcome::Failure,
			error_class: Some(error_class),
			error_summary: Some(error_summary.into()),
			duration_ms,
			order_id: None,
			attempted_at: Utc::now(),
		}
	}

	pub fn succeeded(&self) -> bool {
		self.outcome == AttemptOutcome::Success
	}
}

/// Fully resolved result of one confirmation session.
///
/// The caller always receives a terminal state, never a partial one, even
/// when failover happened internally.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfirmationResult {
	pub state: ConfirmationState,

	/// Provider the order was actually placed with, on success
	pub provider_id: Option<String>,

	pub order: Option<ProviderOrder>,

	pub failover_attempted: bool,

	/// Primary provider id when failover occurred
	pub failover_from: Option<String>,

	/// Attempts in the order they were made
	pub attempts: Vec<ConfirmAttempt>,

	/// Human-readable status, safe to show to the end user
	pub message: String,
}

impl ConfirmationResult {
	pub fn succeeded(&self) -> bool {
		self.state == ConfirmationState::Confirmed
	}
}

/// Confirmation-session errors surfaced to the caller before any provider is
/// contacted
#[derive(Debug, Error)]
pub enum ConfirmationError {
	#[error("confirmation token has expired")]
	TokenExpired,

	#[error("confirmation token was already used")]
	TokenAlreadyUsed,

	#[error("no routing decision found for token")]
	DecisionNotFound,

	#[error("routing decision failed integrity verification")]
	IntegrityMismatch,

	#[error("storage error: {0}")]
	Storage(String),
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_terminal_states() {
		assert!(ConfirmationState::Confirmed.is_terminal());
		assert!(ConfirmationState::FailedNonRetryable.is_terminal());
		assert!(ConfirmationState::FailedTerminal.is_terminal());
		assert!(!ConfirmationState::Quoted.is_terminal());
		assert!(!ConfirmationState::Confirming.is_terminal());
	}

	#[test]
	fn test_attempt_constructors() {
		let ok = ConfirmAttempt::success("dec-1", "freshmart", "ord-42", 120);
		assert!(ok.succeeded());
		assert_eq!(ok.order_id.as_deref(), Some("ord-42"));
		assert!(ok.error_class.is_none());

		let failed = ConfirmAttempt::failure(
			"dec-1",
			"freshmart",
			ErrorClass::Retryable,
			"provider unavailable",
			80,
		);
		assert!(!failed.succeeded());
		assert_eq!(failed.error_class, Some(ErrorClass::Retryable));
		assert!(failed.order_id.is_none());
	}
}
