//! Adapter error taxonomy and retry classification
//!
//! Classification is primarily by variant; the message-pattern heuristic in
//! [`ErrorClass::from_message`] is a documented fallback used only for
//! [`AdapterError::Other`]. Ambiguous errors default to retryable, favoring
//! availability over a spurious non-retry that strands the user.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type for adapter operations
pub type AdapterResult<T> = Result<T, AdapterError>;

/// Whether a failed confirmation may be retried against another provider
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorClass {
	/// Infrastructure faults; a different provider may well succeed
	Retryable,
	/// User-caused faults that would reproduce against any provider
	NonRetryable,
}

impl ErrorClass {
	/// Fallback heuristic for errors that arrive without an explicit code.
	///
	/// Only consulted for [`AdapterError::Other`]; anything that does not
	/// match a known user-fault pattern is treated as retryable.
	pub fn from_message(message: &str) -> Self {
		let lower = message.to_ascii_lowercase();

		const NON_RETRYABLE_PATTERNS: &[&str] = &[
			"payment declined",
			"card declined",
			"invalid payment",
			"invalid address",
			"address not serviceable",
			"validation",
		];

		if NON_RETRYABLE_PATTERNS.iter().any(|p| lower.contains(p)) {
			ErrorClass::NonRetryable
		} else {
			ErrorClass::Retryable
		}
	}
}

/// Typed errors surfaced by provider adapters
#[derive(Debug, Error)]
pub enum AdapterError {
	#[error("provider unavailable: {provider_id}")]
	ProviderUnavailable { provider_id: String },

	#[error("timeout after {timeout_ms}ms")]
	Timeout { timeout_ms: u64 },

	#[error("network error: {0}")]
	Network(String),

	#[error("upstream server error {status_code}: {reason}")]
	UpstreamServerError { status_code: u16, reason: String },

	#[error("invalid shipping address: {reason}")]
	InvalidAddress { reason: String },

	#[error("payment declined: {reason}")]
	PaymentDeclined { reason: String },

	#[error("invalid payment details: {reason}")]
	InvalidPayment { reason: String },

	#[error("upstream client error {status_code}: {reason}")]
	UpstreamClientError { status_code: u16, reason: String },

	#[error("validation error: {0}")]
	Validation(String),

	#[error("invalid response format: {reason}")]
	InvalidResponse { reason: String },

	#[error("adapter configuration error: {reason}")]
	Config { reason: String },

	#[error("http request failed: {0}")]
	Http(#[from] reqwest::Error),

	#[error("serialization error: {0}")]
	Serialization(#[from] serde_json::Error),

	#[error("{0}")]
	Other(String),
}

impl AdapterError {
	/// Classify this error for failover decisions.
	///
	/// The mapping is a lookup on the variant, not message parsing; only
	/// `Other` falls back to the message heuristic.
	pub fn class(&self) -> ErrorClass {
		match self {
			AdapterError::ProviderUnavailable { .. }
			| AdapterError::Timeout { .. }
			| AdapterError::Network(_)
			| AdapterError::UpstreamServerError { .. }
			| AdapterError::InvalidResponse { .. }
			| AdapterError::Config { .. }
			| AdapterError::Serialization(_) => ErrorClass::Retryable,

			AdapterError::InvalidAddress { .. }
			| AdapterError::PaymentDeclined { .. }
			| AdapterError::InvalidPayment { .. }
			| AdapterError::UpstreamClientError { .. }
			| AdapterError::Validation(_) => ErrorClass::NonRetryable,

			AdapterError::Http(e) => match e.status() {
				Some(status) if status.is_client_error() => ErrorClass::NonRetryable,
				_ => ErrorClass::Retryable,
			},

			AdapterError::Other(message) => ErrorClass::from_message(message),
		}
	}

	pub fn is_retryable(&self) -> bool {
		self.class() == ErrorClass::Retryable
	}

	/// Map an upstream HTTP status onto the taxonomy
	pub fn from_http_status(status_code: u16, reason: impl Into<String>) -> Self {
		let reason = reason.into();
		match status_code {
			402 => AdapterError::PaymentDeclined { reason },
			408 | 429 => AdapterError::UpstreamServerError {
				status_code,
				reason,
			},
			400..=499 => AdapterError::UpstreamClientError {
				status_code,
				reason,
			},
			_ => AdapterError::UpstreamServerError {
				status_code,
				reason,
			},
		}
	}

	/// Corrective action implied by a non-retryable error, for user-facing
	/// failure messages. Never leaks internal error codes.
	pub fn corrective_hint(&self) -> Option<&'static str> {
		match self {
			AdapterError::PaymentDeclined { .. } => Some("check your payment method"),
			AdapterError::InvalidPayment { .. } => Some("check your payment details"),
			AdapterError::InvalidAddress { .. } => Some("check your shipping address"),
			AdapterError::Validation(_) | AdapterError::UpstreamClientError { .. } => {
				Some("review the order details")
			},
			_ => None,
		}
	}
}
