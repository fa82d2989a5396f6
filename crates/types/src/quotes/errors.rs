//! Error types for quote validation

use thiserror::Error;

/// Result type for quote validation
pub type QuoteValidationResult<T> = Result<T, QuoteValidationError>;

/// Invariant violations detected at the adapter boundary
#[derive(Debug, Error, PartialEq)]
pub enum QuoteValidationError {
	#[error("quote total {actual} does not equal subtotal + fees + tax = {expected}")]
	TotalMismatch { expected: i64, actual: i64 },

	#[error("quote has {actual} availability entries for a cart of {expected} items")]
	AvailabilityLengthMismatch { expected: usize, actual: usize },

	#[error("negative amount in {field}: {value}")]
	NegativeAmount { field: String, value: i64 },

	#[error("quote is missing a provider id")]
	EmptyProviderId,
}
