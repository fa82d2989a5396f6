//! Error types for provider configuration and lookup

use thiserror::Error;

/// Result type for provider operations
pub type ProviderResult<T> = Result<T, ProviderError>;

/// Result type for provider validation
pub type ProviderValidationResult<T> = Result<T, ProviderValidationError>;

/// Validation errors for provider configurations
#[derive(Debug, Error, PartialEq)]
pub enum ProviderValidationError {
	#[error("invalid provider id: {id}")]
	InvalidProviderId { id: String },

	#[error("invalid commission rate {rate}, must be within 0.0..=1.0")]
	InvalidCommissionRate { rate: f64 },

	#[error("invalid endpoint: {endpoint}")]
	InvalidEndpoint { endpoint: String },

	#[error("missing required field: {field}")]
	MissingRequiredField { field: String },
}

/// Provider lookup and registry errors
#[derive(Debug, Error)]
pub enum ProviderError {
	#[error("provider not found: {provider_id}")]
	NotFound { provider_id: String },

	#[error("provider is disabled: {provider_id}")]
	Disabled { provider_id: String },

	#[error("provider '{provider_id}' references unknown adapter '{adapter_id}'")]
	UnknownAdapter {
		provider_id: String,
		adapter_id: String,
	},

	#[error("duplicate provider id: {provider_id}")]
	Duplicate { provider_id: String },

	#[error("provider validation failed: {0}")]
	Validation(#[from] ProviderValidationError),
}
