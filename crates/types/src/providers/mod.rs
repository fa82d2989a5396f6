//! Provider configuration model
//!
//! A provider is an external fulfillment source (direct retailer integration
//! or aggregator marketplace). The registry hands out read-only snapshots of
//! these configs for the duration of one routing decision.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use url::Url;

pub mod errors;

pub use errors::{ProviderError, ProviderResult, ProviderValidationError, ProviderValidationResult};

/// Static configuration for one fulfillment provider
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderConfig {
	/// Unique, stable identifier ("freshmart", "basketlink", ...)
	pub id: String,

	/// ID of the adapter used to communicate with this provider
	pub adapter_id: String,

	/// Human-readable display name
	pub name: String,

	/// Only enabled providers participate in quoting
	pub enabled: bool,

	/// Operator-assigned priority, higher wins score ties
	pub priority: i32,

	/// Commission rate earned on orders routed here, 0.0 to 1.0
	pub commission_rate: f64,

	/// Whether the adapter talks to the live backend or prices deterministically
	pub mode: ProviderMode,

	/// Base endpoint for the provider API (required in live mode)
	pub endpoint: String,

	/// API credential, never logged
	#[serde(skip_serializing_if = "Option::is_none")]
	pub api_key: Option<String>,

	/// Custom HTTP headers for live-mode requests
	#[serde(skip_serializing_if = "Option::is_none")]
	pub headers: Option<HashMap<String, String>>,

	/// Per-provider quote timeout override in milliseconds
	#[serde(skip_serializing_if = "Option::is_none")]
	pub timeout_ms: Option<u64>,
}

/// Adapter execution mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ProviderMode {
	/// Deterministic pricing as a pure function of cart contents
	#[default]
	Mock,
	/// Real calls against the provider backend
	Live,
}

impl ProviderConfig {
	pub fn new(
		id: impl Into<String>,
		adapter_id: impl Into<String>,
		endpoint: impl Into<String>,
	) -> Self {
		let id = id.into();
		Self {
			name: id.clone(),
			id,
			adapter_id: adapter_id.into(),
			endpoint: endpoint.into(),
			enabled: true,
			priority: 0,
			commission_rate: 0.0,
			mode: ProviderMode::Mock,
			api_key: None,
			headers: None,
			timeout_ms: None,
		}
	}

	pub fn with_name(mut self, name: impl Into<String>) -> Self {
		self.name = name.into();
		self
	}

	pub fn with_priority(mut self, priority: i32) -> Self {
		self.priority = priority;
		self
	}

	pub fn with_commission_rate(mut self, rate: f64) -> Self {
		self.commission_rate = rate;
		self
	}

	pub fn with_mode(mut self, mode: ProviderMode) -> Self {
		self.mode = mode;
		self
	}

	pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
		self.api_key = Some(api_key.into());
		self
	}

	pub fn with_headers(mut self, headers: HashMap<String, String>) -> Self {
		self.headers = Some(headers);
		self
	}

	pub fn enabled(mut self, enabled: bool) -> Self {
		self.enabled = enabled;
		self
	}

	/// Validate the configuration before it enters the registry
	pub fn validate(&self) -> ProviderValidationResult<()> {
		if self.id.is_empty() {
			return Err(ProviderValidationError::MissingRequiredField {
				field: "id".to_string(),
			});
		}

		if !self
			.id
			.chars()
			.all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
		{
			return Err(ProviderValidationError::InvalidProviderId {
				id: self.id.clone(),
			});
		}

		if self.adapter_id.is_empty() {
			return Err(ProviderValidationError::MissingRequiredField {
				field: "adapter_id".to_string(),
			});
		}

		if !(0.0..=1.0).contains(&self.commission_rate) {
			return Err(ProviderValidationError::InvalidCommissionRate {
				rate: self.commission_rate,
			});
		}

		// Mock-mode providers never dial out, so a placeholder endpoint is fine
		if self.mode == ProviderMode::Live && Url::parse(&self.endpoint).is_err() {
			return Err(ProviderValidationError::InvalidEndpoint {
				endpoint: self.endpoint.clone(),
			});
		}

		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn test_provider() -> ProviderConfig {
		ProviderConfig::new("freshmart", "retailer-v1", "https://api.freshmart.test")
			.with_name("FreshMart")
			.with_priority(5)
			.with_commission_rate(0.08)
	}

	#[test]
	fn test_valid_provider() {
		let provider = test_provider();
		assert!(provider.validate().is_ok());
		assert_eq!(provider.mode, ProviderMode::Mock);
		assert!(provider.enabled);
	}

	#[test]
	fn test_invalid_provider_id() {
		let provider = ProviderConfig::new("not valid!", "retailer-v1", "https://api.test");
		assert!(matches!(
			provider.validate(),
			Err(ProviderValidationError::InvalidProviderId { .. })
		));
	}

	#[test]
	fn test_commission_rate_bounds() {
		let provider = test_provider().with_commission_rate(1.5);
		assert!(matches!(
			provider.validate(),
			Err(ProviderValidationError::InvalidCommissionRate { rate }) if rate == 1.5
		));
	}

	#[test]
	fn test_live_mode_requires_valid_endpoint() {
		let provider = ProviderConfig::new("freshmart", "retailer-v1", "not-a-url")
			.with_mode(ProviderMode::Live);
		assert!(matches!(
			provider.validate(),
			Err(ProviderValidationError::InvalidEndpoint { .. })
		));

		// Mock mode accepts any endpoint string
		let provider = ProviderConfig::new("freshmart", "retailer-v1", "not-a-url");
		assert!(provider.validate().is_ok());
	}
}
