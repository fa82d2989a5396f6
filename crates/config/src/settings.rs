//! Configuration settings structures

use grocer_types::{ProviderConfig, ProviderMode, WeightTable};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Main application settings
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
#[serde(default)]
pub struct Settings {
	pub server: ServerSettings,
	pub providers: HashMap<String, ProviderSettings>,
	pub timeouts: TimeoutSettings,
	pub routing: RoutingSettings,
	pub security: SecuritySettings,
	pub environment: EnvironmentSettings,
	pub logging: LoggingSettings,
}

/// Server configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ServerSettings {
	pub host: String,
	pub port: u16,
}

/// Individual provider configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ProviderSettings {
	pub provider_id: String,
	pub adapter_id: String,
	pub endpoint: String,
	pub enabled: bool,
	pub priority: i32,
	pub commission_rate: f64,
	#[serde(default)]
	pub mode: ProviderMode,
	pub api_key: Option<String>,
	pub headers: Option<HashMap<String, String>>,
	pub timeout_ms: Option<u64>,
	// Optional descriptive metadata
	pub name: Option<String>,
}

/// Convert from settings ProviderSettings to domain ProviderConfig
impl From<ProviderSettings> for ProviderConfig {
	fn from(settings: ProviderSettings) -> Self {
		Self {
			name: settings.name.unwrap_or_else(|| settings.provider_id.clone()),
			id: settings.provider_id,
			adapter_id: settings.adapter_id,
			endpoint: settings.endpoint,
			enabled: settings.enabled,
			priority: settings.priority,
			commission_rate: settings.commission_rate,
			mode: settings.mode,
			api_key: settings.api_key,
			headers: settings.headers,
			timeout_ms: settings.timeout_ms,
		}
	}
}

/// Timeout configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct TimeoutSettings {
	/// Per-provider quote timeout in milliseconds
	pub per_provider_ms: u64,
	/// Ceiling for the whole aggregation fan-out in milliseconds
	pub global_ms: u64,
	/// Request timeout for HTTP clients
	pub request_ms: u64,
}

/// Routing and scoring configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct RoutingSettings {
	/// Additive priority boost ceiling in score points
	pub priority_boost_max: f64,

	/// Reliability score for providers with no confirmation history
	pub neutral_reliability: f64,

	/// Trailing attempt count the reliability aggregate is computed over
	pub reliability_window: usize,

	/// Scoring weights per optimization preference
	pub weights: WeightTable,
}

/// Confirmation token configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct SecuritySettings {
	/// HMAC key for decision integrity checksums; falls back to the
	/// TOKEN_SECRET environment variable when unset
	pub token_secret: Option<String>,

	/// Token TTL in minutes
	pub token_ttl_minutes: i64,
}

/// Environment-specific settings
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct EnvironmentSettings {
	pub profile: EnvironmentProfile,
	pub debug: bool,
}

/// Environment profiles
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum EnvironmentProfile {
	Development,
	Staging,
	Production,
}

/// Logging configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct LoggingSettings {
	pub level: String,
	pub format: LogFormat,
	pub structured: bool,
}

/// Log format options
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
	Json,
	Pretty,
	Compact,
}

impl Default for ServerSettings {
	fn default() -> Self {
		Self {
			host: "0.0.0.0".to_string(),
			port: 4000,
		}
	}
}

impl Default for TimeoutSettings {
	fn default() -> Self {
		Self {
			per_provider_ms: 3_000,
			global_ms: 5_000,
			request_ms: 10_000,
		}
	}
}

impl Default for RoutingSettings {
	fn default() -> Self {
		Self {
			priority_boost_max: 20.0,
			neutral_reliability: 70.0,
			reliability_window: 50,
			weights: WeightTable::default(),
		}
	}
}

impl Default for SecuritySettings {
	fn default() -> Self {
		Self {
			token_secret: None,
			token_ttl_minutes: 15,
		}
	}
}

impl Default for EnvironmentSettings {
	fn default() -> Self {
		Self {
			profile: EnvironmentProfile::Development,
			debug: false,
		}
	}
}

impl Default for LoggingSettings {
	fn default() -> Self {
		Self {
			level: "info".to_string(),
			format: LogFormat::Compact,
			structured: false,
		}
	}
}

impl Settings {
	/// Providers that participate in quoting
	pub fn enabled_providers(&self) -> HashMap<String, ProviderSettings> {
		self.providers
			.iter()
			.filter(|(_, p)| p.enabled)
			.map(|(id, p)| (id.clone(), p.clone()))
			.collect()
	}

	/// All configured providers as domain configs
	pub fn provider_configs(&self) -> Vec<ProviderConfig> {
		self.providers
			.values()
			.cloned()
			.map(ProviderConfig::from)
			.collect()
	}

	pub fn bind_address(&self) -> String {
		format!("{}:{}", self.server.host, self.server.port)
	}

	/// Resolve the HMAC key for decision checksums.
	///
	/// Order: explicit setting, then the TOKEN_SECRET environment variable.
	pub fn resolve_token_secret(&self) -> Result<String, String> {
		let secret = match &self.security.token_secret {
			Some(secret) => secret.clone(),
			None => std::env::var("TOKEN_SECRET")
				.map_err(|_| "token secret not configured and TOKEN_SECRET unset".to_string())?,
		};

		if secret.len() < 16 {
			return Err("token secret must be at least 16 characters".to_string());
		}

		Ok(secret)
	}

	/// Validate cross-field constraints before the engine starts
	pub fn validate(&self) -> Result<(), String> {
		self.routing.weights.validate()?;

		if self.routing.priority_boost_max < 0.0 {
			return Err("priority_boost_max must be non-negative".to_string());
		}

		if !(0.0..=100.0).contains(&self.routing.neutral_reliability) {
			return Err("neutral_reliability must be within 0..=100".to_string());
		}

		if self.timeouts.per_provider_ms == 0 || self.timeouts.global_ms == 0 {
			return Err("timeouts must be positive".to_string());
		}

		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_defaults_are_valid() {
		let settings = Settings::default();
		assert!(settings.validate().is_ok());
		assert_eq!(settings.bind_address(), "0.0.0.0:4000");
		assert_eq!(settings.routing.neutral_reliability, 70.0);
	}

	#[test]
	fn test_enabled_provider_filtering() {
		let mut settings = Settings::default();
		settings.providers.insert(
			"freshmart".to_string(),
			ProviderSettings {
				provider_id: "freshmart".to_string(),
				adapter_id: "retailer-v1".to_string(),
				endpoint: "https://api.freshmart.test".to_string(),
				enabled: true,
				priority: 5,
				commission_rate: 0.08,
				mode: ProviderMode::Mock,
				api_key: None,
				headers: None,
				timeout_ms: None,
				name: Some("FreshMart".to_string()),
			},
		);
		settings.providers.insert(
			"dormant".to_string(),
			ProviderSettings {
				provider_id: "dormant".to_string(),
				adapter_id: "retailer-v1".to_string(),
				endpoint: "https://api.dormant.test".to_string(),
				enabled: false,
				priority: 0,
				commission_rate: 0.0,
				mode: ProviderMode::Mock,
				api_key: None,
				headers: None,
				timeout_ms: None,
				name: None,
			},
		);

		let enabled = settings.enabled_providers();
		assert_eq!(enabled.len(), 1);
		assert!(enabled.contains_key("freshmart"));
	}

	#[test]
	fn test_provider_settings_to_domain() {
		let settings = ProviderSettings {
			provider_id: "freshmart".to_string(),
			adapter_id: "retailer-v1".to_string(),
			endpoint: "https://api.freshmart.test".to_string(),
			enabled: true,
			priority: 5,
			commission_rate: 0.08,
			mode: ProviderMode::Live,
			api_key: Some("key".to_string()),
			headers: None,
			timeout_ms: Some(2_500),
			name: None,
		};

		let config = ProviderConfig::from(settings);
		assert_eq!(config.id, "freshmart");
		// Name falls back to the provider id
		assert_eq!(config.name, "freshmart");
		assert_eq!(config.mode, ProviderMode::Live);
		assert_eq!(config.timeout_ms, Some(2_500));
		assert!(config.validate().is_ok());
	}

	#[test]
	fn test_token_secret_resolution() {
		let mut settings = Settings::default();
		settings.security.token_secret = Some("short".to_string());
		assert!(settings.resolve_token_secret().is_err());

		settings.security.token_secret = Some("a-long-enough-secret".to_string());
		assert_eq!(
			settings.resolve_token_secret().unwrap(),
			"a-long-enough-secret"
		);
	}

	#[test]
	fn test_partial_config_deserializes_with_defaults() {
		let json = r#"{ "server": { "host": "127.0.0.1", "port": 9000 } }"#;
		let settings: Settings = serde_json::from_str(json).unwrap();

		assert_eq!(settings.bind_address(), "127.0.0.1:9000");
		assert_eq!(settings.timeouts.per_provider_ms, 3_000);
		assert!(settings.providers.is_empty());
	}
}
