//! Provider registry
//!
//! Holds the provider configuration snapshot and resolves providers to their
//! adapters. Configuration changes take effect only for requests started
//! after a reload; in-flight requests keep the snapshot they cloned.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use grocer_adapters::AdapterRegistry;
use grocer_types::{ProviderAdapter, ProviderConfig, ProviderError};
use tracing::info;

/// Registry of configured providers with adapter resolution
pub struct ProviderRegistry {
	providers: RwLock<HashMap<String, ProviderConfig>>,
	adapters: Arc<AdapterRegistry>,
}

impl ProviderRegistry {
	/// Build the registry, validating every provider and its adapter binding
	pub fn new(
		configs: Vec<ProviderConfig>,
		adapters: Arc<AdapterRegistry>,
	) -> Result<Self, ProviderError> {
		let providers = Self::validate_configs(configs, &adapters)?;

		info!("Provider registry initialized with {} provider(s)", providers.len());

		Ok(Self {
			providers: RwLock::new(providers),
			adapters,
		})
	}

	fn validate_configs(
		configs: Vec<ProviderConfig>,
		adapters: &AdapterRegistry,
	) -> Result<HashMap<String, ProviderConfig>, ProviderError> {
		let mut providers = HashMap::new();

		for config in configs {
			config.validate()?;

			if adapters.get(&config.adapter_id).is_none() {
				return Err(ProviderError::UnknownAdapter {
					provider_id: config.id.clone(),
					adapter_id: config.adapter_id.clone(),
				});
			}

			if providers.insert(config.id.clone(), config.clone()).is_some() {
				return Err(ProviderError::Duplicate {
					provider_id: config.id,
				});
			}
		}

		Ok(providers)
	}

	/// Enabled providers as a read-only snapshot, sorted by id for
	/// deterministic fan-out order
	pub fn list_enabled(&self) -> Vec<ProviderConfig> {
		let guard = self.providers.read().expect("provider registry lock poisoned");
		let mut enabled: Vec<ProviderConfig> =
			guard.values().filter(|p| p.enabled).cloned().collect();
		enabled.sort_by(|a, b| a.id.cmp(&b.id));
		enabled
	}

	/// All configured providers, sorted by id
	pub fn list_all(&self) -> Vec<ProviderConfig> {
		let guard = self.providers.read().expect("provider registry lock poisoned");
		let mut all: Vec<ProviderConfig> = guard.values().cloned().collect();
		all.sort_by(|a, b| a.id.cmp(&b.id));
		all
	}

	pub fn get(&self, provider_id: &str) -> Option<ProviderConfig> {
		let guard = self.providers.read().expect("provider registry lock poisoned");
		guard.get(provider_id).cloned()
	}

	/// Replace the whole configuration atomically.
	///
	/// Validation happens before the swap, so a bad reload leaves the
	/// previous snapshot untouched.
	pub fn reload(&self, configs: Vec<ProviderConfig>) -> Result<(), ProviderError> {
		let validated = Self::validate_configs(configs, &self.adapters)?;

		let mut guard = self.providers.write().expect("provider registry lock poisoned");
		let previous = guard.len();
		*guard = validated;

		info!(
			"Provider registry reloaded: {} -> {} provider(s)",
			previous,
			guard.len()
		);
		Ok(())
	}

	/// Resolve the adapter a provider is bound to
	pub fn adapter_for(
		&self,
		config: &ProviderConfig,
	) -> Result<Arc<dyn ProviderAdapter>, ProviderError> {
		self.adapters
			.get(&config.adapter_id)
			.ok_or_else(|| ProviderError::UnknownAdapter {
				provider_id: config.id.clone(),
				adapter_id: config.adapter_id.clone(),
			})
	}

	pub fn adapters(&self) -> Arc<AdapterRegistry> {
		Arc::clone(&self.adapters)
	}

	pub fn len(&self) -> usize {
		self.providers.read().expect("provider registry lock poisoned").len()
	}

	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn adapters() -> Arc<AdapterRegistry> {
		Arc::new(AdapterRegistry::with_defaults())
	}

	fn provider(id: &str) -> ProviderConfig {
		ProviderConfig::new(id, "retailer-v1", "https://api.test")
	}

	#[test]
	fn test_registry_validates_adapter_binding() {
		let bad = ProviderConfig::new("ghost", "no-such-adapter", "https://api.test");
		let result = ProviderRegistry::new(vec![bad], adapters());
		assert!(matches!(
			result,
			Err(ProviderError::UnknownAdapter { .. })
		));
	}

	#[test]
	fn test_registry_rejects_duplicates() {
		let result =
			ProviderRegistry::new(vec![provider("freshmart"), provider("freshmart")], adapters());
		assert!(matches!(result, Err(ProviderError::Duplicate { .. })));
	}

	#[test]
	fn test_list_enabled_excludes_disabled() {
		let registry = ProviderRegistry::new(
			vec![provider("freshmart"), provider("dormant").enabled(false)],
			adapters(),
		)
		.unwrap();

		let enabled = registry.list_enabled();
		assert_eq!(enabled.len(), 1);
		assert_eq!(enabled[0].id, "freshmart");

		assert_eq!(registry.list_all().len(), 2);
	}

	#[test]
	fn test_list_enabled_is_sorted() {
		let registry = ProviderRegistry::new(
			vec![provider("zmart"), provider("amart"), provider("mmart")],
			adapters(),
		)
		.unwrap();

		let ids: Vec<String> = registry.list_enabled().into_iter().map(|p| p.id).collect();
		assert_eq!(ids, vec!["amart", "mmart", "zmart"]);
	}

	#[test]
	fn test_reload_is_all_or_nothing() {
		let registry = ProviderRegistry::new(vec![provider("freshmart")], adapters()).unwrap();

		// Invalid reload leaves the previous snapshot in place
		let bad = ProviderConfig::new("ghost", "no-such-adapter", "https://api.test");
		assert!(registry.reload(vec![bad]).is_err());
		assert!(registry.get("freshmart").is_some());

		// Valid reload swaps wholesale
		registry.reload(vec![provider("basketlink")]).unwrap();
		assert!(registry.get("freshmart").is_none());
		assert!(registry.get("basketlink").is_some());
	}
}
