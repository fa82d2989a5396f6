//! Grocer Adapters
//!
//! Provider-specific adapters for the grocer routing engine. Each adapter
//! speaks one backend family (a direct retailer API or an aggregator
//! marketplace API) and carries a deterministic mock mode for reproducible
//! provider comparisons.

pub mod http;
pub mod marketplace_adapter;
pub mod pricing;
pub mod retailer_adapter;

pub use marketplace_adapter::MarketplaceAdapter;
pub use retailer_adapter::RetailerAdapter;

pub use grocer_types::{AdapterError, AdapterResult, ProviderAdapter};

use std::collections::HashMap;
use std::sync::Arc;

/// Registry of provider adapters keyed by adapter id
pub struct AdapterRegistry {
	adapters: HashMap<String, Arc<dyn ProviderAdapter>>,
}

impl AdapterRegistry {
	pub fn new() -> Self {
		Self {
			adapters: HashMap::new(),
		}
	}

	/// Registry pre-populated with the built-in adapters
	pub fn with_defaults() -> Self {
		let mut registry = Self::new();
		registry
			.register(Arc::new(RetailerAdapter::new()))
			.expect("built-in retailer adapter id is unique");
		registry
			.register(Arc::new(MarketplaceAdapter::new()))
			.expect("built-in marketplace adapter id is unique");
		registry
	}

	pub fn register(&mut self, adapter: Arc<dyn ProviderAdapter>) -> AdapterResult<()> {
		let id = adapter.adapter_id().to_string();
		if self.adapters.contains_key(&id) {
			return Err(AdapterError::Config {
				reason: format!("adapter already registered: {id}"),
			});
		}
		self.adapters.insert(id, adapter);
		Ok(())
	}

	pub fn get(&self, adapter_id: &str) -> Option<Arc<dyn ProviderAdapter>> {
		self.adapters.get(adapter_id).cloned()
	}

	pub fn ids(&self) -> Vec<String> {
		let mut ids: Vec<String> = self.adapters.keys().cloned().collect();
		ids.sort();
		ids
	}

	pub fn len(&self) -> usize {
		self.adapters.len()
	}

	pub fn is_empty(&self) -> bool {
		self.adapters.is_empty()
	}
}

impl Default for AdapterRegistry {
	fn default() -> Self {
		Self::with_defaults()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_defaults_register_builtin_adapters() {
		let registry = AdapterRegistry::with_defaults();
		assert_eq!(registry.ids(), vec!["marketplace-v1", "retailer-v1"]);
		assert!(registry.get("retailer-v1").is_some());
		assert!(registry.get("unknown").is_none());
	}

	#[test]
	fn test_duplicate_registration_rejected() {
		let mut registry = AdapterRegistry::with_defaults();
		let result = registry.register(Arc::new(RetailerAdapter::new()));
		assert!(matches!(result, Err(AdapterError::Config { .. })));
	}
}
