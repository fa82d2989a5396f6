//! Provider adapter trait and runtime models
//!
//! Adapters present a uniform capability surface over heterogeneous provider
//! backends. They are stateless and safe to invoke concurrently from multiple
//! routing requests.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt::Debug;

pub mod errors;

pub use errors::{AdapterError, AdapterResult, ErrorClass};

use crate::carts::Cart;
use crate::providers::{ProviderConfig, ProviderMode};
use crate::quotes::Quote;

/// Runtime view of a provider config handed to adapter calls.
///
/// Snapshotted from the registry per request; adapters never read shared
/// mutable configuration.
#[derive(Debug, Clone)]
pub struct ProviderRuntimeConfig {
	pub provider_id: String,
	pub endpoint: String,
	pub mode: ProviderMode,
	pub api_key: Option<String>,
	pub headers: Option<HashMap<String, String>>,
	pub timeout_ms: u64,
}

impl ProviderRuntimeConfig {
	pub const DEFAULT_TIMEOUT_MS: u64 = 3_000;
}

impl From<&ProviderConfig> for ProviderRuntimeConfig {
	fn from(config: &ProviderConfig) -> Self {
		Self {
			provider_id: config.id.clone(),
			endpoint: config.endpoint.clone(),
			mode: config.mode,
			api_key: config.api_key.clone(),
			headers: config.headers.clone(),
			timeout_ms: config.timeout_ms.unwrap_or(Self::DEFAULT_TIMEOUT_MS),
		}
	}
}

/// Everything an adapter needs to place an order for a previously quoted cart
#[derive(Debug, Clone)]
pub struct ConfirmationContext {
	/// Routing decision this confirmation belongs to
	pub decision_id: String,

	/// Provider being asked to confirm
	pub provider_id: String,

	/// The cart bound to the decision
	pub cart: Cart,

	/// The quote this provider produced for the cart
	pub quote: Quote,

	/// Caller-supplied payment handle, passed through opaquely
	pub payment_handle: String,

	/// Caller identity for the provider's records
	pub user_id: String,
}

/// Result of a successful order confirmation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderOrder {
	/// Provider-assigned order identifier
	pub order_id: String,

	#[serde(skip_serializing_if = "Option::is_none")]
	pub tracking_url: Option<String>,

	#[serde(skip_serializing_if = "Option::is_none")]
	pub estimated_delivery: Option<DateTime<Utc>>,
}

/// Core trait for provider adapter implementations
///
/// One implementation per provider backend family. In mock mode every method
/// must be a deterministic pure function of its inputs so provider comparison
/// tests are reproducible.
#[async_trait]
pub trait ProviderAdapter: Send + Sync + Debug {
	/// Stable adapter identifier, matched against `ProviderConfig::adapter_id`
	fn adapter_id(&self) -> &str;

	/// Human-readable adapter name
	fn name(&self) -> &str;

	/// Produce a quote for the cart.
	///
	/// Failures surface as a typed [`AdapterError`] carrying a classification
	/// hint; transport-level errors never cross this boundary raw.
	async fn get_quote(&self, cart: &Cart, config: &ProviderRuntimeConfig)
		-> AdapterResult<Quote>;

	/// Cheap liveness probe against the provider backend
	async fn health_check(&self, config: &ProviderRuntimeConfig) -> AdapterResult<bool>;

	/// Place the order described by the confirmation context
	async fn confirm_order(
		&self,
		context: &ConfirmationContext,
		config: &ProviderRuntimeConfig,
	) -> AdapterResult<ProviderOrder>;
}
