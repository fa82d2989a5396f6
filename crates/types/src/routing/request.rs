//! Routing request model

use serde::{Deserialize, Serialize};

#[cfg(feature = "openapi")]
use utoipa::ToSchema;

use crate::carts::{Cart, CartItem, CartValidationResult, OptimizationPreference, ShippingAddress};

/// A routing request from the calling application
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct RoutingRequest {
	pub items: Vec<CartItem>,

	pub shipping_address: ShippingAddress,

	#[serde(default)]
	pub preference: OptimizationPreference,

	/// Operator/testing overrides applied to the registry snapshot for this
	/// request only
	#[serde(default, skip_serializing_if = "Vec::is_empty")]
	pub provider_overrides: Vec<ProviderOverride>,
}

/// Per-request provider override
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct ProviderOverride {
	pub provider_id: String,

	/// Force-enable or force-disable the provider for this request
	#[serde(skip_serializing_if = "Option::is_none")]
	pub enabled: Option<bool>,

	/// Replace the provider's configured priority for this request
	#[serde(skip_serializing_if = "Option::is_none")]
	pub priority: Option<i32>,
}

impl RoutingRequest {
	pub fn new(items: Vec<CartItem>, shipping_address: ShippingAddress) -> Self {
		Self {
			items,
			shipping_address,
			preference: OptimizationPreference::default(),
			provider_overrides: Vec::new(),
		}
	}

	pub fn with_preference(mut self, preference: OptimizationPreference) -> Self {
		self.preference = preference;
		self
	}

	pub fn with_override(mut self, provider_override: ProviderOverride) -> Self {
		self.provider_overrides.push(provider_override);
		self
	}

	/// Build the read-only cart the engine works with
	pub fn to_cart(&self) -> Cart {
		Cart::new(self.items.clone(), self.shipping_address.clone())
			.with_preference(self.preference)
	}

	pub fn validate(&self) -> CartValidationResult<()> {
		self.to_cart().validate()
	}
}

impl ProviderOverride {
	pub fn disable(provider_id: impl Into<String>) -> Self {
		Self {
			provider_id: provider_id.into(),
			enabled: Some(false),
			priority: None,
		}
	}

	pub fn boost(provider_id: impl Into<String>, priority: i32) -> Self {
		Self {
			provider_id: provider_id.into(),
			enabled: None,
			priority: Some(priority),
		}
	}
}
