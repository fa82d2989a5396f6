//! Cart domain model
//!
//! A cart is supplied by the calling application per routing request and is
//! read-only inside the engine.

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[cfg(feature = "openapi")]
use utoipa::ToSchema;

/// Result type for cart validation
pub type CartValidationResult<T> = Result<T, CartValidationError>;

/// A purchase request: the items to fulfill, where to ship them, and how the
/// caller wants the provider choice optimized.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct Cart {
	/// Requested items, in caller order
	pub items: Vec<CartItem>,

	/// Shipping destination for the fulfilled order
	pub shipping_address: ShippingAddress,

	/// How the scoring engine should weight providers for this cart
	#[serde(default)]
	pub preference: OptimizationPreference,
}

/// A single requested item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct CartItem {
	/// Client-assigned item identifier, echoed back in availability results
	pub id: String,

	/// Human-readable item name (also the lookup key for provider catalogs)
	pub name: String,

	/// Requested quantity, must be positive
	pub quantity: u32,

	/// Unit of measure ("each", "lb", "oz", ...)
	pub unit: String,
}

/// Shipping destination
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct ShippingAddress {
	pub line1: String,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub line2: Option<String>,
	pub city: String,
	pub region: String,
	pub postal_code: String,
	pub country: String,
}

/// Optimization preference for provider selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub enum OptimizationPreference {
	/// Overweight the price sub-score
	Price,
	/// Overweight the speed sub-score
	Speed,
	/// Overweight the margin sub-score
	Margin,
	/// Spread weights evenly across all sub-scores
	#[default]
	Balanced,
}

/// Validation errors for incoming carts
#[derive(Debug, Error, PartialEq)]
pub enum CartValidationError {
	#[error("cart has no items")]
	EmptyCart,

	#[error("item '{item_id}' has zero quantity")]
	ZeroQuantity { item_id: String },

	#[error("item '{item_id}' has an empty name")]
	EmptyItemName { item_id: String },

	#[error("missing required address field: {field}")]
	MissingAddressField { field: String },
}

impl Cart {
	pub fn new(items: Vec<CartItem>, shipping_address: ShippingAddress) -> Self {
		Self {
			items,
			shipping_address,
			preference: OptimizationPreference::default(),
		}
	}

	pub fn with_preference(mut self, preference: OptimizationPreference) -> Self {
		self.preference = preference;
		self
	}

	pub fn item_count(&self) -> usize {
		self.items.len()
	}

	/// Validate the cart before any provider is contacted
	pub fn validate(&self) -> CartValidationResult<()> {
		if self.items.is_empty() {
			return Err(CartValidationError::EmptyCart);
		}

		for item in &self.items {
			if item.quantity == 0 {
				return Err(CartValidationError::ZeroQuantity {
					item_id: item.id.clone(),
				});
			}
			if item.name.trim().is_empty() {
				return Err(CartValidationError::EmptyItemName {
					item_id: item.id.clone(),
				});
			}
		}

		self.shipping_address.validate()
	}
}

impl CartItem {
	pub fn new(id: impl Into<String>, name: impl Into<String>, quantity: u32) -> Self {
		Self {
			id: id.into(),
			name: name.into(),
			quantity,
			unit: "each".to_string(),
		}
	}

	pub fn with_unit(mut self, unit: impl Into<String>) -> Self {
		self.unit = unit.into();
		self
	}
}

impl ShippingAddress {
	fn validate(&self) -> CartValidationResult<()> {
		let required = [
			("line1", &self.line1),
			("city", &self.city),
			("postalCode", &self.postal_code),
			("country", &self.country),
		];

		for (field, value) in required {
			if value.trim().is_empty() {
				return Err(CartValidationError::MissingAddressField {
					field: field.to_string(),
				});
			}
		}

		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn test_address() -> ShippingAddress {
		ShippingAddress {
			line1: "100 Main St".to_string(),
			line2: None,
			city: "Springfield".to_string(),
			region: "IL".to_string(),
			postal_code: "62704".to_string(),
			country: "US".to_string(),
		}
	}

	#[test]
	fn test_valid_cart() {
		let cart = Cart::new(
			vec![CartItem::new("item-1", "Whole Milk", 2)],
			test_address(),
		);

		assert!(cart.validate().is_ok());
		assert_eq!(cart.item_count(), 1);
		assert_eq!(cart.preference, OptimizationPreference::Balanced);
	}

	#[test]
	fn test_empty_cart_rejected() {
		let cart = Cart::new(vec![], test_address());
		assert_eq!(cart.validate(), Err(CartValidationError::EmptyCart));
	}

	#[test]
	fn test_zero_quantity_rejected() {
		let cart = Cart::new(vec![CartItem::new("item-1", "Eggs", 0)], test_address());

		assert_eq!(
			cart.validate(),
			Err(CartValidationError::ZeroQuantity {
				item_id: "item-1".to_string()
			})
		);
	}

	#[test]
	fn test_missing_address_field_rejected() {
		let mut address = test_address();
		address.postal_code = "".to_string();
		let cart = Cart::new(vec![CartItem::new("item-1", "Eggs", 1)], address);

		assert_eq!(
			cart.validate(),
			Err(CartValidationError::MissingAddressField {
				field: "postalCode".to_string()
			})
		);
	}

	#[test]
	fn test_preference_serde_roundtrip() {
		let json = serde_json::to_string(&OptimizationPreference::Price).unwrap();
		assert_eq!(json, "\"price\"");

		let parsed: OptimizationPreference = serde_json::from_str("\"balanced\"").unwrap();
		assert_eq!(parsed, OptimizationPreference::Balanced);
	}
}
