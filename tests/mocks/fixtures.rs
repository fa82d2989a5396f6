//! Test fixtures

use grocer_router::{
	CartItem, OptimizationPreference, RoutingRequest, Settings, ShippingAddress,
};

pub const TOKEN_SECRET: &str = "integration-test-secret";

/// Settings with a fixed token secret and short timeouts for tests
pub fn test_settings() -> Settings {
	let mut settings = Settings::default();
	settings.security.token_secret = Some(TOKEN_SECRET.to_string());
	settings.timeouts.per_provider_ms = 1_000;
	settings.timeouts.global_ms = 2_000;
	settings
}

pub fn shipping_address() -> ShippingAddress {
	ShippingAddress {
		line1: "100 Main St".to_string(),
		line2: None,
		city: "Springfield".to_string(),
		region: "IL".to_string(),
		postal_code: "62704".to_string(),
		country: "US".to_string(),
	}
}

/// One-item cart, the base scenario for provider comparison
pub fn single_item_request(preference: OptimizationPreference) -> RoutingRequest {
	RoutingRequest::new(vec![CartItem::new("item-1", "Whole Milk", 1)], shipping_address())
		.with_preference(preference)
}

/// Larger cart that crosses mock free-fee thresholds
pub fn pantry_request(preference: OptimizationPreference) -> RoutingRequest {
	RoutingRequest::new(
		vec![
			CartItem::new("item-1", "Whole Milk", 2),
			CartItem::new("item-2", "Sourdough Bread", 1),
			CartItem::new("item-3", "Olive Oil", 1),
		],
		shipping_address(),
	)
	.with_preference(preference)
}
