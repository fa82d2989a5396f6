//! Direct retailer adapter
//!
//! Speaks the first-party API of a single grocery retailer. Live mode maps
//! the retailer's HTTP surface onto the engine's error taxonomy; mock mode
//! prices deterministically from the cart.

use async_trait::async_trait;
use chrono::{Duration, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::debug;
use uuid::Uuid;

use grocer_types::{
	AdapterError, AdapterResult, Cart, ConfirmationContext, ItemAvailability, ProviderAdapter,
	ProviderMode, ProviderOrder, ProviderRuntimeConfig, Quote,
};

use crate::http::{client_for, join_url};
use crate::pricing::{FeeSchedule, MockCatalog};

const ADAPTER_ID: &str = "retailer-v1";

/// Mock catalog parameters for the retailer family: mid-range prices, a
/// waivable delivery fee, slower store-picked fulfillment.
const MOCK_CATALOG: MockCatalog = MockCatalog {
	base_price_minor: 199,
	price_spread_minor: 800,
	fees: FeeSchedule {
		fee_minor: 499,
		free_fee_threshold_minor: Some(3_500),
		tax_rate: 0.08,
	},
	substitution_modulus: 7,
	stockout_modulus: 13,
};

const MOCK_FULFILLMENT_MINUTES: u32 = 120;

/// Wire model for the retailer's quote endpoint
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct RetailerQuoteRequest<'a> {
	items: Vec<RetailerItem<'a>>,
	postal_code: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct RetailerItem<'a> {
	sku_query: &'a str,
	quantity: u32,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RetailerQuoteResponse {
	subtotal_cents: i64,
	delivery_fee_cents: i64,
	tax_cents: i64,
	currency: String,
	items: Vec<RetailerItemResult>,
	eta_minutes: u32,
	checkout_url: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RetailerItemResult {
	status: String,
	substitute_name: Option<String>,
	unit_price_cents: Option<i64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RetailerOrderResponse {
	order_id: String,
	tracking_url: Option<String>,
	delivery_eta_minutes: Option<i64>,
}

/// Adapter for direct retailer integrations
#[derive(Debug, Default)]
pub struct RetailerAdapter;

impl RetailerAdapter {
	pub fn new() -> Self {
		Self
	}

	fn mock_quote(&self, cart: &Cart, config: &ProviderRuntimeConfig) -> Quote {
		let (subtotal, fees, tax, availability) = MOCK_CATALOG.price_cart(cart);

		Quote::new(config.provider_id.clone(), subtotal, fees, tax, "USD")
			.with_item_availability(availability)
			.with_fulfillment_minutes(MOCK_FULFILLMENT_MINUTES)
			.with_metadata(json!({ "source": "mock", "adapter": ADAPTER_ID }))
	}

	async fn live_quote(
		&self,
		cart: &Cart,
		config: &ProviderRuntimeConfig,
	) -> AdapterResult<Quote> {
		let client = client_for(config)?;
		let url = join_url(&config.endpoint, "v1/quotes")?;

		let body = RetailerQuoteRequest {
			items: cart
				.items
				.iter()
				.map(|item| RetailerItem {
					sku_query: &item.name,
					quantity: item.quantity,
				})
				.collect(),
			postal_code: &cart.shipping_address.postal_code,
		};

		let response = client
			.post(&url)
			.json(&body)
			.send()
			.await
			.map_err(|e| wrap_transport(e, config))?;

		let status = response.status();
		if !status.is_success() {
			let reason = response.text().await.unwrap_or_default();
			return Err(AdapterError::from_http_status(status.as_u16(), reason));
		}

		let parsed: RetailerQuoteResponse =
			response
				.json()
				.await
				.map_err(|e| AdapterError::InvalidResponse {
					reason: format!("malformed quote body: {e}"),
				})?;

		if parsed.items.len() != cart.items.len() {
			return Err(AdapterError::InvalidResponse {
				reason: format!(
					"expected {} item results, got {}",
					cart.items.len(),
					parsed.items.len()
				),
			});
		}

		let availability = cart
			.items
			.iter()
			.zip(parsed.items.iter())
			.map(|(item, result)| match result.status.as_str() {
				"found" => {
					ItemAvailability::found(item.id.clone(), result.unit_price_cents.unwrap_or(0))
				},
				"substituted" => ItemAvailability::substituted(
					item.id.clone(),
					result.substitute_name.clone().unwrap_or_default(),
					result.unit_price_cents.unwrap_or(0),
				),
				_ => ItemAvailability::out_of_stock(item.id.clone()),
			})
			.collect();

		let mut quote = Quote::new(
			config.provider_id.clone(),
			parsed.subtotal_cents,
			parsed.delivery_fee_cents,
			parsed.tax_cents,
			parsed.currency,
		)
		.with_item_availability(availability)
		.with_fulfillment_minutes(parsed.eta_minutes);

		if let Some(url) = parsed.checkout_url {
			quote = quote.with_checkout_url(url);
		}

		Ok(quote)
	}
}

#[async_trait]
impl ProviderAdapter for RetailerAdapter {
	fn adapter_id(&self) -> &str {
		ADAPTER_ID
	}

	fn name(&self) -> &str {
		"Direct Retailer v1"
	}

	async fn get_quote(
		&self,
		cart: &Cart,
		config: &ProviderRuntimeConfig,
	) -> AdapterResult<Quote> {
		match config.mode {
			ProviderMode::Mock => {
				debug!(
					"Producing mock retailer quote for provider {}",
					config.provider_id
				);
				Ok(self.mock_quote(cart, config))
			},
			ProviderMode::Live => self.live_quote(cart, config).await,
		}
	}

	async fn health_check(&self, config: &ProviderRuntimeConfig) -> AdapterResult<bool> {
		match config.mode {
			ProviderMode::Mock => Ok(true),
			ProviderMode::Live => {
				let client = client_for(config)?;
				let url = join_url(&config.endpoint, "v1/health")?;
				let response = client
					.get(&url)
					.send()
					.await
					.map_err(|e| wrap_transport(e, config))?;
				Ok(response.status().is_success())
			},
		}
	}

	async fn confirm_order(
		&self,
		context: &ConfirmationContext,
		config: &ProviderRuntimeConfig,
	) -> AdapterResult<ProviderOrder> {
		match config.mode {
			ProviderMode::Mock => Ok(ProviderOrder {
				order_id: format!("rtl_{}", Uuid::new_v4().simple()),
				tracking_url: None,
				estimated_delivery: Some(
					Utc::now() + Duration::minutes(context.quote.fulfillment_minutes as i64),
				),
			}),
			ProviderMode::Live => {
				let client = client_for(config)?;
				let url = join_url(&config.endpoint, "v1/orders")?;

				let body = json!({
					"quoteRef": context.quote.quote_id,
					"paymentHandle": context.payment_handle,
					"customerRef": context.user_id,
					"shippingAddress": context.cart.shipping_address,
				});

				let response = client
					.post(&url)
					.json(&body)
					.send()
					.await
					.map_err(|e| wrap_transport(e, config))?;

				let status = response.status();
				if !status.is_success() {
					let reason = response.text().await.unwrap_or_default();
					return Err(AdapterError::from_http_status(status.as_u16(), reason));
				}

				let parsed: RetailerOrderResponse =
					response
						.json()
						.await
						.map_err(|e| AdapterError::InvalidResponse {
							reason: format!("malformed order body: {e}"),
						})?;

				Ok(ProviderOrder {
					order_id: parsed.order_id,
					tracking_url: parsed.tracking_url,
					estimated_delivery: parsed
						.delivery_eta_minutes
						.map(|minutes| Utc::now() + Duration::minutes(minutes)),
				})
			},
		}
	}
}

/// Wrap a reqwest transport failure into the taxonomy
fn wrap_transport(error: reqwest::Error, config: &ProviderRuntimeConfig) -> AdapterError {
	if error.is_timeout() {
		AdapterError::Timeout {
			timeout_ms: config.timeout_ms,
		}
	} else if error.is_connect() {
		AdapterError::ProviderUnavailable {
			provider_id: config.provider_id.clone(),
		}
	} else {
		AdapterError::Network(error.to_string())
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use grocer_types::{CartItem, ProviderConfig, ShippingAddress};

	fn mock_config() -> ProviderRuntimeConfig {
		ProviderRuntimeConfig::from(&ProviderConfig::new(
			"freshmart",
			ADAPTER_ID,
			"https://api.freshmart.test",
		))
	}

	fn test_cart() -> Cart {
		Cart::new(
			vec![
				CartItem::new("a", "Whole Milk", 2),
				CartItem::new("b", "Sourdough Bread", 1),
			],
			ShippingAddress {
				line1: "100 Main St".to_string(),
				line2: None,
				city: "Springfield".to_string(),
				region: "IL".to_string(),
				postal_code: "62704".to_string(),
				country: "US".to_string(),
			},
		)
	}

	#[tokio::test]
	async fn test_mock_quote_is_deterministic() {
		let adapter = RetailerAdapter::new();
		let cart = test_cart();
		let config = mock_config();

		let first = adapter.get_quote(&cart, &config).await.unwrap();
		let second = adapter.get_quote(&cart, &config).await.unwrap();

		assert_eq!(first.subtotal_minor, second.subtotal_minor);
		assert_eq!(first.total_minor, second.total_minor);
		assert_eq!(first.item_availability, second.item_availability);
	}

	#[tokio::test]
	async fn test_mock_quote_satisfies_invariants() {
		let adapter = RetailerAdapter::new();
		let cart = test_cart();

		let quote = adapter.get_quote(&cart, &mock_config()).await.unwrap();
		assert!(quote.validate(cart.item_count()).is_ok());
		assert_eq!(quote.provider_id, "freshmart");
	}

	#[tokio::test]
	async fn test_mock_health_check() {
		let adapter = RetailerAdapter::new();
		assert!(adapter.health_check(&mock_config()).await.unwrap());
	}

	#[tokio::test]
	async fn test_mock_confirm_returns_order() {
		let adapter = RetailerAdapter::new();
		let cart = test_cart();
		let config = mock_config();
		let quote = adapter.get_quote(&cart, &config).await.unwrap();

		let context = ConfirmationContext {
			decision_id: "dec-1".to_string(),
			provider_id: "freshmart".to_string(),
			cart,
			quote,
			payment_handle: "pay_123".to_string(),
			user_id: "user-1".to_string(),
		};

		let order = adapter.confirm_order(&context, &config).await.unwrap();
		assert!(order.order_id.starts_with("rtl_"));
		assert!(order.estimated_delivery.is_some());
	}
}
