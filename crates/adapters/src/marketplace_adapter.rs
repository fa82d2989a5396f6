//! Aggregator marketplace adapter
//!
//! Speaks the API of a multi-store marketplace that fulfills carts through
//! its own shopper network. Cheaper catalog prices than the direct retailer
//! family, a flat service fee that is never waived, faster fulfillment, and
//! an affiliate deep link on every quote.

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::debug;
use uuid::Uuid;

use grocer_types::{
	AdapterError, AdapterResult, Cart, ConfirmationContext, ItemAvailability, ProviderAdapter,
	ProviderMode, ProviderOrder, ProviderRuntimeConfig, Quote,
};

use crate::http::{client_for, join_url};
use crate::pricing::{unit_price_minor, FeeSchedule, MockCatalog};

const ADAPTER_ID: &str = "marketplace-v1";

const MOCK_CATALOG: MockCatalog = MockCatalog {
	base_price_minor: 179,
	price_spread_minor: 700,
	fees: FeeSchedule {
		fee_minor: 995,
		free_fee_threshold_minor: None,
		tax_rate: 0.08,
	},
	substitution_modulus: 9,
	stockout_modulus: 17,
};

const MOCK_FULFILLMENT_MINUTES: u32 = 45;

/// Wire models for the marketplace batch-quote endpoint
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct MarketplaceBasketRequest<'a> {
	lines: Vec<MarketplaceLine<'a>>,
	destination_zip: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct MarketplaceLine<'a> {
	query: &'a str,
	count: u32,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MarketplaceBasketResponse {
	basket_total_cents: i64,
	service_fee_cents: i64,
	estimated_tax_cents: i64,
	currency: String,
	lines: Vec<MarketplaceLineResult>,
	delivery_window_minutes: u32,
	deep_link: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MarketplaceLineResult {
	availability: String,
	replacement: Option<String>,
	price_cents: Option<i64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MarketplaceOrderResponse {
	reference: String,
	tracking_link: Option<String>,
	delivery_by: Option<DateTime<Utc>>,
}

/// Adapter for aggregator marketplace integrations
#[derive(Debug, Default)]
pub struct MarketplaceAdapter;

impl MarketplaceAdapter {
	pub fn new() -> Self {
		Self
	}

	fn mock_quote(&self, cart: &Cart, config: &ProviderRuntimeConfig) -> Quote {
		let (subtotal, fees, tax, availability) = MOCK_CATALOG.price_cart(cart);

		// Deterministic affiliate link derived from the cart's first item
		let slug = cart
			.items
			.first()
			.map(|item| {
				unit_price_minor(&item.name, MOCK_CATALOG.base_price_minor, 9_999) as u64
			})
			.unwrap_or_default();

		Quote::new(config.provider_id.clone(), subtotal, fees, tax, "USD")
			.with_item_availability(availability)
			.with_fulfillment_minutes(MOCK_FULFILLMENT_MINUTES)
			.with_checkout_url(format!("https://basket.example/checkout/{slug}"))
			.with_metadata(json!({ "source": "mock", "adapter": ADAPTER_ID }))
	}

	async fn live_quote(
		&self,
		cart: &Cart,
		config: &ProviderRuntimeConfig,
	) -> AdapterResult<Quote> {
		let client = client_for(config)?;
		let url = join_url(&config.endpoint, "v2/baskets/quote")?;

		let body = MarketplaceBasketRequest {
			lines: cart
				.items
				.iter()
				.map(|item| MarketplaceLine {
					query: &item.name,
					count: item.quantity,
				})
				.collect(),
			destination_zip: &cart.shipping_address.postal_code,
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

		let parsed: MarketplaceBasketResponse =
			response
				.json()
				.await
				.map_err(|e| AdapterError::InvalidResponse {
					reason: format!("malformed basket body: {e}"),
				})?;

		if parsed.lines.len() != cart.items.len() {
			return Err(AdapterError::InvalidResponse {
				reason: format!(
					"expected {} line results, got {}",
					cart.items.len(),
					parsed.lines.len()
				),
			});
		}

		let availability = cart
			.items
			.iter()
			.zip(parsed.lines.iter())
			.map(|(item, line)| match line.availability.as_str() {
				"in_stock" => {
					ItemAvailability::found(item.id.clone(), line.price_cents.unwrap_or(0))
				},
				"replaced" => ItemAvailability::substituted(
					item.id.clone(),
					line.replacement.clone().unwrap_or_default(),
					line.price_cents.unwrap_or(0),
				),
				_ => ItemAvailability::out_of_stock(item.id.clone()),
			})
			.collect();

		let mut quote = Quote::new(
			config.provider_id.clone(),
			parsed.basket_total_cents,
			parsed.service_fee_cents,
			parsed.estimated_tax_cents,
			parsed.currency,
		)
		.with_item_availability(availability)
		.with_fulfillment_minutes(parsed.delivery_window_minutes);

		if let Some(link) = parsed.deep_link {
			quote = quote.with_checkout_url(link);
		}

		Ok(quote)
	}
}

#[async_trait]
impl ProviderAdapter for MarketplaceAdapter {
	fn adapter_id(&self) -> &str {
		ADAPTER_ID
	}

	fn name(&self) -> &str {
		"Aggregator Marketplace v1"
	}

	async fn get_quote(
		&self,
		cart: &Cart,
		config: &ProviderRuntimeConfig,
	) -> AdapterResult<Quote> {
		match config.mode {
			ProviderMode::Mock => {
				debug!(
					"Producing mock marketplace quote for provider {}",
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
				let url = join_url(&config.endpoint, "v2/status")?;
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
				order_id: format!("mkt_{}", Uuid::new_v4().simple()),
				tracking_url: Some(format!(
					"https://basket.example/track/{}",
					context.quote.quote_id
				)),
				estimated_delivery: Some(
					Utc::now() + Duration::minutes(context.quote.fulfillment_minutes as i64),
				),
			}),
			ProviderMode::Live => {
				let client = client_for(config)?;
				let url = join_url(&config.endpoint, "v2/baskets/place")?;

				let body = json!({
					"basketRef": context.quote.quote_id,
					"payment": { "handle": context.payment_handle },
					"shopper": context.user_id,
					"dropoff": context.cart.shipping_address,
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

				let parsed: MarketplaceOrderResponse =
					response
						.json()
						.await
						.map_err(|e| AdapterError::InvalidResponse {
							reason: format!("malformed order body: {e}"),
						})?;

				Ok(ProviderOrder {
					order_id: parsed.reference,
					tracking_url: parsed.tracking_link,
					estimated_delivery: parsed.delivery_by,
				})
			},
		}
	}
}

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
