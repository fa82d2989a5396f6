//! Mock adapters for examples and testing
//!
//! A small deterministic adapter with an injectable fault strategy. Fault
//! injection lives only in this test double; the production adapters never
//! embed failure simulation.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{Duration, Utc};
use uuid::Uuid;

use grocer_types::{
	AdapterError, AdapterResult, Cart, ConfirmationContext, ItemAvailability, ProviderAdapter,
	ProviderConfig, ProviderOrder, ProviderRuntimeConfig, Quote,
};

/// Injectable failure behavior for [`MockPantryAdapter`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FaultInjection {
	/// Quote and confirm both succeed
	#[default]
	None,
	/// Quoting fails with `ProviderUnavailable`
	QuoteUnavailable,
	/// Confirmation fails with `ProviderUnavailable` (retryable)
	ConfirmUnavailable,
	/// Confirmation fails with `PaymentDeclined` (non-retryable)
	ConfirmPaymentDeclined,
	/// Health check reports unhealthy
	Unhealthy,
}

/// Deterministic pantry adapter: flat unit price, waivable fee, fixed tax.
///
/// Pricing is intentionally simpler than the production mock catalogs so
/// test expectations can be computed by hand.
#[derive(Debug)]
pub struct MockPantryAdapter {
	id: String,
	unit_price_minor: i64,
	fee_minor: i64,
	fulfillment_minutes: u32,
	fault: FaultInjection,
	confirm_calls: AtomicUsize,
}

impl MockPantryAdapter {
	pub fn new(id: impl Into<String>) -> Self {
		Self {
			id: id.into(),
			unit_price_minor: 325,
			fee_minor: 250,
			fulfillment_minutes: 60,
			fault: FaultInjection::None,
			confirm_calls: AtomicUsize::new(0),
		}
	}

	pub fn with_unit_price(mut self, unit_price_minor: i64) -> Self {
		self.unit_price_minor = unit_price_minor;
		self
	}

	pub fn with_fee(mut self, fee_minor: i64) -> Self {
		self.fee_minor = fee_minor;
		self
	}

	pub fn with_fulfillment_minutes(mut self, minutes: u32) -> Self {
		self.fulfillment_minutes = minutes;
		self
	}

	pub fn with_fault(mut self, fault: FaultInjection) -> Self {
		self.fault = fault;
		self
	}

	/// Number of confirm calls this adapter has served
	pub fn confirm_calls(&self) -> usize {
		self.confirm_calls.load(Ordering::SeqCst)
	}
}

#[async_trait]
impl ProviderAdapter for MockPantryAdapter {
	fn adapter_id(&self) -> &str {
		&self.id
	}

	fn name(&self) -> &str {
		"Mock Pantry"
	}

	async fn get_quote(&self, cart: &Cart, config: &ProviderRuntimeConfig) -> AdapterResult<Quote> {
		if self.fault == FaultInjection::QuoteUnavailable {
			return Err(AdapterError::ProviderUnavailable {
				provider_id: config.provider_id.clone(),
			});
		}

		let availability: Vec<ItemAvailability> = cart
			.items
			.iter()
			.map(|item| ItemAvailability::found(item.id.clone(), self.unit_price_minor))
			.collect();

		let subtotal: i64 = cart
			.items
			.iter()
			.map(|item| self.unit_price_minor * item.quantity as i64)
			.sum();
		let fees = if subtotal >= 3_000 { 0 } else { self.fee_minor };
		let tax = (subtotal as f64 * 0.08).round() as i64;

		Ok(Quote::new(config.provider_id.clone(), subtotal, fees, tax, "USD")
			.with_item_availability(availability)
			.with_fulfillment_minutes(self.fulfillment_minutes))
	}

	async fn health_check(&self, _config: &ProviderRuntimeConfig) -> AdapterResult<bool> {
		Ok(self.fault != FaultInjection::Unhealthy)
	}

	async fn confirm_order(
		&self,
		context: &ConfirmationContext,
		config: &ProviderRuntimeConfig,
	) -> AdapterResult<ProviderOrder> {
		self.confirm_calls.fetch_add(1, Ordering::SeqCst);

		match self.fault {
			FaultInjection::ConfirmUnavailable => Err(AdapterError::ProviderUnavailable {
				provider_id: config.provider_id.clone(),
			}),
			FaultInjection::ConfirmPaymentDeclined => Err(AdapterError::PaymentDeclined {
				reason: "mock decline".to_string(),
			}),
			_ => Ok(ProviderOrder {
				order_id: format!("pantry_{}", Uuid::new_v4().simple()),
				tracking_url: None,
				estimated_delivery: Some(
					Utc::now() + Duration::minutes(context.quote.fulfillment_minutes as i64),
				),
			}),
		}
	}
}

/// Provider config bound to a mock pantry adapter id
pub fn mock_provider(id: impl Into<String>, adapter_id: impl Into<String>) -> ProviderConfig {
	let id = id.into();
	ProviderConfig::new(id.clone(), adapter_id, "http://localhost:0")
		.with_name(format!("Mock {id}"))
}

/// Convenience pair: an adapter plus a provider wired to it
pub fn mock_pair(id: &str) -> (Arc<MockPantryAdapter>, ProviderConfig) {
	let adapter_id = format!("{id}-adapter");
	let adapter = Arc::new(MockPantryAdapter::new(adapter_id.clone()));
	let provider = mock_provider(id, adapter_id);
	(adapter, provider)
}
