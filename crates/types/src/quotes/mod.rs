//! Quote domain model
//!
//! A quote is a priced, availability-checked offer from one provider for one
//! cart. All money is in integer minor-currency units.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[cfg(feature = "openapi")]
use utoipa::ToSchema;

pub mod errors;

pub use errors::{QuoteValidationError, QuoteValidationResult};

/// A priced offer from one provider for one cart
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct Quote {
	/// Unique identifier for the quote
	pub quote_id: String,

	/// ID of the provider that produced this quote
	pub provider_id: String,

	/// Item total in minor units
	pub subtotal_minor: i64,

	/// Delivery and service fees in minor units
	pub fees_minor: i64,

	/// Tax in minor units
	pub tax_minor: i64,

	/// Grand total, always subtotal + fees + tax
	pub total_minor: i64,

	/// ISO 4217 currency code
	pub currency: String,

	/// Per-item availability, one entry per requested cart item
	pub item_availability: Vec<ItemAvailability>,

	/// Estimated fulfillment time in minutes
	pub fulfillment_minutes: u32,

	/// Affiliate/deep-link URL for the provider's checkout, if offered
	#[serde(skip_serializing_if = "Option::is_none")]
	pub checkout_url: Option<String>,

	/// Opaque provider-specific metadata
	#[serde(default, skip_serializing_if = "serde_json::Value::is_null")]
	pub metadata: serde_json::Value,

	/// When the quote was produced
	pub created_at: DateTime<Utc>,
}

/// Availability of one requested item within a quote
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct ItemAvailability {
	/// Client-assigned item id from the cart
	pub item_id: String,

	pub status: AvailabilityStatus,

	/// Replacement product name when status is `Substituted`
	#[serde(skip_serializing_if = "Option::is_none")]
	pub substituted_with: Option<String>,

	/// Unit price in minor units when the item (or substitute) is purchasable
	#[serde(skip_serializing_if = "Option::is_none")]
	pub unit_price_minor: Option<i64>,
}

/// Item availability status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub enum AvailabilityStatus {
	/// Exact item is in stock
	Found,
	/// A comparable replacement was offered
	Substituted,
	/// Neither the item nor a substitute is available
	OutOfStock,
}

impl Quote {
	/// Create a new quote; the total is derived, never supplied
	pub fn new(
		provider_id: impl Into<String>,
		subtotal_minor: i64,
		fees_minor: i64,
		tax_minor: i64,
		currency: impl Into<String>,
	) -> Self {
		Self {
			quote_id: Uuid::new_v4().to_string(),
			provider_id: provider_id.into(),
			subtotal_minor,
			fees_minor,
			tax_minor,
			total_minor: subtotal_minor + fees_minor + tax_minor,
			currency: currency.into(),
			item_availability: Vec::new(),
			fulfillment_minutes: 0,
			checkout_url: None,
			metadata: serde_json::Value::Null,
			created_at: Utc::now(),
		}
	}

	pub fn with_item_availability(mut self, availability: Vec<ItemAvailability>) -> Self {
		self.item_availability = availability;
		self
	}

	pub fn with_fulfillment_minutes(mut self, minutes: u32) -> Self {
		self.fulfillment_minutes = minutes;
		self
	}

	pub fn with_checkout_url(mut self, url: impl Into<String>) -> Self {
		self.checkout_url = Some(url.into());
		self
	}

	pub fn with_metadata(mut self, metadata: serde_json::Value) -> Self {
		self.metadata = metadata;
		self
	}

	/// Fraction of requested items marked `Found`, in 0.0..=1.0
	pub fn found_fraction(&self) -> f64 {
		if self.item_availability.is_empty() {
			return 0.0;
		}

		let found = self
			.item_availability
			.iter()
			.filter(|a| a.status == AvailabilityStatus::Found)
			.count();

		found as f64 / self.item_availability.len() as f64
	}

	/// Enforce quote invariants against the cart that produced it.
	///
	/// Called at the adapter boundary so a malformed upstream response never
	/// reaches scoring.
	pub fn validate(&self, cart_item_count: usize) -> QuoteValidationResult<()> {
		if self.provider_id.is_empty() {
			return Err(QuoteValidationError::EmptyProviderId);
		}

		for (field, value) in [
			("subtotalMinor", self.subtotal_minor),
			("feesMinor", self.fees_minor),
			("taxMinor", self.tax_minor),
		] {
			if value < 0 {
				return Err(QuoteValidationError::NegativeAmount {
					field: field.to_string(),
					value,
				});
			}
		}

		let expected_total = self.subtotal_minor + self.fees_minor + self.tax_minor;
		if self.total_minor != expected_total {
			return Err(QuoteValidationError::TotalMismatch {
				expected: expected_total,
				actual: self.total_minor,
			});
		}

		if self.item_availability.len() != cart_item_count {
			return Err(QuoteValidationError::AvailabilityLengthMismatch {
				expected: cart_item_count,
				actual: self.item_availability.len(),
			});
		}

		Ok(())
	}
}

impl ItemAvailability {
	pub fn found(item_id: impl Into<String>, unit_price_minor: i64) -> Self {
		Self {
			item_id: item_id.into(),
			status: AvailabilityStatus::Found,
			substituted_with: None,
			unit_price_minor: Some(unit_price_minor),
		}
	}

	pub fn substituted(
		item_id: impl Into<String>,
		replacement: impl Into<String>,
		unit_price_minor: i64,
	) -> Self {
		Self {
			item_id: item_id.into(),
			status: AvailabilityStatus::Substituted,
			substituted_with: Some(replacement.into()),
			unit_price_minor: Some(unit_price_minor),
		}
	}

	pub fn out_of_stock(item_id: impl Into<String>) -> Self {
		Self {
			item_id: item_id.into(),
			status: AvailabilityStatus::OutOfStock,
			substituted_with: None,
			unit_price_minor: None,
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn test_quote() -> Quote {
		Quote::new("freshmart", 1099, 0, 88, "USD").with_item_availability(vec![
			ItemAvailability::found("item-1", 1099),
		])
	}

	#[test]
	fn test_total_is_derived() {
		let quote = test_quote();
		assert_eq!(quote.total_minor, 1187);
		assert!(quote.validate(1).is_ok());
	}

	#[test]
	fn test_total_mismatch_rejected() {
		let mut quote = test_quote();
		quote.total_minor = 9999;

		assert_eq!(
			quote.validate(1),
			Err(QuoteValidationError::TotalMismatch {
				expected: 1187,
				actual: 9999
			})
		);
	}

	#[test]
	fn test_availability_length_must_match_cart() {
		let quote = test_quote();
		assert_eq!(
			quote.validate(3),
			Err(QuoteValidationError::AvailabilityLengthMismatch {
				expected: 3,
				actual: 1
			})
		);
	}

	#[test]
	fn test_negative_amounts_rejected() {
		let mut quote = test_quote();
		quote.fees_minor = -50;
		quote.total_minor = quote.subtotal_minor + quote.fees_minor + quote.tax_minor;

		assert!(matches!(
			quote.validate(1),
			Err(QuoteValidationError::NegativeAmount { .. })
		));
	}

	#[test]
	fn test_found_fraction() {
		let quote = Quote::new("freshmart", 3000, 0, 0, "USD").with_item_availability(vec![
			ItemAvailability::found("a", 1000),
			ItemAvailability::substituted("b", "Store Brand Oats", 900),
			ItemAvailability::out_of_stock("c"),
		]);

		assert!((quote.found_fraction() - 1.0 / 3.0).abs() < 1e-9);
	}

	#[test]
	fn test_found_fraction_empty_is_zero() {
		let quote = Quote::new("freshmart", 0, 0, 0, "USD");
		assert_eq!(quote.found_fraction(), 0.0);
	}
}
