//! Routing decision domain model
//!
//! A routing decision is the selected primary provider plus ranked
//! alternatives for one cart, bound to an opaque confirmation token so a later
//! confirm call does not resupply the cart. The stored binding is
//! authoritative; confirmation never trusts client-supplied alternatives.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub mod request;
pub mod response;

pub use request::{ProviderOverride, RoutingRequest};
pub use response::{AlternativeQuote, RoutingResponse};

use crate::carts::Cart;
use crate::quotes::Quote;
use crate::scoring::ScoreBreakdown;

/// Opaque, time-bounded handle binding a routing decision to a confirm step
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConfirmationToken(String);

impl ConfirmationToken {
	pub fn generate() -> Self {
		Self(format!("tok_{}", Uuid::new_v4().simple()))
	}

	pub fn as_str(&self) -> &str {
		&self.0
	}
}

impl std::fmt::Display for ConfirmationToken {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.write_str(&self.0)
	}
}

impl From<String> for ConfirmationToken {
	fn from(value: String) -> Self {
		Self(value)
	}
}

/// One provider's quote with its score, as ranked by the scoring engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RankedQuote {
	pub provider_id: String,
	pub provider_name: String,
	/// Raw priority from the provider config, kept for deterministic tie-breaks
	pub priority: i32,
	/// Commission rate snapshot at decision time
	pub commission_rate: f64,
	pub quote: Quote,
	pub score: ScoreBreakdown,
}

/// The routing engine's answer for one cart
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoutingDecision {
	pub decision_id: String,

	pub token: ConfirmationToken,

	/// Cart the decision was made for, bound server-side
	pub cart: Cart,

	/// Top-ranked provider
	pub selected: RankedQuote,

	/// Remaining candidates, descending by total score, selected excluded
	pub alternatives: Vec<RankedQuote>,

	pub created_at: DateTime<Utc>,

	/// After this instant the token is unusable
	pub expires_at: DateTime<Utc>,

	/// HMAC-SHA256 over the binding payload, set by the routing service
	#[serde(skip_serializing_if = "Option::is_none")]
	pub integrity_checksum: Option<String>,
}

impl RoutingDecision {
	pub fn new(cart: Cart, selected: RankedQuote, alternatives: Vec<RankedQuote>, ttl: Duration) -> Self {
		let now = Utc::now();
		Self {
			decision_id: Uuid::new_v4().to_string(),
			token: ConfirmationToken::generate(),
			cart,
			selected,
			alternatives,
			created_at: now,
			expires_at: now + ttl,
			integrity_checksum: None,
		}
	}

	pub fn is_expired(&self) -> bool {
		Utc::now() > self.expires_at
	}

	/// Canonical payload for the integrity checksum.
	///
	/// Covers the fields a tampered store could otherwise rewrite to redirect
	/// a confirmation: who was selected, what they quoted, and until when.
	pub fn to_integrity_payload(&self) -> String {
		format!(
			"decision_id={}|token={}|provider_id={}|total_minor={}|expires_at={}",
			self.decision_id,
			self.token,
			self.selected.provider_id,
			self.selected.quote.total_minor,
			self.expires_at.timestamp_millis()
		)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::carts::{CartItem, ShippingAddress};
	use crate::quotes::ItemAvailability;

	fn test_decision() -> RoutingDecision {
		let cart = Cart::new(
			vec![CartItem::new("item-1", "Whole Milk", 1)],
			ShippingAddress {
				line1: "100 Main St".to_string(),
				line2: None,
				city: "Springfield".to_string(),
				region: "IL".to_string(),
				postal_code: "62704".to_string(),
				country: "US".to_string(),
			},
		);

		let quote = Quote::new("freshmart", 1099, 0, 0, "USD")
			.with_item_availability(vec![ItemAvailability::found("item-1", 1099)]);

		let selected = RankedQuote {
			provider_id: "freshmart".to_string(),
			provider_name: "FreshMart".to_string(),
			priority: 5,
			commission_rate: 0.08,
			quote,
			score: ScoreBreakdown {
				price: 100.0,
				speed: 100.0,
				margin: 0.0,
				availability: 100.0,
				reliability: 70.0,
				priority_boost: 10.0,
				total: 84.0,
			},
		};

		RoutingDecision::new(cart, selected, vec![], Duration::minutes(15))
	}

	#[test]
	fn test_token_is_opaque_and_unique() {
		let a = ConfirmationToken::generate();
		let b = ConfirmationToken::generate();

		assert!(a.as_str().starts_with("tok_"));
		assert_ne!(a, b);
	}

	#[test]
	fn test_fresh_decision_is_not_expired() {
		let decision = test_decision();
		assert!(!decision.is_expired());
	}

	#[test]
	fn test_expired_decision() {
		let mut decision = test_decision();
		decision.expires_at = Utc::now() - Duration::minutes(1);
		assert!(decision.is_expired());
	}

	#[test]
	fn test_integrity_payload_is_deterministic() {
		let decision = test_decision();
		assert_eq!(decision.to_integrity_payload(), decision.to_integrity_payload());
		assert!(decision
			.to_integrity_payload()
			.contains("provider_id=freshmart"));
	}
}
