//! Routing response model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[cfg(feature = "openapi")]
use utoipa::ToSchema;

use super::{RankedQuote, RoutingDecision};
use crate::quotes::Quote;
use crate::scoring::ScoreBreakdown;

/// Wire response for a routing request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct RoutingResponse {
	/// Selected primary provider
	pub provider_id: String,
	pub provider_name: String,

	pub quote: Quote,

	pub score: ScoreBreakdown,

	/// Remaining candidates, descending by total score
	pub alternatives: Vec<AlternativeQuote>,

	/// Opaque token for the confirmation step
	pub confirmation_token: String,

	pub expires_at: DateTime<Utc>,

	#[serde(skip_serializing_if = "Option::is_none")]
	pub checkout_url: Option<String>,
}

/// One ranked alternative in the routing response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct AlternativeQuote {
	pub provider_id: String,
	pub provider_name: String,
	pub quote: Quote,
	pub score: ScoreBreakdown,
}

impl From<&RankedQuote> for AlternativeQuote {
	fn from(ranked: &RankedQuote) -> Self {
		Self {
			provider_id: ranked.provider_id.clone(),
			provider_name: ranked.provider_name.clone(),
			quote: ranked.quote.clone(),
			score: ranked.score,
		}
	}
}

impl From<&RoutingDecision> for RoutingResponse {
	fn from(decision: &RoutingDecision) -> Self {
		Self {
			provider_id: decision.selected.provider_id.clone(),
			provider_name: decision.selected.provider_name.clone(),
			checkout_url: decision.selected.quote.checkout_url.clone(),
			quote: decision.selected.quote.clone(),
			score: decision.selected.score,
			alternatives: decision.alternatives.iter().map(AlternativeQuote::from).collect(),
			confirmation_token: decision.token.to_string(),
			expires_at: decision.expires_at,
		}
	}
}
