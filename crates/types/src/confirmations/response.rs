//! Confirmation response model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[cfg(feature = "openapi")]
use utoipa::ToSchema;

use super::ConfirmationResult;

/// Wire response for a confirmation request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct ConfirmationResponse {
	pub success: bool,

	#[serde(skip_serializing_if = "Option::is_none")]
	pub order_id: Option<String>,

	#[serde(skip_serializing_if = "Option::is_none")]
	pub tracking_url: Option<String>,

	#[serde(skip_serializing_if = "Option::is_none")]
	pub estimated_delivery: Option<DateTime<Utc>>,

	/// Provider the order was actually placed with
	#[serde(skip_serializing_if = "Option::is_none")]
	pub provider_id: Option<String>,

	pub failover_attempted: bool,

	#[serde(skip_serializing_if = "Option::is_none")]
	pub failover_from: Option<String>,

	/// Human-readable status message
	pub message: String,
}

impl From<&ConfirmationResult> for ConfirmationResponse {
	fn from(result: &ConfirmationResult) -> Self {
		Self {
			success: result.succeeded(),
			order_id: result.order.as_ref().map(|o| o.order_id.clone()),
			tracking_url: result.order.as_ref().and_then(|o| o.tracking_url.clone()),
			estimated_delivery: result.order.as_ref().and_then(|o| o.estimated_delivery),
			provider_id: result.provider_id.clone(),
			failover_attempted: result.failover_attempted,
			failover_from: result.failover_from.clone(),
			message: result.message.clone(),
		}
	}
}
