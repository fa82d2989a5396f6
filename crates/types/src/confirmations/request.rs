//! Confirmation request model

use serde::{Deserialize, Serialize};

#[cfg(feature = "openapi")]
use utoipa::ToSchema;

/// A confirmation request from the calling application.
///
/// Only the token identifies the decision; alternatives and cart are loaded
/// from the server-side binding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct ConfirmationRequest {
	/// Token from a prior routing response
	pub confirmation_token: String,

	/// Caller identity for the provider's records
	pub user_id: String,

	/// Opaque payment handle passed through to the provider
	pub payment_handle: String,
}

impl ConfirmationRequest {
	pub fn new(
		confirmation_token: impl Into<String>,
		user_id: impl Into<String>,
		payment_handle: impl Into<String>,
	) -> Self {
		Self {
			confirmation_token: confirmation_token.into(),
			user_id: user_id.into(),
			payment_handle: payment_handle.into(),
		}
	}
}
