use axum::{extract::State, http::StatusCode, response::Json};
use tracing::info;

use crate::handlers::common::ErrorResponse;
use crate::state::AppState;
use grocer_types::{ConfirmationError, ConfirmationRequest, ConfirmationResponse};

/// Confirm the order bound to a confirmation token
#[cfg_attr(feature = "openapi", utoipa::path(
	post,
	path = "/api/v1/confirmations",
	request_body = ConfirmationRequest,
	responses(
		(status = 200, description = "Confirmation resolved (success or terminal failure)", body = ConfirmationResponse),
		(status = 404, description = "Unknown token", body = ErrorResponse),
		(status = 409, description = "Token already used", body = ErrorResponse),
		(status = 410, description = "Token expired", body = ErrorResponse)
	),
	tag = "confirmations"
))]
pub async fn post_confirmations(
	State(state): State<AppState>,
	Json(request): Json<ConfirmationRequest>,
) -> Result<Json<ConfirmationResponse>, (StatusCode, Json<ErrorResponse>)> {
	info!("Received confirmation request");

	let result = state
		.confirmation_service
		.confirm(&request)
		.await
		.map_err(|e| {
			let (status, code) = match &e {
				ConfirmationError::DecisionNotFound => (StatusCode::NOT_FOUND, "TOKEN_NOT_FOUND"),
				ConfirmationError::TokenExpired => (StatusCode::GONE, "TOKEN_EXPIRED"),
				ConfirmationError::TokenAlreadyUsed => (StatusCode::CONFLICT, "TOKEN_ALREADY_USED"),
				ConfirmationError::IntegrityMismatch => (StatusCode::CONFLICT, "TOKEN_INTEGRITY"),
				ConfirmationError::Storage(_) => {
					(StatusCode::INTERNAL_SERVER_ERROR, "STORAGE_ERROR")
				},
			};
			(status, Json(ErrorResponse::new(code, e.to_string())))
		})?;

	info!(
		"Confirmation resolved: success={}, failover={}",
		result.succeeded(),
		result.failover_attempted
	);

	// Terminal failures are fully resolved results, not transport errors
	Ok(Json(ConfirmationResponse::from(&result)))
}
