use axum::{extract::State, http::StatusCode, response::Json};
use tracing::info;

use crate::handlers::common::ErrorResponse;
use crate::state::AppState;
use grocer_service::RoutingError;
use grocer_types::{RoutingRequest, RoutingResponse};

/// Route a cart to its best provider
#[cfg_attr(feature = "openapi", utoipa::path(
	post,
	path = "/api/v1/routes",
	request_body = RoutingRequest,
	responses(
		(status = 200, description = "Routing decision produced", body = RoutingResponse),
		(status = 400, description = "Invalid cart", body = ErrorResponse),
		(status = 503, description = "No providers available", body = ErrorResponse)
	),
	tag = "routes"
))]
pub async fn post_routes(
	State(state): State<AppState>,
	Json(request): Json<RoutingRequest>,
) -> Result<Json<RoutingResponse>, (StatusCode, Json<ErrorResponse>)> {
	info!(
		"Received routing request with {} item(s), preference {:?}",
		request.items.len(),
		request.preference
	);

	let decision = state.routing_service.route(&request).await.map_err(|e| {
		let (status, code) = match &e {
			RoutingError::Validation(_) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR"),
			RoutingError::NoProvidersAvailable => {
				(StatusCode::SERVICE_UNAVAILABLE, "NO_PROVIDERS_AVAILABLE")
			},
			RoutingError::Storage(_) => (StatusCode::INTERNAL_SERVER_ERROR, "STORAGE_ERROR"),
		};
		(status, Json(ErrorResponse::new(code, e.to_string())))
	})?;

	info!(
		"Routed cart to provider {} with {} alternative(s)",
		decision.selected.provider_id,
		decision.alternatives.len()
	);

	Ok(Json(RoutingResponse::from(&decision)))
}
