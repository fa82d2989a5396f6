use axum::{extract::State, response::Json};
use grocer_storage::Storage;
use serde::{Deserialize, Serialize};

#[cfg(feature = "openapi")]
use utoipa::ToSchema;

use crate::state::AppState;

/// Health probe response
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct HealthResponse {
	pub status: String,
	pub providers: usize,
	pub storage_healthy: bool,
	pub timestamp: i64,
}

/// GET /health
#[cfg_attr(feature = "openapi", utoipa::path(
	get,
	path = "/health",
	responses((status = 200, description = "Service health", body = HealthResponse)),
	tag = "health"
))]
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
	let storage_healthy = state.storage.health_check().await.unwrap_or(false);

	Json(HealthResponse {
		status: if storage_healthy { "ok" } else { "degraded" }.to_string(),
		providers: state.registry.len(),
		storage_healthy,
		timestamp: chrono::Utc::now().timestamp(),
	})
}
