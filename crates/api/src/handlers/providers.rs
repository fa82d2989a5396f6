use axum::{
	extract::{Path, State},
	http::StatusCode,
	response::Json,
};
use serde::{Deserialize, Serialize};

#[cfg(feature = "openapi")]
use utoipa::ToSchema;

use crate::handlers::common::ErrorResponse;
use crate::state::AppState;
use grocer_types::{ProviderConfig, ProviderMode, ProviderRuntimeConfig};

/// Operational view of one provider; credentials are never exposed
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct ProviderView {
	pub id: String,
	pub name: String,
	pub adapter_id: String,
	pub enabled: bool,
	pub priority: i32,
	pub commission_rate: f64,
	pub mode: ProviderMode,
}

/// Provider detail including a live health probe
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct ProviderDetailView {
	#[serde(flatten)]
	pub provider: ProviderView,
	pub healthy: bool,
}

impl From<&ProviderConfig> for ProviderView {
	fn from(config: &ProviderConfig) -> Self {
		Self {
			id: config.id.clone(),
			name: config.name.clone(),
			adapter_id: config.adapter_id.clone(),
			enabled: config.enabled,
			priority: config.priority,
			commission_rate: config.commission_rate,
			mode: config.mode,
		}
	}
}

/// List all configured providers
#[cfg_attr(feature = "openapi", utoipa::path(
	get,
	path = "/api/v1/providers",
	responses(
		(status = 200, description = "Configured providers", body = [ProviderView])
	),
	tag = "providers"
))]
pub async fn get_providers(State(state): State<AppState>) -> Json<Vec<ProviderView>> {
	let providers = state
		.registry
		.list_all()
		.iter()
		.map(ProviderView::from)
		.collect();

	Json(providers)
}

/// Fetch one provider with a live health check
#[cfg_attr(feature = "openapi", utoipa::path(
	get,
	path = "/api/v1/providers/{id}",
	params(("id" = String, Path, description = "Provider id")),
	responses(
		(status = 200, description = "Provider detail", body = ProviderDetailView),
		(status = 404, description = "Unknown provider", body = ErrorResponse)
	),
	tag = "providers"
))]
pub async fn get_provider_by_id(
	State(state): State<AppState>,
	Path(id): Path<String>,
) -> Result<Json<ProviderDetailView>, (StatusCode, Json<ErrorResponse>)> {
	let Some(config) = state.registry.get(&id) else {
		return Err((
			StatusCode::NOT_FOUND,
			Json(ErrorResponse::new(
				"PROVIDER_NOT_FOUND",
				format!("no provider with id '{id}'"),
			)),
		));
	};

	let healthy = match state.registry.adapter_for(&config) {
		Ok(adapter) => {
			let runtime = ProviderRuntimeConfig::from(&config);
			adapter.health_check(&runtime).await.unwrap_or(false)
		},
		Err(_) => false,
	};

	Ok(Json(ProviderDetailView {
		provider: ProviderView::from(&config),
		healthy,
	}))
}
