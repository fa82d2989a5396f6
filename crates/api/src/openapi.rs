//! OpenAPI documentation (enabled with the `openapi` feature)

use utoipa::OpenApi;

use crate::handlers;
use crate::handlers::health::HealthResponse;
use crate::handlers::providers::{ProviderDetailView, ProviderView};
use crate::handlers::ErrorResponse;
use grocer_types::{
	AlternativeQuote, AvailabilityStatus, CartItem, ConfirmationRequest, ConfirmationResponse,
	ItemAvailability, OptimizationPreference, ProviderOverride, Quote, RoutingRequest,
	RoutingResponse, ScoreBreakdown, ShippingAddress,
};

#[derive(OpenApi)]
#[openapi(
	paths(
		handlers::health::health,
		handlers::routes::post_routes,
		handlers::confirmations::post_confirmations,
		handlers::providers::get_providers,
		handlers::providers::get_provider_by_id,
	),
	components(schemas(
		RoutingRequest,
		RoutingResponse,
		AlternativeQuote,
		CartItem,
		ShippingAddress,
		ConfirmationRequest,
		ConfirmationResponse,
		Quote,
		ItemAvailability,
		AvailabilityStatus,
		OptimizationPreference,
		ProviderOverride,
		ScoreBreakdown,
		ProviderView,
		ProviderDetailView,
		HealthResponse,
		ErrorResponse,
	)),
	tags(
		(name = "routes", description = "Cart routing"),
		(name = "confirmations", description = "Order confirmation"),
		(name = "providers", description = "Provider operations"),
		(name = "health", description = "Service health")
	)
)]
pub struct ApiDoc;
