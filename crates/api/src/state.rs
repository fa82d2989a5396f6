use std::sync::Arc;

use grocer_service::{ConfirmationOrchestrator, ProviderRegistry, RoutingService};
use grocer_storage::Storage;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
	pub routing_service: Arc<RoutingService>,
	pub confirmation_service: Arc<ConfirmationOrchestrator>,
	pub registry: Arc<ProviderRegistry>,
	pub storage: Arc<dyn Storage>,
}
