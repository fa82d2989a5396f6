//! Grocer Router Library
//!
//! A provider routing and failover engine for grocery fulfillment: parallel
//! quote collection, deterministic weighted scoring, order confirmation with
//! single-hop failover, and outcome recording that feeds reliability back
//! into future routing decisions.

use std::net::SocketAddr;
use std::sync::Arc;

use chrono::Duration;
use tracing::info;

// Core domain types - the most commonly used types
pub use grocer_types::{
	chrono,
	// External dependencies for convenience
	serde_json,
	AdapterError,
	AlternativeQuote,
	Cart,
	CartItem,
	ConfirmationRequest,
	ConfirmationResponse,
	ConfirmationResult,
	ConfirmationState,
	ConfirmationToken,
	ErrorClass,
	ItemAvailability,
	OptimizationPreference,
	OrderOutcome,
	// Primary domain entities
	ProviderAdapter,
	ProviderConfig,
	ProviderMode,
	ProviderOverride,
	Quote,
	RoutingDecision,
	RoutingRequest,
	RoutingResponse,
	ScoreBreakdown,
	ShippingAddress,
};

// Service layer
pub use grocer_service::{
	ConfirmationOrchestrator, OutcomeRecorder, ProviderRegistry, QuoteAggregator, RoutingError,
	RoutingService, ScoringEngine, TokenService,
};

// Storage layer
pub use grocer_storage::{MemoryStore, Storage};

// API layer
pub use grocer_api::{create_router, AppState};

// Adapters
pub use grocer_adapters::{AdapterRegistry, AdapterResult};

// Config
pub use grocer_config::{load_config, log_service_info, log_startup_complete, Settings};

// Module aliases for direct access to the underlying crates
pub mod types {
	pub use grocer_types::*;
}

pub mod storage {
	pub use grocer_storage::*;
}

pub mod config {
	pub use grocer_config::*;
}

pub mod adapters {
	pub use grocer_adapters::*;
}

pub mod api {
	pub use grocer_api::*;
}

pub mod service {
	pub use grocer_service::*;
}

pub mod mocks;

// Re-export external dependencies for adapter implementors
pub use async_trait;
pub use reqwest;

/// Builder pattern for configuring the routing engine
pub struct EngineBuilder<S = MemoryStore>
where
	S: Storage + Clone + 'static,
{
	settings: Option<Settings>,
	storage: S,
	adapter_registry: Option<AdapterRegistry>,
	providers: Vec<ProviderConfig>,
}

impl EngineBuilder<MemoryStore> {
	/// Create a new engine builder with default memory storage
	pub fn new() -> Self {
		Self::with_storage(MemoryStore::new())
	}
}

impl Default for EngineBuilder<MemoryStore> {
	fn default() -> Self {
		Self::new()
	}
}

impl<S> EngineBuilder<S>
where
	S: Storage + Clone + 'static,
{
	/// Create a new engine builder with the provided storage
	pub fn with_storage(storage: S) -> Self {
		Self {
			settings: None,
			storage,
			adapter_registry: None,
			providers: Vec::new(),
		}
	}

	/// Set custom settings
	pub fn with_settings(mut self, settings: Settings) -> Self {
		self.settings = Some(settings);
		self
	}

	/// Add a provider to the engine
	pub fn with_provider(mut self, provider: ProviderConfig) -> Self {
		self.providers.push(provider);
		self
	}

	/// Register a custom adapter (uses the adapter's own ID).
	/// Panics on duplicate registration; that is a fatal startup
	/// configuration error.
	pub fn with_adapter(mut self, adapter: Arc<dyn ProviderAdapter>) -> Self {
		let mut registry = self
			.adapter_registry
			.unwrap_or_else(AdapterRegistry::with_defaults);
		registry
			.register(adapter)
			.expect("Failed to register adapter during startup - this is a fatal configuration error");
		self.adapter_registry = Some(registry);
		self
	}

	/// Get the current settings
	pub fn settings(&self) -> Option<&Settings> {
		self.settings.as_ref()
	}

	/// Start the engine and return the configured router with state
	pub async fn start(self) -> Result<(axum::Router, AppState), Box<dyn std::error::Error>> {
		let settings = self.settings.clone().unwrap_or_default();
		settings.validate()?;

		let token_secret = settings.resolve_token_secret().map_err(|e| {
			format!(
				"Failed to resolve token secret: {e}. Set the TOKEN_SECRET environment variable \
				 with a random string of at least 16 characters."
			)
		})?;

		let adapter_registry = Arc::new(
			self.adapter_registry
				.unwrap_or_else(AdapterRegistry::with_defaults),
		);

		// Providers from settings plus any added through the builder
		let mut provider_configs = settings.provider_configs();
		provider_configs.extend(self.providers.clone());

		let registry = Arc::new(ProviderRegistry::new(provider_configs, adapter_registry)?);
		info!(
			"Engine initialized with {} provider(s), {} enabled",
			registry.len(),
			registry.list_enabled().len()
		);

		let storage_arc: Arc<dyn Storage> = Arc::new(self.storage.clone());
		let recorder = Arc::new(OutcomeRecorder::new(
			Arc::clone(&storage_arc),
			settings.routing.reliability_window,
		));
		let tokens = TokenService::new(&token_secret);

		let routing_service = RoutingService::new(
			Arc::clone(&registry),
			QuoteAggregator::new(
				Arc::clone(&registry),
				settings.timeouts.per_provider_ms,
				settings.timeouts.global_ms,
			),
			ScoringEngine::new(&settings.routing, Arc::clone(&recorder)),
			Arc::clone(&storage_arc),
			tokens.clone(),
			Duration::minutes(settings.security.token_ttl_minutes),
		);

		let confirmation_service = ConfirmationOrchestrator::new(
			Arc::clone(&registry),
			Arc::clone(&storage_arc),
			Arc::clone(&recorder),
			tokens,
		);

		// Storage TTL cleanup and the outcome retry queue run for the life
		// of the process
		storage_arc.start_background_tasks().await?;
		recorder.start_retry_flush();

		let app_state = AppState {
			routing_service: Arc::new(routing_service),
			confirmation_service: Arc::new(confirmation_service),
			registry,
			storage: storage_arc,
		};

		let router = create_router().with_state(app_state.clone());

		Ok((router, app_state))
	}

	/// Initialize tracing with configuration-based settings
	fn init_tracing_from_settings(
		&self,
		settings: &Settings,
	) -> Result<(), Box<dyn std::error::Error>> {
		use grocer_config::LogFormat;

		let log_level = &settings.logging.level;
		let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
			.unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level));

		match settings.logging.format {
			LogFormat::Json => {
				let subscriber = tracing_subscriber::fmt().json().with_env_filter(env_filter);
				if settings.logging.structured {
					subscriber.with_target(true).with_thread_ids(true).init();
				} else {
					subscriber.init();
				}
			},
			LogFormat::Pretty => {
				let subscriber = tracing_subscriber::fmt()
					.pretty()
					.with_env_filter(env_filter);
				if settings.logging.structured {
					subscriber.with_target(true).with_thread_ids(true).init();
				} else {
					subscriber.init();
				}
			},
			LogFormat::Compact => {
				let subscriber = tracing_subscriber::fmt()
					.compact()
					.with_env_filter(env_filter);
				if settings.logging.structured {
					subscriber.with_target(true).with_thread_ids(true).init();
				} else {
					subscriber.init();
				}
			},
		}

		info!(
			"Logging configuration applied: level={}, format={:?}",
			settings.logging.level, settings.logging.format
		);

		Ok(())
	}

	/// Start the complete server with all defaults and setup.
	///
	/// Loads `.env`, loads configuration, initializes tracing, starts
	/// background tasks, binds, and serves.
	pub async fn start_server(mut self) -> Result<(), Box<dyn std::error::Error>> {
		dotenvy::dotenv().ok();

		let using_provided_settings = self.settings.is_some();
		let settings = if using_provided_settings {
			self.settings.take().expect("settings checked above")
		} else {
			load_config().unwrap_or_default()
		};

		self.init_tracing_from_settings(&settings)?;
		log_service_info();

		info!(
			"Using configuration: loaded from {}",
			if using_provided_settings {
				"provided settings"
			} else {
				"config file or defaults"
			}
		);

		let enabled_providers = settings.enabled_providers();
		info!("Enabled providers: {}", enabled_providers.len());
		for (id, provider) in &enabled_providers {
			info!(
				"  - {}: {} via {} ({:?} mode)",
				id, provider.endpoint, provider.adapter_id, provider.mode
			);
		}

		let bind_addr = settings.bind_address();
		let addr: SocketAddr = bind_addr
			.parse()
			.map_err(|e| format!("Invalid bind address '{bind_addr}': {e}"))?;

		if self.settings.is_none() {
			self.settings = Some(settings);
		}

		let (app, _) = self.start().await?;

		let listener = tokio::net::TcpListener::bind(addr).await?;
		log_startup_complete(&bind_addr);
		info!("API endpoints available:");
		info!("  GET  /health");
		info!("  POST /api/v1/routes");
		info!("  POST /api/v1/confirmations");
		info!("  GET  /api/v1/providers");
		info!("  GET  /api/v1/providers/{{id}}");
		if cfg!(feature = "openapi") {
			info!("  GET  /swagger-ui");
			info!("  GET  /api-docs/openapi.json");
		}

		axum::serve(listener, app).await?;

		Ok(())
	}
}
