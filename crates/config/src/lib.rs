//! Grocer Config
//!
//! Configuration structures and loading for the grocer routing engine.

pub mod loader;
pub mod settings;
pub mod startup_logger;

pub use loader::load_config;
pub use settings::{
	EnvironmentProfile, EnvironmentSettings, LogFormat, LoggingSettings, ProviderSettings,
	RoutingSettings, SecuritySettings, ServerSettings, Settings, TimeoutSettings,
};
pub use startup_logger::{log_service_info, log_startup_complete};
