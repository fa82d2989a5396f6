//! Startup logging helpers

use tracing::info;

/// Log service identity and build information at startup
pub fn log_service_info() {
	info!("Starting grocer-router v{}", env!("CARGO_PKG_VERSION"));
}

/// Log that the server is listening
pub fn log_startup_complete(bind_addr: &str) {
	info!("Server listening on http://{}", bind_addr);
}
