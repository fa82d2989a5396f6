//! Grocer Router Server
//!
//! Main entry point for the routing engine server

use grocer_router::EngineBuilder;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
	// Start the complete server with all defaults and setup handled automatically
	EngineBuilder::new().start_server().await
}
