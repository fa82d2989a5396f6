//! Test server for integration tests

use grocer_router::{AppState, EngineBuilder, MemoryStore};
use tokio::task::JoinHandle;

/// Running test server plus the state behind it, for storage assertions
pub struct TestServer {
	pub base_url: String,
	pub state: AppState,
	pub handle: JoinHandle<()>,
}

impl TestServer {
	/// Spawn the engine behind an ephemeral port
	pub async fn spawn(
		builder: EngineBuilder<MemoryStore>,
	) -> Result<Self, Box<dyn std::error::Error>> {
		let (router, state) = builder.start().await?;

		let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
		let addr = listener.local_addr()?;

		let handle = tokio::spawn(async move {
			axum::serve(listener, router)
				.await
				.expect("test server crashed");
		});

		Ok(Self {
			base_url: format!("http://{addr}"),
			state,
			handle,
		})
	}

	pub fn url(&self, path: &str) -> String {
		format!("{}{}", self.base_url, path)
	}
}

impl Drop for TestServer {
	fn drop(&mut self) {
		self.handle.abort();
	}
}
