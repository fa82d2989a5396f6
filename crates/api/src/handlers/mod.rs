//! HTTP request handlers

pub mod common;
pub mod confirmations;
pub mod health;
pub mod providers;
pub mod routes;

pub use common::ErrorResponse;
pub use confirmations::post_confirmations;
pub use health::health;
pub use providers::{get_provider_by_id, get_providers};
pub use routes::post_routes;
