//! Grocer API
//!
//! HTTP layer for the grocer routing engine.

pub mod handlers;
#[cfg(feature = "openapi")]
pub mod openapi;
pub mod router;
pub mod security;
pub mod state;

pub use router::create_router;
pub use state::AppState;
