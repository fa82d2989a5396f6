//! Grocer Service
//!
//! Core routing, scoring, and confirmation services for the grocer engine.

pub mod aggregator;
pub mod confirmation;
pub mod outcomes;
pub mod registry;
pub mod routing;
pub mod scoring;
pub mod token;

pub use aggregator::{AggregationStats, CollectedQuote, QuoteAggregator};
pub use confirmation::ConfirmationOrchestrator;
pub use outcomes::OutcomeRecorder;
pub use registry::ProviderRegistry;
pub use routing::{RoutingError, RoutingService};
pub use scoring::ScoringEngine;
pub use token::TokenService;
