//! Grocer Types
//!
//! Shared models and traits for the grocer routing engine.
//! This crate contains all domain models organized by business entity.

pub mod adapters;
pub mod carts;
pub mod confirmations;
pub mod outcomes;
pub mod providers;
pub mod quotes;
pub mod routing;
pub mod scoring;
pub mod storage;

// Re-export chrono and serde_json for convenience
pub use chrono;
pub use serde_json;

// Re-export commonly used types for convenience
pub use carts::{Cart, CartItem, CartValidationError, OptimizationPreference, ShippingAddress};

pub use providers::{
	ProviderConfig, ProviderError, ProviderMode, ProviderResult, ProviderValidationError,
	ProviderValidationResult,
};

pub use quotes::{
	AvailabilityStatus, ItemAvailability, Quote, QuoteValidationError, QuoteValidationResult,
};

pub use scoring::{ScoreBreakdown, ScoringWeights, WeightTable};

pub use routing::{
	AlternativeQuote, ConfirmationToken, ProviderOverride, RankedQuote, RoutingDecision,
	RoutingRequest, RoutingResponse,
};

pub use confirmations::{
	AttemptOutcome, ConfirmAttempt, ConfirmationError, ConfirmationRequest, ConfirmationResponse,
	ConfirmationResult, ConfirmationState,
};

pub use outcomes::{OrderOutcome, ProviderReliability};

pub use adapters::{
	AdapterError, AdapterResult, ConfirmationContext, ErrorClass, ProviderAdapter, ProviderOrder,
	ProviderRuntimeConfig,
};

pub use storage::{
	ClaimOutcome, DecisionStorage, OutcomeStorage, Storage, StorageError, StorageResult,
	StorageStats,
};
