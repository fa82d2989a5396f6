//! Storage traits for pluggable backends
//!
//! The engine receives `Arc<dyn Storage>` at construction; nothing in the
//! routing or confirmation path touches module-level state, so multiple
//! engines (per test, per tenant) run without cross-contamination.

use async_trait::async_trait;
use thiserror::Error;

use crate::confirmations::ConfirmAttempt;
use crate::outcomes::{OrderOutcome, ProviderReliability};
use crate::routing::RoutingDecision;

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Storage backend errors
#[derive(Debug, Error)]
pub enum StorageError {
	#[error("not found: {key}")]
	NotFound { key: String },

	#[error("conflict: {reason}")]
	Conflict { reason: String },

	#[error("storage backend error: {reason}")]
	Backend { reason: String },
}

/// Result of an atomic token claim
#[derive(Debug, Clone, PartialEq)]
pub enum ClaimOutcome {
	/// Token was live and is now marked used; here is the bound decision
	Claimed(RoutingDecision),
	/// Token was already claimed by a previous confirmation
	AlreadyUsed,
	/// Token exists but its TTL has elapsed
	Expired,
	/// No decision is bound to this token
	NotFound,
}

/// Storage for routing decisions keyed by confirmation token
#[async_trait]
pub trait DecisionStorage: Send + Sync {
	async fn put_decision(&self, decision: RoutingDecision) -> StorageResult<()>;

	async fn get_decision(&self, token: &str) -> StorageResult<Option<RoutingDecision>>;

	/// Atomically claim the token for single use.
	///
	/// Two concurrent confirmations for the same token must never both
	/// observe `Claimed`.
	async fn claim_decision(&self, token: &str) -> StorageResult<ClaimOutcome>;

	/// Drop expired decisions; returns how many were removed
	async fn cleanup_expired(&self) -> StorageResult<usize>;
}

/// Append-only storage for confirmation attempts and order outcomes
#[async_trait]
pub trait OutcomeStorage: Send + Sync {
	async fn append_attempt(&self, attempt: ConfirmAttempt) -> StorageResult<()>;

	async fn append_outcome(&self, outcome: OrderOutcome) -> StorageResult<()>;

	/// Rolling stats over the trailing `window` attempts for one provider
	async fn provider_reliability(
		&self,
		provider_id: &str,
		window: usize,
	) -> StorageResult<ProviderReliability>;

	async fn attempts_for_decision(&self, decision_id: &str) -> StorageResult<Vec<ConfirmAttempt>>;

	async fn outcomes_for_provider(&self, provider_id: &str) -> StorageResult<Vec<OrderOutcome>>;
}

/// Aggregate storage statistics
#[derive(Debug, Clone, PartialEq)]
pub struct StorageStats {
	pub total_decisions: usize,
	pub active_decisions: usize,
	pub total_attempts: usize,
	pub total_outcomes: usize,
}

/// Combined storage interface the engine is built against
#[async_trait]
pub trait Storage: DecisionStorage + OutcomeStorage {
	async fn health_check(&self) -> StorageResult<bool>;

	async fn stats(&self) -> StorageResult<StorageStats>;

	/// Start backend-specific maintenance (TTL cleanup, queue flushing)
	async fn start_background_tasks(&self) -> StorageResult<()>;
}
