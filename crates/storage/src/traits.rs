//! Storage traits for pluggable storage implementations

// Re-export the storage traits from the types crate
pub use grocer_types::storage::{
	ClaimOutcome, DecisionStorage, OutcomeStorage, Storage, StorageError, StorageResult,
	StorageStats,
};
