//! In-memory storage implementation using DashMap with TTL support

use crate::traits::{
	ClaimOutcome, DecisionStorage, OutcomeStorage, Storage, StorageResult, StorageStats,
};
use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;
use grocer_types::{ConfirmAttempt, OrderOutcome, ProviderReliability, RoutingDecision};
use std::sync::Arc;
use tokio::time::{interval, Duration};
use tracing::{debug, info};

/// A routing decision plus its single-use claim flag
#[derive(Debug, Clone)]
struct StoredDecision {
	decision: RoutingDecision,
	used: bool,
}

/// In-memory storage for decisions, attempts, and outcomes with TTL support
#[derive(Clone)]
pub struct MemoryStore {
	decisions: Arc<DashMap<String, StoredDecision>>,
	/// Attempts per provider, append order preserved
	attempts: Arc<DashMap<String, Vec<ConfirmAttempt>>>,
	/// Outcomes per provider, append order preserved
	outcomes: Arc<DashMap<String, Vec<OrderOutcome>>>,
	decision_ttl_enabled: bool,
}

impl MemoryStore {
	pub fn new() -> Self {
		Self {
			decisions: Arc::new(DashMap::new()),
			attempts: Arc::new(DashMap::new()),
			outcomes: Arc::new(DashMap::new()),
			decision_ttl_enabled: true,
		}
	}

	pub fn with_ttl_enabled(ttl_enabled: bool) -> Self {
		Self {
			decision_ttl_enabled: ttl_enabled,
			..Self::new()
		}
	}

	/// Start the TTL cleanup task for expired decisions
	pub fn start_ttl_cleanup(&self) -> tokio::task::JoinHandle<()> {
		if !self.decision_ttl_enabled {
			return tokio::spawn(async {});
		}

		let decisions = Arc::clone(&self.decisions);
		tokio::spawn(async move {
			let mut cleanup_interval = interval(Duration::from_secs(60));

			loop {
				cleanup_interval.tick().await;

				let now = Utc::now();
				let mut removed = 0usize;
				decisions.retain(|_token, stored| {
					if stored.decision.expires_at <= now {
						removed += 1;
						false
					} else {
						true
					}
				});

				if removed > 0 {
					debug!("Cleaned up {} expired routing decisions", removed);
				}
			}
		})
	}
}

impl Default for MemoryStore {
	fn default() -> Self {
		Self::new()
	}
}

#[async_trait]
impl DecisionStorage for MemoryStore {
	async fn put_decision(&self, decision: RoutingDecision) -> StorageResult<()> {
		self.decisions.insert(
			decision.token.to_string(),
			StoredDecision {
				decision,
				used: false,
			},
		);
		Ok(())
	}

	async fn get_decision(&self, token: &str) -> StorageResult<Option<RoutingDecision>> {
		Ok(self
			.decisions
			.get(token)
			.map(|stored| stored.decision.clone()))
	}

	async fn claim_decision(&self, token: &str) -> StorageResult<ClaimOutcome> {
		// get_mut holds the shard lock, so the used flip is atomic; two
		// concurrent claims can never both observe used == false.
		let Some(mut stored) = self.decisions.get_mut(token) else {
			return Ok(ClaimOutcome::NotFound);
		};

		if stored.decision.is_expired() {
			return Ok(ClaimOutcome::Expired);
		}

		if stored.used {
			return Ok(ClaimOutcome::AlreadyUsed);
		}

		stored.used = true;
		Ok(ClaimOutcome::Claimed(stored.decision.clone()))
	}

	async fn cleanup_expired(&self) -> StorageResult<usize> {
		if !self.decision_ttl_enabled {
			return Ok(0);
		}

		let now = Utc::now();
		let mut removed = 0usize;

		self.decisions.retain(|_token, stored| {
			if stored.decision.expires_at <= now {
				removed += 1;
				false
			} else {
				true
			}
		});

		if removed > 0 {
			info!("Cleaned up {} expired routing decisions", removed);
		}

		Ok(removed)
	}
}

#[async_trait]
impl OutcomeStorage for MemoryStore {
	async fn append_attempt(&self, attempt: ConfirmAttempt) -> StorageResult<()> {
		self.attempts
			.entry(attempt.provider_id.clone())
			.or_default()
			.push(attempt);
		Ok(())
	}

	async fn append_outcome(&self, outcome: OrderOutcome) -> StorageResult<()> {
		self.outcomes
			.entry(outcome.provider_id.clone())
			.or_default()
			.push(outcome);
		Ok(())
	}

	async fn provider_reliability(
		&self,
		provider_id: &str,
		window: usize,
	) -> StorageResult<ProviderReliability> {
		let Some(attempts) = self.attempts.get(provider_id) else {
			return Ok(ProviderReliability::empty(provider_id));
		};

		let trailing = attempts.iter().rev().take(window);
		let mut total = 0u64;
		let mut successes = 0u64;
		for attempt in trailing {
			total += 1;
			if attempt.succeeded() {
				successes += 1;
			}
		}

		Ok(ProviderReliability {
			provider_id: provider_id.to_string(),
			attempts: total,
			successes,
		})
	}

	async fn attempts_for_decision(&self, decision_id: &str) -> StorageResult<Vec<ConfirmAttempt>> {
		let mut matching: Vec<ConfirmAttempt> = self
			.attempts
			.iter()
			.flat_map(|entry| {
				entry
					.value()
					.iter()
					.filter(|a| a.decision_id == decision_id)
					.cloned()
					.collect::<Vec<_>>()
			})
			.collect();

		matching.sort_by_key(|a| a.attempted_at);
		Ok(matching)
	}

	async fn outcomes_for_provider(&self, provider_id: &str) -> StorageResult<Vec<OrderOutcome>> {
		Ok(self
			.outcomes
			.get(provider_id)
			.map(|entry| entry.clone())
			.unwrap_or_default())
	}
}

#[async_trait]
impl Storage for MemoryStore {
	async fn health_check(&self) -> StorageResult<bool> {
		Ok(true)
	}

	async fn stats(&self) -> StorageResult<StorageStats> {
		let now = Utc::now();
		let active_decisions = self
			.decisions
			.iter()
			.filter(|entry| entry.value().decision.expires_at > now)
			.count();

		Ok(StorageStats {
			total_decisions: self.decisions.len(),
			active_decisions,
			total_attempts: self.attempts.iter().map(|e| e.value().len()).sum(),
			total_outcomes: self.outcomes.iter().map(|e| e.value().len()).sum(),
		})
	}

	async fn start_background_tasks(&self) -> StorageResult<()> {
		self.start_ttl_cleanup();
		Ok(())
	}
}
