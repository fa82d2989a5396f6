//! Outcome recorder
//!
//! Sole writer of confirmation attempts and order outcomes, and the read
//! surface for the reliability aggregate the scoring engine consumes.
//! Recording is best-effort relative to the user-facing transaction: a
//! storage failure never fails a confirmed order, but the record is queued
//! and retried rather than dropped, since reliability scoring depends on
//! completeness.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use grocer_storage::{OutcomeStorage, Storage};
use grocer_types::{ConfirmAttempt, OrderOutcome};
use tokio::time::{interval, Duration};
use tracing::{debug, warn};

#[derive(Debug, Clone)]
enum PendingRecord {
	Attempt(ConfirmAttempt),
	Outcome(OrderOutcome),
}

/// Append-only recorder with an internal retry queue
pub struct OutcomeRecorder {
	storage: Arc<dyn Storage>,
	reliability_window: usize,
	pending: Arc<Mutex<VecDeque<PendingRecord>>>,
}

impl OutcomeRecorder {
	pub fn new(storage: Arc<dyn Storage>, reliability_window: usize) -> Self {
		Self {
			storage,
			reliability_window,
			pending: Arc::new(Mutex::new(VecDeque::new())),
		}
	}

	/// Persist one confirmation attempt; queues on storage failure
	pub async fn record_attempt(&self, attempt: ConfirmAttempt) {
		if let Err(e) = self.storage.append_attempt(attempt.clone()).await {
			warn!(
				"Failed to record attempt for provider {}, queuing for retry: {}",
				attempt.provider_id, e
			);
			self.enqueue(PendingRecord::Attempt(attempt));
		}
	}

	/// Persist one order outcome; queues on storage failure
	pub async fn record_outcome(&self, outcome: OrderOutcome) {
		if let Err(e) = self.storage.append_outcome(outcome.clone()).await {
			warn!(
				"Failed to record outcome for order {}, queuing for retry: {}",
				outcome.order_id, e
			);
			self.enqueue(PendingRecord::Outcome(outcome));
		}
	}

	/// Rolling success rate for a provider over the configured trailing
	/// window, `None` when the provider has no history (or the read failed).
	pub async fn reliability_rate(&self, provider_id: &str) -> Option<f64> {
		match self
			.storage
			.provider_reliability(provider_id, self.reliability_window)
			.await
		{
			Ok(reliability) => reliability.success_rate(),
			Err(e) => {
				warn!("Failed to read reliability for provider {}: {}", provider_id, e);
				None
			},
		}
	}

	fn enqueue(&self, record: PendingRecord) {
		self.pending
			.lock()
			.expect("outcome retry queue lock poisoned")
			.push_back(record);
	}

	/// Number of records waiting for retry
	pub fn pending_len(&self) -> usize {
		self.pending
			.lock()
			.expect("outcome retry queue lock poisoned")
			.len()
	}

	/// Retry everything in the queue once; failures re-queue at the back
	pub async fn flush_pending(&self) {
		let drained: Vec<PendingRecord> = {
			let mut guard = self
				.pending
				.lock()
				.expect("outcome retry queue lock poisoned");
			guard.drain(..).collect()
		};

		if drained.is_empty() {
			return;
		}

		debug!("Retrying {} queued outcome record(s)", drained.len());

		for record in drained {
			let result = match &record {
				PendingRecord::Attempt(attempt) => {
					self.storage.append_attempt(attempt.clone()).await
				},
				PendingRecord::Outcome(outcome) => {
					self.storage.append_outcome(outcome.clone()).await
				},
			};

			if let Err(e) = result {
				warn!("Retry of queued record failed, keeping it queued: {}", e);
				self.enqueue(record);
			}
		}
	}

	/// Background task that periodically drains the retry queue
	pub fn start_retry_flush(self: &Arc<Self>) -> tokio::task::JoinHandle<()> {
		let recorder = Arc::clone(self);
		tokio::spawn(async move {
			let mut flush_interval = interval(Duration::from_secs(30));
			loop {
				flush_interval.tick().await;
				recorder.flush_pending().await;
			}
		})
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use async_trait::async_trait;
	use grocer_storage::MemoryStore;
	use grocer_types::storage::{
		ClaimOutcome, DecisionStorage, OutcomeStorage, StorageError, StorageResult, StorageStats,
	};
	use grocer_types::{ErrorClass, ProviderReliability, RoutingDecision};
	use std::sync::atomic::{AtomicBool, Ordering};

	/// Storage wrapper whose appends can be switched off to simulate outages
	struct FlakyStore {
		inner: MemoryStore,
		appends_fail: AtomicBool,
	}

	impl FlakyStore {
		fn new() -> Self {
			Self {
				inner: MemoryStore::new(),
				appends_fail: AtomicBool::new(false),
			}
		}

		fn fail_appends(&self, fail: bool) {
			self.appends_fail.store(fail, Ordering::SeqCst);
		}

		fn check(&self) -> StorageResult<()> {
			if self.appends_fail.load(Ordering::SeqCst) {
				Err(StorageError::Backend {
					reason: "simulated outage".to_string(),
				})
			} else {
				Ok(())
			}
		}
	}

	#[async_trait]
	impl DecisionStorage for FlakyStore {
		async fn put_decision(&self, decision: RoutingDecision) -> StorageResult<()> {
			self.inner.put_decision(decision).await
		}

		async fn get_decision(&self, token: &str) -> StorageResult<Option<RoutingDecision>> {
			self.inner.get_decision(token).await
		}

		async fn claim_decision(&self, token: &str) -> StorageResult<ClaimOutcome> {
			self.inner.claim_decision(token).await
		}

		async fn cleanup_expired(&self) -> StorageResult<usize> {
			self.inner.cleanup_expired().await
		}
	}

	#[async_trait]
	impl OutcomeStorage for FlakyStore {
		async fn append_attempt(&self, attempt: ConfirmAttempt) -> StorageResult<()> {
			self.check()?;
			self.inner.append_attempt(attempt).await
		}

		async fn append_outcome(&self, outcome: OrderOutcome) -> StorageResult<()> {
			self.check()?;
			self.inner.append_outcome(outcome).await
		}

		async fn provider_reliability(
			&self,
			provider_id: &str,
			window: usize,
		) -> StorageResult<ProviderReliability> {
			self.inner.provider_reliability(provider_id, window).await
		}

		async fn attempts_for_decision(
			&self,
			decision_id: &str,
		) -> StorageResult<Vec<ConfirmAttempt>> {
			self.inner.attempts_for_decision(decision_id).await
		}

		async fn outcomes_for_provider(
			&self,
			provider_id: &str,
		) -> StorageResult<Vec<OrderOutcome>> {
			self.inner.outcomes_for_provider(provider_id).await
		}
	}

	#[async_trait]
	impl Storage for FlakyStore {
		async fn health_check(&self) -> StorageResult<bool> {
			Ok(true)
		}

		async fn stats(&self) -> StorageResult<StorageStats> {
			self.inner.stats().await
		}

		async fn start_background_tasks(&self) -> StorageResult<()> {
			Ok(())
		}
	}

	#[tokio::test]
	async fn test_records_pass_through_to_storage() {
		let store = Arc::new(FlakyStore::new());
		let recorder = OutcomeRecorder::new(store.clone(), 50);

		recorder
			.record_attempt(ConfirmAttempt::success("dec-1", "freshmart", "ord-1", 90))
			.await;
		recorder
			.record_outcome(OrderOutcome::new("ord-1", "freshmart", true, 1_099, 88))
			.await;

		assert_eq!(recorder.pending_len(), 0);
		assert_eq!(recorder.reliability_rate("freshmart").await, Some(1.0));
		assert_eq!(
			store.outcomes_for_provider("freshmart").await.unwrap().len(),
			1
		);
	}

	#[tokio::test]
	async fn test_failed_records_queue_and_flush() {
		let store = Arc::new(FlakyStore::new());
		let recorder = OutcomeRecorder::new(store.clone(), 50);

		store.fail_appends(true);
		recorder
			.record_attempt(ConfirmAttempt::failure(
				"dec-1",
				"freshmart",
				ErrorClass::Retryable,
				"unavailable",
				40,
			))
			.await;
		recorder
			.record_outcome(OrderOutcome::new("ord-1", "freshmart", true, 1_099, 88))
			.await;
		assert_eq!(recorder.pending_len(), 2);

		// Outage persists: retry keeps the records queued
		recorder.flush_pending().await;
		assert_eq!(recorder.pending_len(), 2);

		// Outage clears: retry drains the queue into storage
		store.fail_appends(false);
		recorder.flush_pending().await;
		assert_eq!(recorder.pending_len(), 0);

		let reliability = store.provider_reliability("freshmart", 50).await.unwrap();
		assert_eq!(reliability.attempts, 1);
	}

	#[tokio::test]
	async fn test_no_history_yields_no_rate() {
		let recorder = OutcomeRecorder::new(Arc::new(FlakyStore::new()), 50);
		assert_eq!(recorder.reliability_rate("brand-new").await, None);
	}
}
