//! Confirmation orchestrator
//!
//! Drives one confirmation session: claim the token, attempt the primary
//! provider, classify any failure, and fail over to the next-ranked
//! alternative exactly once on a retryable class. Failover is limited to a
//! single hop to bound latency and avoid cascading load onto remaining
//! providers during an outage. Confirmation is strictly sequential; two live
//! orders are never in flight at once. Every attempt is recorded through the
//! outcome recorder before the orchestrator returns.

use std::sync::Arc;
use std::time::Instant;

use grocer_storage::{ClaimOutcome, DecisionStorage, Storage};
use grocer_types::{
	AdapterError, ConfirmAttempt, ConfirmationContext, ConfirmationError, ConfirmationRequest,
	ConfirmationResult, ConfirmationState, ErrorClass, OrderOutcome, ProviderOrder, ProviderRuntimeConfig,
	RankedQuote, RoutingDecision,
};
use tracing::{info, warn};

use crate::outcomes::OutcomeRecorder;
use crate::registry::ProviderRegistry;
use crate::token::TokenService;

/// Service for confirming routed orders with automatic failover
pub struct ConfirmationOrchestrator {
	registry: Arc<ProviderRegistry>,
	storage: Arc<dyn Storage>,
	recorder: Arc<OutcomeRecorder>,
	tokens: TokenService,
}

impl ConfirmationOrchestrator {
	pub fn new(
		registry: Arc<ProviderRegistry>,
		storage: Arc<dyn Storage>,
		recorder: Arc<OutcomeRecorder>,
		tokens: TokenService,
	) -> Self {
		Self {
			registry,
			storage,
			recorder,
			tokens,
		}
	}

	/// Confirm the order bound to a token.
	///
	/// Session-level failures (bad token) surface as `Err`; everything past
	/// the claim resolves to a terminal [`ConfirmationResult`], success or
	/// not.
	pub async fn confirm(
		&self,
		request: &ConfirmationRequest,
	) -> Result<ConfirmationResult, ConfirmationError> {
		let decision = self.claim(&request.confirmation_token).await?;

		if let Some(checksum) = &decision.integrity_checksum {
			if !self.tokens.verify(&decision.to_integrity_payload(), checksum) {
				warn!(
					"Decision {} failed integrity verification",
					decision.decision_id
				);
				return Err(ConfirmationError::IntegrityMismatch);
			}
		}

		let primary = decision.selected.clone();
		let mut attempts = Vec::new();

		info!(
			"Confirming decision {} with primary provider {}",
			decision.decision_id, primary.provider_id
		);

		match self.attempt(&decision, &primary, request).await {
			Ok((order, duration_ms)) => {
				self.record_success(&decision, &primary, &order, duration_ms, &mut attempts)
					.await;

				Ok(ConfirmationResult {
					state: ConfirmationState::Confirmed,
					provider_id: Some(primary.provider_id.clone()),
					order: Some(order),
					failover_attempted: false,
					failover_from: None,
					attempts,
					message: format!("Order confirmed with {}", primary.provider_name),
				})
			},
			Err((error, duration_ms)) => {
				let class = error.class();
				self.record_failure(&decision, &primary, &error, class, duration_ms, &mut attempts)
					.await;

				match class {
					ErrorClass::NonRetryable => Ok(self.resolve_non_retryable(
						&primary, &error, attempts,
					)),
					ErrorClass::Retryable => {
						self.fail_over(&decision, &primary, request, attempts).await
					},
				}
			},
		}
	}

	/// Single-hop failover to the highest-ranked alternative
	async fn fail_over(
		&self,
		decision: &RoutingDecision,
		primary: &RankedQuote,
		request: &ConfirmationRequest,
		mut attempts: Vec<ConfirmAttempt>,
	) -> Result<ConfirmationResult, ConfirmationError> {
		let Some(alternative) = decision.alternatives.first().cloned() else {
			info!(
				"No alternatives left for decision {}; terminal failure",
				decision.decision_id
			);
			return Ok(ConfirmationResult {
				state: ConfirmationState::FailedTerminal,
				provider_id: None,
				order: None,
				failover_attempted: false,
				failover_from: None,
				attempts,
				message: format!(
					"{} could not take the order and no alternative providers were available; please try again shortly",
					primary.provider_name
				),
			});
		};

		info!(
			"Failing over from {} to {} for decision {}",
			primary.provider_id, alternative.provider_id, decision.decision_id
		);

		match self.attempt(decision, &alternative, request).await {
			Ok((order, duration_ms)) => {
				self.record_success(decision, &alternative, &order, duration_ms, &mut attempts)
					.await;

				Ok(ConfirmationResult {
					state: ConfirmationState::Confirmed,
					provider_id: Some(alternative.provider_id.clone()),
					order: Some(order),
					failover_attempted: true,
					failover_from: Some(primary.provider_id.clone()),
					attempts,
					message: format!(
						"{} could not take the order; confirmed with {} instead",
						primary.provider_name, alternative.provider_name
					),
				})
			},
			Err((error, duration_ms)) => {
				let class = error.class();
				self.record_failure(
					decision,
					&alternative,
					&error,
					class,
					duration_ms,
					&mut attempts,
				)
				.await;

				Ok(ConfirmationResult {
					state: ConfirmationState::FailedTerminal,
					provider_id: None,
					order: None,
					failover_attempted: true,
					failover_from: Some(primary.provider_id.clone()),
					attempts,
					message: format!(
						"Neither {} nor {} could take the order; please try again shortly",
						primary.provider_name, alternative.provider_name
					),
				})
			},
		}
	}

	fn resolve_non_retryable(
		&self,
		primary: &RankedQuote,
		error: &AdapterError,
		attempts: Vec<ConfirmAttempt>,
	) -> ConfirmationResult {
		let hint = error
			.corrective_hint()
			.unwrap_or("review the order details");

		ConfirmationResult {
			state: ConfirmationState::FailedNonRetryable,
			provider_id: None,
			order: None,
			failover_attempted: false,
			failover_from: None,
			attempts,
			message: format!(
				"{} could not place the order; please {}",
				primary.provider_name, hint
			),
		}
	}

	async fn claim(&self, token: &str) -> Result<RoutingDecision, ConfirmationError> {
		match self
			.storage
			.claim_decision(token)
			.await
			.map_err(|e| ConfirmationError::Storage(e.to_string()))?
		{
			ClaimOutcome::Claimed(decision) => Ok(decision),
			ClaimOutcome::AlreadyUsed => Err(ConfirmationError::TokenAlreadyUsed),
			ClaimOutcome::Expired => Err(ConfirmationError::TokenExpired),
			ClaimOutcome::NotFound => Err(ConfirmationError::DecisionNotFound),
		}
	}

	/// One order placement against one provider, with wall-clock duration
	async fn attempt(
		&self,
		decision: &RoutingDecision,
		candidate: &RankedQuote,
		request: &ConfirmationRequest,
	) -> Result<(ProviderOrder, u64), (AdapterError, u64)> {
		let started = Instant::now();

		let Some(config) = self.registry.get(&candidate.provider_id) else {
			// Provider vanished from the registry between quote and confirm
			return Err((
				AdapterError::ProviderUnavailable {
					provider_id: candidate.provider_id.clone(),
				},
				started.elapsed().as_millis() as u64,
			));
		};

		let adapter = match self.registry.adapter_for(&config) {
			Ok(adapter) => adapter,
			Err(e) => {
				return Err((
					AdapterError::Config {
						reason: e.to_string(),
					},
					started.elapsed().as_millis() as u64,
				));
			},
		};

		let context = ConfirmationContext {
			decision_id: decision.decision_id.clone(),
			provider_id: candidate.provider_id.clone(),
			cart: decision.cart.clone(),
			quote: candidate.quote.clone(),
			payment_handle: request.payment_handle.clone(),
			user_id: request.user_id.clone(),
		};

		let runtime_config = ProviderRuntimeConfig::from(&config);
		match adapter.confirm_order(&context, &runtime_config).await {
			Ok(order) => Ok((order, started.elapsed().as_millis() as u64)),
			Err(error) => Err((error, started.elapsed().as_millis() as u64)),
		}
	}

	async fn record_success(
		&self,
		decision: &RoutingDecision,
		candidate: &RankedQuote,
		order: &ProviderOrder,
		duration_ms: u64,
		attempts: &mut Vec<ConfirmAttempt>,
	) {
		let attempt = ConfirmAttempt::success(
			decision.decision_id.clone(),
			candidate.provider_id.clone(),
			order.order_id.clone(),
			duration_ms,
		);
		self.recorder.record_attempt(attempt.clone()).await;
		attempts.push(attempt);

		let commission_minor = (candidate.quote.total_minor as f64
			* candidate.commission_rate)
			.round() as i64;
		self.recorder
			.record_outcome(OrderOutcome::new(
				order.order_id.clone(),
				candidate.provider_id.clone(),
				true,
				candidate.quote.total_minor,
				commission_minor,
			))
			.await;
	}

	async fn record_failure(
		&self,
		decision: &RoutingDecision,
		candidate: &RankedQuote,
		error: &AdapterError,
		class: ErrorClass,
		duration_ms: u64,
		attempts: &mut Vec<ConfirmAttempt>,
	) {
		warn!(
			"Confirmation attempt against {} failed ({:?}): {}",
			candidate.provider_id, class, error
		);

		let attempt = ConfirmAttempt::failure(
			decision.decision_id.clone(),
			candidate.provider_id.clone(),
			class,
			error.to_string(),
			duration_ms,
		);
		self.recorder.record_attempt(attempt.clone()).await;
		attempts.push(attempt);
	}
}
