//! Routing service
//!
//! Drives one routing request end to end: validate the cart, snapshot the
//! registry, aggregate quotes, rank them, and persist the decision binding
//! behind a confirmation token.

use std::sync::Arc;

use chrono::Duration;
use grocer_storage::{DecisionStorage, Storage};
use grocer_types::{
	CartValidationError, ProviderConfig, RoutingDecision, RoutingRequest,
};
use thiserror::Error;
use tracing::{debug, info};

use crate::aggregator::QuoteAggregator;
use crate::registry::ProviderRegistry;
use crate::scoring::ScoringEngine;
use crate::token::TokenService;

/// Errors surfaced by the routing service
#[derive(Debug, Error)]
pub enum RoutingError {
	#[error("invalid cart: {0}")]
	Validation(#[from] CartValidationError),

	/// No provider produced a usable quote; this is the aggregate condition,
	/// never a per-provider error
	#[error("no providers available for this cart")]
	NoProvidersAvailable,

	#[error("storage error: {0}")]
	Storage(String),
}

/// Service for producing routing decisions
pub struct RoutingService {
	registry: Arc<ProviderRegistry>,
	aggregator: QuoteAggregator,
	scoring: ScoringEngine,
	storage: Arc<dyn Storage>,
	tokens: TokenService,
	token_ttl: Duration,
}

impl RoutingService {
	pub fn new(
		registry: Arc<ProviderRegistry>,
		aggregator: QuoteAggregator,
		scoring: ScoringEngine,
		storage: Arc<dyn Storage>,
		tokens: TokenService,
		token_ttl: Duration,
	) -> Self {
		Self {
			registry,
			aggregator,
			scoring,
			storage,
			tokens,
			token_ttl,
		}
	}

	/// Route one cart to its best provider.
	///
	/// The returned decision has already been persisted under its token; the
	/// caller can confirm against it until the TTL elapses.
	pub async fn route(&self, request: &RoutingRequest) -> Result<RoutingDecision, RoutingError> {
		request.validate()?;
		let cart = request.to_cart();

		let candidates = self.candidate_providers(request);
		if candidates.is_empty() {
			info!("Routing request has no eligible providers");
			return Err(RoutingError::NoProvidersAvailable);
		}

		let (collected, stats) = self.aggregator.collect(&cart, candidates).await;
		if collected.is_empty() {
			info!(
				"No usable quotes: {} queried, {} failed, {} timed out",
				stats.providers_queried, stats.failed, stats.timed_out
			);
			return Err(RoutingError::NoProvidersAvailable);
		}

		let mut ranked = self.scoring.rank(collected, cart.preference).await;

		// rank() never returns empty for non-empty input
		let selected = ranked.remove(0);
		info!(
			"Selected provider {} (total score {:.2}) with {} alternative(s)",
			selected.provider_id,
			selected.score.total,
			ranked.len()
		);

		let mut decision = RoutingDecision::new(cart, selected, ranked, self.token_ttl);
		decision.integrity_checksum = Some(self.tokens.checksum(&decision.to_integrity_payload()));

		self.storage
			.put_decision(decision.clone())
			.await
			.map_err(|e| RoutingError::Storage(e.to_string()))?;

		Ok(decision)
	}

	/// Registry snapshot with per-request overrides applied.
	///
	/// Overrides touch only this request's snapshot; the registry itself is
	/// never mutated mid-flight.
	fn candidate_providers(&self, request: &RoutingRequest) -> Vec<ProviderConfig> {
		let mut providers = self.registry.list_enabled();

		for provider_override in &request.provider_overrides {
			match provider_override.enabled {
				Some(false) => {
					debug!(
						"Override disables provider {} for this request",
						provider_override.provider_id
					);
					providers.retain(|p| p.id != provider_override.provider_id);
					continue;
				},
				Some(true) => {
					let missing = !providers.iter().any(|p| p.id == provider_override.provider_id);
					if missing {
						if let Some(config) = self.registry.get(&provider_override.provider_id) {
							debug!(
								"Override enables provider {} for this request",
								config.id
							);
							providers.push(config);
						}
					}
				},
				None => {},
			}

			if let Some(priority) = provider_override.priority {
				if let Some(provider) = providers
					.iter_mut()
					.find(|p| p.id == provider_override.provider_id)
				{
					provider.priority = priority;
				}
			}
		}

		providers.sort_by(|a, b| a.id.cmp(&b.id));
		providers
	}
}
