//! Quote aggregation service
//!
//! Fans out `get_quote` to every candidate provider concurrently. Each call
//! is bounded by a per-provider timeout; a provider that errors or times out
//! is excluded from scoring without disturbing the other in-flight calls.
//! Partial results are the normal case. The whole fan-out runs on a
//! `JoinSet`, so dropping the aggregation future aborts outstanding calls.

use std::sync::Arc;

use grocer_types::{Cart, ProviderConfig, ProviderRuntimeConfig, Quote};
use tokio::task::JoinSet;
use tokio::time::{timeout_at, Duration, Instant};
use tracing::{debug, info, warn};

use crate::registry::ProviderRegistry;

/// A successful quote paired with the provider config that produced it
#[derive(Debug, Clone)]
pub struct CollectedQuote {
	pub provider: ProviderConfig,
	pub quote: Quote,
}

/// Counters describing one aggregation run
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AggregationStats {
	pub providers_queried: usize,
	pub quotes_collected: usize,
	pub failed: usize,
	pub timed_out: usize,
}

enum FetchOutcome {
	Quoted(Box<CollectedQuote>),
	Failed,
	TimedOut,
}

/// Service for collecting quotes from multiple providers concurrently
pub struct QuoteAggregator {
	registry: Arc<ProviderRegistry>,
	per_provider_timeout_ms: u64,
	global_timeout_ms: u64,
}

impl QuoteAggregator {
	pub fn new(
		registry: Arc<ProviderRegistry>,
		per_provider_timeout_ms: u64,
		global_timeout_ms: u64,
	) -> Self {
		Self {
			registry,
			per_provider_timeout_ms,
			global_timeout_ms,
		}
	}

	/// Collect quotes from the given providers for one cart.
	///
	/// Quotes that fail their invariants at the adapter boundary are dropped
	/// here, so scoring only ever sees well-formed candidates.
	pub async fn collect(
		&self,
		cart: &Cart,
		providers: Vec<ProviderConfig>,
	) -> (Vec<CollectedQuote>, AggregationStats) {
		let mut stats = AggregationStats {
			providers_queried: providers.len(),
			..Default::default()
		};

		info!(
			"Fetching quotes for {} item(s) from {} provider(s)",
			cart.item_count(),
			providers.len()
		);

		let mut tasks: JoinSet<FetchOutcome> = JoinSet::new();

		for provider in providers {
			let adapter = match self.registry.adapter_for(&provider) {
				Ok(adapter) => adapter,
				Err(e) => {
					warn!("Skipping provider {}: {}", provider.id, e);
					stats.failed += 1;
					continue;
				},
			};

			let cart = cart.clone();
			let per_call_timeout = provider.timeout_ms.unwrap_or(self.per_provider_timeout_ms);
			let item_count = cart.item_count();

			tasks.spawn(async move {
				let mut config = ProviderRuntimeConfig::from(&provider);
				config.timeout_ms = per_call_timeout;

				debug!("Starting quote fetch from provider {}", provider.id);

				let deadline = Instant::now() + Duration::from_millis(per_call_timeout);
				match timeout_at(deadline, adapter.get_quote(&cart, &config)).await {
					Err(_) => {
						warn!(
							"Provider {} timed out after {}ms",
							provider.id, per_call_timeout
						);
						FetchOutcome::TimedOut
					},
					Ok(Err(e)) => {
						warn!("Provider {} returned error: {}", provider.id, e);
						FetchOutcome::Failed
					},
					Ok(Ok(quote)) => match quote.validate(item_count) {
						Err(e) => {
							warn!("Provider {} produced an invalid quote: {}", provider.id, e);
							FetchOutcome::Failed
						},
						Ok(()) => {
							info!(
								"Got quote from provider {}: total {} {}",
								provider.id, quote.total_minor, quote.currency
							);
							FetchOutcome::Quoted(Box::new(CollectedQuote { provider, quote }))
						},
					},
				}
			});
		}

		// Global ceiling over the whole fan-out; stragglers past it are
		// aborted, not merged in later.
		let global_deadline = Instant::now() + Duration::from_millis(self.global_timeout_ms);
		let mut collected = Vec::new();

		loop {
			match timeout_at(global_deadline, tasks.join_next()).await {
				Ok(Some(Ok(outcome))) => match outcome {
					FetchOutcome::Quoted(quoted) => collected.push(*quoted),
					FetchOutcome::Failed => stats.failed += 1,
					FetchOutcome::TimedOut => stats.timed_out += 1,
				},
				Ok(Some(Err(join_error))) => {
					warn!("Quote task panicked: {}", join_error);
					stats.failed += 1;
				},
				Ok(None) => break,
				Err(_) => {
					warn!(
						"Global aggregation ceiling reached after {}ms, aborting stragglers",
						self.global_timeout_ms
					);
					stats.timed_out += tasks.len();
					tasks.abort_all();
					break;
				},
			}
		}

		stats.quotes_collected = collected.len();
		info!(
			"Quote aggregation completed: {}/{} provider(s) responded",
			stats.quotes_collected, stats.providers_queried
		);

		(collected, stats)
	}
}
