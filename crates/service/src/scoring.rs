//! Scoring engine
//!
//! Converts each collected quote plus provider metadata into a normalized
//! multi-factor score and ranks the candidates. Determinism is a hard
//! requirement: identical inputs and identical reliability history must
//! produce identical selection, so ties fall back to raw priority and then
//! to the lexicographically smallest provider id.

use std::sync::Arc;

use futures::future::join_all;
use grocer_config::RoutingSettings;
use grocer_types::{OptimizationPreference, RankedQuote, ScoreBreakdown, WeightTable};
use tracing::debug;

use crate::aggregator::CollectedQuote;
use crate::outcomes::OutcomeRecorder;

/// Priority values are interpreted on a 0..=10 scale when mapping into the
/// additive boost range.
const PRIORITY_SCALE_MAX: i32 = 10;

/// Service for scoring and ranking provider quotes
pub struct ScoringEngine {
	weights: WeightTable,
	priority_boost_max: f64,
	neutral_reliability: f64,
	recorder: Arc<OutcomeRecorder>,
}

impl ScoringEngine {
	pub fn new(settings: &RoutingSettings, recorder: Arc<OutcomeRecorder>) -> Self {
		Self {
			weights: settings.weights,
			priority_boost_max: settings.priority_boost_max,
			neutral_reliability: settings.neutral_reliability,
			recorder,
		}
	}

	/// Score and rank the collected quotes, best first.
	///
	/// Empty input yields empty output; the caller decides whether that is an
	/// error condition.
	pub async fn rank(
		&self,
		collected: Vec<CollectedQuote>,
		preference: OptimizationPreference,
	) -> Vec<RankedQuote> {
		if collected.is_empty() {
			return Vec::new();
		}

		let weights = self.weights.for_preference(preference);

		let cheapest_total = collected
			.iter()
			.map(|c| c.quote.total_minor)
			.min()
			.unwrap_or(0);
		let fastest_minutes = collected
			.iter()
			.map(|c| c.quote.fulfillment_minutes)
			.min()
			.unwrap_or(0);
		let max_commission = collected
			.iter()
			.map(|c| c.provider.commission_rate)
			.fold(0.0_f64, f64::max);

		// Reliability reads are storage-bound; fetch them for the whole
		// candidate set concurrently.
		let reliability_rates = join_all(
			collected
				.iter()
				.map(|c| self.recorder.reliability_rate(&c.provider.id)),
		)
		.await;

		let mut ranked = Vec::with_capacity(collected.len());

		for (candidate, rate) in collected.into_iter().zip(reliability_rates) {
			let reliability = match rate {
				Some(rate) => rate * 100.0,
				None => self.neutral_reliability,
			};

			let mut score = ScoreBreakdown {
				price: price_score(candidate.quote.total_minor, cheapest_total),
				speed: speed_score(candidate.quote.fulfillment_minutes, fastest_minutes),
				margin: margin_score(candidate.provider.commission_rate, max_commission),
				availability: candidate.quote.found_fraction() * 100.0,
				reliability,
				priority_boost: self.priority_boost(candidate.provider.priority),
				total: 0.0,
			};
			score.total = score.priority_boost + weights.apply(&score);

			debug!(
				"Scored provider {}: total {:.2} (price {:.1}, speed {:.1}, margin {:.1}, availability {:.1}, reliability {:.1}, boost {:.1})",
				candidate.provider.id,
				score.total,
				score.price,
				score.speed,
				score.margin,
				score.availability,
				score.reliability,
				score.priority_boost
			);

			ranked.push(RankedQuote {
				provider_id: candidate.provider.id,
				provider_name: candidate.provider.name,
				priority: candidate.provider.priority,
				commission_rate: candidate.provider.commission_rate,
				quote: candidate.quote,
				score,
			});
		}

		ranked.sort_by(|a, b| {
			b.score
				.total
				.partial_cmp(&a.score.total)
				.unwrap_or(std::cmp::Ordering::Equal)
				.then_with(|| b.priority.cmp(&a.priority))
				.then_with(|| a.provider_id.cmp(&b.provider_id))
		});

		ranked
	}

	/// Map operator priority into the additive boost range
	fn priority_boost(&self, priority: i32) -> f64 {
		let clamped = priority.clamp(0, PRIORITY_SCALE_MAX);
		clamped as f64 / PRIORITY_SCALE_MAX as f64 * self.priority_boost_max
	}
}

/// Inverse-linear price score: the cheapest total scores 100, degrading with
/// percentage markup above it, floored at 0.
pub fn price_score(total_minor: i64, cheapest_minor: i64) -> f64 {
	if total_minor <= cheapest_minor {
		return 100.0;
	}
	if cheapest_minor <= 0 {
		return 0.0;
	}

	let markup_pct = (total_minor - cheapest_minor) as f64 * 100.0 / cheapest_minor as f64;
	(100.0 - markup_pct).max(0.0)
}

/// Inverse-linear speed score, same shape as the price score
pub fn speed_score(minutes: u32, fastest_minutes: u32) -> f64 {
	if minutes <= fastest_minutes {
		return 100.0;
	}

	let baseline = fastest_minutes.max(1) as f64;
	let markup_pct = (minutes - fastest_minutes) as f64 * 100.0 / baseline;
	(100.0 - markup_pct).max(0.0)
}

/// Linear margin score relative to the highest commission in the candidate
/// set; when no candidate carries a commission every provider scores 0.
pub fn margin_score(commission_rate: f64, max_commission: f64) -> f64 {
	if max_commission <= 0.0 {
		return 0.0;
	}

	(commission_rate / max_commission * 100.0).clamp(0.0, 100.0)
}

#[cfg(test)]
mod tests {
	use super::*;
	use grocer_storage::MemoryStore;
	use grocer_types::{
		ConfirmAttempt, ItemAvailability, ProviderConfig, Quote,
	};

	fn engine() -> (ScoringEngine, Arc<MemoryStore>) {
		let store = Arc::new(MemoryStore::new());
		let recorder = Arc::new(OutcomeRecorder::new(store.clone(), 50));
		let engine = ScoringEngine::new(&RoutingSettings::default(), recorder);
		(engine, store)
	}

	fn candidate(
		id: &str,
		total_minor: i64,
		minutes: u32,
		commission: f64,
		priority: i32,
	) -> CollectedQuote {
		let provider = ProviderConfig::new(id, "retailer-v1", "https://api.test")
			.with_priority(priority)
			.with_commission_rate(commission);

		// Single found item priced at the subtotal keeps availability at 100
		let quote = Quote::new(id, total_minor, 0, 0, "USD")
			.with_item_availability(vec![ItemAvailability::found("item-1", total_minor)])
			.with_fulfillment_minutes(minutes);

		CollectedQuote { provider, quote }
	}

	#[test]
	fn test_price_score_shape() {
		assert_eq!(price_score(1099, 1099), 100.0);

		// The 2094-cent quote is ~90.5% over the 1099-cent floor
		let score = price_score(2094, 1099);
		assert!(score < 100.0);
		assert!((score - 9.46).abs() < 0.1);

		// Beyond double the cheapest floors at 0
		assert_eq!(price_score(2500, 1000), 0.0);
	}

	#[test]
	fn test_speed_score_shape() {
		assert_eq!(speed_score(45, 45), 100.0);
		assert_eq!(speed_score(90, 45), 0.0);
		assert!((speed_score(60, 45) - 66.666).abs() < 0.01);

		// Zero-minute baseline does not divide by zero
		assert_eq!(speed_score(0, 0), 100.0);
		assert!(speed_score(2, 0) < 100.0);
	}

	#[test]
	fn test_margin_score_shape() {
		assert_eq!(margin_score(0.10, 0.10), 100.0);
		assert_eq!(margin_score(0.05, 0.10), 50.0);
		assert_eq!(margin_score(0.0, 0.10), 0.0);

		// No commissions anywhere: axis contributes nothing
		assert_eq!(margin_score(0.0, 0.0), 0.0);
	}

	#[tokio::test]
	async fn test_cheapest_wins_under_price_preference() {
		let (engine, _) = engine();

		// Provider X: total 1099, free delivery; provider Y: same subtotal
		// plus a 995-cent fee
		let x = candidate("provider-x", 1099, 120, 0.05, 0);
		let y = candidate("provider-y", 2094, 120, 0.05, 0);

		let ranked = engine
			.rank(vec![y, x], OptimizationPreference::Price)
			.await;

		assert_eq!(ranked[0].provider_id, "provider-x");
		assert_eq!(ranked[0].score.price, 100.0);
		assert!(ranked[1].score.price < 100.0);
	}

	#[tokio::test]
	async fn test_price_preference_ranks_cheapest_no_worse_than_balanced() {
		let (engine, _) = engine();

		let make = || {
			vec![
				candidate("cheap", 1000, 180, 0.02, 0),
				candidate("fast", 1400, 30, 0.10, 0),
				candidate("mid", 1200, 60, 0.06, 0),
			]
		};

		let balanced = engine.rank(make(), OptimizationPreference::Balanced).await;
		let priced = engine.rank(make(), OptimizationPreference::Price).await;

		let rank_of = |ranking: &[RankedQuote], id: &str| {
			ranking.iter().position(|r| r.provider_id == id).unwrap()
		};

		assert!(rank_of(&priced, "cheap") <= rank_of(&balanced, "cheap"));
	}

	#[tokio::test]
	async fn test_neutral_reliability_for_new_providers() {
		let (engine, _) = engine();

		let ranked = engine
			.rank(
				vec![candidate("brand-new", 1000, 60, 0.05, 0)],
				OptimizationPreference::Balanced,
			)
			.await;

		assert_eq!(ranked[0].score.reliability, 70.0);
		assert_ne!(ranked[0].score.reliability, 0.0);
		assert_ne!(ranked[0].score.reliability, 100.0);
	}

	#[tokio::test]
	async fn test_reliability_feedback_changes_score() {
		use grocer_types::storage::OutcomeStorage;

		let (engine, store) = engine();

		// A provider with a 50% confirmation record
		store
			.append_attempt(ConfirmAttempt::success("dec-1", "veteran", "ord-1", 50))
			.await
			.unwrap();
		store
			.append_attempt(ConfirmAttempt::failure(
				"dec-2",
				"veteran",
				grocer_types::ErrorClass::Retryable,
				"unavailable",
				50,
			))
			.await
			.unwrap();

		let ranked = engine
			.rank(
				vec![candidate("veteran", 1000, 60, 0.05, 0)],
				OptimizationPreference::Balanced,
			)
			.await;

		assert_eq!(ranked[0].score.reliability, 50.0);
	}

	#[tokio::test]
	async fn test_deterministic_ranking_across_runs() {
		let (engine, _) = engine();

		let make = || {
			vec![
				candidate("alpha", 1000, 60, 0.05, 3),
				candidate("bravo", 1000, 60, 0.05, 3),
				candidate("charlie", 1100, 50, 0.08, 1),
			]
		};

		let first: Vec<String> = engine
			.rank(make(), OptimizationPreference::Balanced)
			.await
			.into_iter()
			.map(|r| r.provider_id)
			.collect();

		for _ in 0..5 {
			let again: Vec<String> = engine
				.rank(make(), OptimizationPreference::Balanced)
				.await
				.into_iter()
				.map(|r| r.provider_id)
				.collect();
			assert_eq!(first, again);
		}

		// alpha and bravo are identical except for id; the tie breaks
		// lexicographically
		let alpha = first.iter().position(|id| id == "alpha").unwrap();
		let bravo = first.iter().position(|id| id == "bravo").unwrap();
		assert!(alpha < bravo);
	}

	#[tokio::test]
	async fn test_priority_breaks_ties_before_id() {
		let (engine, _) = engine();

		let ranked = engine
			.rank(
				vec![
					candidate("aaa-low", 1000, 60, 0.05, 1),
					candidate("zzz-high", 1000, 60, 0.05, 2),
				],
				OptimizationPreference::Balanced,
			)
			.await;

		// Higher raw priority also earns a larger boost, so it leads on
		// total; the ordering must hold regardless of id order
		assert_eq!(ranked[0].provider_id, "zzz-high");
	}

	#[tokio::test]
	async fn test_priority_boost_is_additive_and_bounded() {
		let (engine, _) = engine();

		let ranked = engine
			.rank(
				vec![candidate("boosted", 1000, 60, 0.0, 100)],
				OptimizationPreference::Balanced,
			)
			.await;

		// Priority 100 clamps to the 0..=10 scale: max boost is 20
		assert_eq!(ranked[0].score.priority_boost, 20.0);
		let unboosted = ranked[0].score.total - ranked[0].score.priority_boost;
		assert!(unboosted <= 100.0);
	}
}
