//! Score models and weight configuration
//!
//! Sub-scores are normalized to [0, 100]. The weighted total is
//! `priority_boost + Σ weight_k * subscore_k`, where the five weights sum to 1
//! and the priority boost is a separate additive term so operator preference
//! can break near-ties without dominating quality signals.

use serde::{Deserialize, Serialize};

#[cfg(feature = "openapi")]
use utoipa::ToSchema;

use crate::carts::OptimizationPreference;

/// Per-provider score breakdown
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct ScoreBreakdown {
	pub price: f64,
	pub speed: f64,
	pub margin: f64,
	pub availability: f64,
	pub reliability: f64,
	/// Additive operator-priority term, outside the convex combination
	pub priority_boost: f64,
	pub total: f64,
}

/// Convex weights over the five sub-scores
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoringWeights {
	pub price: f64,
	pub speed: f64,
	pub margin: f64,
	pub availability: f64,
	pub reliability: f64,
}

/// One weight set per optimization preference
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeightTable {
	pub price: ScoringWeights,
	pub speed: ScoringWeights,
	pub margin: ScoringWeights,
	pub balanced: ScoringWeights,
}

impl ScoringWeights {
	pub const BALANCED: ScoringWeights = ScoringWeights {
		price: 0.2,
		speed: 0.2,
		margin: 0.2,
		availability: 0.2,
		reliability: 0.2,
	};

	/// Overweight one axis at 0.5, availability kept meaningful at 0.15
	pub const fn favoring_price() -> Self {
		Self {
			price: 0.5,
			speed: 0.15,
			margin: 0.1,
			availability: 0.15,
			reliability: 0.1,
		}
	}

	pub const fn favoring_speed() -> Self {
		Self {
			price: 0.15,
			speed: 0.5,
			margin: 0.1,
			availability: 0.15,
			reliability: 0.1,
		}
	}

	pub const fn favoring_margin() -> Self {
		Self {
			price: 0.15,
			speed: 0.1,
			margin: 0.5,
			availability: 0.15,
			reliability: 0.1,
		}
	}

	pub fn sum(&self) -> f64 {
		self.price + self.speed + self.margin + self.availability + self.reliability
	}

	/// Weights must form a convex combination
	pub fn is_normalized(&self) -> bool {
		(self.sum() - 1.0).abs() < 1e-6
	}

	pub fn apply(&self, breakdown: &ScoreBreakdown) -> f64 {
		self.price * breakdown.price
			+ self.speed * breakdown.speed
			+ self.margin * breakdown.margin
			+ self.availability * breakdown.availability
			+ self.reliability * breakdown.reliability
	}
}

impl Default for ScoringWeights {
	fn default() -> Self {
		Self::BALANCED
	}
}

impl WeightTable {
	pub fn for_preference(&self, preference: OptimizationPreference) -> ScoringWeights {
		match preference {
			OptimizationPreference::Price => self.price,
			OptimizationPreference::Speed => self.speed,
			OptimizationPreference::Margin => self.margin,
			OptimizationPreference::Balanced => self.balanced,
		}
	}

	pub fn validate(&self) -> Result<(), String> {
		for (name, weights) in [
			("price", &self.price),
			("speed", &self.speed),
			("margin", &self.margin),
			("balanced", &self.balanced),
		] {
			if !weights.is_normalized() {
				return Err(format!(
					"scoring weights for '{}' preference sum to {}, expected 1.0",
					name,
					weights.sum()
				));
			}
		}
		Ok(())
	}
}

impl Default for WeightTable {
	fn default() -> Self {
		Self {
			price: ScoringWeights::favoring_price(),
			speed: ScoringWeights::favoring_speed(),
			margin: ScoringWeights::favoring_margin(),
			balanced: ScoringWeights::BALANCED,
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_default_weights_are_normalized() {
		assert!(WeightTable::default().validate().is_ok());
	}

	#[test]
	fn test_unnormalized_weights_rejected() {
		let mut table = WeightTable::default();
		table.price.price = 0.9;
		assert!(table.validate().is_err());
	}

	#[test]
	fn test_weight_selection_by_preference() {
		let table = WeightTable::default();

		let price = table.for_preference(OptimizationPreference::Price);
		assert_eq!(price.price, 0.5);

		let balanced = table.for_preference(OptimizationPreference::Balanced);
		assert_eq!(balanced.price, 0.2);
	}

	#[test]
	fn test_apply_is_convex_combination() {
		let breakdown = ScoreBreakdown {
			price: 100.0,
			speed: 100.0,
			margin: 100.0,
			availability: 100.0,
			reliability: 100.0,
			priority_boost: 0.0,
			total: 0.0,
		};

		let weighted = ScoringWeights::BALANCED.apply(&breakdown);
		assert!((weighted - 100.0).abs() < 1e-9);
	}
}
