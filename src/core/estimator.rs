//! Comparable-sales price estimator.
//!
//! Pipeline: per-acre normalization, similarity clustering, cluster selection,
//! statistics and confidence, narrative. Pure and synchronous; no I/O.

use crate::core::clustering::{cluster_prices, DEFAULT_SIMILARITY_THRESHOLD};
use crate::core::narrative::Narrative;
use crate::core::selection::{select_cluster, SelectionReason};
use crate::core::statistics::ClusterStats;
use crate::domain::model::{ComparableObservation, Estimate, TargetParcel};
use crate::utils::error::EstimateError;
use crate::utils::format::format_currency;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EstimatorSettings {
    pub similarity_threshold: f64,
}

impl Default for EstimatorSettings {
    fn default() -> Self {
        Self {
            similarity_threshold: DEFAULT_SIMILARITY_THRESHOLD,
        }
    }
}

/// Everything derived while estimating, before the result is formatted.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PriceAnalysis {
    pub stats: ClusterStats,
    pub cluster_count: usize,
    pub cluster_sizes: Vec<usize>,
    pub current_price_per_acre: Option<f64>,
    pub selection_reason: SelectionReason,
}

#[derive(Debug, Clone, Default)]
pub struct PriceEstimator {
    settings: EstimatorSettings,
}

impl PriceEstimator {
    pub fn new(settings: EstimatorSettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &EstimatorSettings {
        &self.settings
    }

    /// Clusters the valid observations and describes the cluster chosen for `target`.
    pub fn analyze(
        &self,
        observations: &[ComparableObservation],
        target: &TargetParcel,
    ) -> Result<PriceAnalysis, EstimateError> {
        let prices_per_acre: Vec<f64> = observations
            .iter()
            .filter_map(ComparableObservation::price_per_acre)
            .collect();

        if prices_per_acre.is_empty() {
            return Err(EstimateError::NoValidObservations);
        }

        let clusters = cluster_prices(&prices_per_acre, self.settings.similarity_threshold);
        let context = target.pricing_context();

        let (selected, selection_reason) =
            select_cluster(&clusters, &context).ok_or(EstimateError::NoValidObservations)?;
        let stats = ClusterStats::compute(&selected.members, prices_per_acre.len())
            .ok_or(EstimateError::NoValidObservations)?;
        if !stats.is_finite() {
            return Err(EstimateError::NonFiniteEstimate);
        }

        tracing::debug!(
            valid = prices_per_acre.len(),
            ignored = observations.len() - prices_per_acre.len(),
            clusters = clusters.len(),
            selected = stats.member_count,
            reason = %selection_reason,
            "Clustered comparable prices"
        );

        Ok(PriceAnalysis {
            stats,
            cluster_count: clusters.len(),
            cluster_sizes: clusters.iter().map(|c| c.len()).collect(),
            current_price_per_acre: context.current_price_per_acre(),
            selection_reason,
        })
    }

    pub fn estimate(
        &self,
        observations: &[ComparableObservation],
        target: &TargetParcel,
    ) -> Result<Estimate, EstimateError> {
        let analysis = self.analyze(observations, target)?;
        let area = target.usable_area().ok_or(EstimateError::MissingTargetArea)?;

        let predicted_value = analysis.stats.mean * area;
        if !predicted_value.is_finite() {
            return Err(EstimateError::NonFiniteEstimate);
        }
        let confidence_score = analysis
            .stats
            .confidence()
            .ok_or(EstimateError::NonFiniteEstimate)?;
        let locality = target.locality_label();

        let reasoning = Narrative {
            stats: &analysis.stats,
            target_area_acres: area,
            locality: locality.as_deref(),
            current_price_per_acre: analysis.current_price_per_acre,
            similarity_threshold: self.settings.similarity_threshold,
        }
        .render();

        Ok(Estimate {
            predicted_price: format_currency(predicted_value),
            confidence_score,
            reasoning,
        })
    }
}

/// Estimates with the default 25% similarity threshold.
pub fn estimate(
    observations: &[ComparableObservation],
    target: &TargetParcel,
) -> Result<Estimate, EstimateError> {
    PriceEstimator::default().estimate(observations, target)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn obs(acre: f64, price: f64) -> ComparableObservation {
        ComparableObservation::new(None, Some(acre), Some(price))
    }

    #[test]
    fn test_invalid_observations_are_ignored() {
        let observations = vec![
            obs(10.0, 100_000.0),
            ComparableObservation::new(Some("no price"), Some(4.0), None),
            ComparableObservation::new(Some("no area"), None, Some(20_000.0)),
            obs(0.0, 40_000.0),
            obs(3.0, 0.0),
        ];

        let analysis = PriceEstimator::default()
            .analyze(&observations, &TargetParcel::with_area(1.0))
            .unwrap();

        assert_eq!(analysis.stats.total_count, 1);
        assert_eq!(analysis.stats.mean, 10_000.0);
        assert_eq!(analysis.cluster_sizes, vec![1]);
    }

    #[test]
    fn test_only_invalid_observations_fail() {
        let observations = vec![obs(0.0, 1.0), ComparableObservation::default()];
        assert_eq!(
            estimate(&observations, &TargetParcel::with_area(5.0)),
            Err(EstimateError::NoValidObservations)
        );
    }

    #[test]
    fn test_negative_area_fails() {
        assert_eq!(
            estimate(&[obs(1.0, 1_000.0)], &TargetParcel::with_area(-2.0)),
            Err(EstimateError::MissingTargetArea)
        );
        assert_eq!(
            estimate(&[obs(1.0, 1_000.0)], &TargetParcel::default()),
            Err(EstimateError::MissingTargetArea)
        );
    }

    #[test]
    fn test_overflowing_prices_fail_instead_of_estimating() {
        // ratio itself overflows, so nothing valid is left
        assert_eq!(
            estimate(&[obs(1e-300, 1e300)], &TargetParcel::with_area(10.0)),
            Err(EstimateError::NoValidObservations)
        );

        // each ratio is finite, their spread is not
        let spread = vec![obs(1.0, 1e200), obs(1.0, 1.1e200)];
        assert_eq!(
            PriceEstimator::default().analyze(&spread, &TargetParcel::with_area(1.0)),
            Err(EstimateError::NonFiniteEstimate)
        );

        // the cluster is fine, scaling it to the parcel is not
        assert_eq!(
            estimate(&[obs(1.0, 1e300)], &TargetParcel::with_area(1e10)),
            Err(EstimateError::NonFiniteEstimate)
        );
    }

    #[test]
    fn test_custom_threshold_changes_clusters() {
        let observations = vec![obs(1.0, 10_000.0), obs(1.0, 13_000.0)];
        let target = TargetParcel::with_area(1.0);

        let default = PriceEstimator::default().analyze(&observations, &target).unwrap();
        assert_eq!(default.cluster_count, 2);

        let wide = PriceEstimator::new(EstimatorSettings {
            similarity_threshold: 0.35,
        })
        .analyze(&observations, &target)
        .unwrap();
        assert_eq!(wide.cluster_count, 1);

        let estimate = PriceEstimator::new(EstimatorSettings {
            similarity_threshold: 0.35,
        })
        .estimate(&observations, &target)
        .unwrap();
        assert!(estimate.reasoning.contains("(within 35% of each other)"));
    }
}
