//! Descriptive statistics over the selected cluster and the confidence heuristic.
//!
//! Confidence is a linear map of the coefficient of variation: `cv = 0` gives 100,
//! `cv >= 0.5` gives 0. It is not a calibrated interval.

use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClusterStats {
    pub mean: f64,
    pub std_dev: f64,
    pub coefficient_of_variation: f64,
    pub min: f64,
    pub max: f64,
    pub member_count: usize,
    pub total_count: usize,
    pub outlier_count: usize,
}

impl ClusterStats {
    /// Returns `None` for an empty cluster or a `total_count` smaller than the cluster.
    pub fn compute(members: &[f64], total_count: usize) -> Option<Self> {
        let k = members.len();
        if k == 0 || total_count < k {
            return None;
        }

        let mean = members.iter().sum::<f64>() / k as f64;
        // population variance
        let variance = members.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / k as f64;
        let std_dev = variance.sqrt();

        let min = members.iter().copied().fold(f64::INFINITY, f64::min);
        let max = members.iter().copied().fold(f64::NEG_INFINITY, f64::max);

        Some(Self {
            mean,
            std_dev,
            coefficient_of_variation: std_dev / mean,
            min,
            max,
            member_count: k,
            total_count,
            outlier_count: total_count - k,
        })
    }

    /// False when summing or squaring the members overflowed.
    pub fn is_finite(&self) -> bool {
        self.mean.is_finite() && self.std_dev.is_finite() && self.coefficient_of_variation.is_finite()
    }

    pub fn confidence(&self) -> Option<u8> {
        confidence_from_cv(self.coefficient_of_variation)
    }
}

/// `clamp((1 - 2 * cv) * 100, 0, 100)`, rounded to the nearest integer.
/// `None` for a non-finite `cv`.
pub fn confidence_from_cv(cv: f64) -> Option<u8> {
    if !cv.is_finite() {
        return None;
    }
    let raw = (1.0 - cv * 2.0) * 100.0;
    Some(raw.clamp(0.0, 100.0).round() as u8)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stats_for_scenario_cluster() {
        let stats = ClusterStats::compute(&[10_000.0, 10_500.0], 3).unwrap();

        assert_eq!(stats.mean, 10_250.0);
        assert_eq!(stats.std_dev, 250.0);
        assert!((stats.coefficient_of_variation - 0.024390).abs() < 1e-6);
        assert_eq!(stats.min, 10_000.0);
        assert_eq!(stats.max, 10_500.0);
        assert_eq!(stats.member_count, 2);
        assert_eq!(stats.outlier_count, 1);
        assert_eq!(stats.member_count + stats.outlier_count, stats.total_count);
        assert_eq!(stats.confidence(), Some(95));
    }

    #[test]
    fn test_uniform_cluster() {
        let stats = ClusterStats::compute(&[7_000.0, 7_000.0, 7_000.0], 3).unwrap();
        assert_eq!(stats.std_dev, 0.0);
        assert_eq!(stats.coefficient_of_variation, 0.0);
        assert_eq!(stats.outlier_count, 0);
        assert_eq!(stats.confidence(), Some(100));
    }

    #[test]
    fn test_invalid_inputs() {
        assert!(ClusterStats::compute(&[], 0).is_none());
        assert!(ClusterStats::compute(&[1.0, 2.0], 1).is_none());
    }

    #[test]
    fn test_confidence_bounds() {
        assert_eq!(confidence_from_cv(0.0), Some(100));
        assert_eq!(confidence_from_cv(0.25), Some(50));
        assert_eq!(confidence_from_cv(0.5), Some(0));
        assert_eq!(confidence_from_cv(1.0), Some(0));
        assert_eq!(confidence_from_cv(7.5), Some(0));

        let mut cv = 0.0;
        while cv <= 2.0 {
            assert!(confidence_from_cv(cv).is_some_and(|c| c <= 100));
            cv += 0.01;
        }
    }

    #[test]
    fn test_overflowing_members_are_not_finite() {
        let stats = ClusterStats::compute(&[1e200, 1.1e200], 2).unwrap();
        assert!(stats.mean.is_finite());
        assert!(!stats.std_dev.is_finite());
        assert!(!stats.is_finite());

        assert!(ClusterStats::compute(&[10_000.0, 10_500.0], 2).unwrap().is_finite());
        assert_eq!(confidence_from_cv(f64::NAN), None);
        assert_eq!(confidence_from_cv(f64::INFINITY), None);
    }

    #[test]
    fn test_confidence_rounding() {
        // (1 - 2 * 0.0244) * 100 = 95.12
        assert_eq!(confidence_from_cv(0.0244), Some(95));
        // (1 - 2 * 0.1) * 100 = 80
        assert_eq!(confidence_from_cv(0.1), Some(80));
        assert_eq!(confidence_from_cv(0.001), Some(100));
    }
}
