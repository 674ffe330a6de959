//! Single-seed threshold clustering of per-acre prices.
//!
//! Each cluster is seeded by the first unassigned value and takes every other
//! unassigned value within `threshold` (relative to the seed) of it. Membership
//! is decided against the seed only, so members never attract further values.
//! The clusters partition the input: every value lands in exactly one cluster.

use serde::Serialize;

pub const DEFAULT_SIMILARITY_THRESHOLD: f64 = 0.25;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Cluster {
    pub seed: f64,
    /// Members in input order; the seed is always first.
    pub members: Vec<f64>,
}

impl Cluster {
    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn mean(&self) -> f64 {
        self.members.iter().sum::<f64>() / self.members.len() as f64
    }
}

/// Relative distance of `value` from `seed`. `seed` must be positive.
#[inline]
pub fn relative_difference(value: f64, seed: f64) -> f64 {
    (value - seed).abs() / seed
}

/// Partitions `prices` into clusters in seed order.
///
/// Values are expected to be positive; callers filter invalid observations first.
pub fn cluster_prices(prices: &[f64], threshold: f64) -> Vec<Cluster> {
    let mut assigned = vec![false; prices.len()];
    let mut clusters = Vec::new();

    for seed_idx in 0..prices.len() {
        if assigned[seed_idx] {
            continue;
        }
        assigned[seed_idx] = true;

        let seed = prices[seed_idx];
        let mut members = vec![seed];

        for (idx, &value) in prices.iter().enumerate().skip(seed_idx + 1) {
            if !assigned[idx] && relative_difference(value, seed) <= threshold {
                assigned[idx] = true;
                members.push(value);
            }
        }

        clusters.push(Cluster { seed, members });
    }

    clusters
}
