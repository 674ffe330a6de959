use crate::core::clustering::Cluster;
use crate::domain::model::TargetPricingContext;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SelectionReason {
    NearestToCurrentValue,
    LargestCluster,
}

impl SelectionReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NearestToCurrentValue => "nearest to property's current value",
            Self::LargestCluster => "largest cluster available",
        }
    }
}

impl std::fmt::Display for SelectionReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Picks the cluster used for the estimate. Returns `None` only for an empty list.
///
/// With a known current value, the cluster whose mean is nearest that value wins.
/// Otherwise the largest cluster wins. Ties always go to the earliest cluster.
pub fn select_cluster<'a>(
    clusters: &'a [Cluster],
    context: &TargetPricingContext,
) -> Option<(&'a Cluster, SelectionReason)> {
    match *context {
        TargetPricingContext::KnownCurrentValue(current) => clusters
            .iter()
            .map(|c| (c, (c.mean() - current).abs()))
            // min_by keeps the first of equal elements
            .min_by(|(_, a), (_, b)| a.partial_cmp(b).unwrap_or(Ordering::Equal))
            .map(|(c, _)| (c, SelectionReason::NearestToCurrentValue)),
        TargetPricingContext::Unknown => clusters
            .iter()
            .min_by_key(|c| std::cmp::Reverse(c.len()))
            .map(|c| (c, SelectionReason::LargestCluster)),
    }
}
