//! Markdown explanation attached to every estimate.
//!
//! The layout is consumed verbatim by display code, so the order and wording of
//! the lines below must not drift. Lines ending in two spaces are markdown line
//! breaks.

use crate::core::statistics::ClusterStats;
use crate::utils::format::{format_currency, format_fixed, format_percent};

pub struct Narrative<'a> {
    pub stats: &'a ClusterStats,
    pub target_area_acres: f64,
    pub locality: Option<&'a str>,
    pub current_price_per_acre: Option<f64>,
    pub similarity_threshold: f64,
}

impl Narrative<'_> {
    /// Ordered report lines; `None` entries are conditional lines that do not apply.
    fn sections(&self) -> Vec<Option<String>> {
        let stats = self.stats;
        let variation = format_percent(stats.coefficient_of_variation);
        let locality = self
            .locality
            .map(|l| format!(" in {}", l))
            .unwrap_or_default();

        vec![
            Some(format!(
                "Analysis based on a cluster of properties with characteristics most similar to your property ({} of {} properties){}:  ",
                stats.member_count, stats.total_count, locality
            )),
            Some(String::new()),
            Some(format!("• Average price per acre: {}  ", format_currency(stats.mean))),
            Some(format!(
                "• Range within cluster: {} to {} per acre  ",
                format_currency(stats.min),
                format_currency(stats.max)
            )),
            Some(format!("• Price variation: {}%  ", variation)),
            Some(format!(
                "• Your property: {} acres  ",
                format_fixed(self.target_area_acres, 2)
            )),
            self.current_price_per_acre
                .map(|p| format!("• Current property value per acre: {}", format_currency(p))),
            Some(format!("• Outliers excluded: {} properties  ", stats.outlier_count)),
            Some(String::new()),
            Some(format!(
                "This estimate uses similarity clustering to group properties with similar prices per acre (within {}% of each other) and selects the most relevant cluster for analysis. The coefficient of variation ({}%) indicates the spread of prices within the cluster - a lower percentage suggests more consistent pricing.",
                threshold_percent(self.similarity_threshold),
                variation
            )),
        ]
    }

    pub fn render(&self) -> String {
        self.sections()
            .into_iter()
            .flatten()
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// `0.25` -> `25`, `0.125` -> `12.5`.
fn threshold_percent(threshold: f64) -> String {
    let text = format_fixed(threshold * 100.0, 2);
    text.trim_end_matches('0').trim_end_matches('.').to_string()
}
