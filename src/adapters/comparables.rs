use crate::domain::model::{ComparableObservation, ComparableQuery};
use crate::domain::ports::ComparableSource;
use crate::utils::error::{PricerError, Result};
use async_trait::async_trait;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Shape returned by the acre-price lookup: `{"prices": [...]}`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ComparablesDocument {
    Wrapped { prices: Vec<ComparableObservation> },
    Bare(Vec<ComparableObservation>),
}

impl ComparablesDocument {
    fn into_observations(self) -> Vec<ComparableObservation> {
        match self {
            Self::Wrapped { prices } => prices,
            Self::Bare(prices) => prices,
        }
    }
}

pub fn parse_json(data: &[u8]) -> Result<Vec<ComparableObservation>> {
    let document: ComparablesDocument = serde_json::from_slice(data)?;
    Ok(document.into_observations())
}

/// Expects a header row with `address`, `acre` (or `acres`) and `price` columns.
/// Empty cells become missing values.
pub fn parse_csv(data: &[u8]) -> Result<Vec<ComparableObservation>> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(data);

    let mut observations = Vec::new();
    for row in reader.deserialize() {
        let observation: ComparableObservation = row?;
        observations.push(observation);
    }
    Ok(observations)
}

/// Comparables exported to a local JSON or CSV file. The query is only logged.
#[derive(Debug, Clone)]
pub struct FileComparableSource {
    path: PathBuf,
    require_zip_code: bool,
}

impl FileComparableSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            require_zip_code: false,
        }
    }

    /// Rejects queries without a zip code, like the market lookup the file was exported from.
    pub fn require_zip_code(mut self, required: bool) -> Self {
        self.require_zip_code = required;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn is_csv(&self) -> bool {
        self.path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.eq_ignore_ascii_case("csv"))
            .unwrap_or(false)
    }
}

#[async_trait]
impl ComparableSource for FileComparableSource {
    async fn fetch_comparables(&self, query: &ComparableQuery) -> Result<Vec<ComparableObservation>> {
        let has_zip = query
            .zip_code
            .as_deref()
            .is_some_and(|zip| !zip.trim().is_empty());
        if self.require_zip_code && !has_zip {
            return Err(PricerError::ValidationError {
                message: "Missing zip code for property".to_string(),
            });
        }

        tracing::debug!(
            "Reading comparables from {} (city: {:?}, zip: {:?})",
            self.path.display(),
            query.city,
            query.zip_code
        );

        let data = tokio::fs::read(&self.path).await.map_err(|e| {
            PricerError::upstream(format!("{}: {}", self.path.display(), e))
        })?;

        if self.is_csv() {
            parse_csv(&data)
        } else {
            parse_json(&data)
        }
    }
}
