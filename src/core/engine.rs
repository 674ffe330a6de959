use crate::core::estimator::PriceEstimator;
use crate::domain::model::{ComparableQuery, PropertyRecord, TargetParcel, ValuationOutcome};
use crate::domain::ports::{ComparableSource, CreditLedger, Storage};
use crate::utils::error::{PricerError, Result};
use chrono::Utc;
use std::collections::HashSet;
use std::sync::{Arc, Mutex};

/// Acreage sent to the comparable source when the target has no GIS area.
pub const DEFAULT_QUERY_ACRES: f64 = 10.0;

/// Runs one valuation: credit check, comparable fetch, estimate, debit, persist.
pub struct ValuationEngine<C: ComparableSource, L: CreditLedger, S: Storage> {
    source: C,
    ledger: L,
    storage: S,
    estimator: PriceEstimator,
    in_flight: Arc<Mutex<HashSet<String>>>,
}

impl<C: ComparableSource, L: CreditLedger, S: Storage> ValuationEngine<C, L, S> {
    pub fn new(source: C, ledger: L, storage: S) -> Self {
        Self::with_estimator(source, ledger, storage, PriceEstimator::default())
    }

    pub fn with_estimator(source: C, ledger: L, storage: S, estimator: PriceEstimator) -> Self {
        Self {
            source,
            ledger,
            storage,
            estimator,
            in_flight: Arc::new(Mutex::new(HashSet::new())),
        }
    }

    pub async fn run(&self, target: &TargetParcel) -> Result<ValuationOutcome> {
        let key = target.key();
        tracing::info!("🏷️ Starting valuation for {}", key);

        // 沒有額度就不執行
        let balance = self.ledger.balance().await?;
        if balance == 0 {
            tracing::warn!("Valuation blocked: no credits remaining");
            return Err(PricerError::InsufficientCredits);
        }

        let _guard = InFlightGuard::acquire(&self.in_flight, &key)?;

        let query = comparable_query(target);
        tracing::info!("🔎 Fetching comparables ({} acres)", query.acres);
        let observations = self
            .source
            .fetch_comparables(&query)
            .await
            .map_err(|e| match e {
                PricerError::UpstreamFetch { .. } | PricerError::ValidationError { .. } => e,
                other => PricerError::upstream(other.to_string()),
            })?;
        tracing::info!("Fetched {} comparable listings", observations.len());

        let estimate = self.estimator.estimate(&observations, target)?;
        tracing::info!(
            "📈 Predicted {} with {}% confidence",
            estimate.predicted_price,
            estimate.confidence_score
        );

        let record = PropertyRecord {
            key: key.clone(),
            target: target.clone(),
            predicted_price: estimate.predicted_price.clone(),
            confidence_score: estimate.confidence_score.to_string(),
            price_reasoning: estimate.reasoning.clone(),
            acre_prices: observations,
            saved_at: Utc::now(),
        };
        let record_path = record_path(&key);
        let json = serde_json::to_vec_pretty(&record)?;

        // 先扣點再寫檔，並行的執行不會同時用掉最後一點
        let credits_remaining = self.ledger.debit().await?;

        tracing::debug!("Writing property record ({} bytes) to {}", json.len(), record_path);
        if let Err(e) = self.storage.write_file(&record_path, &json).await {
            tracing::warn!("Saving {} failed, refunding credit: {}", record_path, e);
            if let Err(refund_err) = self.ledger.refund().await {
                tracing::error!("Credit refund failed: {}", refund_err);
            }
            return Err(e);
        }
        tracing::info!("💳 Credits remaining: {}", credits_remaining);

        Ok(ValuationOutcome {
            estimate,
            record_path,
            credits_remaining,
            generated_at: Utc::now(),
        })
    }

    /// Reads back the record saved by the last successful run for `target`.
    pub async fn load_record(&self, target: &TargetParcel) -> Result<PropertyRecord> {
        let path = record_path(&target.key());
        tracing::debug!("Loading property record from {}", path);
        let data = self.storage.read_file(&path).await?;
        Ok(serde_json::from_slice(&data)?)
    }

    pub fn is_running(&self, target: &TargetParcel) -> bool {
        lock_in_flight(&self.in_flight).contains(&target.key())
    }
}

pub fn comparable_query(target: &TargetParcel) -> ComparableQuery {
    let address = target.address.as_ref();
    ComparableQuery {
        city: address.and_then(|a| a.city.clone()),
        zip_code: address.and_then(|a| a.zipcode.clone()),
        acres: target.usable_area().unwrap_or(DEFAULT_QUERY_ACRES),
    }
}

/// `properties/<slug>.json`, slug being the lower-cased key with runs of
/// non-alphanumerics collapsed to `-`.
pub fn record_path(key: &str) -> String {
    let mut slug = String::with_capacity(key.len());
    for ch in key.chars() {
        if ch.is_ascii_alphanumeric() {
            slug.push(ch.to_ascii_lowercase());
        } else if !slug.ends_with('-') && !slug.is_empty() {
            slug.push('-');
        }
    }
    let slug = slug.trim_end_matches('-');
    format!("properties/{}.json", slug)
}

fn lock_in_flight(set: &Mutex<HashSet<String>>) -> std::sync::MutexGuard<'_, HashSet<String>> {
    set.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

struct InFlightGuard {
    set: Arc<Mutex<HashSet<String>>>,
    key: String,
}

impl InFlightGuard {
    fn acquire(set: &Arc<Mutex<HashSet<String>>>, key: &str) -> Result<Self> {
        if !lock_in_flight(set).insert(key.to_string()) {
            return Err(PricerError::EstimateInProgress {
                key: key.to_string(),
            });
        }
        Ok(Self {
            set: Arc::clone(set),
            key: key.to_string(),
        })
    }
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        lock_in_flight(&self.set).remove(&self.key);
    }
}
