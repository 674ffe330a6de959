use crate::domain::model::{ComparableObservation, ComparableQuery};
use crate::utils::error::Result;
use async_trait::async_trait;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

/// Supplies comparable sales for a location. Errors are reported as upstream fetch
/// failures, except `ValidationError` for a query the source cannot serve.
#[async_trait]
pub trait ComparableSource: Send + Sync {
    async fn fetch_comparables(&self, query: &ComparableQuery) -> Result<Vec<ComparableObservation>>;
}

/// Usage-credit balance. One credit is consumed per successful estimate.
#[async_trait]
pub trait CreditLedger: Send + Sync {
    async fn balance(&self) -> Result<u64>;
    /// Consumes one credit and returns the remaining balance.
    /// Fails with `InsufficientCredits` at zero; check and decrement are atomic.
    async fn debit(&self) -> Result<u64>;
    /// Gives back a credit taken by `debit` for a run that did not complete.
    async fn refund(&self) -> Result<u64>;
}
