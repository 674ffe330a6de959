use crate::domain::ports::CreditLedger;
use crate::utils::error::{PricerError, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;

#[derive(Debug)]
pub struct InMemoryCreditLedger {
    credits: Mutex<u64>,
}

impl InMemoryCreditLedger {
    pub fn new(credits: u64) -> Self {
        Self {
            credits: Mutex::new(credits),
        }
    }
}

#[async_trait]
impl CreditLedger for InMemoryCreditLedger {
    async fn balance(&self) -> Result<u64> {
        Ok(*self.credits.lock().await)
    }

    async fn debit(&self) -> Result<u64> {
        let mut credits = self.credits.lock().await;
        if *credits == 0 {
            return Err(PricerError::InsufficientCredits);
        }
        *credits -= 1;
        Ok(*credits)
    }

    async fn refund(&self) -> Result<u64> {
        let mut credits = self.credits.lock().await;
        *credits += 1;
        Ok(*credits)
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct LedgerFile {
    credits: u64,
}

/// Balance kept in a small JSON file (`{"credits": N}`) so it survives between CLI runs.
#[derive(Debug)]
pub struct FileCreditLedger {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileCreditLedger {
    /// Creates the ledger file with `initial_credits` if it does not exist yet.
    pub async fn open(path: impl Into<PathBuf>, initial_credits: u64) -> Result<Self> {
        let path = path.into();
        if !tokio::fs::try_exists(&path).await? {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                tokio::fs::create_dir_all(parent).await?;
            }
            write_ledger(&path, initial_credits).await?;
            tracing::debug!("Created credit ledger at {} with {} credits", path.display(), initial_credits);
        }

        Ok(Self {
            path,
            lock: Mutex::new(()),
        })
    }

    async fn read(&self) -> Result<u64> {
        let data = tokio::fs::read(&self.path).await?;
        let ledger: LedgerFile = serde_json::from_slice(&data)?;
        Ok(ledger.credits)
    }
}

async fn write_ledger(path: &Path, credits: u64) -> Result<()> {
    let json = serde_json::to_vec_pretty(&LedgerFile { credits })?;
    tokio::fs::write(path, json).await?;
    Ok(())
}

#[async_trait]
impl CreditLedger for FileCreditLedger {
    async fn balance(&self) -> Result<u64> {
        let _lock = self.lock.lock().await;
        self.read().await
    }

    async fn debit(&self) -> Result<u64> {
        let _lock = self.lock.lock().await;
        let credits = self.read().await?;
        if credits == 0 {
            return Err(PricerError::InsufficientCredits);
        }
        write_ledger(&self.path, credits - 1).await?;
        Ok(credits - 1)
    }

    async fn refund(&self) -> Result<u64> {
        let _lock = self.lock.lock().await;
        let credits = self.read().await? + 1;
        write_ledger(&self.path, credits).await?;
        tracing::debug!("Refunded one credit, balance now {}", credits);
        Ok(credits)
    }
}
