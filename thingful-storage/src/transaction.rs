//! Scoped transactions
//!
//! A [`Transaction`] is finalized at most once. If it goes out of scope
//! without an explicit commit, the store transaction it wraps is dropped and
//! rolled back, so an early `?` return never leaves partial writes behind.

use thingful_api_types::{Review, Thing, User};
use tracing::{debug, warn};

use crate::connection::{SeedStore, SeedTransaction, Table};
use crate::{StorageError, StorageResult};

/// Transaction wrapper
pub struct Transaction {
    inner: Option<Box<dyn SeedTransaction>>,
    label: &'static str,
}

impl Transaction {
    /// Begin a transaction on `store`; `label` names it in logs
    pub async fn begin(store: &dyn SeedStore, label: &'static str) -> StorageResult<Self> {
        let inner = store.begin().await?;
        debug!("Transaction '{}' started", label);
        Ok(Self {
            inner: Some(inner),
            label,
        })
    }

    /// Whether commit or rollback has already run
    pub fn is_finalized(&self) -> bool {
        self.inner.is_none()
    }

    pub async fn truncate(&mut self, tables: &[Table]) -> StorageResult<()> {
        self.active()?.truncate(tables).await
    }

    pub async fn reset_sequence(&mut self, table: Table, start: i64) -> StorageResult<()> {
        self.active()?.reset_sequence(table, start).await
    }

    pub async fn set_sequence(&mut self, table: Table, value: i64) -> StorageResult<()> {
        self.active()?.set_sequence(table, value).await
    }

    pub async fn next_id(&mut self, table: Table) -> StorageResult<i64> {
        self.active()?.next_id(table).await
    }

    pub async fn insert_users(&mut self, users: &[User]) -> StorageResult<u64> {
        self.active()?.insert_users(users).await
    }

    pub async fn insert_things(&mut self, things: &[Thing]) -> StorageResult<u64> {
        self.active()?.insert_things(things).await
    }

    pub async fn insert_reviews(&mut self, reviews: &[Review]) -> StorageResult<u64> {
        self.active()?.insert_reviews(reviews).await
    }

    /// Commit the transaction
    pub async fn commit(mut self) -> StorageResult<()> {
        let tx = self.take()?;
        tx.commit().await?;
        debug!("Transaction '{}' committed", self.label);
        Ok(())
    }

    /// Rollback the transaction
    pub async fn rollback(mut self) -> StorageResult<()> {
        let tx = self.take()?;
        tx.rollback().await?;
        debug!("Transaction '{}' rolled back", self.label);
        Ok(())
    }

    fn active(&mut self) -> StorageResult<&mut Box<dyn SeedTransaction>> {
        self.inner.as_mut().ok_or_else(|| {
            StorageError::TransactionFailed(format!(
                "Transaction '{}' already finalized",
                self.label
            ))
        })
    }

    fn take(&mut self) -> StorageResult<Box<dyn SeedTransaction>> {
        self.inner.take().ok_or_else(|| {
            StorageError::TransactionFailed(format!(
                "Transaction '{}' already finalized",
                self.label
            ))
        })
    }
}

impl Drop for Transaction {
    fn drop(&mut self) {
        if self.inner.is_some() {
            warn!("Transaction '{}' dropped before commit, rolling back", self.label);
        }
    }
}
