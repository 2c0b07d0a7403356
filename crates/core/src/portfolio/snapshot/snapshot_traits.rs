//! Repository trait for portfolio snapshots.

use async_trait::async_trait;
use chrono::NaiveDate;

use super::PortfolioSnapshot;
use crate::accounts::TradingMode;
use crate::errors::Result;

#[async_trait]
pub trait SnapshotRepositoryTrait: Send + Sync {
    /// Inserts the snapshot, or overwrites the amounts of the row already
    /// stored under its `(account_id, snapshot_date, mode)` key.
    ///
    /// Atomic per key; concurrent writers resolve last-writer-wins. Returns
    /// the stored row, which keeps the id of an overwritten row.
    async fn save_or_update_snapshot(&self, snapshot: PortfolioSnapshot)
        -> Result<PortfolioSnapshot>;

    fn get_snapshot(
        &self,
        account_id: &str,
        date: NaiveDate,
        mode: TradingMode,
    ) -> Result<Option<PortfolioSnapshot>>;

    /// Snapshots with `start_date <= snapshot_date <= end_date`, oldest first.
    fn get_snapshots_in_range(
        &self,
        account_id: &str,
        mode: TradingMode,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Vec<PortfolioSnapshot>>;
}
