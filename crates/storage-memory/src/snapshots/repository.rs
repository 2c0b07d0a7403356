use async_trait::async_trait;
use chrono::NaiveDate;
use tradedesk_core::accounts::TradingMode;
use tradedesk_core::errors::Result;
use tradedesk_core::portfolio::snapshot::{PortfolioSnapshot, SnapshotRepositoryTrait};

use crate::db::MemoryDb;

pub struct SnapshotRepository {
    db: MemoryDb,
}

impl SnapshotRepository {
    pub fn new(db: MemoryDb) -> Self {
        Self { db }
    }
}

#[async_trait]
impl SnapshotRepositoryTrait for SnapshotRepository {
    async fn save_or_update_snapshot(
        &self,
        snapshot: PortfolioSnapshot,
    ) -> Result<PortfolioSnapshot> {
        self.db.write(|state| {
            let key = (
                snapshot.account_id.clone(),
                snapshot.snapshot_date,
                snapshot.mode,
            );
            let stored = match state.snapshots.get(&key) {
                Some(existing) => PortfolioSnapshot {
                    id: existing.id.clone(),
                    ..snapshot
                },
                None => snapshot,
            };
            state.snapshots.insert(key, stored.clone());
            Ok(stored)
        })
    }

    fn get_snapshot(
        &self,
        account_id: &str,
        date: NaiveDate,
        mode: TradingMode,
    ) -> Result<Option<PortfolioSnapshot>> {
        self.db.read(|state| {
            state
                .snapshots
                .get(&(account_id.to_string(), date, mode))
                .cloned()
        })
    }

    fn get_snapshots_in_range(
        &self,
        account_id: &str,
        mode: TradingMode,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Vec<PortfolioSnapshot>> {
        let mut snapshots: Vec<PortfolioSnapshot> = self.db.read(|state| {
            state
                .snapshots
                .values()
                .filter(|s| {
                    s.account_id == account_id
                        && s.mode == mode
                        && s.snapshot_date >= start_date
                        && s.snapshot_date <= end_date
                })
                .cloned()
                .collect()
        })?;
        snapshots.sort_by_key(|s| s.snapshot_date);
        Ok(snapshots)
    }
}
