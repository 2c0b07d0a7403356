use std::sync::Arc;

use chrono::NaiveDate;
use log::debug;

use super::performance_calculator::calculate_performance_history;
use super::performance_model::PerformanceHistory;
use crate::accounts::TradingMode;
use crate::errors::Result;
use crate::portfolio::snapshot::SnapshotRepositoryTrait;
use crate::utils::time_utils::{trailing_window, valuation_date_today};

pub trait PerformanceServiceTrait: Send + Sync {
    /// Return series over the trailing `days` days, ending today.
    fn build(&self, account_id: &str, mode: TradingMode, days: i64) -> Result<PerformanceHistory>;

    /// Return series over `[today - days, today]`.
    fn build_until(
        &self,
        account_id: &str,
        mode: TradingMode,
        days: i64,
        today: NaiveDate,
    ) -> Result<PerformanceHistory>;
}

pub struct PerformanceService {
    snapshot_repository: Arc<dyn SnapshotRepositoryTrait>,
}

impl PerformanceService {
    pub fn new(snapshot_repository: Arc<dyn SnapshotRepositoryTrait>) -> Self {
        Self {
            snapshot_repository,
        }
    }
}

impl PerformanceServiceTrait for PerformanceService {
    fn build(&self, account_id: &str, mode: TradingMode, days: i64) -> Result<PerformanceHistory> {
        self.build_until(account_id, mode, days, valuation_date_today())
    }

    fn build_until(
        &self,
        account_id: &str,
        mode: TradingMode,
        days: i64,
        today: NaiveDate,
    ) -> Result<PerformanceHistory> {
        let (start_date, end_date) = trailing_window(today, days);
        let snapshots = self
            .snapshot_repository
            .get_snapshots_in_range(account_id, mode, start_date, end_date)?;
        debug!(
            "Building performance for {} ({}) from {} snapshot(s) in {}..={}",
            account_id,
            mode,
            snapshots.len(),
            start_date,
            end_date
        );

        Ok(PerformanceHistory {
            account_id: account_id.to_string(),
            mode,
            start_date,
            end_date,
            points: calculate_performance_history(&snapshots),
        })
    }
}
