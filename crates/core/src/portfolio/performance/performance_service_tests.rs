use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{Duration, NaiveDate, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::*;
use crate::accounts::TradingMode;
use crate::errors::Result;
use crate::portfolio::snapshot::{PortfolioSnapshot, SnapshotRepositoryTrait};

fn day(n: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 10, n).unwrap()
}

fn snapshot(date: NaiveDate, total_value: Decimal) -> PortfolioSnapshot {
    PortfolioSnapshot {
        id: uuid::Uuid::new_v4().to_string(),
        account_id: "acc-1".to_string(),
        snapshot_date: date,
        mode: TradingMode::Real,
        total_value,
        total_cost_basis: dec!(1000),
        cash_balance: dec!(0),
        holdings_count: 1,
        calculated_at: Utc::now(),
    }
}

#[test]
fn test_returns_against_previous_and_first_value() {
    let series = vec![
        snapshot(day(1), dec!(1000)),
        snapshot(day(2), dec!(1100)),
        snapshot(day(3), dec!(1050)),
    ];

    let points = calculate_performance_history(&series);

    let cumulative: Vec<Decimal> = points.iter().map(|p| p.cumulative_return).collect();
    assert_eq!(cumulative, vec![dec!(0), dec!(10), dec!(5)]);
    let daily: Vec<Decimal> = points.iter().map(|p| p.daily_return).collect();
    assert_eq!(daily, vec![dec!(0), dec!(10), dec!(-4.55)]);
    assert_eq!(points[2].date, day(3));
}

#[test]
fn test_empty_series_is_empty() {
    assert!(calculate_performance_history(&[]).is_empty());
}

#[test]
fn test_zero_base_values_give_zero_returns() {
    let series = vec![
        snapshot(day(1), dec!(0)),
        snapshot(day(2), dec!(500)),
        snapshot(day(3), dec!(550)),
    ];

    let points = calculate_performance_history(&series);

    assert_eq!(points[1].daily_return, dec!(0));
    assert_eq!(points[2].daily_return, dec!(10));
    assert!(points.iter().all(|p| p.cumulative_return.is_zero()));
}

#[test]
fn test_portfolio_value_rounds_to_two_places() {
    let points = calculate_performance_history(&[snapshot(day(1), dec!(1234.5678))]);
    assert_eq!(points[0].portfolio_value, dec!(1234.57));
}

struct FixedSnapshots {
    rows: Mutex<Vec<PortfolioSnapshot>>,
}

#[async_trait]
impl SnapshotRepositoryTrait for FixedSnapshots {
    async fn save_or_update_snapshot(
        &self,
        snapshot: PortfolioSnapshot,
    ) -> Result<PortfolioSnapshot> {
        self.rows.lock().unwrap().push(snapshot.clone());
        Ok(snapshot)
    }

    fn get_snapshot(
        &self,
        _account_id: &str,
        _date: NaiveDate,
        _mode: TradingMode,
    ) -> Result<Option<PortfolioSnapshot>> {
        Ok(None)
    }

    fn get_snapshots_in_range(
        &self,
        account_id: &str,
        mode: TradingMode,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Vec<PortfolioSnapshot>> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|s| {
                s.account_id == account_id
                    && s.mode == mode
                    && s.snapshot_date >= start_date
                    && s.snapshot_date <= end_date
            })
            .cloned()
            .collect())
    }
}

#[test]
fn test_build_reads_trailing_window() {
    let today = day(16);
    let repository = Arc::new(FixedSnapshots {
        rows: Mutex::new(vec![
            snapshot(today - Duration::days(40), dec!(500)),
            snapshot(today - Duration::days(2), dec!(1000)),
            snapshot(today - Duration::days(1), dec!(1100)),
            snapshot(today, dec!(1050)),
        ]),
    });
    let service = PerformanceService::new(repository);

    let history = service
        .build_until("acc-1", TradingMode::Real, 30, today)
        .unwrap();

    assert_eq!(history.start_date, day(16) - Duration::days(30));
    assert_eq!(history.points.len(), 3);
    assert_eq!(history.total_return(), Some(dec!(5)));

    let paper = service
        .build_until("acc-1", TradingMode::Paper, 30, today)
        .unwrap();
    assert!(paper.points.is_empty());
    assert_eq!(paper.total_return(), None);
}

#[test]
fn test_build_with_unbounded_days_covers_full_history() {
    let today = day(16);
    let repository = Arc::new(FixedSnapshots {
        rows: Mutex::new(vec![
            snapshot(today - Duration::days(4000), dec!(800)),
            snapshot(today, dec!(1000)),
        ]),
    });
    let service = PerformanceService::new(repository);

    let history = service
        .build_until("acc-1", TradingMode::Real, i64::MAX, today)
        .unwrap();

    assert_eq!(history.start_date, NaiveDate::MIN);
    assert_eq!(history.points.len(), 2);
    assert_eq!(history.total_return(), Some(dec!(25)));

    assert!(service.build("acc-1", TradingMode::Real, i64::MAX).is_ok());
}
