use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{NaiveDate, TimeZone, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::*;
use crate::accounts::{Account, AccountRepositoryTrait, NewAccount, TradingMode};
use crate::errors::{DatabaseError, Error, Result};
use crate::portfolio::holdings::{open_position, Holding, HoldingRepositoryTrait};
use crate::quotes::{DividendInfo, EarningsInfo, Quote, QuoteOracleTrait};

#[derive(Default)]
struct MockAccounts {
    accounts: Mutex<Vec<Account>>,
}

#[async_trait]
impl AccountRepositoryTrait for MockAccounts {
    async fn create(&self, account: Account) -> Result<Account> {
        self.accounts.lock().unwrap().push(account.clone());
        Ok(account)
    }

    async fn update(&self, account: Account) -> Result<Account> {
        Ok(account)
    }

    fn get_by_id(&self, account_id: &str) -> Result<Account> {
        self.accounts
            .lock()
            .unwrap()
            .iter()
            .find(|a| a.id == account_id)
            .cloned()
            .ok_or_else(|| DatabaseError::NotFound(account_id.to_string()).into())
    }

    fn list(&self) -> Result<Vec<Account>> {
        Ok(self.accounts.lock().unwrap().clone())
    }
}

#[derive(Default)]
struct MockHoldings {
    holdings: Mutex<Vec<Holding>>,
    broken_accounts: Mutex<Vec<String>>,
}

impl HoldingRepositoryTrait for MockHoldings {
    fn list_by_account_and_mode(
        &self,
        account_id: &str,
        mode: TradingMode,
    ) -> Result<Vec<Holding>> {
        if self
            .broken_accounts
            .lock()
            .unwrap()
            .iter()
            .any(|id| id == account_id)
        {
            return Err(DatabaseError::QueryFailed("connection reset".to_string()).into());
        }
        Ok(self
            .holdings
            .lock()
            .unwrap()
            .iter()
            .filter(|h| h.account_id == account_id && h.mode == mode)
            .cloned()
            .collect())
    }

    fn get(&self, account_id: &str, symbol: &str, mode: TradingMode) -> Result<Option<Holding>> {
        Ok(self
            .list_by_account_and_mode(account_id, mode)?
            .into_iter()
            .find(|h| h.symbol == symbol))
    }
}

#[derive(Default)]
struct MockSnapshots {
    rows: Mutex<HashMap<(String, NaiveDate, TradingMode), PortfolioSnapshot>>,
}

#[async_trait]
impl SnapshotRepositoryTrait for MockSnapshots {
    async fn save_or_update_snapshot(
        &self,
        snapshot: PortfolioSnapshot,
    ) -> Result<PortfolioSnapshot> {
        let mut rows = self.rows.lock().unwrap();
        let key = (
            snapshot.account_id.clone(),
            snapshot.snapshot_date,
            snapshot.mode,
        );
        let stored = match rows.get(&key) {
            Some(existing) => PortfolioSnapshot {
                id: existing.id.clone(),
                ..snapshot
            },
            None => snapshot,
        };
        rows.insert(key, stored.clone());
        Ok(stored)
    }

    fn get_snapshot(
        &self,
        account_id: &str,
        date: NaiveDate,
        mode: TradingMode,
    ) -> Result<Option<PortfolioSnapshot>> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .get(&(account_id.to_string(), date, mode))
            .cloned())
    }

    fn get_snapshots_in_range(
        &self,
        account_id: &str,
        mode: TradingMode,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Vec<PortfolioSnapshot>> {
        let mut rows: Vec<PortfolioSnapshot> = self
            .rows
            .lock()
            .unwrap()
            .values()
            .filter(|s| {
                s.account_id == account_id
                    && s.mode == mode
                    && s.snapshot_date >= start_date
                    && s.snapshot_date <= end_date
            })
            .cloned()
            .collect();
        rows.sort_by_key(|s| s.snapshot_date);
        Ok(rows)
    }
}

#[derive(Default)]
struct MockQuotes {
    prices: Mutex<HashMap<String, Decimal>>,
}

impl MockQuotes {
    fn set_price(&self, symbol: &str, price: Decimal) {
        self.prices
            .lock()
            .unwrap()
            .insert(symbol.to_string(), price);
    }
}

#[async_trait]
impl QuoteOracleTrait for MockQuotes {
    async fn get_quote(&self, symbol: &str) -> Result<Option<Quote>> {
        Ok(self
            .prices
            .lock()
            .unwrap()
            .get(symbol)
            .map(|p| Quote::new(symbol, *p, "USD")))
    }

    async fn get_earnings(&self, _symbol: &str) -> Result<Option<EarningsInfo>> {
        Ok(None)
    }

    async fn get_dividends(&self, _symbol: &str) -> Result<Option<DividendInfo>> {
        Ok(None)
    }
}

struct Fixture {
    service: SnapshotService,
    accounts: Arc<MockAccounts>,
    holdings: Arc<MockHoldings>,
    snapshots: Arc<MockSnapshots>,
    quotes: Arc<MockQuotes>,
}

fn fixture() -> Fixture {
    let accounts = Arc::new(MockAccounts::default());
    let holdings = Arc::new(MockHoldings::default());
    let snapshots = Arc::new(MockSnapshots::default());
    let quotes = Arc::new(MockQuotes::default());
    let service = SnapshotService::new(
        accounts.clone(),
        holdings.clone(),
        snapshots.clone(),
        quotes.clone(),
    );
    Fixture {
        service,
        accounts,
        holdings,
        snapshots,
        quotes,
    }
}

async fn add_account(f: &Fixture, name: &str, real_balance: Decimal) -> Account {
    let mut new_account = NewAccount::named(name);
    new_account.real_balance = Some(real_balance);
    let account = new_account.into_account(Utc::now()).unwrap();
    f.accounts.create(account).await.unwrap()
}

fn add_holding(f: &Fixture, account: &Account, symbol: &str, quantity: i64, cost: Decimal, mode: TradingMode) {
    let holding = open_position(
        &account.id,
        symbol,
        symbol,
        quantity,
        cost,
        "USD",
        mode,
        Utc::now(),
    )
    .unwrap();
    f.holdings.holdings.lock().unwrap().push(holding);
}

#[tokio::test]
async fn test_refresh_values_holdings_at_current_prices() {
    let f = fixture();
    let account = add_account(&f, "Jane", dec!(2500)).await;
    add_holding(&f, &account, "AAPL", 10, dec!(150), TradingMode::Real);
    add_holding(&f, &account, "MSFT", 2, dec!(300.12345), TradingMode::Real);
    f.quotes.set_price("AAPL", dec!(182.52));
    f.quotes.set_price("MSFT", dec!(410.333335));

    let snapshot = f
        .service
        .refresh_snapshot(&account.id, TradingMode::Real)
        .await
        .unwrap();

    // 1825.2 + 820.66667 = 2645.86667
    assert_eq!(snapshot.total_value, dec!(2645.8667));
    // 1500 + 2 * 300.1235
    assert_eq!(snapshot.total_cost_basis, dec!(2100.2470));
    assert_eq!(snapshot.cash_balance, dec!(2500));
    assert_eq!(snapshot.holdings_count, 2);
}

#[tokio::test]
async fn test_refresh_twice_same_day_keeps_one_row_with_latest_values() {
    let f = fixture();
    let account = add_account(&f, "Jane", dec!(0)).await;
    add_holding(&f, &account, "AAPL", 10, dec!(150), TradingMode::Real);
    let morning = Utc.with_ymd_and_hms(2026, 10, 16, 9, 0, 0).unwrap();
    let evening = Utc.with_ymd_and_hms(2026, 10, 16, 21, 0, 0).unwrap();

    f.quotes.set_price("AAPL", dec!(150));
    let first = f
        .service
        .refresh_snapshot_at(&account.id, TradingMode::Real, morning)
        .await
        .unwrap();
    f.quotes.set_price("AAPL", dec!(160));
    let second = f
        .service
        .refresh_snapshot_at(&account.id, TradingMode::Real, evening)
        .await
        .unwrap();

    assert_eq!(f.snapshots.rows.lock().unwrap().len(), 1);
    assert_eq!(second.id, first.id);
    let stored = f
        .snapshots
        .get_snapshot(&account.id, morning.date_naive(), TradingMode::Real)
        .unwrap()
        .unwrap();
    assert_eq!(stored.total_value, dec!(1600));
    assert_eq!(stored.calculated_at, evening);
}

#[tokio::test]
async fn test_empty_partition_records_zero_snapshot_with_cash() {
    let f = fixture();
    let account = add_account(&f, "Jane", dec!(750.5)).await;

    let snapshot = f
        .service
        .refresh_snapshot(&account.id, TradingMode::Real)
        .await
        .unwrap();

    assert_eq!(snapshot.total_value, Decimal::ZERO);
    assert_eq!(snapshot.total_cost_basis, Decimal::ZERO);
    assert_eq!(snapshot.holdings_count, 0);
    assert_eq!(snapshot.cash_balance, dec!(750.5));
}

#[tokio::test]
async fn test_quote_miss_values_holding_at_zero() {
    let f = fixture();
    let account = add_account(&f, "Jane", dec!(0)).await;
    add_holding(&f, &account, "AAPL", 10, dec!(150), TradingMode::Paper);
    add_holding(&f, &account, "GONE", 5, dec!(20), TradingMode::Paper);
    f.quotes.set_price("AAPL", dec!(155));

    let snapshot = f
        .service
        .refresh_snapshot(&account.id, TradingMode::Paper)
        .await
        .unwrap();

    assert_eq!(snapshot.total_value, dec!(1550));
    assert_eq!(snapshot.total_cost_basis, dec!(1600));
    assert_eq!(snapshot.cash_balance, dec!(100000));
}

#[tokio::test]
async fn test_nightly_batch_skips_empty_partitions_and_isolates_failures() {
    let f = fixture();
    let healthy = add_account(&f, "Healthy", dec!(0)).await;
    let broken = add_account(&f, "Broken", dec!(0)).await;
    let idle = add_account(&f, "Idle", dec!(0)).await;
    add_holding(&f, &broken, "AAPL", 1, dec!(100), TradingMode::Real);
    add_holding(&f, &healthy, "AAPL", 1, dec!(100), TradingMode::Real);
    add_holding(&f, &healthy, "MSFT", 1, dec!(300), TradingMode::Paper);
    f.quotes.set_price("AAPL", dec!(110));
    f.quotes.set_price("MSFT", dec!(310));
    f.holdings
        .broken_accounts
        .lock()
        .unwrap()
        .push(broken.id.clone());

    let summary = f.service.run_nightly_batch().await.unwrap();

    assert_eq!(summary.accounts_processed, 3);
    assert_eq!(summary.snapshots_written, 2);
    assert_eq!(summary.failed_accounts, vec![broken.id.clone()]);

    let rows = f.snapshots.rows.lock().unwrap();
    assert!(rows.values().all(|s| s.account_id == healthy.id));
    assert!(!rows.values().any(|s| s.account_id == idle.id));
}

#[tokio::test]
async fn test_unknown_account_is_an_error() {
    let f = fixture();
    let result = f
        .service
        .refresh_snapshot("missing", TradingMode::Real)
        .await;
    assert!(matches!(
        result,
        Err(Error::Database(DatabaseError::NotFound(_)))
    ));
}
