//! Event queue worker for processing domain events.
//!
//! Receives events from an mpsc channel, debounces them with a 1s window,
//! then processes the batch to refresh snapshots and revalue holdings.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tradedesk_core::{
    events::DomainEvent, portfolio::holdings::HoldingsServiceTrait,
    portfolio::snapshot::SnapshotServiceTrait,
};

use super::planner::{count_alert_triggers, plan_snapshot_refresh};

/// Debounce window for collecting events before processing.
pub(super) const DEBOUNCE_DURATION: Duration = Duration::from_millis(1000);

/// Dependencies needed by the queue worker for processing events.
pub struct QueueWorkerDeps {
    pub snapshot_service: Arc<dyn SnapshotServiceTrait>,
    pub holdings_service: Arc<dyn HoldingsServiceTrait>,
}

/// Runs the event queue worker.
///
/// Batches are processed inline, so a new batch never starts while the
/// previous one is still running; events keep queuing in the channel.
pub async fn event_queue_worker(
    mut rx: mpsc::UnboundedReceiver<DomainEvent>,
    deps: Arc<QueueWorkerDeps>,
) {
    tracing::info!("Domain event queue worker started");

    let mut pending_events: Vec<DomainEvent> = Vec::new();

    loop {
        if pending_events.is_empty() {
            // No pending events, wait for the first event
            match rx.recv().await {
                Some(e) => pending_events.push(e),
                None => {
                    tracing::info!("Domain event queue worker shutting down");
                    return;
                }
            }
            continue;
        }

        tokio::select! {
            event = rx.recv() => {
                match event {
                    Some(e) => pending_events.push(e),
                    None => {
                        // Channel closed, process remaining and exit
                        process_event_batch(&pending_events, &deps).await;
                        tracing::info!("Domain event queue worker shutting down");
                        return;
                    }
                }
            }
            _ = tokio::time::sleep(DEBOUNCE_DURATION) => {
                let batch = std::mem::take(&mut pending_events);
                process_event_batch(&batch, &deps).await;
            }
        }
    }
}

/// Processes a batch of domain events.
async fn process_event_batch(events: &[DomainEvent], deps: &QueueWorkerDeps) {
    tracing::info!("Processing batch of {} domain event(s)", events.len());

    let triggered = count_alert_triggers(events);
    if triggered > 0 {
        tracing::debug!("{} alert trigger(s) in batch", triggered);
    }

    for (account_id, mode) in plan_snapshot_refresh(events) {
        match deps.snapshot_service.refresh_snapshot(&account_id, mode).await {
            Ok(snapshot) => tracing::debug!(
                "Refreshed {} snapshot for {} on {}: value {}",
                mode,
                account_id,
                snapshot.snapshot_date,
                snapshot.total_value
            ),
            Err(e) => {
                tracing::warn!(
                    "Post-trade snapshot refresh failed for {} ({}): {}",
                    account_id,
                    mode,
                    e
                );
                continue;
            }
        }

        match deps
            .holdings_service
            .get_portfolio_summary(&account_id, mode)
            .await
        {
            Ok(summary) => tracing::info!(
                "Portfolio {} ({}): {} {} across {} holding(s), P/L {}%",
                account_id,
                mode,
                summary.total_value,
                summary.currency,
                summary.holdings_count,
                summary.total_profit_loss_percent
            ),
            Err(e) => tracing::warn!("Revaluation failed for {} ({}): {}", account_id, mode, e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    use async_trait::async_trait;
    use chrono::{DateTime, Utc};
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;
    use tradedesk_core::accounts::{AccountRepositoryTrait, NewAccount, TradingMode};
    use tradedesk_core::errors::{DatabaseError, Result};
    use tradedesk_core::portfolio::holdings::{HoldingValuation, PortfolioSummary};
    use tradedesk_core::portfolio::snapshot::{NightlyBatchSummary, PortfolioSnapshot};
    use tradedesk_core::quotes::{DividendInfo, EarningsInfo, Quote, QuoteOracleTrait};
    use tradedesk_core::trading::{TradeSide, TradingService, TradingServiceTrait};
    use tradedesk_storage_memory::{
        AccountRepository, HoldingRepository, MemoryDb, MemoryLedgerExecutor,
        TransactionRepository,
    };

    use crate::domain_events::WorkerDomainEventSink;

    #[derive(Default)]
    struct RecordingSnapshots {
        refreshed: Mutex<Vec<(String, TradingMode)>>,
    }

    #[async_trait]
    impl SnapshotServiceTrait for RecordingSnapshots {
        async fn refresh_snapshot(
            &self,
            account_id: &str,
            mode: TradingMode,
        ) -> Result<PortfolioSnapshot> {
            self.refresh_snapshot_at(account_id, mode, Utc::now()).await
        }

        async fn refresh_snapshot_at(
            &self,
            account_id: &str,
            mode: TradingMode,
            now: DateTime<Utc>,
        ) -> Result<PortfolioSnapshot> {
            self.refreshed
                .lock()
                .unwrap()
                .push((account_id.to_string(), mode));
            Ok(PortfolioSnapshot {
                id: "snap".to_string(),
                account_id: account_id.to_string(),
                snapshot_date: now.date_naive(),
                mode,
                total_value: Decimal::ZERO,
                total_cost_basis: Decimal::ZERO,
                cash_balance: Decimal::ZERO,
                holdings_count: 0,
                calculated_at: now,
            })
        }

        async fn run_nightly_batch(&self) -> Result<NightlyBatchSummary> {
            Ok(NightlyBatchSummary::default())
        }
    }

    struct NoHoldings;

    #[async_trait]
    impl HoldingsServiceTrait for NoHoldings {
        async fn get_holdings(
            &self,
            _account_id: &str,
            _mode: TradingMode,
        ) -> Result<Vec<HoldingValuation>> {
            Ok(Vec::new())
        }

        async fn get_holding(
            &self,
            _account_id: &str,
            _symbol: &str,
            _mode: TradingMode,
        ) -> Result<Option<HoldingValuation>> {
            Ok(None)
        }

        async fn get_portfolio_summary(
            &self,
            account_id: &str,
            mode: TradingMode,
        ) -> Result<PortfolioSummary> {
            Ok(PortfolioSummary {
                account_id: account_id.to_string(),
                mode,
                currency: "USD".to_string(),
                total_value: Decimal::ZERO,
                total_cost_basis: Decimal::ZERO,
                total_profit_loss: Decimal::ZERO,
                total_profit_loss_percent: Decimal::ZERO,
                cash_balance: Decimal::ZERO,
                holdings_count: 0,
                allocations: Vec::new(),
            })
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_burst_of_trades_refreshes_each_partition_once() {
        let snapshots = Arc::new(RecordingSnapshots::default());
        let deps = Arc::new(QueueWorkerDeps {
            snapshot_service: snapshots.clone(),
            holdings_service: Arc::new(NoHoldings),
        });
        let (tx, rx) = mpsc::unbounded_channel();
        let worker = tokio::spawn(event_queue_worker(rx, deps));

        for symbol in ["AAPL", "MSFT", "KO"] {
            tx.send(DomainEvent::trade_executed(
                "acc-1",
                TradingMode::Real,
                symbol,
                TradeSide::Buy,
            ))
            .unwrap();
        }
        tokio::time::sleep(DEBOUNCE_DURATION * 2).await;
        assert_eq!(
            snapshots.refreshed.lock().unwrap().clone(),
            vec![("acc-1".to_string(), TradingMode::Real)]
        );

        tx.send(DomainEvent::trade_executed(
            "acc-1",
            TradingMode::Paper,
            "AAPL",
            TradeSide::Sell,
        ))
        .unwrap();
        drop(tx);
        worker.await.unwrap();
        assert_eq!(snapshots.refreshed.lock().unwrap().len(), 2);
    }

    #[derive(Default)]
    struct FailingSnapshots {
        attempts: Mutex<u32>,
    }

    #[async_trait]
    impl SnapshotServiceTrait for FailingSnapshots {
        async fn refresh_snapshot(
            &self,
            account_id: &str,
            mode: TradingMode,
        ) -> Result<PortfolioSnapshot> {
            self.refresh_snapshot_at(account_id, mode, Utc::now()).await
        }

        async fn refresh_snapshot_at(
            &self,
            _account_id: &str,
            _mode: TradingMode,
            _now: DateTime<Utc>,
        ) -> Result<PortfolioSnapshot> {
            *self.attempts.lock().unwrap() += 1;
            Err(DatabaseError::TransactionFailed("snapshot store unavailable".to_string()).into())
        }

        async fn run_nightly_batch(&self) -> Result<NightlyBatchSummary> {
            Ok(NightlyBatchSummary::default())
        }
    }

    struct FixedQuotes;

    #[async_trait]
    impl QuoteOracleTrait for FixedQuotes {
        async fn get_quote(&self, symbol: &str) -> Result<Option<Quote>> {
            Ok(Some(Quote::new(symbol, dec!(150), "USD")))
        }

        async fn get_earnings(&self, _symbol: &str) -> Result<Option<EarningsInfo>> {
            Ok(None)
        }

        async fn get_dividends(&self, _symbol: &str) -> Result<Option<DividendInfo>> {
            Ok(None)
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_failed_refresh_leaves_trades_committed() {
        let db = MemoryDb::new();
        let accounts = Arc::new(AccountRepository::new(db.clone()));
        let mut account = NewAccount::named("Jane").into_account(Utc::now()).unwrap();
        account.trading_mode = TradingMode::Paper;
        let account = accounts.create(account).await.unwrap();

        let snapshots = Arc::new(FailingSnapshots::default());
        let sink = Arc::new(WorkerDomainEventSink::new());
        sink.start_worker(snapshots.clone(), Arc::new(NoHoldings));

        let trading = TradingService::new(
            MemoryLedgerExecutor::new(db.clone()),
            accounts.clone(),
            Arc::new(HoldingRepository::new(db.clone())),
            Arc::new(TransactionRepository::new(db.clone())),
            Arc::new(FixedQuotes),
            sink,
        );

        let bought = trading.buy(&account.id, "AAPL", 10).await.unwrap();
        assert_eq!(bought.new_balance, dec!(98500));
        tokio::time::sleep(DEBOUNCE_DURATION * 2).await;
        assert_eq!(*snapshots.attempts.lock().unwrap(), 1);

        // The worker keeps draining after a failed batch
        let sold = trading.sell(&account.id, "AAPL", 5).await.unwrap();
        assert_eq!(sold.new_balance, dec!(99250));
        tokio::time::sleep(DEBOUNCE_DURATION * 2).await;
        assert_eq!(*snapshots.attempts.lock().unwrap(), 2);

        let stored = accounts.get_by_id(&account.id).unwrap();
        assert_eq!(stored.paper_balance, dec!(99250));
        assert_eq!(trading.get_transactions(&account.id).unwrap().len(), 2);
    }
}
