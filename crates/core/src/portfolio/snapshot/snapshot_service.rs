use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use log::{debug, info, warn};
use rust_decimal::Decimal;

use super::snapshot_model::{NightlyBatchSummary, PortfolioSnapshot};
use super::snapshot_traits::SnapshotRepositoryTrait;
use crate::accounts::{Account, AccountRepositoryTrait, TradingMode};
use crate::constants::MONEY_DECIMAL_PRECISION;
use crate::errors::Result;
use crate::portfolio::holdings::{Holding, HoldingRepositoryTrait};
use crate::quotes::QuoteOracleTrait;
use crate::utils::decimal_utils::round_half_up;
use crate::utils::time_utils::valuation_date_from_utc;

#[async_trait]
pub trait SnapshotServiceTrait: Send + Sync {
    /// Values the partition now and upserts today's row.
    async fn refresh_snapshot(&self, account_id: &str, mode: TradingMode)
        -> Result<PortfolioSnapshot>;

    /// Same as [`refresh_snapshot`](Self::refresh_snapshot) with an explicit clock.
    async fn refresh_snapshot_at(
        &self,
        account_id: &str,
        mode: TradingMode,
        now: DateTime<Utc>,
    ) -> Result<PortfolioSnapshot>;

    /// Refreshes every non-empty partition of every account.
    async fn run_nightly_batch(&self) -> Result<NightlyBatchSummary>;
}

pub struct SnapshotService {
    account_repository: Arc<dyn AccountRepositoryTrait>,
    holding_repository: Arc<dyn HoldingRepositoryTrait>,
    snapshot_repository: Arc<dyn SnapshotRepositoryTrait>,
    quote_oracle: Arc<dyn QuoteOracleTrait>,
}

impl SnapshotService {
    pub fn new(
        account_repository: Arc<dyn AccountRepositoryTrait>,
        holding_repository: Arc<dyn HoldingRepositoryTrait>,
        snapshot_repository: Arc<dyn SnapshotRepositoryTrait>,
        quote_oracle: Arc<dyn QuoteOracleTrait>,
    ) -> Self {
        Self {
            account_repository,
            holding_repository,
            snapshot_repository,
            quote_oracle,
        }
    }

    /// Sum of `price * quantity`. A holding without a quote counts as 0.
    async fn market_value(&self, holdings: &[Holding]) -> Decimal {
        let mut total = Decimal::ZERO;
        for holding in holdings {
            match self.quote_oracle.get_quote(&holding.symbol).await {
                Ok(Some(quote)) => total += quote.price * Decimal::from(holding.quantity),
                Ok(None) => warn!(
                    "No quote for {}; valuing {} shares at 0",
                    holding.symbol, holding.quantity
                ),
                Err(e) => warn!(
                    "Could not fetch current price for {}: {}; valuing at 0",
                    holding.symbol, e
                ),
            }
        }
        total
    }

    async fn record(
        &self,
        account: &Account,
        mode: TradingMode,
        holdings: &[Holding],
        now: DateTime<Utc>,
    ) -> Result<PortfolioSnapshot> {
        let total_value = self.market_value(holdings).await;
        let total_cost_basis: Decimal = holdings.iter().map(Holding::total_cost_basis).sum();

        let snapshot = PortfolioSnapshot {
            id: uuid::Uuid::new_v4().to_string(),
            account_id: account.id.clone(),
            snapshot_date: valuation_date_from_utc(now),
            mode,
            total_value: round_half_up(total_value, MONEY_DECIMAL_PRECISION),
            total_cost_basis: round_half_up(total_cost_basis, MONEY_DECIMAL_PRECISION),
            cash_balance: round_half_up(account.balance_for(mode), MONEY_DECIMAL_PRECISION),
            holdings_count: holdings.len(),
            calculated_at: now,
        };

        let stored = self
            .snapshot_repository
            .save_or_update_snapshot(snapshot)
            .await?;
        debug!(
            "Saved snapshot for account {} on {} ({}): value {}, cost {}, cash {}",
            stored.account_id,
            stored.snapshot_date,
            mode,
            stored.total_value,
            stored.total_cost_basis,
            stored.cash_balance
        );
        Ok(stored)
    }

    /// Writes one snapshot per non-empty partition of `account`.
    async fn snapshot_account(&self, account: &Account, now: DateTime<Utc>) -> Result<usize> {
        let mut written = 0;
        for mode in TradingMode::ALL {
            let holdings = self
                .holding_repository
                .list_by_account_and_mode(&account.id, mode)?;
            if holdings.is_empty() {
                continue;
            }
            self.record(account, mode, &holdings, now).await?;
            written += 1;
        }
        Ok(written)
    }
}

#[async_trait]
impl SnapshotServiceTrait for SnapshotService {
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
        let account = self.account_repository.get_by_id(account_id)?;
        // An empty partition still gets a row so the daily series has no gaps.
        let holdings = self
            .holding_repository
            .list_by_account_and_mode(account_id, mode)?;
        self.record(&account, mode, &holdings, now).await
    }

    async fn run_nightly_batch(&self) -> Result<NightlyBatchSummary> {
        info!("Starting nightly portfolio snapshot batch");
        let now = Utc::now();
        let accounts = self.account_repository.list()?;
        let mut summary = NightlyBatchSummary::default();

        for account in &accounts {
            summary.accounts_processed += 1;
            match self.snapshot_account(account, now).await {
                Ok(written) => summary.snapshots_written += written,
                Err(e) => {
                    warn!("Error taking snapshot for account {}: {}", account.id, e);
                    summary.failed_accounts.push(account.id.clone());
                }
            }
        }

        info!(
            "Nightly snapshot batch completed: {} snapshot(s) for {} account(s), {} failure(s)",
            summary.snapshots_written,
            summary.accounts_processed,
            summary.failed_accounts.len()
        );
        Ok(summary)
    }
}
