use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use log::{error, info, warn};
use rust_decimal::Decimal;

use super::trading_errors::TradingError;
use super::trading_model::{TradeResult, TradeSide, Transaction};
use super::trading_traits::{LedgerExecutor, LedgerTransaction, TransactionRepositoryTrait};
use crate::accounts::{AccountRepositoryTrait, TradingMode};
use crate::errors::{Error, Result};
use crate::events::{DomainEvent, DomainEventSink};
use crate::portfolio::holdings::{apply_buy, apply_sell, open_position, HoldingRepositoryTrait};
use crate::quotes::{Quote, QuoteOracleTrait};

#[async_trait]
pub trait TradingServiceTrait: Send + Sync {
    /// Buys `quantity` shares at the current quote in the account's active mode.
    async fn buy(&self, account_id: &str, symbol: &str, quantity: i64) -> Result<TradeResult>;

    /// Sells `quantity` shares at the current quote in the account's active mode.
    async fn sell(&self, account_id: &str, symbol: &str, quantity: i64) -> Result<TradeResult>;

    /// Transaction history, newest first.
    fn get_transactions(&self, account_id: &str) -> Result<Vec<Transaction>>;

    fn get_transactions_by_symbol(&self, account_id: &str, symbol: &str)
        -> Result<Vec<Transaction>>;
}

/// Executes orders (Generic over Executor).
///
/// Balance, holding and transaction-log writes of one order commit as a
/// single unit of work. Snapshot refresh is requested afterwards through
/// the event sink and never affects the order's outcome.
pub struct TradingService<E: LedgerExecutor> {
    executor: E,
    account_repository: Arc<dyn AccountRepositoryTrait>,
    holding_repository: Arc<dyn HoldingRepositoryTrait>,
    transaction_repository: Arc<dyn TransactionRepositoryTrait>,
    quote_oracle: Arc<dyn QuoteOracleTrait>,
    event_sink: Arc<dyn DomainEventSink>,
}

impl<E: LedgerExecutor> TradingService<E> {
    pub fn new(
        executor: E,
        account_repository: Arc<dyn AccountRepositoryTrait>,
        holding_repository: Arc<dyn HoldingRepositoryTrait>,
        transaction_repository: Arc<dyn TransactionRepositoryTrait>,
        quote_oracle: Arc<dyn QuoteOracleTrait>,
        event_sink: Arc<dyn DomainEventSink>,
    ) -> Self {
        Self {
            executor,
            account_repository,
            holding_repository,
            transaction_repository,
            quote_oracle,
            event_sink,
        }
    }

    async fn fetch_quote(&self, symbol: &str) -> Result<Quote> {
        match self.quote_oracle.get_quote(symbol).await {
            Ok(Some(quote)) if quote.price > Decimal::ZERO => Ok(quote),
            Ok(Some(quote)) => {
                warn!("Ignoring non-positive price {} for {}", quote.price, symbol);
                Err(TradingError::QuoteUnavailable(symbol.to_string()).into())
            }
            Ok(None) => Err(TradingError::QuoteUnavailable(symbol.to_string()).into()),
            Err(e) => {
                warn!("Quote lookup for {} failed: {}", symbol, e);
                Err(TradingError::QuoteUnavailable(symbol.to_string()).into())
            }
        }
    }

    fn execute_order(
        &self,
        side: TradeSide,
        account_id: &str,
        symbol: &str,
        quantity: i64,
        quote: &Quote,
        amount: Decimal,
    ) -> Result<TradeResult> {
        let now = Utc::now();
        let outcome = self.executor.execute(|tx| match side {
            TradeSide::Buy => buy_in_transaction(tx, account_id, symbol, quantity, quote, amount, now),
            TradeSide::Sell => {
                sell_in_transaction(tx, account_id, symbol, quantity, quote, amount, now)
            }
        });

        match outcome {
            Ok((new_balance, transaction)) => {
                info!(
                    "{} {} x {} @ {} {} executed for account {} ({}), balance now {}",
                    side,
                    quantity,
                    symbol,
                    quote.price,
                    quote.currency,
                    account_id,
                    transaction.mode,
                    new_balance
                );
                self.event_sink.emit(DomainEvent::trade_executed(
                    account_id,
                    transaction.mode,
                    symbol,
                    side,
                ));
                Ok(TradeResult::new(new_balance, transaction))
            }
            Err(e) => {
                log_rejection(side, account_id, symbol, &e);
                Err(e)
            }
        }
    }
}

/// Upper-cases the symbol and checks the order shape.
fn normalize_order(symbol: &str, quantity: i64) -> Result<String> {
    if quantity < 1 {
        return Err(TradingError::InvalidOrder("Quantity must be at least 1".to_string()).into());
    }
    let symbol = symbol.trim().to_uppercase();
    if symbol.is_empty() {
        return Err(TradingError::InvalidOrder("Symbol is required".to_string()).into());
    }
    Ok(symbol)
}

fn order_amount(price: Decimal, quantity: i64) -> Result<Decimal> {
    price.checked_mul(Decimal::from(quantity)).ok_or_else(|| {
        TradingError::InvalidOrder(format!("Order value of {} shares is too large", quantity)).into()
    })
}

fn log_rejection(side: TradeSide, account_id: &str, symbol: &str, error: &Error) {
    match error {
        Error::Trading(reason) => info!(
            "{} order for {} rejected (account {}): {}",
            side, symbol, account_id, reason
        ),
        other => error!(
            "{} order for {} failed (account {}), nothing applied: {}",
            side, symbol, account_id, other
        ),
    }
}

#[allow(clippy::too_many_arguments)]
fn record(
    account_id: &str,
    symbol: &str,
    name: &str,
    side: TradeSide,
    quantity: i64,
    quote: &Quote,
    amount: Decimal,
    mode: TradingMode,
    now: DateTime<Utc>,
) -> Transaction {
    Transaction {
        id: uuid::Uuid::new_v4().to_string(),
        account_id: account_id.to_string(),
        symbol: symbol.to_string(),
        name: name.to_string(),
        side,
        quantity,
        price_per_share: quote.price,
        total_amount: amount,
        currency: quote.currency.clone(),
        mode,
        executed_at: now,
    }
}

fn buy_in_transaction(
    tx: &mut dyn LedgerTransaction,
    account_id: &str,
    symbol: &str,
    quantity: i64,
    quote: &Quote,
    total_cost: Decimal,
    now: DateTime<Utc>,
) -> Result<(Decimal, Transaction)> {
    let mut account = tx.get_account(account_id)?;
    let mode = account.trading_mode;
    let available = account.balance_for(mode);
    if available < total_cost {
        return Err(TradingError::InsufficientFunds {
            required: total_cost,
            available,
            currency: quote.currency.clone(),
        }
        .into());
    }

    let holding = match tx.get_holding(account_id, symbol, mode)? {
        Some(existing) => apply_buy(&existing, quantity, total_cost, now)?,
        None => open_position(
            account_id,
            symbol,
            &quote.name,
            quantity,
            quote.price,
            &quote.currency,
            mode,
            now,
        )?,
    };

    let new_balance = available - total_cost;
    account.set_balance_for(mode, new_balance);
    account.updated_at = now;
    tx.save_account(&account)?;
    tx.save_holding(&holding)?;

    let transaction = record(
        account_id,
        symbol,
        &quote.name,
        TradeSide::Buy,
        quantity,
        quote,
        total_cost,
        mode,
        now,
    );
    tx.insert_transaction(&transaction)?;
    Ok((new_balance, transaction))
}

fn sell_in_transaction(
    tx: &mut dyn LedgerTransaction,
    account_id: &str,
    symbol: &str,
    quantity: i64,
    quote: &Quote,
    proceeds: Decimal,
    now: DateTime<Utc>,
) -> Result<(Decimal, Transaction)> {
    let mut account = tx.get_account(account_id)?;
    let mode = account.trading_mode;
    let holding = tx
        .get_holding(account_id, symbol, mode)?
        .ok_or_else(|| TradingError::NoPosition(symbol.to_string()))?;
    let remaining = apply_sell(&holding, quantity, now)?;

    let new_balance = account.balance_for(mode) + proceeds;
    account.set_balance_for(mode, new_balance);
    account.updated_at = now;
    tx.save_account(&account)?;
    match remaining {
        Some(reduced) => tx.save_holding(&reduced)?,
        None => tx.delete_holding(account_id, symbol, mode)?,
    }

    let transaction = record(
        account_id,
        symbol,
        &holding.name,
        TradeSide::Sell,
        quantity,
        quote,
        proceeds,
        mode,
        now,
    );
    tx.insert_transaction(&transaction)?;
    Ok((new_balance, transaction))
}

#[async_trait]
impl<E: LedgerExecutor> TradingServiceTrait for TradingService<E> {
    async fn buy(&self, account_id: &str, symbol: &str, quantity: i64) -> Result<TradeResult> {
        let symbol = normalize_order(symbol, quantity).inspect_err(|e| {
            info!("Buy order rejected (account {}): {}", account_id, e);
        })?;
        let account = self.account_repository.get_by_id(account_id)?;
        info!(
            "Buy order: {} x {} for account {} ({})",
            quantity, symbol, account_id, account.trading_mode
        );

        let quote = self.fetch_quote(&symbol).await.inspect_err(|e| {
            info!("Buy order for {} rejected: {}", symbol, e);
        })?;
        let total_cost = order_amount(quote.price, quantity)?;

        self.execute_order(TradeSide::Buy, account_id, &symbol, quantity, &quote, total_cost)
    }

    async fn sell(&self, account_id: &str, symbol: &str, quantity: i64) -> Result<TradeResult> {
        let symbol = normalize_order(symbol, quantity).inspect_err(|e| {
            info!("Sell order rejected (account {}): {}", account_id, e);
        })?;
        let account = self.account_repository.get_by_id(account_id)?;
        let mode = account.trading_mode;
        info!(
            "Sell order: {} x {} for account {} ({})",
            quantity, symbol, account_id, mode
        );

        // Rejections that need no quote are answered before calling upstream.
        let holding = self
            .holding_repository
            .get(account_id, &symbol, mode)?
            .ok_or_else(|| TradingError::NoPosition(symbol.clone()))
            .inspect_err(|e| info!("Sell order rejected: {}", e))?;
        if holding.quantity < quantity {
            let rejection = TradingError::InsufficientShares {
                owned: holding.quantity,
                requested: quantity,
            };
            info!("Sell order rejected: {}", rejection);
            return Err(rejection.into());
        }

        let quote = self.fetch_quote(&symbol).await.inspect_err(|e| {
            info!("Sell order for {} rejected: {}", symbol, e);
        })?;
        let proceeds = order_amount(quote.price, quantity)?;

        self.execute_order(TradeSide::Sell, account_id, &symbol, quantity, &quote, proceeds)
    }

    fn get_transactions(&self, account_id: &str) -> Result<Vec<Transaction>> {
        self.transaction_repository.list_by_account(account_id)
    }

    fn get_transactions_by_symbol(
        &self,
        account_id: &str,
        symbol: &str,
    ) -> Result<Vec<Transaction>> {
        self.transaction_repository
            .list_by_account_and_symbol(account_id, &symbol.trim().to_uppercase())
    }
}
