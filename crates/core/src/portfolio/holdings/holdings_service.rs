use std::sync::Arc;

use async_trait::async_trait;
use log::{debug, warn};
use rust_decimal::Decimal;

use super::holdings_model::{AllocationEntry, Holding, HoldingValuation, PortfolioSummary};
use super::holdings_traits::HoldingRepositoryTrait;
use crate::accounts::{AccountRepositoryTrait, TradingMode};
use crate::constants::DISPLAY_DECIMAL_PRECISION;
use crate::errors::Result;
use crate::fx::CurrencyConverter;
use crate::quotes::QuoteOracleTrait;
use crate::utils::decimal_utils::{percent_change, round_half_up};

#[async_trait]
pub trait HoldingsServiceTrait: Send + Sync {
    /// Open positions of a partition, priced at the latest quotes.
    async fn get_holdings(&self, account_id: &str, mode: TradingMode)
        -> Result<Vec<HoldingValuation>>;

    async fn get_holding(
        &self,
        account_id: &str,
        symbol: &str,
        mode: TradingMode,
    ) -> Result<Option<HoldingValuation>>;

    /// Partition totals expressed in the account's preferred currency.
    async fn get_portfolio_summary(
        &self,
        account_id: &str,
        mode: TradingMode,
    ) -> Result<PortfolioSummary>;
}

pub struct HoldingsService {
    account_repository: Arc<dyn AccountRepositoryTrait>,
    holding_repository: Arc<dyn HoldingRepositoryTrait>,
    quote_oracle: Arc<dyn QuoteOracleTrait>,
    currency_converter: Arc<CurrencyConverter>,
}

impl HoldingsService {
    pub fn new(
        account_repository: Arc<dyn AccountRepositoryTrait>,
        holding_repository: Arc<dyn HoldingRepositoryTrait>,
        quote_oracle: Arc<dyn QuoteOracleTrait>,
        currency_converter: Arc<CurrencyConverter>,
    ) -> Self {
        Self {
            account_repository,
            holding_repository,
            quote_oracle,
            currency_converter,
        }
    }

    /// Latest price, or `None` when the quote source misses or fails.
    async fn current_price(&self, symbol: &str) -> Option<Decimal> {
        match self.quote_oracle.get_quote(symbol).await {
            Ok(Some(quote)) => Some(quote.price),
            Ok(None) => {
                warn!("No quote for {}; valuing it at 0", symbol);
                None
            }
            Err(e) => {
                warn!("Could not fetch current price for {}: {}", symbol, e);
                None
            }
        }
    }

    async fn value(&self, holding: &Holding) -> HoldingValuation {
        let price = self.current_price(&holding.symbol).await;
        let current_price = price.unwrap_or(Decimal::ZERO);
        let current_value = current_price * Decimal::from(holding.quantity);
        let cost_basis = holding.total_cost_basis();
        let profit_loss = current_value - cost_basis;

        HoldingValuation {
            id: holding.id.clone(),
            symbol: holding.symbol.clone(),
            name: holding.name.clone(),
            quantity: holding.quantity,
            average_cost: display(holding.average_cost),
            current_price: display(current_price),
            current_value: display(current_value),
            total_cost_basis: display(cost_basis),
            profit_loss: display(profit_loss),
            profit_loss_percent: display(percent_change(profit_loss, cost_basis)),
            currency: holding.currency.clone(),
            priced: price.is_some(),
        }
    }
}

fn display(value: Decimal) -> Decimal {
    round_half_up(value, DISPLAY_DECIMAL_PRECISION)
}

#[async_trait]
impl HoldingsServiceTrait for HoldingsService {
    async fn get_holdings(
        &self,
        account_id: &str,
        mode: TradingMode,
    ) -> Result<Vec<HoldingValuation>> {
        let holdings = self
            .holding_repository
            .list_by_account_and_mode(account_id, mode)?;
        let mut valuations = Vec::with_capacity(holdings.len());
        for holding in &holdings {
            valuations.push(self.value(holding).await);
        }
        Ok(valuations)
    }

    async fn get_holding(
        &self,
        account_id: &str,
        symbol: &str,
        mode: TradingMode,
    ) -> Result<Option<HoldingValuation>> {
        let symbol = symbol.trim().to_uppercase();
        match self.holding_repository.get(account_id, &symbol, mode)? {
            Some(holding) => Ok(Some(self.value(&holding).await)),
            None => Ok(None),
        }
    }

    async fn get_portfolio_summary(
        &self,
        account_id: &str,
        mode: TradingMode,
    ) -> Result<PortfolioSummary> {
        let account = self.account_repository.get_by_id(account_id)?;
        let target = account.preferred_currency.clone();
        let holdings = self
            .holding_repository
            .list_by_account_and_mode(account_id, mode)?;

        let mut total_value = Decimal::ZERO;
        let mut total_cost_basis = Decimal::ZERO;
        let mut allocations = Vec::with_capacity(holdings.len());

        for holding in &holdings {
            let price = self.current_price(&holding.symbol).await.unwrap_or_default();
            let value = self
                .currency_converter
                .convert(price * Decimal::from(holding.quantity), &holding.currency, &target)
                .await;
            let cost_basis = self
                .currency_converter
                .convert(holding.total_cost_basis(), &holding.currency, &target)
                .await;

            total_value += value;
            total_cost_basis += cost_basis;
            allocations.push(AllocationEntry {
                symbol: holding.symbol.clone(),
                name: holding.name.clone(),
                value,
                percentage: Decimal::ZERO,
            });
        }

        for entry in &mut allocations {
            entry.percentage = percent_change(entry.value, total_value);
            entry.value = display(entry.value);
        }

        let total_profit_loss = total_value - total_cost_basis;
        debug!(
            "Summary for {} ({}): value {} {}, {} holdings",
            account_id,
            mode,
            total_value,
            target,
            holdings.len()
        );

        Ok(PortfolioSummary {
            account_id: account.id.clone(),
            mode,
            currency: target,
            total_value: display(total_value),
            total_cost_basis: display(total_cost_basis),
            total_profit_loss: display(total_profit_loss),
            total_profit_loss_percent: display(percent_change(total_profit_loss, total_cost_basis)),
            cash_balance: account.balance_for(mode),
            holdings_count: holdings.len(),
            allocations,
        })
    }
}
