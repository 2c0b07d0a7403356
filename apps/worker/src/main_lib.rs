use std::sync::Arc;
use std::time::Duration;

use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};
use tradedesk_core::{
    accounts::{AccountService, AccountServiceTrait},
    alerts::{AlertService, AlertServiceTrait},
    events::DomainEventSink,
    fx::{CurrencyConverter, InMemoryRateCache, RateSourceTrait},
    portfolio::{
        holdings::{HoldingsService, HoldingsServiceTrait},
        snapshot::{SnapshotService, SnapshotServiceTrait},
    },
    quotes::{MarketDataQuoteOracle, QuoteOracleTrait, TimeoutQuoteOracle},
    trading::{TradingService, TradingServiceTrait},
};
use tradedesk_market_data::UpstreamClient;
use tradedesk_storage_memory::{
    AccountRepository, AlertRepository, HoldingRepository, MemoryDb, MemoryLedgerExecutor,
    SnapshotRepository, TransactionRepository,
};

use crate::{
    config::Config, domain_events::WorkerDomainEventSink, notifier::LogNotificationDispatcher,
};

pub struct AppState {
    pub account_service: Arc<dyn AccountServiceTrait>,
    /// Order entry point. Every executed order emits `TradeExecuted` into the
    /// worker's event queue, which refreshes that partition's snapshot.
    #[allow(dead_code)]
    pub trading_service: Arc<dyn TradingServiceTrait>,
    pub alert_service: Arc<dyn AlertServiceTrait>,
    pub snapshot_service: Arc<dyn SnapshotServiceTrait>,
}

pub fn init_tracing() {
    let log_format = std::env::var("TD_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    if log_format.eq_ignore_ascii_case("json") {
        registry
            .with(fmt::layer().json().with_current_span(false))
            .init();
    } else {
        registry
            .with(fmt::layer().with_target(true).with_line_number(true))
            .init();
    }
}

pub fn build_state(config: &Config) -> anyhow::Result<Arc<AppState>> {
    let upstream = Arc::new(UpstreamClient::with_timeout(
        config.market_data_url.clone(),
        config.quote_timeout,
    ));
    let market_data = Arc::new(MarketDataQuoteOracle::new(upstream));
    let quote_oracle: Arc<dyn QuoteOracleTrait> = Arc::new(TimeoutQuoteOracle::new(
        market_data.clone(),
        config.quote_timeout,
    ));

    Ok(assemble_state(
        MemoryDb::new(),
        quote_oracle,
        market_data,
        config.rate_cache_ttl,
    ))
}

/// Wires every service over one store. Must run inside a tokio runtime
/// because it spawns the domain event worker.
pub(crate) fn assemble_state(
    db: MemoryDb,
    quote_oracle: Arc<dyn QuoteOracleTrait>,
    rate_source: Arc<dyn RateSourceTrait>,
    rate_cache_ttl: Duration,
) -> Arc<AppState> {
    let currency_converter = Arc::new(CurrencyConverter::new(
        Arc::new(InMemoryRateCache::with_ttl(rate_cache_ttl)),
        rate_source,
    ));

    // Two-phase initialization: the sink buffers events until the worker starts
    let domain_event_sink = Arc::new(WorkerDomainEventSink::new());

    let account_repo = Arc::new(AccountRepository::new(db.clone()));
    let holding_repo = Arc::new(HoldingRepository::new(db.clone()));

    let account_service: Arc<dyn AccountServiceTrait> =
        Arc::new(AccountService::new(account_repo.clone()));
    let trading_service: Arc<dyn TradingServiceTrait> = Arc::new(TradingService::new(
        MemoryLedgerExecutor::new(db.clone()),
        account_repo.clone(),
        holding_repo.clone(),
        Arc::new(TransactionRepository::new(db.clone())),
        quote_oracle.clone(),
        domain_event_sink.clone() as Arc<dyn DomainEventSink>,
    ));
    let snapshot_service: Arc<dyn SnapshotServiceTrait> = Arc::new(SnapshotService::new(
        account_repo.clone(),
        holding_repo.clone(),
        Arc::new(SnapshotRepository::new(db.clone())),
        quote_oracle.clone(),
    ));
    let holdings_service: Arc<dyn HoldingsServiceTrait> = Arc::new(HoldingsService::new(
        account_repo.clone(),
        holding_repo,
        quote_oracle.clone(),
        currency_converter,
    ));
    let alert_service: Arc<dyn AlertServiceTrait> = Arc::new(AlertService::new(
        Arc::new(AlertRepository::new(db)),
        account_repo,
        quote_oracle,
        Arc::new(LogNotificationDispatcher),
        domain_event_sink.clone() as Arc<dyn DomainEventSink>,
    ));

    domain_event_sink.start_worker(snapshot_service.clone(), holdings_service);

    Arc::new(AppState {
        account_service,
        trading_service,
        alert_service,
        snapshot_service,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    use async_trait::async_trait;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;
    use tradedesk_core::accounts::{NewAccount, TradingMode};
    use tradedesk_core::errors::Result;
    use tradedesk_core::portfolio::snapshot::SnapshotRepositoryTrait;
    use tradedesk_core::quotes::{DividendInfo, EarningsInfo, Quote};
    use tradedesk_core::utils::time_utils::valuation_date_today;

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

    struct NoRates;

    #[async_trait]
    impl RateSourceTrait for NoRates {
        async fn fetch_rate(&self, _from: &str, _to: &str) -> Result<Option<Decimal>> {
            Ok(None)
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_orders_refresh_snapshot_through_event_queue() {
        let db = MemoryDb::new();
        let state = assemble_state(
            db.clone(),
            Arc::new(FixedQuotes),
            Arc::new(NoRates),
            Duration::from_secs(300),
        );

        let account = state
            .account_service
            .create_account(NewAccount::named("Jane"))
            .await
            .unwrap();
        state
            .account_service
            .set_trading_mode(&account.id, TradingMode::Paper)
            .await
            .unwrap();

        let result = state
            .trading_service
            .buy(&account.id, "aapl", 10)
            .await
            .unwrap();
        assert_eq!(result.new_balance, dec!(98500));

        tokio::time::sleep(Duration::from_secs(3)).await;

        let snapshot = SnapshotRepository::new(db)
            .get_snapshot(&account.id, valuation_date_today(), TradingMode::Paper)
            .unwrap()
            .expect("post-trade snapshot recorded");
        assert_eq!(snapshot.holdings_count, 1);
        assert_eq!(snapshot.total_value, dec!(1500));
        assert_eq!(snapshot.cash_balance, dec!(98500));
    }
}
