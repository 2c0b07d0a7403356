//! Trading module - order execution against the holdings ledger.

mod trading_errors;
mod trading_model;
mod trading_service;
mod trading_traits;


pub use trading_errors::TradingError;
pub use trading_model::{TradeResult, TradeSide, Transaction};
pub use trading_service::{TradingService, TradingServiceTrait};
pub use trading_traits::{LedgerExecutor, LedgerTransaction, TransactionRepositoryTrait};
