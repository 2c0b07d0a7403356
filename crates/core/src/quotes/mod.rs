//! Quote lookup module.
//!
//! - [`model`] - Point-in-time quote and corporate-action calendar models
//! - [`oracle`] - The `QuoteOracleTrait` contract and its timeout guard
//! - [`client`] - Adapter over the `tradedesk-market-data` HTTP client
//!
//! ```text
//! TradingService / AlertService / SnapshotService
//!        ↓
//! TimeoutQuoteOracle → MarketDataQuoteOracle → market-data crate (HTTP)
//! ```

pub mod client;
pub mod model;
pub mod oracle;


pub use client::MarketDataQuoteOracle;
pub use model::{DividendInfo, EarningsInfo, Quote};
pub use oracle::{QuoteOracleTrait, TimeoutQuoteOracle};
