//! Tradedesk Market Data Crate
//!
//! Client for the upstream market-data service that supplies the trading
//! engine with point-in-time quotes, corporate-action calendars (earnings,
//! dividends) and currency conversion rates.
//!
//! # Architecture
//!
//! ```text
//! +------------------+     +----------------------+
//! |   Domain Layer   | --> |  MarketDataProvider  |  (trait, mockable)
//! +------------------+     +----------------------+
//!                                     |
//!                                     v
//!                          +----------------------+
//!                          |    UpstreamClient    |  (reqwest, timeouts)
//!                          +----------------------+
//!                                     |
//!                                     v
//!                          +----------------------+
//!                          |  market-data service |  (HTTP/JSON)
//!                          +----------------------+
//! ```
//!
//! A `404 Not Found` from the service is a miss (`Ok(None)`), never an error.

pub mod client;
pub mod errors;
pub mod models;

pub use client::{MarketDataProvider, UpstreamClient, DEFAULT_BASE_URL};
pub use errors::MarketDataError;
pub use models::{DividendCalendar, EarningsCalendar, ExchangeRateQuote, NextDividend, StockQuote};
