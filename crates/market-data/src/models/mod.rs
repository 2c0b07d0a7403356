//! Market data models
//!
//! Wire shapes returned by the upstream service. Numeric fields deserialize
//! straight into `Decimal`; dates use the `YYYY-MM-DD` form.

mod calendar;
mod rate;
mod stock_quote;

pub use calendar::{DividendCalendar, EarningsCalendar, NextDividend};
pub use rate::ExchangeRateQuote;
pub use stock_quote::StockQuote;
