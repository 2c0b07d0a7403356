use rust_decimal::Decimal;
use thiserror::Error;

/// Order rejections. None of these leave any state behind.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TradingError {
    #[error("Invalid order: {0}")]
    InvalidOrder(String),

    #[error("Unable to fetch stock price for {0}")]
    QuoteUnavailable(String),

    #[error("Insufficient balance. Required: {required} {currency}, Available: {available}")]
    InsufficientFunds {
        required: Decimal,
        available: Decimal,
        currency: String,
    },

    #[error("Insufficient shares. You own {owned} shares but trying to sell {requested}")]
    InsufficientShares { owned: i64, requested: i64 },

    #[error("You don't own any shares of {0}")]
    NoPosition(String),
}
