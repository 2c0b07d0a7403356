use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum FxError {
    #[error("Invalid currency code: {0}")]
    InvalidCurrencyCode(String),

    #[error("No exchange rate available for {from}/{to}")]
    RateNotFound { from: String, to: String },

    #[error("Invalid exchange rate: {0}")]
    InvalidRate(String),
}
