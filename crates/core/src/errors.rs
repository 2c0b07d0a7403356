//! Core error types for the Tradedesk engine.
//!
//! This module defines storage-agnostic error types. Storage-specific errors
//! are converted to [`DatabaseError`] by the storage layer.

use chrono::ParseError as ChronoParseError;
use thiserror::Error;

use crate::alerts::AlertError;
use crate::fx::FxError;
use crate::trading::TradingError;

/// Type alias for Result using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Root error type for the engine.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Database operation failed: {0}")]
    Database(#[from] DatabaseError),

    #[error("{0}")]
    Trading(#[from] TradingError),

    #[error("Alert error: {0}")]
    Alert(#[from] AlertError),

    #[error("Fx error: {0}")]
    Fx(#[from] FxError),

    #[error("Input validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("Market data operation failed: {0}")]
    MarketData(String),
}

/// Storage-agnostic error type for storage operations.
///
/// Any of these raised inside a unit of work means nothing from that unit
/// was applied.
#[derive(Error, Debug)]
pub enum DatabaseError {
    /// A query failed to execute.
    #[error("Database query failed: {0}")]
    QueryFailed(String),

    /// The requested record was not found.
    #[error("Record not found: {0}")]
    NotFound(String),

    /// A unique constraint was violated (e.g., duplicate key).
    #[error("Unique constraint violation: {0}")]
    UniqueViolation(String),

    /// A transaction could not be committed and was rolled back.
    #[error("Transaction failed: {0}")]
    TransactionFailed(String),

    /// Internal/unexpected storage error.
    #[error("Internal database error: {0}")]
    Internal(String),
}

/// Validation errors for user input and data parsing.
#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Required field '{0}' is missing")]
    MissingField(String),

    #[error("Failed to parse decimal number: {0}")]
    DecimalParse(#[from] rust_decimal::Error),

    #[error("Failed to parse date/time: {0}")]
    DateTimeParse(#[from] ChronoParseError),
}

impl Error {
    /// Returns true when the error came from the storage layer.
    pub fn is_storage_failure(&self) -> bool {
        matches!(self, Error::Database(_))
    }
}

impl From<rust_decimal::Error> for Error {
    fn from(err: rust_decimal::Error) -> Self {
        Error::Validation(ValidationError::DecimalParse(err))
    }
}

impl From<ChronoParseError> for Error {
    fn from(err: ChronoParseError) -> Self {
        Error::Validation(ValidationError::DateTimeParse(err))
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Validation(ValidationError::InvalidInput(err.to_string()))
    }
}

impl From<tradedesk_market_data::MarketDataError> for Error {
    fn from(err: tradedesk_market_data::MarketDataError) -> Self {
        Error::MarketData(err.to_string())
    }
}

impl From<Error> for String {
    fn from(err: Error) -> Self {
        err.to_string()
    }
}
