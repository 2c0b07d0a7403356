//! Error types for the market data crate.

use thiserror::Error;

/// Errors that can occur while talking to the upstream market-data service.
#[derive(Error, Debug)]
pub enum MarketDataError {
    /// The request did not complete within the configured timeout.
    #[error("Timeout: {endpoint}")]
    Timeout {
        /// The endpoint that timed out
        endpoint: String,
    },

    /// The service answered with a non-success status.
    #[error("Provider error: {endpoint} - {message}")]
    ProviderError {
        /// The endpoint that failed
        endpoint: String,
        /// Status line and body excerpt
        message: String,
    },

    /// The service answered but the payload could not be interpreted.
    #[error("Invalid data: {0}")]
    InvalidData(String),

    /// A transport-level failure (DNS, connection reset, TLS).
    #[error("Network error: {0}")]
    Network(String),
}

impl MarketDataError {
    /// Returns true for failures that may succeed on a later attempt.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Timeout { .. } | Self::Network(_))
    }
}
