//! Tradedesk Core - Domain entities, services, and traits.
//!
//! This crate contains the trading and portfolio accounting engine.
//! It is database-agnostic and defines traits that are implemented
//! by the storage crates.

pub mod accounts;
pub mod alerts;
pub mod constants;
pub mod errors;
pub mod events;
pub mod fx;
pub mod notifications;
pub mod portfolio;
pub mod quotes;
pub mod trading;
pub mod utils;

// Re-export error types
pub use errors::Error;
pub use errors::Result;
