//! Portfolio snapshot module - one valuation record per account, day and mode.

mod snapshot_model;
pub mod snapshot_service;
mod snapshot_traits;

pub use snapshot_model::*;
pub use snapshot_service::*;
pub use snapshot_traits::*;

#[cfg(test)]
mod snapshot_service_tests;
