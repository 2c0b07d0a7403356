//! Holdings ledger: per-account, per-mode positions with a running
//! weighted-average cost basis, plus read-side valuation.

mod holdings_ledger;
mod holdings_model;
mod holdings_service;
mod holdings_traits;


pub use holdings_ledger::{apply_buy, apply_sell, open_position};
pub use holdings_model::{AllocationEntry, Holding, HoldingValuation, PortfolioSummary};
pub use holdings_service::{HoldingsService, HoldingsServiceTrait};
pub use holdings_traits::HoldingRepositoryTrait;
