//! Portfolio accounting: the holdings ledger, daily snapshots and the
//! performance series derived from them.

pub mod holdings;
pub mod performance;
pub mod snapshot;
