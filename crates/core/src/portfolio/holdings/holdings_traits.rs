use crate::accounts::TradingMode;
use crate::errors::Result;

use super::holdings_model::Holding;

/// Read access to positions. Writes go through the ledger unit of work.
pub trait HoldingRepositoryTrait: Send + Sync {
    /// All open positions of one partition, ordered by symbol.
    fn list_by_account_and_mode(&self, account_id: &str, mode: TradingMode)
        -> Result<Vec<Holding>>;

    fn get(&self, account_id: &str, symbol: &str, mode: TradingMode) -> Result<Option<Holding>>;
}
