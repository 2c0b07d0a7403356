use tradedesk_core::accounts::TradingMode;
use tradedesk_core::errors::Result;
use tradedesk_core::portfolio::holdings::{Holding, HoldingRepositoryTrait};

use crate::db::{holding_key, MemoryDb};

/// Read side of the holdings table. Writes happen in ledger units of work.
pub struct HoldingRepository {
    db: MemoryDb,
}

impl HoldingRepository {
    pub fn new(db: MemoryDb) -> Self {
        Self { db }
    }
}

impl HoldingRepositoryTrait for HoldingRepository {
    fn list_by_account_and_mode(
        &self,
        account_id: &str,
        mode: TradingMode,
    ) -> Result<Vec<Holding>> {
        let mut holdings: Vec<Holding> = self.db.read(|state| {
            state
                .holdings
                .values()
                .filter(|h| h.account_id == account_id && h.mode == mode)
                .cloned()
                .collect()
        })?;
        holdings.sort_by(|a, b| a.symbol.cmp(&b.symbol));
        Ok(holdings)
    }

    fn get(&self, account_id: &str, symbol: &str, mode: TradingMode) -> Result<Option<Holding>> {
        self.db.read(|state| {
            state
                .holdings
                .get(&holding_key(account_id, symbol, mode))
                .cloned()
        })
    }
}
