use tradedesk_core::errors::Result;
use tradedesk_core::trading::{Transaction, TransactionRepositoryTrait};

use crate::db::MemoryDb;

/// Read side of the transaction log.
pub struct TransactionRepository {
    db: MemoryDb,
}

impl TransactionRepository {
    pub fn new(db: MemoryDb) -> Self {
        Self { db }
    }

    fn newest_first(&self, keep: impl Fn(&Transaction) -> bool) -> Result<Vec<Transaction>> {
        self.db.read(|state| {
            state
                .transactions
                .iter()
                .rev()
                .filter(|t| keep(t))
                .cloned()
                .collect()
        })
    }
}

impl TransactionRepositoryTrait for TransactionRepository {
    fn list_by_account(&self, account_id: &str) -> Result<Vec<Transaction>> {
        self.newest_first(|t| t.account_id == account_id)
    }

    fn list_by_account_and_symbol(
        &self,
        account_id: &str,
        symbol: &str,
    ) -> Result<Vec<Transaction>> {
        self.newest_first(|t| t.account_id == account_id && t.symbol == symbol)
    }
}
