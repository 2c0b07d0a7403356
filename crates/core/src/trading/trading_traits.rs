use super::trading_model::Transaction;
use crate::accounts::{Account, TradingMode};
use crate::errors::Result;
use crate::portfolio::holdings::Holding;

/// View of the store inside one unit of work.
///
/// Writes made through it become visible only if the surrounding
/// [`LedgerExecutor::execute`] job returns `Ok`.
pub trait LedgerTransaction {
    fn get_account(&mut self, account_id: &str) -> Result<Account>;

    fn save_account(&mut self, account: &Account) -> Result<()>;

    fn get_holding(
        &mut self,
        account_id: &str,
        symbol: &str,
        mode: TradingMode,
    ) -> Result<Option<Holding>>;

    /// Inserts or replaces the row keyed by `(account_id, symbol, mode)`.
    fn save_holding(&mut self, holding: &Holding) -> Result<()>;

    fn delete_holding(&mut self, account_id: &str, symbol: &str, mode: TradingMode) -> Result<()>;

    /// Appends to the transaction log. Existing records are never touched.
    fn insert_transaction(&mut self, transaction: &Transaction) -> Result<()>;
}

/// Runs ledger jobs atomically.
///
/// A job's writes are applied all together when it returns `Ok` and not
/// at all when it returns `Err` or the commit fails. Jobs touching the same
/// `(account, symbol, mode)` never interleave.
pub trait LedgerExecutor: Send + Sync {
    fn execute<F, T>(&self, job: F) -> Result<T>
    where
        F: FnOnce(&mut dyn LedgerTransaction) -> Result<T>;
}

/// Read access to the transaction log.
pub trait TransactionRepositoryTrait: Send + Sync {
    /// All transactions of an account, newest first.
    fn list_by_account(&self, account_id: &str) -> Result<Vec<Transaction>>;

    /// Transactions of an account for one symbol, newest first.
    fn list_by_account_and_symbol(
        &self,
        account_id: &str,
        symbol: &str,
    ) -> Result<Vec<Transaction>>;
}
