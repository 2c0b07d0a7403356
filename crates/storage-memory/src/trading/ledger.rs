//! Staged unit of work over the shared state.
//!
//! A job reads through to the committed state and writes into a staging
//! area. Staged writes are applied while the state lock is still held, so
//! no other reader or writer observes a partial order.

use std::collections::HashMap;

use log::{debug, warn};
use tradedesk_core::accounts::{Account, TradingMode};
use tradedesk_core::errors::{DatabaseError, Result};
use tradedesk_core::portfolio::holdings::Holding;
use tradedesk_core::trading::{LedgerExecutor, LedgerTransaction, Transaction};

use crate::db::{holding_key, HoldingKey, MemoryDb, State};
use crate::errors::StorageError;

/// Runs ledger jobs against a [`MemoryDb`].
///
/// The state lock is held from the first read to the commit, so jobs are
/// serialized store-wide.
#[derive(Clone)]
pub struct MemoryLedgerExecutor {
    db: MemoryDb,
}

impl MemoryLedgerExecutor {
    pub fn new(db: MemoryDb) -> Self {
        Self { db }
    }
}

struct StagedLedger<'a> {
    committed: &'a State,
    accounts: HashMap<String, Account>,
    /// `None` marks a deleted row.
    holdings: HashMap<HoldingKey, Option<Holding>>,
    transactions: Vec<Transaction>,
}

impl<'a> StagedLedger<'a> {
    fn new(committed: &'a State) -> Self {
        Self {
            committed,
            accounts: HashMap::new(),
            holdings: HashMap::new(),
            transactions: Vec::new(),
        }
    }

    fn into_writes(self) -> Writes {
        Writes {
            accounts: self.accounts,
            holdings: self.holdings,
            transactions: self.transactions,
        }
    }
}

struct Writes {
    accounts: HashMap<String, Account>,
    holdings: HashMap<HoldingKey, Option<Holding>>,
    transactions: Vec<Transaction>,
}

impl Writes {
    fn apply(self, state: &mut State) {
        state.accounts.extend(self.accounts);
        for (key, row) in self.holdings {
            match row {
                Some(holding) => {
                    state.holdings.insert(key, holding);
                }
                None => {
                    state.holdings.remove(&key);
                }
            }
        }
        state.transactions.extend(self.transactions);
    }
}

impl LedgerTransaction for StagedLedger<'_> {
    fn get_account(&mut self, account_id: &str) -> Result<Account> {
        self.accounts
            .get(account_id)
            .or_else(|| self.committed.accounts.get(account_id))
            .cloned()
            .ok_or_else(|| DatabaseError::NotFound(format!("account {}", account_id)).into())
    }

    fn save_account(&mut self, account: &Account) -> Result<()> {
        if !self.committed.accounts.contains_key(&account.id)
            && !self.accounts.contains_key(&account.id)
        {
            return Err(StorageError::NotFound(format!("account {}", account.id)).into());
        }
        self.accounts.insert(account.id.clone(), account.clone());
        Ok(())
    }

    fn get_holding(
        &mut self,
        account_id: &str,
        symbol: &str,
        mode: TradingMode,
    ) -> Result<Option<Holding>> {
        let key = holding_key(account_id, symbol, mode);
        Ok(match self.holdings.get(&key) {
            Some(staged) => staged.clone(),
            None => self.committed.holdings.get(&key).cloned(),
        })
    }

    fn save_holding(&mut self, holding: &Holding) -> Result<()> {
        let key = holding_key(&holding.account_id, &holding.symbol, holding.mode);
        self.holdings.insert(key, Some(holding.clone()));
        Ok(())
    }

    fn delete_holding(&mut self, account_id: &str, symbol: &str, mode: TradingMode) -> Result<()> {
        self.holdings
            .insert(holding_key(account_id, symbol, mode), None);
        Ok(())
    }

    fn insert_transaction(&mut self, transaction: &Transaction) -> Result<()> {
        let duplicate = self
            .committed
            .transactions
            .iter()
            .chain(self.transactions.iter())
            .any(|t| t.id == transaction.id);
        if duplicate {
            return Err(StorageError::Duplicate(format!("transaction {}", transaction.id)).into());
        }
        self.transactions.push(transaction.clone());
        Ok(())
    }
}

impl LedgerExecutor for MemoryLedgerExecutor {
    fn execute<F, T>(&self, job: F) -> Result<T>
    where
        F: FnOnce(&mut dyn LedgerTransaction) -> Result<T>,
    {
        let mut state = self.db.lock()?;

        let (value, writes) = {
            let mut staged = StagedLedger::new(&state);
            let value = job(&mut staged)?;
            (value, staged.into_writes())
        };

        if self.db.take_commit_failure() {
            warn!("Ledger commit rejected; discarding staged writes");
            return Err(StorageError::CommitRejected("injected commit failure".to_string()).into());
        }

        debug!(
            "Committing ledger unit: {} account(s), {} holding(s), {} transaction(s)",
            writes.accounts.len(),
            writes.holdings.len(),
            writes.transactions.len()
        );
        writes.apply(&mut state);
        Ok(value)
    }
}
