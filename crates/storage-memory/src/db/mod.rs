//! Shared in-memory state and access helpers.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use chrono::NaiveDate;
use log::error;
use tradedesk_core::accounts::{Account, TradingMode};
use tradedesk_core::alerts::Alert;
use tradedesk_core::errors::Result;
use tradedesk_core::portfolio::holdings::Holding;
use tradedesk_core::portfolio::snapshot::PortfolioSnapshot;
use tradedesk_core::trading::Transaction;

use crate::errors::StorageError;

pub(crate) type HoldingKey = (String, String, TradingMode);
pub(crate) type SnapshotKey = (String, NaiveDate, TradingMode);

pub(crate) fn holding_key(account_id: &str, symbol: &str, mode: TradingMode) -> HoldingKey {
    (account_id.to_string(), symbol.to_string(), mode)
}

/// All tables of the store.
#[derive(Debug, Clone, Default)]
pub(crate) struct State {
    pub accounts: HashMap<String, Account>,
    pub holdings: HashMap<HoldingKey, Holding>,
    /// Append-only, in commit order.
    pub transactions: Vec<Transaction>,
    pub alerts: HashMap<String, Alert>,
    pub snapshots: HashMap<SnapshotKey, PortfolioSnapshot>,
}

/// Handle onto the shared store. Clones share the same state.
#[derive(Clone, Default)]
pub struct MemoryDb {
    state: Arc<Mutex<State>>,
    fail_next_commit: Arc<AtomicBool>,
}

impl MemoryDb {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes the next ledger commit fail after its job has run.
    ///
    /// Used to exercise rollback of a unit of work interrupted at the last step.
    pub fn fail_next_commit(&self) {
        self.fail_next_commit.store(true, Ordering::SeqCst);
    }

    pub(crate) fn take_commit_failure(&self) -> bool {
        self.fail_next_commit.swap(false, Ordering::SeqCst)
    }

    pub(crate) fn lock(&self) -> Result<MutexGuard<'_, State>> {
        self.state.lock().map_err(|_| {
            error!("In-memory store lock is poisoned");
            StorageError::LockPoisoned.into()
        })
    }

    /// Runs a read against the current state.
    pub(crate) fn read<T>(&self, f: impl FnOnce(&State) -> T) -> Result<T> {
        let state = self.lock()?;
        Ok(f(&state))
    }

    /// Runs a write against the current state under the lock.
    pub(crate) fn write<T>(&self, f: impl FnOnce(&mut State) -> Result<T>) -> Result<T> {
        let mut state = self.lock()?;
        f(&mut state)
    }
}
