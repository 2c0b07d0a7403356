use async_trait::async_trait;
use tradedesk_core::accounts::{Account, AccountRepositoryTrait};
use tradedesk_core::errors::{DatabaseError, Result};

use crate::db::MemoryDb;
use crate::errors::StorageError;

/// Repository for managing account data in the store
pub struct AccountRepository {
    db: MemoryDb,
}

impl AccountRepository {
    pub fn new(db: MemoryDb) -> Self {
        Self { db }
    }
}

#[async_trait]
impl AccountRepositoryTrait for AccountRepository {
    async fn create(&self, account: Account) -> Result<Account> {
        self.db.write(|state| {
            if state.accounts.contains_key(&account.id) {
                return Err(StorageError::Duplicate(format!("account {}", account.id)).into());
            }
            state.accounts.insert(account.id.clone(), account.clone());
            Ok(account)
        })
    }

    async fn update(&self, account: Account) -> Result<Account> {
        self.db.write(|state| {
            let existing = state
                .accounts
                .get_mut(&account.id)
                .ok_or_else(|| StorageError::NotFound(format!("account {}", account.id)))?;
            // Balances belong to the ledger; a profile edit never moves them.
            let updated = Account {
                real_balance: existing.real_balance,
                paper_balance: existing.paper_balance,
                created_at: existing.created_at,
                ..account
            };
            *existing = updated.clone();
            Ok(updated)
        })
    }

    fn get_by_id(&self, account_id: &str) -> Result<Account> {
        self.db
            .read(|state| state.accounts.get(account_id).cloned())?
            .ok_or_else(|| DatabaseError::NotFound(format!("account {}", account_id)).into())
    }

    /// Accounts ordered by name.
    fn list(&self) -> Result<Vec<Account>> {
        let mut accounts: Vec<Account> = self
            .db
            .read(|state| state.accounts.values().cloned().collect())?;
        accounts.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.id.cmp(&b.id)));
        Ok(accounts)
    }
}
