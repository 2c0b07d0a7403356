//! Account repository and service traits.
//!
//! These traits define the contract for account operations without any
//! storage-specific types, allowing for different storage implementations.

use async_trait::async_trait;

use super::accounts_model::{Account, AccountUpdate, NewAccount, TradingMode};
use crate::errors::Result;

/// Trait defining the contract for Account repository operations.
///
/// Balance changes made by orders go through the ledger unit of work
/// instead, so they commit together with holdings and transactions.
#[async_trait]
pub trait AccountRepositoryTrait: Send + Sync {
    /// Inserts a fully built account.
    async fn create(&self, account: Account) -> Result<Account>;

    /// Replaces the stored profile fields of an account.
    async fn update(&self, account: Account) -> Result<Account>;

    /// Retrieves an account by its ID.
    ///
    /// Returns `DatabaseError::NotFound` when no such account exists.
    fn get_by_id(&self, account_id: &str) -> Result<Account>;

    /// Lists all accounts.
    fn list(&self) -> Result<Vec<Account>>;
}

/// Trait defining the contract for Account service operations.
#[async_trait]
pub trait AccountServiceTrait: Send + Sync {
    /// Creates a new account with defaults applied.
    async fn create_account(&self, new_account: NewAccount) -> Result<Account>;

    /// Applies a profile edit.
    async fn update_account(&self, account_update: AccountUpdate) -> Result<Account>;

    /// Switches the partition new orders act on.
    async fn set_trading_mode(&self, account_id: &str, mode: TradingMode) -> Result<Account>;

    /// Sets the currency summaries are expressed in.
    async fn set_preferred_currency(&self, account_id: &str, currency: &str)
        -> Result<Account>;

    /// Sets or clears the push token. Blank tokens clear it.
    async fn set_notification_token(
        &self,
        account_id: &str,
        token: Option<String>,
    ) -> Result<Account>;

    /// Retrieves an account by ID.
    fn get_account(&self, account_id: &str) -> Result<Account>;

    /// Lists all accounts.
    fn list_accounts(&self) -> Result<Vec<Account>>;
}
