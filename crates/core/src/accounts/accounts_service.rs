use async_trait::async_trait;
use chrono::Utc;
use log::{debug, info};
use std::sync::Arc;

use super::accounts_model::{Account, AccountUpdate, NewAccount, TradingMode};
use super::accounts_traits::{AccountRepositoryTrait, AccountServiceTrait};
use crate::errors::Result;

/// Service for managing accounts
pub struct AccountService {
    repository: Arc<dyn AccountRepositoryTrait>,
}

impl AccountService {
    /// Creates a new AccountService instance
    pub fn new(repository: Arc<dyn AccountRepositoryTrait>) -> Self {
        Self { repository }
    }
}

#[async_trait]
impl AccountServiceTrait for AccountService {
    async fn create_account(&self, new_account: NewAccount) -> Result<Account> {
        debug!("Creating account '{}'", new_account.name);
        let account = new_account.into_account(Utc::now())?;
        let created = self.repository.create(account).await?;
        info!(
            "Created account {} (mode {}, currency {})",
            created.id, created.trading_mode, created.preferred_currency
        );
        Ok(created)
    }

    async fn update_account(&self, account_update: AccountUpdate) -> Result<Account> {
        let mut account = self.repository.get_by_id(&account_update.id)?;
        account_update.apply(&mut account, Utc::now())?;
        self.repository.update(account).await
    }

    async fn set_trading_mode(&self, account_id: &str, mode: TradingMode) -> Result<Account> {
        info!("Switching account {} to {} trading", account_id, mode);
        self.update_account(AccountUpdate {
            id: account_id.to_string(),
            trading_mode: Some(mode),
            ..Default::default()
        })
        .await
    }

    async fn set_preferred_currency(
        &self,
        account_id: &str,
        currency: &str,
    ) -> Result<Account> {
        self.update_account(AccountUpdate {
            id: account_id.to_string(),
            preferred_currency: Some(currency.to_string()),
            ..Default::default()
        })
        .await
    }

    async fn set_notification_token(
        &self,
        account_id: &str,
        token: Option<String>,
    ) -> Result<Account> {
        self.update_account(AccountUpdate {
            id: account_id.to_string(),
            notification_token: Some(token),
            ..Default::default()
        })
        .await
    }

    fn get_account(&self, account_id: &str) -> Result<Account> {
        self.repository.get_by_id(account_id)
    }

    fn list_accounts(&self) -> Result<Vec<Account>> {
        self.repository.list()
    }
}
