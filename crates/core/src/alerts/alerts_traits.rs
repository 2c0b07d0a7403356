//! Alert repository trait.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::alerts_model::Alert;
use crate::errors::Result;

#[async_trait]
pub trait AlertRepositoryTrait: Send + Sync {
    async fn create(&self, alert: Alert) -> Result<Alert>;

    /// Replaces a stored alert. Returns `DatabaseError::NotFound` for an unknown id.
    async fn update(&self, alert: Alert) -> Result<Alert>;

    async fn delete(&self, alert_id: &str) -> Result<()>;

    fn get_by_id(&self, alert_id: &str) -> Result<Option<Alert>>;

    /// Alerts of an account, newest first.
    fn list_by_account(&self, account_id: &str) -> Result<Vec<Alert>>;

    /// Every active alert across all accounts.
    fn list_active(&self) -> Result<Vec<Alert>>;

    /// Atomically moves an active alert to triggered.
    ///
    /// Returns the updated alert, or `None` when the alert is missing or
    /// already inactive. Of two concurrent calls on the same alert at most
    /// one gets `Some`.
    async fn mark_triggered(&self, alert_id: &str, at: DateTime<Utc>) -> Result<Option<Alert>>;
}
