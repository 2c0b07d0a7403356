use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tradedesk_core::alerts::{Alert, AlertRepositoryTrait};
use tradedesk_core::errors::Result;

use crate::db::MemoryDb;
use crate::errors::StorageError;

pub struct AlertRepository {
    db: MemoryDb,
}

impl AlertRepository {
    pub fn new(db: MemoryDb) -> Self {
        Self { db }
    }
}

#[async_trait]
impl AlertRepositoryTrait for AlertRepository {
    async fn create(&self, alert: Alert) -> Result<Alert> {
        self.db.write(|state| {
            if state.alerts.contains_key(&alert.id) {
                return Err(StorageError::Duplicate(format!("alert {}", alert.id)).into());
            }
            state.alerts.insert(alert.id.clone(), alert.clone());
            Ok(alert)
        })
    }

    async fn update(&self, alert: Alert) -> Result<Alert> {
        self.db.write(|state| {
            let existing = state
                .alerts
                .get_mut(&alert.id)
                .ok_or_else(|| StorageError::NotFound(format!("alert {}", alert.id)))?;
            *existing = alert.clone();
            Ok(alert)
        })
    }

    async fn delete(&self, alert_id: &str) -> Result<()> {
        self.db.write(|state| {
            state.alerts.remove(alert_id);
            Ok(())
        })
    }

    fn get_by_id(&self, alert_id: &str) -> Result<Option<Alert>> {
        self.db.read(|state| state.alerts.get(alert_id).cloned())
    }

    fn list_by_account(&self, account_id: &str) -> Result<Vec<Alert>> {
        let mut alerts: Vec<Alert> = self.db.read(|state| {
            state
                .alerts
                .values()
                .filter(|a| a.account_id == account_id)
                .cloned()
                .collect()
        })?;
        alerts.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| a.id.cmp(&b.id))
        });
        Ok(alerts)
    }

    fn list_active(&self) -> Result<Vec<Alert>> {
        let mut alerts: Vec<Alert> = self.db.read(|state| {
            state
                .alerts
                .values()
                .filter(|a| a.is_active)
                .cloned()
                .collect()
        })?;
        alerts.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));
        Ok(alerts)
    }

    async fn mark_triggered(&self, alert_id: &str, at: DateTime<Utc>) -> Result<Option<Alert>> {
        self.db.write(|state| match state.alerts.get_mut(alert_id) {
            Some(alert) if alert.is_active => {
                alert.is_active = false;
                alert.triggered_at = Some(at);
                Ok(Some(alert.clone()))
            }
            _ => Ok(None),
        })
    }
}
