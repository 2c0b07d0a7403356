use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use futures::stream::{self, StreamExt};
use log::{debug, info, warn};

use super::alerts_errors::AlertError;
use super::alerts_evaluator::{percent_move, price_condition_met, reminder_due};
use super::alerts_model::{Alert, AlertCondition, NewAlert};
use super::alerts_traits::AlertRepositoryTrait;
use crate::accounts::AccountRepositoryTrait;
use crate::constants::MAX_CONCURRENT_ALERT_CHECKS;
use crate::errors::Result;
use crate::events::{DomainEvent, DomainEventSink};
use crate::notifications::{NotificationDispatcher, NotificationPayload, NotificationRequest};
use crate::quotes::QuoteOracleTrait;

#[async_trait]
pub trait AlertServiceTrait: Send + Sync {
    async fn create_alert(&self, account_id: &str, new_alert: NewAlert) -> Result<Alert>;

    /// All alerts of an account, newest first.
    fn get_alerts(&self, account_id: &str) -> Result<Vec<Alert>>;

    fn get_active_alerts(&self, account_id: &str) -> Result<Vec<Alert>>;

    fn get_alerts_by_symbol(&self, account_id: &str, symbol: &str) -> Result<Vec<Alert>>;

    /// Flips `is_active`. Re-activating clears `triggered_at`.
    async fn toggle_alert(&self, account_id: &str, alert_id: &str) -> Result<Alert>;

    async fn delete_alert(&self, account_id: &str, alert_id: &str) -> Result<()>;

    /// Scans every active alert at the current time.
    async fn check_and_trigger_alerts(&self) -> Result<Vec<Alert>>;

    /// Scans every active alert as of `now` and returns the ones that
    /// triggered, ordered by id.
    async fn check_and_trigger_alerts_at(&self, now: DateTime<Utc>) -> Result<Vec<Alert>>;
}

/// What an evaluation found: the alert fired with this payload and name.
struct Firing {
    name: String,
    payload: NotificationPayload,
}

pub struct AlertService {
    repository: Arc<dyn AlertRepositoryTrait>,
    account_repository: Arc<dyn AccountRepositoryTrait>,
    quote_oracle: Arc<dyn QuoteOracleTrait>,
    dispatcher: Arc<dyn NotificationDispatcher>,
    event_sink: Arc<dyn DomainEventSink>,
}

impl AlertService {
    pub fn new(
        repository: Arc<dyn AlertRepositoryTrait>,
        account_repository: Arc<dyn AccountRepositoryTrait>,
        quote_oracle: Arc<dyn QuoteOracleTrait>,
        dispatcher: Arc<dyn NotificationDispatcher>,
        event_sink: Arc<dyn DomainEventSink>,
    ) -> Self {
        Self {
            repository,
            account_repository,
            quote_oracle,
            dispatcher,
            event_sink,
        }
    }

    fn owned_alert(&self, account_id: &str, alert_id: &str) -> Result<Alert> {
        let alert = self
            .repository
            .get_by_id(alert_id)?
            .ok_or_else(|| AlertError::NotFound(alert_id.to_string()))?;
        if alert.account_id != account_id {
            return Err(AlertError::NotOwner(alert_id.to_string()).into());
        }
        Ok(alert)
    }

    /// Checks one alert against upstream data. `Ok(None)` means no trigger,
    /// which includes every data miss.
    async fn evaluate(&self, alert: &Alert, now: DateTime<Utc>) -> Result<Option<Firing>> {
        match &alert.condition {
            AlertCondition::Above { target_price } | AlertCondition::Below { target_price } => {
                let Some(quote) = self.quote_oracle.get_quote(&alert.symbol).await? else {
                    debug!("No quote for {}; alert {} skipped", alert.symbol, alert.id);
                    return Ok(None);
                };
                Ok(price_condition_met(&alert.condition, quote.price).then(|| Firing {
                    name: quote.name,
                    payload: NotificationPayload::PriceAlert {
                        kind: alert.kind(),
                        target_price: *target_price,
                        current_price: quote.price,
                    },
                }))
            }
            AlertCondition::PercentChange {
                threshold_percent,
                reference_price,
            } => {
                let Some(reference_price) = *reference_price else {
                    debug!("Alert {} has no reference price; skipped", alert.id);
                    return Ok(None);
                };
                let Some(quote) = self.quote_oracle.get_quote(&alert.symbol).await? else {
                    debug!("No quote for {}; alert {} skipped", alert.symbol, alert.id);
                    return Ok(None);
                };
                let Some(moved) = percent_move(quote.price, reference_price) else {
                    warn!(
                        "Alert {}: move from reference {} to {} is out of range; skipped",
                        alert.id, reference_price, quote.price
                    );
                    return Ok(None);
                };
                Ok((moved >= *threshold_percent).then(|| Firing {
                    name: quote.name,
                    payload: NotificationPayload::PriceAlert {
                        kind: alert.kind(),
                        target_price: *threshold_percent,
                        current_price: quote.price,
                    },
                }))
            }
            AlertCondition::EarningsReminder { .. } => {
                let days_notice = alert.condition.days_notice().unwrap_or_default();
                let Some(earnings) = self.quote_oracle.get_earnings(&alert.symbol).await? else {
                    debug!("No earnings date for {}; alert {} skipped", alert.symbol, alert.id);
                    return Ok(None);
                };
                Ok(
                    reminder_due(earnings.next_earnings_date, days_notice, now).then(|| Firing {
                        name: alert.name.clone(),
                        payload: NotificationPayload::EarningsReminder {
                            earnings_date: earnings.next_earnings_date,
                            days_notice,
                        },
                    }),
                )
            }
            AlertCondition::DividendPayment { .. } => {
                let days_notice = alert.condition.days_notice().unwrap_or_default();
                let Some(dividend) = self.quote_oracle.get_dividends(&alert.symbol).await? else {
                    debug!("No dividend date for {}; alert {} skipped", alert.symbol, alert.id);
                    return Ok(None);
                };
                Ok(
                    reminder_due(dividend.payment_date, days_notice, now).then(|| Firing {
                        name: alert.name.clone(),
                        payload: NotificationPayload::DividendPayment {
                            amount: dividend.amount,
                            payment_date: dividend.payment_date,
                        },
                    }),
                )
            }
        }
    }

    /// Evaluates and, on a hit, triggers one alert. Errors stay with the alert.
    async fn check_alert(&self, alert: Alert, now: DateTime<Utc>) -> Option<Alert> {
        let firing = match self.evaluate(&alert, now).await {
            Ok(Some(firing)) => firing,
            Ok(None) => return None,
            Err(e) => {
                warn!(
                    "Error checking alert {} ({} {}): {}",
                    alert.id,
                    alert.kind(),
                    alert.symbol,
                    e
                );
                return None;
            }
        };

        let triggered = match self.repository.mark_triggered(&alert.id, now).await {
            Ok(Some(triggered)) => triggered,
            Ok(None) => {
                debug!("Alert {} was triggered concurrently; skipping", alert.id);
                return None;
            }
            Err(e) => {
                warn!("Failed to mark alert {} as triggered: {}", alert.id, e);
                return None;
            }
        };

        info!(
            "Alert {} triggered: {} {} for account {}",
            triggered.id,
            triggered.kind(),
            triggered.symbol,
            triggered.account_id
        );
        self.notify(&triggered, firing);
        self.event_sink.emit(DomainEvent::alert_triggered(
            &triggered.account_id,
            &triggered.id,
            &triggered.symbol,
        ));
        Some(triggered)
    }

    fn notify(&self, alert: &Alert, firing: Firing) {
        let token = match self.account_repository.get_by_id(&alert.account_id) {
            Ok(account) => account.notification_token,
            Err(e) => {
                warn!(
                    "Could not load account {} to notify alert {}: {}",
                    alert.account_id, alert.id, e
                );
                return;
            }
        };
        let Some(device_token) = token else {
            debug!(
                "Account {} has no notification token; alert {} not pushed",
                alert.account_id, alert.id
            );
            return;
        };

        self.dispatcher.send(NotificationRequest {
            account_id: alert.account_id.clone(),
            device_token,
            alert_id: alert.id.clone(),
            symbol: alert.symbol.clone(),
            name: firing.name,
            payload: firing.payload,
        });
    }
}

#[async_trait]
impl AlertServiceTrait for AlertService {
    async fn create_alert(&self, account_id: &str, new_alert: NewAlert) -> Result<Alert> {
        let symbol = new_alert.symbol.trim().to_uppercase();
        if symbol.is_empty() {
            return Err(AlertError::InvalidAlert("Symbol is required".to_string()).into());
        }
        let condition = new_alert.condition()?;
        self.account_repository.get_by_id(account_id)?;

        let name = new_alert
            .name
            .as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .unwrap_or(symbol.as_str())
            .to_string();
        let alert = Alert {
            id: uuid::Uuid::new_v4().to_string(),
            account_id: account_id.to_string(),
            symbol,
            name,
            condition,
            is_active: true,
            created_at: Utc::now(),
            triggered_at: None,
        };

        let created = self.repository.create(alert).await?;
        info!(
            "Created {} alert {} on {} for account {}",
            created.kind(),
            created.id,
            created.symbol,
            account_id
        );
        Ok(created)
    }

    fn get_alerts(&self, account_id: &str) -> Result<Vec<Alert>> {
        self.repository.list_by_account(account_id)
    }

    fn get_active_alerts(&self, account_id: &str) -> Result<Vec<Alert>> {
        Ok(self
            .repository
            .list_by_account(account_id)?
            .into_iter()
            .filter(|a| a.is_active)
            .collect())
    }

    fn get_alerts_by_symbol(&self, account_id: &str, symbol: &str) -> Result<Vec<Alert>> {
        let symbol = symbol.trim().to_uppercase();
        Ok(self
            .repository
            .list_by_account(account_id)?
            .into_iter()
            .filter(|a| a.symbol == symbol)
            .collect())
    }

    async fn toggle_alert(&self, account_id: &str, alert_id: &str) -> Result<Alert> {
        let mut alert = self.owned_alert(account_id, alert_id)?;
        alert.is_active = !alert.is_active;
        if alert.is_active {
            alert.triggered_at = None;
        }
        let updated = self.repository.update(alert).await?;
        info!(
            "Alert {} is now {}",
            updated.id,
            if updated.is_active { "active" } else { "inactive" }
        );
        Ok(updated)
    }

    async fn delete_alert(&self, account_id: &str, alert_id: &str) -> Result<()> {
        self.owned_alert(account_id, alert_id)?;
        self.repository.delete(alert_id).await?;
        info!("Deleted alert {} for account {}", alert_id, account_id);
        Ok(())
    }

    async fn check_and_trigger_alerts(&self) -> Result<Vec<Alert>> {
        self.check_and_trigger_alerts_at(Utc::now()).await
    }

    async fn check_and_trigger_alerts_at(&self, now: DateTime<Utc>) -> Result<Vec<Alert>> {
        let active = self.repository.list_active()?;
        let checked = active.len();
        debug!("Checking {} active alerts", checked);

        let mut triggered: Vec<Alert> = stream::iter(active)
            .map(|alert| self.check_alert(alert, now))
            .buffer_unordered(MAX_CONCURRENT_ALERT_CHECKS)
            .filter_map(|outcome| async move { outcome })
            .collect()
            .await;
        triggered.sort_by(|a, b| a.id.cmp(&b.id));

        info!(
            "Alert scan finished: {} checked, {} triggered",
            checked,
            triggered.len()
        );
        Ok(triggered)
    }
}
