//! Background schedulers for the periodic engine jobs.
//!
//! - Alert scan on a fixed interval.
//! - Nightly snapshot batch at a fixed UTC hour.

use std::sync::Arc;

use chrono::{DateTime, Duration as ChronoDuration, NaiveTime, Utc};
use tokio::task::JoinHandle;
use tokio::time::{interval, Duration, MissedTickBehavior};
use tracing::{debug, info, warn};
use tradedesk_core::alerts::AlertServiceTrait;
use tradedesk_core::portfolio::snapshot::SnapshotServiceTrait;

/// Starts the alert scan loop. The first scan runs one interval after start.
pub fn start_alert_scheduler(
    alert_service: Arc<dyn AlertServiceTrait>,
    every: Duration,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        info!("Alert scheduler started ({:?} interval)", every);

        let mut ticker = interval(every);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // The first tick completes immediately
        ticker.tick().await;

        loop {
            ticker.tick().await;
            run_alert_scan(alert_service.as_ref()).await;
        }
    })
}

async fn run_alert_scan(alert_service: &dyn AlertServiceTrait) {
    debug!("Running scheduled alert scan...");
    match alert_service.check_and_trigger_alerts().await {
        Ok(triggered) if triggered.is_empty() => debug!("Alert scan: nothing triggered"),
        Ok(triggered) => info!("Alert scan triggered {} alert(s)", triggered.len()),
        Err(e) => warn!("Scheduled alert scan failed: {}", e),
    }
}

/// Starts the nightly snapshot loop at `hour_utc`:00 every day.
pub fn start_snapshot_scheduler(
    snapshot_service: Arc<dyn SnapshotServiceTrait>,
    hour_utc: u32,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        info!("Snapshot scheduler started (daily at {:02}:00 UTC)", hour_utc);

        loop {
            let now = Utc::now();
            let next = next_run_after(now, hour_utc);
            let wait = (next - now).to_std().unwrap_or_default();
            debug!("Next nightly snapshot batch at {} (in {:?})", next, wait);
            tokio::time::sleep(wait).await;

            match snapshot_service.run_nightly_batch().await {
                Ok(summary) if summary.failed_accounts.is_empty() => {
                    debug!("Nightly batch finished without failures")
                }
                Ok(summary) => warn!(
                    "Nightly batch could not snapshot {} account(s): {:?}",
                    summary.failed_accounts.len(),
                    summary.failed_accounts
                ),
                Err(e) => warn!("Nightly snapshot batch failed: {}", e),
            }
        }
    })
}

/// The first `hour_utc`:00 strictly after `now`.
pub fn next_run_after(now: DateTime<Utc>, hour_utc: u32) -> DateTime<Utc> {
    let at = NaiveTime::from_hms_opt(hour_utc.min(23), 0, 0).unwrap_or(NaiveTime::MIN);
    let today = now.date_naive().and_time(at).and_utc();
    if today > now {
        today
    } else {
        today + ChronoDuration::days(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use chrono::TimeZone;
    use tradedesk_core::alerts::{Alert, NewAlert};
    use tradedesk_core::errors::Result;

    #[test]
    fn test_next_run_later_today() {
        let now = Utc.with_ymd_and_hms(2026, 10, 16, 0, 30, 0).unwrap();
        assert_eq!(
            next_run_after(now, 1),
            Utc.with_ymd_and_hms(2026, 10, 16, 1, 0, 0).unwrap()
        );
    }

    #[test]
    fn test_next_run_rolls_to_tomorrow() {
        let now = Utc.with_ymd_and_hms(2026, 10, 16, 1, 0, 0).unwrap();
        assert_eq!(
            next_run_after(now, 1),
            Utc.with_ymd_and_hms(2026, 10, 17, 1, 0, 0).unwrap()
        );

        let late = Utc.with_ymd_and_hms(2026, 12, 31, 23, 59, 0).unwrap();
        assert_eq!(
            next_run_after(late, 1),
            Utc.with_ymd_and_hms(2027, 1, 1, 1, 0, 0).unwrap()
        );
    }

    #[derive(Default)]
    struct CountingAlerts {
        scans: AtomicUsize,
    }

    #[async_trait]
    impl AlertServiceTrait for CountingAlerts {
        async fn create_alert(&self, _account_id: &str, _new_alert: NewAlert) -> Result<Alert> {
            unimplemented!()
        }

        fn get_alerts(&self, _account_id: &str) -> Result<Vec<Alert>> {
            Ok(Vec::new())
        }

        fn get_active_alerts(&self, _account_id: &str) -> Result<Vec<Alert>> {
            Ok(Vec::new())
        }

        fn get_alerts_by_symbol(&self, _account_id: &str, _symbol: &str) -> Result<Vec<Alert>> {
            Ok(Vec::new())
        }

        async fn toggle_alert(&self, _account_id: &str, _alert_id: &str) -> Result<Alert> {
            unimplemented!()
        }

        async fn delete_alert(&self, _account_id: &str, _alert_id: &str) -> Result<()> {
            Ok(())
        }

        async fn check_and_trigger_alerts(&self) -> Result<Vec<Alert>> {
            self.scans.fetch_add(1, Ordering::SeqCst);
            Ok(Vec::new())
        }

        async fn check_and_trigger_alerts_at(&self, _now: DateTime<Utc>) -> Result<Vec<Alert>> {
            self.check_and_trigger_alerts().await
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_alert_scheduler_skips_first_tick() {
        let alerts = Arc::new(CountingAlerts::default());
        let handle = start_alert_scheduler(alerts.clone(), Duration::from_secs(300));

        tokio::time::sleep(Duration::from_secs(1)).await;
        assert_eq!(alerts.scans.load(Ordering::SeqCst), 0);

        tokio::time::sleep(Duration::from_secs(300)).await;
        assert_eq!(alerts.scans.load(Ordering::SeqCst), 1);

        tokio::time::sleep(Duration::from_secs(600)).await;
        assert_eq!(alerts.scans.load(Ordering::SeqCst), 3);
        handle.abort();
    }
}
