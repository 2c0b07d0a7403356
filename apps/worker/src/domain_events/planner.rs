//! Event planning functions for domain events.
//!
//! These functions analyze batches of domain events and determine what
//! follow-up work to run.

use std::collections::BTreeSet;

use tradedesk_core::{accounts::TradingMode, events::DomainEvent};

/// Plans the snapshot refreshes needed after a batch of events.
///
/// Each `(account_id, mode)` touched by a trade appears once, in a stable
/// order. Alert triggers do not change valuations and are ignored.
pub fn plan_snapshot_refresh(events: &[DomainEvent]) -> Vec<(String, TradingMode)> {
    let mut partitions: BTreeSet<(String, &'static str)> = BTreeSet::new();
    let mut planned = Vec::new();

    for event in events {
        if let DomainEvent::TradeExecuted {
            account_id, mode, ..
        } = event
        {
            if account_id.is_empty() {
                continue;
            }
            if partitions.insert((account_id.clone(), mode.as_str())) {
                planned.push((account_id.clone(), *mode));
            }
        }
    }

    planned.sort_by(|a, b| a.0.cmp(&b.0).then_with(|| a.1.as_str().cmp(b.1.as_str())));
    planned
}

/// Number of alert triggers in a batch.
pub fn count_alert_triggers(events: &[DomainEvent]) -> usize {
    events
        .iter()
        .filter(|e| matches!(e, DomainEvent::AlertTriggered { .. }))
        .count()
}
