//! Worker domain event sink implementation.
//!
//! Receives domain events and sends them to a background queue worker
//! for debounced processing.

use std::sync::{Arc, Mutex};

use tokio::sync::mpsc;
use tradedesk_core::{
    events::{DomainEvent, DomainEventSink},
    portfolio::{holdings::HoldingsServiceTrait, snapshot::SnapshotServiceTrait},
};

use super::queue_worker::{event_queue_worker, QueueWorkerDeps};

/// Domain event sink for the worker runtime.
///
/// # Two-Phase Initialization
///
/// Services that emit events need the sink before the services the worker
/// depends on exist:
///
/// 1. Create the sink with `new()` - this just creates the channel
/// 2. Call `start_worker()` after all services are created - this spawns the worker
pub struct WorkerDomainEventSink {
    tx: mpsc::UnboundedSender<DomainEvent>,
    rx: Mutex<Option<mpsc::UnboundedReceiver<DomainEvent>>>,
}

impl WorkerDomainEventSink {
    /// The sink accepts events immediately; they are buffered until
    /// `start_worker()` is called.
    pub fn new() -> Self {
        let (tx, rx) = mpsc::unbounded_channel();

        Self {
            tx,
            rx: Mutex::new(Some(rx)),
        }
    }

    /// Spawns the background worker. Later calls are ignored with a warning.
    pub fn start_worker(
        &self,
        snapshot_service: Arc<dyn SnapshotServiceTrait>,
        holdings_service: Arc<dyn HoldingsServiceTrait>,
    ) {
        let rx = self
            .rx
            .lock()
            .map(|mut slot| slot.take())
            .unwrap_or_else(|poisoned| poisoned.into_inner().take());
        let Some(rx) = rx else {
            tracing::warn!("Domain event worker already started");
            return;
        };

        let deps = Arc::new(QueueWorkerDeps {
            snapshot_service,
            holdings_service,
        });

        tokio::spawn(event_queue_worker(rx, deps));
    }
}

impl Default for WorkerDomainEventSink {
    fn default() -> Self {
        Self::new()
    }
}

impl DomainEventSink for WorkerDomainEventSink {
    fn emit(&self, event: DomainEvent) {
        // Best-effort: a closed channel drops the event
        if let Err(e) = self.tx.send(event) {
            tracing::warn!("Failed to send domain event: {}", e);
        }
    }
}
