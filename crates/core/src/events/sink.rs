//! Domain event sink trait and implementations.

use std::sync::{Arc, Mutex, MutexGuard};

use super::DomainEvent;

/// Trait for receiving domain events.
///
/// Core services emit events through this trait after a successful commit.
///
/// # Design Rules
///
/// - `emit()` must be fast and non-blocking (no network calls, no storage writes)
/// - Implementations should queue events for async processing
/// - Failure to emit must not affect domain operations (best-effort)
pub trait DomainEventSink: Send + Sync {
    /// Emit a single domain event.
    fn emit(&self, event: DomainEvent);

    /// Emit multiple domain events.
    ///
    /// Default implementation calls `emit()` for each event.
    fn emit_batch(&self, events: Vec<DomainEvent>) {
        for event in events {
            self.emit(event);
        }
    }
}

/// No-op implementation for tests or contexts that don't need events.
#[derive(Clone, Default)]
pub struct NoOpDomainEventSink;

impl DomainEventSink for NoOpDomainEventSink {
    fn emit(&self, _event: DomainEvent) {}
}

/// Mock sink for testing - collects emitted events.
#[derive(Clone, Default)]
pub struct MockDomainEventSink {
    events: Arc<Mutex<Vec<DomainEvent>>>,
}

impl MockDomainEventSink {
    pub fn new() -> Self {
        Self::default()
    }

    fn guard(&self) -> MutexGuard<'_, Vec<DomainEvent>> {
        self.events.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Returns all collected events.
    pub fn events(&self) -> Vec<DomainEvent> {
        self.guard().clone()
    }

    /// Clears collected events.
    pub fn clear(&self) {
        self.guard().clear();
    }

    /// Returns the number of collected events.
    pub fn len(&self) -> usize {
        self.guard().len()
    }

    /// Returns true if no events have been collected.
    pub fn is_empty(&self) -> bool {
        self.guard().is_empty()
    }
}

impl DomainEventSink for MockDomainEventSink {
    fn emit(&self, event: DomainEvent) {
        self.guard().push(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::accounts::TradingMode;
    use crate::trading::TradeSide;

    fn trade(symbol: &str) -> DomainEvent {
        DomainEvent::trade_executed("acc-1", TradingMode::Real, symbol, TradeSide::Buy)
    }

    #[test]
    fn test_noop_sink_does_not_panic() {
        let sink = NoOpDomainEventSink;
        sink.emit(trade("AAPL"));
        sink.emit_batch(vec![trade("MSFT"), trade("GOOG")]);
    }

    #[test]
    fn test_mock_sink_collects_events() {
        let sink = MockDomainEventSink::new();
        assert!(sink.is_empty());

        sink.emit(trade("AAPL"));
        assert_eq!(sink.len(), 1);

        sink.emit_batch(vec![trade("MSFT"), trade("GOOG")]);
        assert_eq!(sink.len(), 3);
        assert_eq!(sink.events()[2], trade("GOOG"));

        sink.clear();
        assert!(sink.is_empty());
    }
}
