//! Domain events runtime bridge for the worker.
//!
//! Receives domain events via DomainEventSink, debounces them, and triggers
//! snapshot refresh and revaluation of every partition an order touched.
//!
//! Events are debounced with a 1-second window and processed directly
//! by the queue worker so a refresh never overlaps the next one.

mod planner;
mod queue_worker;
mod sink;

pub use sink::WorkerDomainEventSink;
