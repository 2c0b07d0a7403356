//! Domain events module.
//!
//! Provides domain event types and the sink trait for emitting events
//! after successful domain mutations. The host process implements the sink
//! to run follow-up work (snapshot refresh) off the caller's path.

mod domain_event;
mod sink;

pub use domain_event::*;
pub use sink::*;
