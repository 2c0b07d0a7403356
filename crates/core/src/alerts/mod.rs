//! Alerts module - conditional alerts on symbols and the periodic scan
//! that triggers them.

mod alerts_errors;
mod alerts_evaluator;
mod alerts_model;
mod alerts_service;
mod alerts_traits;

#[cfg(test)]
mod alerts_model_tests;

pub use alerts_errors::AlertError;
pub use alerts_evaluator::{percent_move, price_condition_met, reminder_due};
pub use alerts_model::{Alert, AlertCondition, AlertKind, NewAlert};
pub use alerts_service::{AlertService, AlertServiceTrait};
pub use alerts_traits::AlertRepositoryTrait;
