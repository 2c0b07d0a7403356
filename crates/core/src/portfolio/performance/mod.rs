mod performance_calculator;
pub mod performance_model;
pub mod performance_service;

#[cfg(test)]
mod performance_service_tests;

pub use performance_calculator::calculate_performance_history;
pub use performance_model::*;
pub use performance_service::*;
