//! In-memory storage implementation for alerts.

mod repository;

pub use repository::AlertRepository;
