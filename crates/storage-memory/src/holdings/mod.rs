//! In-memory storage implementation for holdings.

mod repository;

pub use repository::HoldingRepository;
