//! In-memory storage implementation for portfolio snapshots.

mod repository;

pub use repository::SnapshotRepository;
