//! In-memory storage implementation for Tradedesk.
//!
//! Implements the repository traits defined in `tradedesk-core` over a
//! single shared [`MemoryDb`]. Every repository is a thin handle onto that
//! state, so handles created from the same database see each other's writes.
//!
//! ```text
//!        core (domain traits)
//!                │
//!                ▼
//!   storage-memory (this crate)
//!                │
//!                ▼
//!     MemoryDb (Arc<Mutex<State>>)
//! ```

pub mod db;
pub mod errors;

// Repository implementations
pub mod accounts;
pub mod alerts;
pub mod holdings;
pub mod snapshots;
pub mod trading;

pub use db::MemoryDb;
pub use errors::StorageError;

pub use accounts::AccountRepository;
pub use alerts::AlertRepository;
pub use holdings::HoldingRepository;
pub use snapshots::SnapshotRepository;
pub use trading::{MemoryLedgerExecutor, TransactionRepository};

// Re-export from tradedesk-core for convenience
pub use tradedesk_core::errors::{DatabaseError, Error, Result};
