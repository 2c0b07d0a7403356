//! In-memory ledger unit of work and transaction log.

mod ledger;
mod repository;

pub use ledger::MemoryLedgerExecutor;
pub use repository::TransactionRepository;
