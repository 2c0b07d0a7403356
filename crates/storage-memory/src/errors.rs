//! Storage-specific error types for the in-memory store.
//!
//! Converted to the database-agnostic [`DatabaseError`] before reaching
//! callers.

use thiserror::Error;
use tradedesk_core::errors::{DatabaseError, Error};

#[derive(Error, Debug)]
pub enum StorageError {
    /// A thread panicked while holding the state lock.
    #[error("Storage lock poisoned")]
    LockPoisoned,

    /// A unit of work was refused at commit time.
    #[error("Commit rejected: {0}")]
    CommitRejected(String),

    #[error("Record not found: {0}")]
    NotFound(String),

    #[error("Duplicate key: {0}")]
    Duplicate(String),
}

impl From<StorageError> for DatabaseError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::LockPoisoned => DatabaseError::Internal(err.to_string()),
            StorageError::CommitRejected(reason) => DatabaseError::TransactionFailed(reason),
            StorageError::NotFound(what) => DatabaseError::NotFound(what),
            StorageError::Duplicate(key) => DatabaseError::UniqueViolation(key),
        }
    }
}

impl From<StorageError> for Error {
    fn from(err: StorageError) -> Self {
        Error::Database(err.into())
    }
}
