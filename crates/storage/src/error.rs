use thiserror::Error;

/// Errors that can occur when interacting with storage.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StorageError {
    /// Another unit of work committed after this one began.
    #[error("Concurrency conflict: unit of work began at revision {expected}, store is at {actual}")]
    ConcurrencyConflict { expected: u64, actual: u64 },

    /// An entity with the same identifier is already stored.
    #[error("{entity} already stored: {id}")]
    Duplicate { entity: &'static str, id: String },
}

/// Result type for storage operations.
pub type Result<T> = std::result::Result<T, StorageError>;
