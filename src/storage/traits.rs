//! Storage traits and error types

use crate::storage::Record;
use serde_json::Value;
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Database(String),

    #[error("Run not found: {0}")]
    RunNotFound(i64),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Append-only sink for extracted records
///
/// Implementations are shared between concurrent handler invocations.
pub trait DatasetSink: Send + Sync {
    /// Appends one record; ownership moves into the sink
    fn push_data(&self, record: Record) -> StorageResult<()>;

    /// Returns all records in insertion order
    fn dataset_items(&self) -> StorageResult<Vec<Record>>;
}

/// Named JSON values stored next to the dataset
pub trait KeyValueStore: Send + Sync {
    /// Stores `value` under `key`, replacing any previous value
    fn set_value(&self, key: &str, value: &Value) -> StorageResult<()>;

    /// Returns the value stored under `key`
    fn get_value(&self, key: &str) -> StorageResult<Option<Value>>;
}

/// Everything a crawl writes to
pub trait Storage: DatasetSink + KeyValueStore {}

impl<T: DatasetSink + KeyValueStore> Storage for T {}
