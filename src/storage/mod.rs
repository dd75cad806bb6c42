//! Storage module for persisting crawl results
//!
//! This module handles:
//! - The dataset sink that receives extracted records
//! - The key-value store for named results (e.g. the JSON video list)
//! - Run tracking for statistics

mod memory;
mod schema;
mod sqlite;
mod traits;

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;
pub use traits::{DatasetSink, KeyValueStore, Storage, StorageError, StorageResult};

/// One extracted record: field name to scraped value
pub type Record = serde_json::Map<String, serde_json::Value>;

/// Represents a crawl run
#[derive(Debug, Clone)]
pub struct RunRecord {
    pub id: i64,
    pub started_at: String,
    pub finished_at: Option<String>,
    pub status: RunStatus,
    pub requests_finished: u64,
    pub requests_failed: u64,
    pub records_pushed: u64,
}

/// Status of a crawl run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
    Running,
    Succeeded,
    Failed,
}

impl RunStatus {
    pub fn to_db_string(&self) -> &'static str {
        match self {
            Self::Running => "running",
            Self::Succeeded => "succeeded",
            Self::Failed => "failed",
        }
    }

    pub fn from_db_string(s: &str) -> Option<Self> {
        match s {
            "running" => Some(Self::Running),
            "succeeded" => Some(Self::Succeeded),
            "failed" => Some(Self::Failed),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_status_from_db_string() {
        assert_eq!(RunStatus::from_db_string("running"), Some(RunStatus::Running));
        assert_eq!(
            RunStatus::from_db_string(RunStatus::Succeeded.to_db_string()),
            Some(RunStatus::Succeeded)
        );
        assert_eq!(RunStatus::from_db_string("invalid"), None);
    }
}
