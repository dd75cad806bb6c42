//! Statistics from the result database
//!
//! This module provides functionality for extracting and displaying
//! statistics about stored results and the latest run.

use crate::storage::{RunRecord, SqliteStore, StorageResult};

/// Stored result statistics
#[derive(Debug, Clone)]
pub struct RunStatistics {
    /// Number of records in the dataset
    pub dataset_items: u64,

    /// Keys present in the key-value store
    pub keys: Vec<String>,

    /// The most recent run, if any
    pub latest_run: Option<RunRecord>,
}

/// Loads statistics from storage
pub fn load_statistics(store: &SqliteStore) -> StorageResult<RunStatistics> {
    Ok(RunStatistics {
        dataset_items: store.count_items()?,
        keys: store.keys()?,
        latest_run: store.latest_run()?,
    })
}

/// Prints statistics to stdout
pub fn print_statistics(stats: &RunStatistics) {
    println!("=== Tube-Harvest Statistics ===\n");

    println!("Dataset items: {}", stats.dataset_items);

    println!("\nKey-value store ({} keys):", stats.keys.len());
    for key in &stats.keys {
        println!("  - {}", key);
    }

    match &stats.latest_run {
        Some(run) => {
            println!("\nLatest run #{}:", run.id);
            println!("  Status: {}", run.status.to_db_string());
            println!("  Started: {}", run.started_at);
            println!(
                "  Finished: {}",
                run.finished_at.as_deref().unwrap_or("(not finished)")
            );
            println!("  Requests finished: {}", run.requests_finished);
            println!("  Requests failed: {}", run.requests_failed);
            println!("  Records pushed: {}", run.records_pushed);
        }
        None => println!("\nNo runs recorded yet"),
    }
}
