//! Output module for inspecting and exporting results
//!
//! This module handles:
//! - Printing statistics about stored results and the latest run
//! - Exporting the dataset as JSON

mod export;
pub mod stats;

pub use export::export_dataset;
pub use stats::{load_statistics, print_statistics, RunStatistics};
