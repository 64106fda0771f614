//! Shared command line and reporting utilities for the join engine.

pub mod config;
pub mod formatter;

pub use config::{get_tree_files, tree_name, Config, ExecutionMode};
pub use formatter::BatchSummary;
