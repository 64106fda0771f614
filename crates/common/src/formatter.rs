//! Per-tree outcomes and the closing summary for `all` mode.

use std::fmt::Display;
use tracing::{error, info};

/// Collects the outcome of every tree in a batch run.
///
/// Failures are kept with their error text and repeated in the summary so
/// they are not lost among per-tree log lines.
pub struct BatchSummary {
    expected: usize,
    evaluated: usize,
    result_tuples: usize,
    failures: Vec<(String, String)>,
}

impl BatchSummary {
    pub fn new(expected: usize) -> Self {
        info!("Evaluating {} join trees", expected);

        Self {
            expected,
            evaluated: 0,
            result_tuples: 0,
            failures: Vec::new(),
        }
    }

    pub fn record_result(&mut self, tree: &str, arity: usize, tuples: usize) {
        self.evaluated += 1;
        self.result_tuples += tuples;
        info!("{}: {} attributes, {} tuples", tree, arity, tuples);
    }

    pub fn record_failure(&mut self, tree: &str, error: impl Display) {
        let error = error.to_string();
        error!("{}: {}", tree, error);
        self.failures.push((tree.to_string(), error));
    }

    pub fn evaluated(&self) -> usize {
        self.evaluated
    }

    pub fn result_tuples(&self) -> usize {
        self.result_tuples
    }

    pub fn failures(&self) -> &[(String, String)] {
        &self.failures
    }

    /// Logs the summary; returns `true` when every tree was evaluated.
    pub fn finish(self) -> bool {
        info!(
            "{} of {} join trees evaluated, {} result tuples in total",
            self.evaluated, self.expected, self.result_tuples
        );
        if self.failures.is_empty() {
            return true;
        }

        error!("{} join trees failed:", self.failures.len());
        for (tree, error) in &self.failures {
            error!("  {}: {}", tree, error);
        }
        false
    }
}
