//! Pipeline diagnostics hooks.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;
use tracing::{debug, trace};

/// Stages of the join pipeline, in execution order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Phase {
    Selection,
    BottomUp,
    TopDown,
    Join,
    Projection,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Selection => "selection",
            Self::BottomUp => "bottom-up reduction",
            Self::TopDown => "top-down reduction",
            Self::Join => "join",
            Self::Projection => "projection",
        };
        write!(f, "{label}")
    }
}

/// Receives informational events from the pipeline.
///
/// Implementations must not influence the computation. Events for sibling
/// subtrees may arrive from different threads when the pipeline runs in
/// parallel, hence `&self` and `Sync`.
pub trait Observer: Send + Sync {
    fn phase_started(&self, _phase: Phase) {}

    /// `rows` is the total tuple count across the tree (or of the result) at the end of the phase.
    fn phase_finished(&self, _phase: Phase, _elapsed: Duration, _rows: usize) {}

    /// A node's relation slot was replaced during `phase`.
    fn relation_replaced(
        &self,
        _phase: Phase,
        _node: usize,
        _relation: &str,
        _before: usize,
        _after: usize,
    ) {
    }
}

/// Ignores every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl Observer for NoopObserver {}

/// Forwards events to `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingObserver;

impl Observer for TracingObserver {
    fn phase_started(&self, phase: Phase) {
        debug!(target: "pipeline", "{} started", phase);
    }

    fn phase_finished(&self, phase: Phase, elapsed: Duration, rows: usize) {
        debug!(target: "pipeline", "{} finished in {:?} ({} rows)", phase, elapsed, rows);
    }

    fn relation_replaced(&self, phase: Phase, node: usize, relation: &str, before: usize, after: usize) {
        trace!(target: "pipeline", "[{}] #{} {}: {} -> {}", phase, node, relation, before, after);
    }
}
