//! Profiling utilities for the join pipeline.

mod observer;

pub use observer::{NoopObserver, Observer, Phase, TracingObserver};

use serde::{Deserialize, Serialize};
use std::io::{self, ErrorKind};
use std::sync::Mutex;
use std::time::Duration;

/// Per-node row counts recorded during one phase.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct NodeProfile {
    /// Pre-order node id.
    pub node: usize,
    /// Relation name at the time of the event.
    pub relation: String,
    pub rows_before: usize,
    pub rows_after: usize,
}

/// One pipeline phase.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct PhaseProfile {
    pub phase: Phase,
    pub elapsed_micros: u128,
    /// Tuple count at the end of the phase.
    pub rows: usize,
    pub nodes: Vec<NodeProfile>,
}

/// Collects pipeline events and serializes them as JSON.
#[derive(Debug, Default)]
pub struct Profiler {
    phases: Mutex<Vec<PhaseProfile>>,
}

impl Profiler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the phases recorded so far.
    pub fn phases(&self) -> Vec<PhaseProfile> {
        self.lock().clone()
    }

    /// Serialize profiler data to a pretty JSON file.
    pub fn write_json<P: AsRef<std::path::Path>>(&self, path: P) -> io::Result<()> {
        let json = serde_json::to_string_pretty(&*self.lock())
            .map_err(|err| io::Error::new(ErrorKind::Other, err))?;
        std::fs::write(path, json)
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<PhaseProfile>> {
        // A poisoned lock still holds complete entries.
        self.phases.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl Observer for Profiler {
    fn phase_started(&self, phase: Phase) {
        self.lock().push(PhaseProfile {
            phase,
            elapsed_micros: 0,
            rows: 0,
            nodes: Vec::new(),
        });
    }

    fn phase_finished(&self, phase: Phase, elapsed: Duration, rows: usize) {
        if let Some(current) = self.lock().iter_mut().rev().find(|p| p.phase == phase) {
            current.elapsed_micros = elapsed.as_micros();
            current.rows = rows;
        }
    }

    fn relation_replaced(&self, phase: Phase, node: usize, relation: &str, before: usize, after: usize) {
        if let Some(current) = self.lock().iter_mut().rev().find(|p| p.phase == phase) {
            current.nodes.push(NodeProfile {
                node,
                relation: relation.to_string(),
                rows_before: before,
                rows_after: after,
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(profiler: &Profiler) {
        profiler.phase_started(Phase::BottomUp);
        profiler.relation_replaced(Phase::BottomUp, 1, "B", 2, 1);
        profiler.phase_finished(Phase::BottomUp, Duration::from_micros(42), 3);
        profiler.phase_started(Phase::Join);
        profiler.phase_finished(Phase::Join, Duration::from_micros(7), 1);
    }

    #[test]
    fn records_phases_in_order() {
        let profiler = Profiler::new();
        record(&profiler);

        let phases = profiler.phases();
        assert_eq!(phases.len(), 2);
        assert_eq!(phases[0].phase, Phase::BottomUp);
        assert_eq!(phases[0].elapsed_micros, 42);
        assert_eq!(phases[0].rows, 3);
        assert_eq!(
            phases[0].nodes,
            vec![NodeProfile {
                node: 1,
                relation: "B".into(),
                rows_before: 2,
                rows_after: 1
            }]
        );
        assert_eq!(phases[1].phase, Phase::Join);
        assert!(phases[1].nodes.is_empty());
    }

    #[test]
    fn events_without_started_phase_are_ignored() {
        let profiler = Profiler::new();
        profiler.relation_replaced(Phase::TopDown, 0, "A", 1, 1);
        profiler.phase_finished(Phase::TopDown, Duration::ZERO, 0);
        assert!(profiler.phases().is_empty());
    }

    #[test]
    fn write_json_roundtrip() {
        let profiler = Profiler::new();
        record(&profiler);

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("profile.json");
        profiler.write_json(&path).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        let back: Vec<PhaseProfile> = serde_json::from_str(&text).unwrap();
        assert_eq!(back, profiler.phases());
    }
}
