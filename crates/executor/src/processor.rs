//! The Yannakakis pipeline: selection, full reduction, join, projection.

use crate::error::{ExecutorError, Result};
use crate::joiner::Joiner;
use crate::options::ProcessOptions;
use crate::reducer::Reducer;
use crate::sink::ResultSink;
use algebra::Relation;
use jointree::{JoinTree, JoinTreeNode};
use profiler::{Observer, Phase, TracingObserver};
use serde::Serialize;
use std::sync::Arc;
use std::time::Instant;
use tracing::debug;

/// The final relation of a `process` call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProcessOutput {
    relation: Relation,
    arity: usize,
    cardinality: usize,
}

impl ProcessOutput {
    pub fn new(relation: Relation) -> Self {
        Self {
            arity: relation.arity(),
            cardinality: relation.cardinality(),
            relation,
        }
    }

    pub fn relation(&self) -> &Relation {
        &self.relation
    }

    pub fn arity(&self) -> usize {
        self.arity
    }

    pub fn cardinality(&self) -> usize {
        self.cardinality
    }

    /// Zero tuples with a well-formed attribute list. A valid outcome.
    pub fn is_empty(&self) -> bool {
        self.cardinality == 0
    }
}

/// Runs join trees through the pipeline.
///
/// Each call owns its tree exclusively and returns either the complete
/// result or an error; a half-reduced tree is never observable.
pub struct Processor {
    options: ProcessOptions,
    observer: Arc<dyn Observer>,
}

impl Default for Processor {
    fn default() -> Self {
        Self::new(ProcessOptions::default())
    }
}

impl Processor {
    pub fn new(options: ProcessOptions) -> Self {
        Self {
            options,
            observer: Arc::new(TracingObserver),
        }
    }

    pub fn with_observer(mut self, observer: Arc<dyn Observer>) -> Self {
        self.observer = observer;
        self
    }

    pub fn options(&self) -> ProcessOptions {
        self.options
    }

    /// Every tree edge must share an attribute regardless of strictness;
    /// a disconnected edge fails before any phase runs.
    pub fn process(&self, tree: JoinTree) -> Result<ProcessOutput> {
        check_connected(&tree)?;

        let (root, selections, projections) = tree.into_parts();
        let Some(mut root) = root else {
            return Err(ExecutorError::InvalidJoinTree(
                "join tree has no root".to_string(),
            ));
        };
        let observer = self.observer.as_ref();

        if !selections.is_empty() {
            let started = self.begin(Phase::Selection);
            for (id, predicate) in &selections {
                let node = root.find_mut(*id).ok_or_else(|| {
                    ExecutorError::InvalidJoinTree(format!("selection on unknown node {id}"))
                })?;
                let before = node.relation().cardinality();
                let selected = node.relation().select(|tuple| predicate(tuple));
                let after = selected.cardinality();
                node.replace_relation(selected);
                observer.relation_replaced(
                    Phase::Selection,
                    id.index(),
                    node.relation().name(),
                    before,
                    after,
                );
            }
            self.end(Phase::Selection, started, total_rows(&root));
        }

        let reducer = Reducer::new(self.options, observer);

        let started = self.begin(Phase::BottomUp);
        reducer.bottom_up(&mut root)?;
        self.end(Phase::BottomUp, started, total_rows(&root));

        let started = self.begin(Phase::TopDown);
        reducer.top_down(&mut root)?;
        self.end(Phase::TopDown, started, total_rows(&root));

        let started = self.begin(Phase::Join);
        let mut result = Joiner::new(self.options, observer).materialize(root)?;
        self.end(Phase::Join, started, result.cardinality());

        if let Some(attributes) = projections {
            let started = self.begin(Phase::Projection);
            result = result.project(&attributes, self.options.strictness)?;
            self.end(Phase::Projection, started, result.cardinality());
        }

        debug!(
            "result {}: {} attributes, {} tuples",
            result.name(),
            result.arity(),
            result.cardinality()
        );
        Ok(ProcessOutput::new(result))
    }

    /// Runs `tree` and hands the output to `sink` under `name`.
    pub fn process_into<S>(&self, tree: JoinTree, name: &str, sink: &mut S) -> Result<ProcessOutput>
    where
        S: ResultSink + ?Sized,
    {
        let output = self.process(tree)?;
        sink.write(name, &output)?;
        Ok(output)
    }

    fn begin(&self, phase: Phase) -> Instant {
        self.observer.phase_started(phase);
        Instant::now()
    }

    fn end(&self, phase: Phase, started: Instant, rows: usize) {
        self.observer.phase_finished(phase, started.elapsed(), rows);
    }
}

/// Fails on the first tree edge whose relations share no attribute.
fn check_connected(tree: &JoinTree) -> Result<()> {
    let Some(&(parent, child)) = tree.disconnected_edges().first() else {
        return Ok(());
    };
    let name = |id| {
        tree.node(id)
            .map(|n| n.relation().name().to_string())
            .unwrap_or_default()
    };
    Err(ExecutorError::MissingJoinKey {
        node: child,
        parent: name(parent),
        child: name(child),
    })
}

fn total_rows(root: &JoinTreeNode) -> usize {
    root.preorder()
        .iter()
        .map(|node| node.relation().cardinality())
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use algebra::{Strictness, Value};
    use jointree::NodeId;
    use profiler::Profiler;

    fn rel(name: &str, attributes: &[&str], rows: &[&[i32]]) -> Relation {
        Relation::new(
            name,
            attributes.iter().copied(),
            rows.iter()
                .map(|row| row.iter().map(|&v| Value::from(v)).collect())
                .collect(),
        )
        .unwrap()
    }

    fn disconnected() -> JoinTree {
        let c = JoinTreeNode::leaf(rel("C", &["q"], &[&[1]]));
        JoinTree::new(JoinTreeNode::leaf(rel("A", &["x"], &[&[1]])).with_left(c))
    }

    #[test]
    fn empty_tree_is_invalid() {
        let err = Processor::default().process(JoinTree::empty()).unwrap_err();
        assert!(matches!(err, ExecutorError::InvalidJoinTree(_)));
    }

    #[test]
    fn strict_mode_validates_edges_upfront() {
        let profiler = Arc::new(Profiler::new());
        let processor = Processor::new(ProcessOptions::default().with_strictness(Strictness::Strict))
            .with_observer(profiler.clone());
        let err = processor.process(disconnected()).unwrap_err();
        assert_eq!(
            err,
            ExecutorError::MissingJoinKey {
                node: NodeId::new(1),
                parent: "A".into(),
                child: "C".into()
            }
        );
        assert!(profiler.phases().is_empty());
    }

    #[test]
    fn lenient_mode_validates_edges_upfront() {
        let profiler = Arc::new(Profiler::new());
        let err = Processor::default()
            .with_observer(profiler.clone())
            .process(disconnected())
            .unwrap_err();
        assert_eq!(
            err,
            ExecutorError::MissingJoinKey {
                node: NodeId::new(1),
                parent: "A".into(),
                child: "C".into()
            }
        );
        assert!(profiler.phases().is_empty());
    }

    #[test]
    fn selection_then_projection() {
        let b = JoinTreeNode::leaf(rel("B", &["y", "z"], &[&[2, 3], &[5, 6]]));
        let tree = JoinTree::new(JoinTreeNode::leaf(rel("A", &["x", "y"], &[&[1, 2], &[4, 5]])).with_left(b))
            .with_selection(NodeId::new(0), |t| t[0] == Value::from(4))
            .with_projection(["z", "x"]);

        let output = Processor::default().process(tree).unwrap();
        assert_eq!(output.arity(), 2);
        assert_eq!(output.relation().attributes(), ["z", "x"]);
        assert_eq!(output.relation().tuples(), [vec![Value::from(6), Value::from(4)]]);
    }

    #[test]
    fn unknown_projection_attribute() {
        let tree = || JoinTree::new(JoinTreeNode::leaf(rel("A", &["x"], &[&[1]]))).with_projection(["x", "nope"]);

        let lenient = Processor::default().process(tree()).unwrap();
        assert_eq!(lenient.relation().attributes(), ["x"]);

        let strict = Processor::new(ProcessOptions::default().with_strictness(Strictness::Strict));
        assert_eq!(
            strict.process(tree()).unwrap_err(),
            ExecutorError::UnknownAttribute {
                relation: "A".into(),
                attribute: "nope".into()
            }
        );
    }

    #[test]
    fn records_every_phase() {
        let b = JoinTreeNode::leaf(rel("B", &["y"], &[&[2]]));
        let tree = JoinTree::new(JoinTreeNode::leaf(rel("A", &["x", "y"], &[&[1, 2], &[3, 4]])).with_left(b))
            .with_selection(NodeId::new(1), |_| true)
            .with_projection(["x"]);
        let profiler = Arc::new(Profiler::new());
        let output = Processor::default()
            .with_observer(profiler.clone())
            .process(tree)
            .unwrap();
        assert_eq!(output.cardinality(), 1);

        let phases: Vec<Phase> = profiler.phases().iter().map(|p| p.phase).collect();
        assert_eq!(
            phases,
            vec![
                Phase::Selection,
                Phase::BottomUp,
                Phase::TopDown,
                Phase::Join,
                Phase::Projection
            ]
        );
    }

    #[test]
    fn process_into_hands_output_to_sink() {
        let tree = JoinTree::new(JoinTreeNode::leaf(rel("A", &["x"], &[&[1]])));
        let mut seen = Vec::new();
        let mut sink = |name: &str, output: &ProcessOutput| -> Result<()> {
            seen.push((name.to_string(), output.cardinality()));
            Ok(())
        };
        Processor::default().process_into(tree, "single", &mut sink).unwrap();
        assert_eq!(seen, vec![("single".to_string(), 1)]);
    }
}
