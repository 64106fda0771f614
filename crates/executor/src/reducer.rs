//! The full reducer: a bottom-up semi-join pass followed by a top-down one.
//!
//! After both passes every relation in the tree holds only tuples that take
//! part in at least one tuple of the global join, which bounds the join
//! phase by input plus output size.

use crate::error::{ExecutorError, Result};
use crate::options::ProcessOptions;
use algebra::Relation;
use jointree::{JoinTreeNode, NodeId};
use profiler::{Observer, Phase};
use tracing::debug;

pub struct Reducer<'a> {
    options: ProcessOptions,
    observer: &'a dyn Observer,
}

impl<'a> Reducer<'a> {
    pub fn new(options: ProcessOptions, observer: &'a dyn Observer) -> Self {
        Self { options, observer }
    }

    /// Runs both passes over the subtree rooted at `root`.
    pub fn reduce(&self, root: &mut JoinTreeNode) -> Result<()> {
        self.bottom_up(root)?;
        self.top_down(root)
    }

    /// Post-order: each node is semi-joined with its children once both
    /// child subtrees are reduced.
    pub fn bottom_up(&self, node: &mut JoinTreeNode) -> Result<()> {
        let parent_id = node.id();
        let (relation, mut left, mut right) = node.slots_mut();

        match (left.as_deref_mut(), right.as_deref_mut()) {
            (Some(l), Some(r)) if self.options.parallel => {
                let (left_result, right_result) =
                    rayon::join(|| self.bottom_up(l), || self.bottom_up(r));
                left_result?;
                right_result?;
            }
            (l, r) => {
                for child in l.into_iter().chain(r) {
                    self.bottom_up(child)?;
                }
            }
        }

        for child in left.iter().chain(right.iter()) {
            self.reduce_slot(
                Phase::BottomUp,
                parent_id,
                relation,
                child.relation(),
                child.id(),
            )?;
        }
        Ok(())
    }

    /// Pre-order: each child is semi-joined with its already reduced parent
    /// before descending into it.
    pub fn top_down(&self, node: &mut JoinTreeNode) -> Result<()> {
        let (relation, left, right) = node.slots_mut();
        let parent: &Relation = relation;

        for child in left.into_iter().chain(right) {
            let child_id = child.id();
            let (child_relation, _, _) = child.slots_mut();
            self.reduce_slot(Phase::TopDown, child_id, child_relation, parent, child_id)?;
            self.top_down(child)?;
        }
        Ok(())
    }

    /// Replaces `target` with `target ⋉ source` over their shared attributes.
    ///
    /// `edge` is the child end of the tree edge between the two relations.
    fn reduce_slot(
        &self,
        phase: Phase,
        target_id: NodeId,
        target: &mut Relation,
        source: &Relation,
        edge: NodeId,
    ) -> Result<()> {
        let join_attributes = target.common_attributes(source);
        if join_attributes.is_empty() {
            if self.options.is_strict() {
                let (parent, child) = match phase {
                    Phase::TopDown => (source, &*target),
                    _ => (&*target, source),
                };
                return Err(ExecutorError::MissingJoinKey {
                    node: edge,
                    parent: parent.name().to_string(),
                    child: child.name().to_string(),
                });
            }
            debug!(
                "{}: {} and {} share no attribute, edge {} left unreduced",
                phase,
                target.name(),
                source.name(),
                edge
            );
            return Ok(());
        }

        let before = target.cardinality();
        let reduced = target.semi_join(source, &join_attributes)?;
        self.observer.relation_replaced(
            phase,
            target_id.index(),
            reduced.name(),
            before,
            reduced.cardinality(),
        );
        *target = reduced;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use algebra::{Strictness, Value};
    use jointree::JoinTree;
    use profiler::{NoopObserver, Profiler};

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

    /// A(x,y) - B(y,z) - C(z,w)
    fn chain() -> JoinTree {
        let c = JoinTreeNode::leaf(rel("C", &["z", "w"], &[&[3, 100]]));
        let b = JoinTreeNode::leaf(rel("B", &["y", "z"], &[&[2, 3], &[5, 9]])).with_left(c);
        let a = JoinTreeNode::leaf(rel("A", &["x", "y"], &[&[1, 2], &[4, 5]])).with_left(b);
        JoinTree::new(a)
    }

    fn cardinalities(tree: &JoinTree) -> Vec<usize> {
        tree.root()
            .unwrap()
            .preorder()
            .iter()
            .map(|n| n.relation().cardinality())
            .collect()
    }

    #[test]
    fn bottom_up_reduces_ancestors_only() {
        let mut tree = chain();
        let observer = NoopObserver;
        let reducer = Reducer::new(ProcessOptions::default(), &observer);
        reducer.bottom_up(tree.root_mut().unwrap()).unwrap();
        // B loses (5, 9), then A loses (4, 5). C is untouched.
        assert_eq!(cardinalities(&tree), vec![1, 1, 1]);
    }

    #[test]
    fn top_down_reduces_descendants() {
        let c = JoinTreeNode::leaf(rel("C", &["z"], &[&[1], &[2]]));
        let p = JoinTreeNode::leaf(rel("P", &["z"], &[&[1]])).with_left(c);
        let mut tree = JoinTree::new(p);

        let observer = NoopObserver;
        let reducer = Reducer::new(ProcessOptions::default(), &observer);
        reducer.top_down(tree.root_mut().unwrap()).unwrap();
        assert_eq!(cardinalities(&tree), vec![1, 1]);
    }

    #[test]
    fn parallel_matches_sequential() {
        let build = || {
            let l = JoinTreeNode::leaf(rel("L", &["a", "b"], &[&[1, 10], &[2, 20]]));
            let r = JoinTreeNode::leaf(rel("R", &["a", "c"], &[&[1, 7], &[3, 8]]));
            JoinTree::new(JoinTreeNode::new(
                rel("M", &["a"], &[&[1], &[2], &[3]]),
                Some(l),
                Some(r),
            ))
        };
        let observer = NoopObserver;

        let mut sequential = build();
        Reducer::new(ProcessOptions::default(), &observer)
            .reduce(sequential.root_mut().unwrap())
            .unwrap();

        let mut parallel = build();
        Reducer::new(ProcessOptions::default().with_parallel(true), &observer)
            .reduce(parallel.root_mut().unwrap())
            .unwrap();

        assert_eq!(sequential.root(), parallel.root());
        assert_eq!(cardinalities(&parallel), vec![1, 1, 1]);
    }

    #[test]
    fn disconnected_edge_is_skipped_when_lenient() {
        let c = JoinTreeNode::leaf(rel("C", &["q"], &[&[1]]));
        let mut tree = JoinTree::new(JoinTreeNode::leaf(rel("A", &["x"], &[&[1], &[2]])).with_left(c));
        let observer = NoopObserver;
        Reducer::new(ProcessOptions::default(), &observer)
            .reduce(tree.root_mut().unwrap())
            .unwrap();
        assert_eq!(cardinalities(&tree), vec![2, 1]);
    }

    #[test]
    fn disconnected_edge_fails_when_strict() {
        let c = JoinTreeNode::leaf(rel("C", &["q"], &[&[1]]));
        let mut tree = JoinTree::new(JoinTreeNode::leaf(rel("A", &["x"], &[&[1]])).with_left(c));
        let observer = NoopObserver;
        let options = ProcessOptions::default().with_strictness(Strictness::Strict);
        let err = Reducer::new(options, &observer)
            .reduce(tree.root_mut().unwrap())
            .unwrap_err();
        assert_eq!(
            err,
            ExecutorError::MissingJoinKey {
                node: NodeId::new(1),
                parent: "A".into(),
                child: "C".into()
            }
        );
    }

    #[test]
    fn reports_replacements() {
        let mut tree = chain();
        let profiler = Profiler::new();
        profiler.phase_started(Phase::BottomUp);
        Reducer::new(ProcessOptions::default(), &profiler)
            .bottom_up(tree.root_mut().unwrap())
            .unwrap();

        let phases = profiler.phases();
        let nodes: Vec<(usize, usize, usize)> = phases[0]
            .nodes
            .iter()
            .map(|n| (n.node, n.rows_before, n.rows_after))
            .collect();
        assert_eq!(nodes, vec![(1, 2, 1), (0, 2, 1)]);
    }
}
