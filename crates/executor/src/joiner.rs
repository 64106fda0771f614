//! Materializing join over a reduced tree.

use crate::error::{ExecutorError, Result};
use crate::options::ProcessOptions;
use algebra::{AlgebraError, Relation};
use jointree::{JoinTreeNode, NodeId, NodeParts};
use profiler::{Observer, Phase};
use tracing::trace;

/// A subtree's combined relation, tagged with the child node it came from.
struct Joined {
    node: NodeId,
    name: String,
    relation: Relation,
}

pub struct Joiner<'a> {
    options: ProcessOptions,
    observer: &'a dyn Observer,
}

impl<'a> Joiner<'a> {
    pub fn new(options: ProcessOptions, observer: &'a dyn Observer) -> Self {
        Self { options, observer }
    }

    /// Post-order combination: `(own ⋈ left) ⋈ right`.
    ///
    /// Consumes the tree. A child that shares no attribute with its parent
    /// fails the whole call with [`ExecutorError::MissingJoinKey`] naming that
    /// child; no branch is ever dropped.
    pub fn materialize(&self, node: JoinTreeNode) -> Result<Relation> {
        let NodeParts {
            id,
            relation,
            left,
            right,
        } = node.into_parts();

        let (left, right) = match (left, right) {
            (Some(l), Some(r)) if self.options.parallel => {
                let (left, right) = rayon::join(|| self.subtree(l), || self.subtree(r));
                (Some(left?), Some(right?))
            }
            (l, r) => (
                l.map(|l| self.subtree(l)).transpose()?,
                r.map(|r| self.subtree(r)).transpose()?,
            ),
        };

        let own = relation.name().to_string();
        let before = relation.cardinality();
        let mut combined = relation;
        for child in left.into_iter().chain(right) {
            trace!("join {} with {} at {}", combined.name(), child.relation.name(), id);
            combined = combined
                .equi_join(&child.relation)
                .map_err(|e| match e {
                    AlgebraError::MissingJoinKey { .. } => ExecutorError::MissingJoinKey {
                        node: child.node,
                        parent: own.clone(),
                        child: child.name.clone(),
                    },
                    other => other.into(),
                })?;
        }

        self.observer.relation_replaced(
            Phase::Join,
            id.index(),
            combined.name(),
            before,
            combined.cardinality(),
        );
        Ok(combined)
    }

    fn subtree(&self, node: JoinTreeNode) -> Result<Joined> {
        let id = node.id();
        let name = node.relation().name().to_string();
        let relation = self.materialize(node)?;
        Ok(Joined {
            node: id,
            name,
            relation,
        })
    }
}
