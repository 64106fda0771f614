//! JSON description of a join tree.
//!
//! ```json
//! {
//!   "root": {
//!     "relation": { "name": "A", "attributes": ["x", "y"], "tuples": [[1, 2]] },
//!     "left": { "relation": { "name": "B", "attributes": ["y", "z"], "tuples": [[2, 9]] } }
//!   },
//!   "selections": [
//!     { "relation": "B", "conditions": [{ "attribute": "z", "op": ">=", "value": 9 }] }
//!   ],
//!   "projections": ["x", "z"]
//! }
//! ```
//!
//! Conditions inside one selection are conjunctive. Selections name their
//! target by relation name, which must identify exactly one node.

use crate::condition::Condition;
use crate::error::{JoinTreeError, Result};
use crate::node::JoinTreeNode;
use crate::tree::JoinTree;
use algebra::{Relation, Value};
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::str::FromStr;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TreeDocument {
    #[serde(default)]
    pub root: Option<NodeDocument>,
    #[serde(default)]
    pub selections: Vec<SelectionDocument>,
    #[serde(default)]
    pub projections: Option<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeDocument {
    pub relation: Relation,
    #[serde(default)]
    pub left: Option<Box<NodeDocument>>,
    #[serde(default)]
    pub right: Option<Box<NodeDocument>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectionDocument {
    pub relation: String,
    pub conditions: Vec<Condition>,
}

impl TreeDocument {
    /// Reads and parses a tree document from `path`.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        text.parse()
    }

    /// Builds the join tree, compiling every selection into a positional predicate.
    pub fn into_join_tree(self) -> Result<JoinTree> {
        let mut tree = match self.root {
            Some(root) => JoinTree::new(root.into_node()),
            None => JoinTree::empty(),
        };

        for selection in self.selections {
            let ids = tree.find_all(&selection.relation);
            let id = match ids.as_slice() {
                [] => return Err(JoinTreeError::UnknownRelation(selection.relation)),
                [id] => *id,
                _ => return Err(JoinTreeError::AmbiguousRelation(selection.relation)),
            };
            let Some(node) = tree.node(id) else {
                return Err(JoinTreeError::UnknownRelation(selection.relation));
            };

            let compiled = compile(node.relation(), &selection.conditions)?;
            debug!(
                "selection on {} {}: {}",
                id,
                selection.relation,
                selection.conditions.iter().join(" ∧ ")
            );
            tree = tree.with_selection(id, move |t: &[Value]| {
                compiled
                    .iter()
                    .all(|(position, condition)| {
                        condition.op().evaluate(&t[*position], condition.value())
                    })
            });
        }

        if let Some(projections) = self.projections {
            tree = tree.with_projection(projections);
        }
        Ok(tree)
    }
}

impl FromStr for TreeDocument {
    type Err = JoinTreeError;

    fn from_str(s: &str) -> Result<Self> {
        Ok(serde_json::from_str(s)?)
    }
}

impl NodeDocument {
    fn into_node(self) -> JoinTreeNode {
        JoinTreeNode::new(
            self.relation,
            self.left.map(|n| n.into_node()),
            self.right.map(|n| n.into_node()),
        )
    }
}

/// Resolves each condition's attribute against `relation`.
fn compile(relation: &Relation, conditions: &[Condition]) -> Result<Vec<(usize, Condition)>> {
    conditions
        .iter()
        .map(|c| {
            relation
                .position(c.attribute())
                .map(|p| (p, c.clone()))
                .ok_or_else(|| JoinTreeError::UnknownAttribute {
                    relation: relation.name().to_string(),
                    attribute: c.attribute().to_string(),
                })
        })
        .collect()
}
