//! Join Tree Library
//!
//! This crate provides the input structure of the join pipeline:
//! * [`JoinTreeNode`]: a binary node owning a replaceable relation slot.
//! * [`JoinTree`]: the rooted tree plus per-node selections and a final projection.
//! * [`TreeDocument`]: a serde JSON description that builds a `JoinTree`.

/// Declarative selection conditions used by tree documents.
pub mod condition;
/// JSON tree documents.
pub mod document;
pub mod error;
/// Join tree nodes and node identities.
pub mod node;
/// The join tree with selections and projection.
pub mod tree;

/// Re-exported.
pub use condition::{ComparisonOperator, Condition};
pub use document::{NodeDocument, SelectionDocument, TreeDocument};
pub use error::{JoinTreeError, Result};
pub use node::{JoinTreeNode, NodeId, NodeParts};
pub use tree::{JoinTree, Predicate};
