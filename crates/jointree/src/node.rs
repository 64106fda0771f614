//! Join tree nodes.

use algebra::Relation;
use serde::Serialize;
use std::fmt;
use std::mem;

/// Pre-order position of a node inside its [`JoinTree`](crate::JoinTree).
///
/// Ids are assigned when a node becomes part of a tree; the root is `#0`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct NodeId(usize);

impl NodeId {
    #[must_use]
    #[inline]
    pub fn new(index: usize) -> Self {
        Self(index)
    }

    #[must_use]
    #[inline]
    pub fn index(&self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A binary join tree node that exclusively owns its relation and children.
///
/// The relation slot is replaced, never aliased, as the reduction and join
/// passes progress.
#[derive(Debug, Clone, PartialEq)]
pub struct JoinTreeNode {
    id: NodeId,
    relation: Relation,
    left: Option<Box<JoinTreeNode>>,
    right: Option<Box<JoinTreeNode>>,
}

/// A node taken apart by value.
#[derive(Debug)]
pub struct NodeParts {
    pub id: NodeId,
    pub relation: Relation,
    pub left: Option<JoinTreeNode>,
    pub right: Option<JoinTreeNode>,
}

impl JoinTreeNode {
    #[must_use]
    pub fn leaf(relation: Relation) -> Self {
        Self::new(relation, None, None)
    }

    #[must_use]
    pub fn new(relation: Relation, left: Option<JoinTreeNode>, right: Option<JoinTreeNode>) -> Self {
        Self {
            id: NodeId::default(),
            relation,
            left: left.map(Box::new),
            right: right.map(Box::new),
        }
    }

    #[must_use]
    pub fn with_left(mut self, child: JoinTreeNode) -> Self {
        self.left = Some(Box::new(child));
        self
    }

    #[must_use]
    pub fn with_right(mut self, child: JoinTreeNode) -> Self {
        self.right = Some(Box::new(child));
        self
    }

    #[must_use]
    #[inline]
    pub fn id(&self) -> NodeId {
        self.id
    }

    #[must_use]
    #[inline]
    pub fn relation(&self) -> &Relation {
        &self.relation
    }

    #[must_use]
    #[inline]
    pub fn left(&self) -> Option<&JoinTreeNode> {
        self.left.as_deref()
    }

    #[must_use]
    #[inline]
    pub fn right(&self) -> Option<&JoinTreeNode> {
        self.right.as_deref()
    }

    /// Existing children, left before right.
    pub fn children(&self) -> impl Iterator<Item = &JoinTreeNode> {
        self.left().into_iter().chain(self.right())
    }

    #[must_use]
    #[inline]
    pub fn is_leaf(&self) -> bool {
        self.left.is_none() && self.right.is_none()
    }

    /// Puts `relation` in this node's slot and returns the previous one.
    pub fn replace_relation(&mut self, relation: Relation) -> Relation {
        mem::replace(&mut self.relation, relation)
    }

    /// Disjoint mutable access to the relation slot and both children.
    pub fn slots_mut(
        &mut self,
    ) -> (
        &mut Relation,
        Option<&mut JoinTreeNode>,
        Option<&mut JoinTreeNode>,
    ) {
        (
            &mut self.relation,
            self.left.as_deref_mut(),
            self.right.as_deref_mut(),
        )
    }

    #[must_use]
    pub fn into_parts(self) -> NodeParts {
        NodeParts {
            id: self.id,
            relation: self.relation,
            left: self.left.map(|n| *n),
            right: self.right.map(|n| *n),
        }
    }

    /// Nodes of this subtree in pre-order.
    #[must_use]
    pub fn preorder(&self) -> Vec<&JoinTreeNode> {
        let mut acc = vec![self];
        for child in self.children() {
            acc.extend(child.preorder());
        }
        acc
    }

    /// Finds the node with `id` in this subtree.
    #[must_use]
    pub fn find_mut(&mut self, id: NodeId) -> Option<&mut JoinTreeNode> {
        if self.id == id {
            return Some(self);
        }
        if let Some(found) = self.left.as_deref_mut().and_then(|n| n.find_mut(id)) {
            return Some(found);
        }
        self.right.as_deref_mut().and_then(|n| n.find_mut(id))
    }

    /// Assigns pre-order ids starting at `next`.
    pub(crate) fn number(&mut self, next: &mut usize) {
        self.id = NodeId(*next);
        *next += 1;
        if let Some(left) = self.left.as_deref_mut() {
            left.number(next);
        }
        if let Some(right) = self.right.as_deref_mut() {
            right.number(next);
        }
    }
}
