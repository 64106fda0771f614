//! Join tree with per-node selections and a final projection.
use crate::node::{JoinTreeNode, NodeId};
use algebra::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// A positional filter over one tuple.
pub type Predicate = Arc<dyn Fn(&[Value]) -> bool + Send + Sync>;

/// Rooted binary join tree plus the selections and projection to apply around the join.
///
/// Constructing a tree numbers its nodes in pre-order. A tree without a root
/// ([`JoinTree::empty`]) is representable so that callers receive a typed
/// failure from processing rather than a panic from construction.
pub struct JoinTree {
    root: Option<JoinTreeNode>,
    selections: BTreeMap<NodeId, Predicate>,
    projections: Option<Vec<String>>,
}

impl JoinTree {
    /// Wraps `root` and assigns pre-order node ids.
    #[must_use]
    pub fn new(mut root: JoinTreeNode) -> Self {
        root.number(&mut 0);
        Self {
            root: Some(root),
            selections: BTreeMap::new(),
            projections: None,
        }
    }

    /// A tree with no root.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            root: None,
            selections: BTreeMap::new(),
            projections: None,
        }
    }

    /// Adds a selection on node `id`. Selections on the same node are conjunctive.
    #[must_use]
    pub fn with_selection<P>(mut self, id: NodeId, predicate: P) -> Self
    where
        P: Fn(&[Value]) -> bool + Send + Sync + 'static,
    {
        let predicate: Predicate = match self.selections.remove(&id) {
            Some(existing) => Arc::new(move |t: &[Value]| existing(t) && predicate(t)),
            None => Arc::new(predicate),
        };
        self.selections.insert(id, predicate);
        self
    }

    /// Sets the final projection list.
    #[must_use]
    pub fn with_projection<I, S>(mut self, attributes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.projections = Some(attributes.into_iter().map(Into::into).collect());
        self
    }

    #[must_use]
    #[inline]
    pub fn root(&self) -> Option<&JoinTreeNode> {
        self.root.as_ref()
    }

    #[must_use]
    #[inline]
    pub fn root_mut(&mut self) -> Option<&mut JoinTreeNode> {
        self.root.as_mut()
    }

    #[must_use]
    #[inline]
    pub fn selections(&self) -> &BTreeMap<NodeId, Predicate> {
        &self.selections
    }

    #[must_use]
    #[inline]
    pub fn projections(&self) -> Option<&[String]> {
        self.projections.as_deref()
    }

    /// Number of nodes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.root.as_ref().map_or(0, |r| r.preorder().len())
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Node with the given id.
    #[must_use]
    pub fn node(&self, id: NodeId) -> Option<&JoinTreeNode> {
        self.root
            .as_ref()?
            .preorder()
            .into_iter()
            .find(|n| n.id() == id)
    }

    /// Ids of every node whose relation is called `name`, in pre-order.
    #[must_use]
    pub fn find_all(&self, name: &str) -> Vec<NodeId> {
        self.root
            .as_ref()
            .map(|r| {
                r.preorder()
                    .into_iter()
                    .filter(|n| n.relation().name() == name)
                    .map(JoinTreeNode::id)
                    .collect()
            })
            .unwrap_or_default()
    }

    /// First node (pre-order) whose relation is called `name`.
    #[must_use]
    pub fn find(&self, name: &str) -> Option<NodeId> {
        self.find_all(name).into_iter().next()
    }

    /// `(parent, child)` edges whose relations share no attribute.
    #[must_use]
    pub fn disconnected_edges(&self) -> Vec<(NodeId, NodeId)> {
        let Some(root) = self.root.as_ref() else {
            return Vec::new();
        };
        root.preorder()
            .into_iter()
            .flat_map(|parent| {
                parent
                    .children()
                    .filter(move |child| {
                        parent
                            .relation()
                            .common_attributes(child.relation())
                            .is_empty()
                    })
                    .map(move |child| (parent.id(), child.id()))
            })
            .collect()
    }

    #[must_use]
    pub fn into_parts(
        self,
    ) -> (
        Option<JoinTreeNode>,
        BTreeMap<NodeId, Predicate>,
        Option<Vec<String>>,
    ) {
        (self.root, self.selections, self.projections)
    }
}

impl fmt::Debug for JoinTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JoinTree")
            .field("root", &self.root)
            .field("selections", &self.selections.keys().collect::<Vec<_>>())
            .field("projections", &self.projections)
            .finish()
    }
}

impl fmt::Display for JoinTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn print_tree(
            f: &mut fmt::Formatter<'_>,
            node: &JoinTreeNode,
            selected: &BTreeMap<NodeId, Predicate>,
            prefix: &str,
            last: bool,
        ) -> fmt::Result {
            writeln!(
                f,
                "{}{}{} {} [{}]{}",
                prefix,
                if last { "└── " } else { "├── " },
                node.id(),
                node.relation(),
                node.relation().cardinality(),
                if selected.contains_key(&node.id()) {
                    " σ"
                } else {
                    ""
                }
            )?;
            let new_prefix = format!("{}{}", prefix, if last { "    " } else { "│   " });
            let children: Vec<&JoinTreeNode> = node.children().collect();
            let len = children.len();
            for (i, child) in children.into_iter().enumerate() {
                print_tree(f, child, selected, &new_prefix, i == len - 1)?;
            }
            Ok(())
        }

        match &self.root {
            Some(root) => print_tree(f, root, &self.selections, "", true)?,
            None => writeln!(f, "(empty join tree)")?,
        }
        if let Some(projections) = &self.projections {
            writeln!(f, "π [{}]", projections.join(", "))?;
        }
        Ok(())
    }
}
