//! Composite join keys.

use crate::Value;

/// The values of a tuple at the join positions, in join-attribute order.
///
/// Hashing and equality are defined component-wise on [`Value`], so two keys
/// match exactly when every component matches in kind and content.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct JoinKey(Vec<Value>);

impl JoinKey {
    /// Gathers `tuple[p]` for every `p` in `positions`.
    #[must_use]
    #[inline]
    pub fn project(tuple: &[Value], positions: &[usize]) -> Self {
        Self(positions.iter().map(|&p| tuple[p].clone()).collect())
    }

    #[must_use]
    #[inline]
    pub fn values(&self) -> &[Value] {
        &self.0
    }
}
