//! Natural equi-join via hash build and probe.

use crate::error::{AlgebraError, Result};
use crate::{JoinKey, Relation, Tuple};
use std::collections::HashMap;
use tracing::trace;

impl Relation {
    /// `self ⋈ other` on every attribute the two relations share.
    ///
    /// Output attributes are `self`'s attributes followed by `other`'s
    /// non-shared attributes in `other`'s order; each output tuple is the full
    /// `self` tuple followed by the matching `other` tuple's non-shared values.
    /// Multiplicities multiply, nothing is deduplicated. The result is named
    /// `{self}_{other}`.
    ///
    /// The smaller input is hashed, the larger one probes. Fails with
    /// `MissingJoinKey` when no attribute is shared: this never degrades to a
    /// cartesian product.
    pub fn equi_join(&self, other: &Relation) -> Result<Relation> {
        let join_attributes = self.common_attributes(other);
        if join_attributes.is_empty() {
            return Err(AlgebraError::MissingJoinKey {
                left: self.name().to_string(),
                right: other.name().to_string(),
            });
        }

        let left_keys = self.positions_of(&join_attributes)?;
        let right_keys = other.positions_of(&join_attributes)?;
        let right_rest: Vec<usize> = (0..other.arity())
            .filter(|i| !right_keys.contains(i))
            .collect();

        let attributes: Vec<String> = self
            .attributes()
            .iter()
            .chain(right_rest.iter().map(|&i| &other.attributes()[i]))
            .cloned()
            .collect();

        let emit = |left: &Tuple, right: &Tuple| -> Tuple {
            let mut out = Vec::with_capacity(left.len() + right_rest.len());
            out.extend_from_slice(left);
            out.extend(right_rest.iter().map(|&i| right[i].clone()));
            out
        };

        let mut tuples = Vec::new();
        if self.cardinality() <= other.cardinality() {
            let table = build(self.tuples(), &left_keys);
            for right in other.tuples() {
                if let Some(bucket) = table.get(&JoinKey::project(right, &right_keys)) {
                    tuples.extend(bucket.iter().map(|&left| emit(left, right)));
                }
            }
        } else {
            let table = build(other.tuples(), &right_keys);
            for left in self.tuples() {
                if let Some(bucket) = table.get(&JoinKey::project(left, &left_keys)) {
                    tuples.extend(bucket.iter().map(|&right| emit(left, right)));
                }
            }
        }

        trace!(
            "equi-join {} ⋈ {} on {:?}: {} x {} -> {}",
            self.name(),
            other.name(),
            join_attributes,
            self.cardinality(),
            other.cardinality(),
            tuples.len()
        );

        Ok(Relation::from_parts(
            format!("{}_{}", self.name(), other.name()),
            attributes,
            tuples,
        ))
    }
}

/// Buckets `tuples` by their key at `positions`.
fn build<'a>(tuples: &'a [Tuple], positions: &[usize]) -> HashMap<JoinKey, Vec<&'a Tuple>> {
    let mut table: HashMap<JoinKey, Vec<&Tuple>> = HashMap::with_capacity(tuples.len());
    for tuple in tuples {
        table
            .entry(JoinKey::project(tuple, positions))
            .or_default()
            .push(tuple);
    }
    table
}
