//! Semi-join: filter a relation by key membership in another.

use crate::error::Result;
use crate::{JoinKey, Relation};
use std::collections::HashSet;
use tracing::trace;

impl Relation {
    /// `self ⋉ other` over `join_attributes`.
    ///
    /// Keeps the tuples of `self` whose values at `join_attributes` occur in at
    /// least one tuple of `other`. Attributes, name and tuple order of `self`
    /// are preserved. An empty `join_attributes` is a no-op and returns a copy
    /// of `self`; callers that require a shared key check for it beforehand.
    ///
    /// Fails with `UnknownAttribute` if a join attribute is missing from
    /// either side.
    pub fn semi_join(&self, other: &Relation, join_attributes: &[String]) -> Result<Relation> {
        if join_attributes.is_empty() {
            trace!(
                "semi-join {} ⋉ {}: no join attributes, passing through",
                self.name(),
                other.name()
            );
            return Ok(self.clone());
        }

        let self_positions = self.positions_of(join_attributes)?;
        let other_positions = other.positions_of(join_attributes)?;

        let keys: HashSet<JoinKey> = other
            .tuples()
            .iter()
            .map(|t| JoinKey::project(t, &other_positions))
            .collect();

        let tuples = self
            .tuples()
            .iter()
            .filter(|t| keys.contains(&JoinKey::project(t, &self_positions)))
            .cloned()
            .collect::<Vec<_>>();

        trace!(
            "semi-join {} ⋉ {} on {:?}: {} -> {}",
            self.name(),
            other.name(),
            join_attributes,
            self.cardinality(),
            tuples.len()
        );

        Ok(self.with_tuples(tuples))
    }
}

#[cfg(test)]
mod tests {
    use crate::{AlgebraError, Relation, Tuple, Value};

    fn row(values: &[i32]) -> Tuple {
        values.iter().copied().map(Value::Int32).collect()
    }

    fn attrs(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn filters_by_key_membership() {
        let r1 = Relation::new("R1", ["A", "B"], vec![row(&[1, 2]), row(&[1, 3])]).unwrap();
        let r2 = Relation::new("R2", ["B", "C"], vec![row(&[2, 10]), row(&[4, 20])]).unwrap();

        let reduced = r1.semi_join(&r2, &attrs(&["B"])).unwrap();
        assert_eq!(reduced.name(), "R1");
        assert_eq!(reduced.attributes(), r1.attributes());
        assert_eq!(reduced.tuples(), &[row(&[1, 2])]);
    }

    #[test]
    fn identity_on_self() {
        let r = Relation::new(
            "R",
            ["A", "B"],
            vec![row(&[1, 2]), row(&[1, 2]), row(&[5, 6])],
        )
        .unwrap();
        let all = r.attributes().to_vec();
        assert_eq!(r.semi_join(&r, &all).unwrap(), r);
    }

    #[test]
    fn empty_attributes_pass_through() {
        let r1 = Relation::new("R1", ["A"], vec![row(&[1]), row(&[2])]).unwrap();
        let r2 = Relation::new("R2", ["B"], vec![]).unwrap();
        assert_eq!(r1.semi_join(&r2, &[]).unwrap(), r1);
    }

    #[test]
    fn empty_other_removes_everything() {
        let r1 = Relation::new("R1", ["A", "B"], vec![row(&[1, 2])]).unwrap();
        let r2 = Relation::new("R2", ["B"], vec![]).unwrap();
        let reduced = r1.semi_join(&r2, &attrs(&["B"])).unwrap();
        assert!(reduced.is_empty());
        assert_eq!(reduced.arity(), 2);
    }

    #[test]
    fn composite_key_matches_all_columns() {
        let r1 = Relation::new("R1", ["A", "B"], vec![row(&[1, 2]), row(&[1, 3])]).unwrap();
        let r2 = Relation::new("R2", ["B", "A"], vec![row(&[2, 1]), row(&[3, 9])]).unwrap();
        let reduced = r1.semi_join(&r2, &attrs(&["A", "B"])).unwrap();
        assert_eq!(reduced.tuples(), &[row(&[1, 2])]);
    }

    #[test]
    fn unknown_join_attribute() {
        let r1 = Relation::new("R1", ["A"], vec![]).unwrap();
        let r2 = Relation::new("R2", ["B"], vec![]).unwrap();
        assert_eq!(
            r1.semi_join(&r2, &attrs(&["B"])).unwrap_err(),
            AlgebraError::UnknownAttribute {
                relation: "R1".into(),
                attribute: "B".into()
            }
        );
    }
}
