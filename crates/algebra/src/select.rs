//! Selection and projection.

use crate::error::{AlgebraError, Result};
use crate::{Relation, Value};
use itertools::Itertools;
use tracing::{debug, trace};

/// How a name that does not resolve against a relation is treated.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash)]
pub enum Strictness {
    /// Skip the name and carry on.
    #[default]
    Lenient,
    /// Fail the operation.
    Strict,
}

impl Strictness {
    #[must_use]
    #[inline]
    pub fn is_strict(&self) -> bool {
        matches!(self, Self::Strict)
    }
}

impl Relation {
    /// `σ_predicate(self)`: keeps the tuples for which `predicate` holds.
    ///
    /// The predicate sees each tuple positionally. Attributes are preserved
    /// even when every tuple is rejected.
    pub fn select<P>(&self, predicate: P) -> Relation
    where
        P: Fn(&[Value]) -> bool,
    {
        let tuples = self
            .tuples()
            .iter()
            .filter(|t| predicate(t.as_slice()))
            .cloned()
            .collect::<Vec<_>>();
        trace!(
            "select {}: {} -> {}",
            self.name(),
            self.cardinality(),
            tuples.len()
        );
        self.with_tuples(tuples)
    }

    /// `π_attributes(self)`: keeps the requested columns, in request order.
    ///
    /// Repeated names are kept once. Names that do not resolve are dropped
    /// under [`Strictness::Lenient`] and fail with `UnknownAttribute` under
    /// [`Strictness::Strict`]. Tuples are not deduplicated.
    pub fn project(&self, attributes: &[String], strictness: Strictness) -> Result<Relation> {
        let mut resolved = Vec::with_capacity(attributes.len());
        for attribute in attributes.iter().unique() {
            match self.position(attribute) {
                Some(position) => resolved.push((attribute.clone(), position)),
                None if strictness.is_strict() => {
                    return Err(AlgebraError::UnknownAttribute {
                        relation: self.name().to_string(),
                        attribute: attribute.clone(),
                    })
                }
                None => debug!(
                    "project {}: dropping unknown attribute '{}'",
                    self.name(),
                    attribute
                ),
            }
        }

        let (names, positions): (Vec<String>, Vec<usize>) = resolved.into_iter().unzip();
        let tuples = self
            .tuples()
            .iter()
            .map(|t| positions.iter().map(|&p| t[p].clone()).collect())
            .collect();

        Ok(Relation::from_parts(self.name().to_string(), names, tuples))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Tuple;

    fn row(values: &[i32]) -> Tuple {
        values.iter().copied().map(Value::Int32).collect()
    }

    fn attrs(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    fn sample() -> Relation {
        Relation::new(
            "R",
            ["A", "B", "C"],
            vec![row(&[1, 2, 3]), row(&[4, 5, 6]), row(&[7, 8, 9])],
        )
        .unwrap()
    }

    #[test]
    fn select_filters_positionally() {
        let r = sample().select(|t| t[1] != Value::Int32(5));
        assert_eq!(r.tuples(), &[row(&[1, 2, 3]), row(&[7, 8, 9])]);
    }

    #[test]
    fn select_reject_all_keeps_shape() {
        let r = sample().select(|_| false);
        assert!(r.is_empty());
        assert_eq!(r.attributes(), sample().attributes());
    }

    #[test]
    fn project_in_request_order() {
        let r = sample().project(&attrs(&["C", "A"]), Strictness::Lenient).unwrap();
        assert_eq!(r.attributes(), &["C", "A"].map(String::from));
        assert_eq!(r.tuples(), &[row(&[3, 1]), row(&[6, 4]), row(&[9, 7])]);
    }

    #[test]
    fn project_lenient_drops_unknown() {
        let r = sample().project(&attrs(&["Z", "B"]), Strictness::Lenient).unwrap();
        assert_eq!(r.attributes(), &["B".to_string()]);
        assert_eq!(r.cardinality(), 3);
    }

    #[test]
    fn project_strict_rejects_unknown() {
        let err = sample().project(&attrs(&["B", "Z"]), Strictness::Strict).unwrap_err();
        assert_eq!(
            err,
            AlgebraError::UnknownAttribute {
                relation: "R".into(),
                attribute: "Z".into()
            }
        );
    }

    #[test]
    fn project_repeated_names_kept_once() {
        let r = sample().project(&attrs(&["A", "A", "B"]), Strictness::Strict).unwrap();
        assert_eq!(r.attributes(), &["A", "B"].map(String::from));
    }

    #[test]
    fn project_is_idempotent() {
        let wanted = attrs(&["C", "Z", "A"]);
        let once = sample().project(&wanted, Strictness::Lenient).unwrap();
        let twice = once.project(&wanted, Strictness::Lenient).unwrap();
        assert_eq!(once, twice);
    }
}
