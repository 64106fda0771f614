//! The relation value type.

use crate::error::{AlgebraError, Result};
use crate::Value;
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// A fixed-arity row. Position `i` corresponds to the relation's `i`-th attribute.
pub type Tuple = Vec<Value>;

/// A named bag of fixed-arity tuples over an ordered, duplicate-free attribute list.
///
/// Relations are values: every algebra operation returns a fresh `Relation`
/// and leaves its inputs untouched. Serialized as
/// `{ "name": ..., "attributes": [...], "tuples": [[...], ...] }`; the same
/// shape is validated on deserialization.
///
/// # Examples
///
/// ```rust
/// use algebra::{Relation, Value};
///
/// let r = Relation::new("R", ["A", "B"], vec![vec![Value::Int32(1), Value::Int32(2)]]).unwrap();
/// assert_eq!(r.arity(), 2);
/// assert_eq!(r.position("B"), Some(1));
/// assert_eq!(r.to_string(), "R(A, B)");
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "RelationDocument")]
pub struct Relation {
    name: String,
    attributes: Vec<String>,
    tuples: Vec<Tuple>,

    /// Attribute name -> position; rebuilt on construction.
    #[serde(skip)]
    positions: HashMap<String, usize>,
}

impl Relation {
    /// Creates a relation, checking attribute uniqueness and tuple arity.
    pub fn new<I, S>(name: impl Into<String>, attributes: I, tuples: Vec<Tuple>) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let name = name.into();
        let attributes: Vec<String> = attributes.into_iter().map(Into::into).collect();

        let mut positions = HashMap::with_capacity(attributes.len());
        for (i, attribute) in attributes.iter().enumerate() {
            if positions.insert(attribute.clone(), i).is_some() {
                return Err(AlgebraError::DuplicateAttribute {
                    relation: name,
                    attribute: attribute.clone(),
                });
            }
        }

        if let Some((index, tuple)) = tuples
            .iter()
            .enumerate()
            .find(|(_, t)| t.len() != attributes.len())
        {
            return Err(AlgebraError::ArityMismatch {
                relation: name,
                index,
                expected: attributes.len(),
                found: tuple.len(),
            });
        }

        Ok(Self {
            name,
            attributes,
            tuples,
            positions,
        })
    }

    /// Builds a relation whose shape is already known to be valid.
    ///
    /// Callers guarantee unique attributes and arity-conforming tuples.
    pub(crate) fn from_parts(name: String, attributes: Vec<String>, tuples: Vec<Tuple>) -> Self {
        debug_assert!(tuples.iter().all(|t| t.len() == attributes.len()));
        let positions = attributes
            .iter()
            .enumerate()
            .map(|(i, a)| (a.clone(), i))
            .collect::<HashMap<_, _>>();
        debug_assert_eq!(positions.len(), attributes.len());
        Self {
            name,
            attributes,
            tuples,
            positions,
        }
    }

    /// Same name and attributes over a new tuple list.
    pub(crate) fn with_tuples(&self, tuples: Vec<Tuple>) -> Self {
        Self {
            name: self.name.clone(),
            attributes: self.attributes.clone(),
            tuples,
            positions: self.positions.clone(),
        }
    }

    #[must_use]
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    #[inline]
    pub fn attributes(&self) -> &[String] {
        &self.attributes
    }

    #[must_use]
    #[inline]
    pub fn tuples(&self) -> &[Tuple] {
        &self.tuples
    }

    /// Number of attributes.
    #[must_use]
    #[inline]
    pub fn arity(&self) -> usize {
        self.attributes.len()
    }

    /// Number of tuples.
    #[must_use]
    #[inline]
    pub fn cardinality(&self) -> usize {
        self.tuples.len()
    }

    #[must_use]
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.tuples.is_empty()
    }

    /// Position of `attribute`, if present.
    #[must_use]
    #[inline]
    pub fn position(&self, attribute: &str) -> Option<usize> {
        self.positions.get(attribute).copied()
    }

    #[must_use]
    #[inline]
    pub fn contains_attribute(&self, attribute: &str) -> bool {
        self.positions.contains_key(attribute)
    }

    /// Resolves every attribute to its position, failing on the first unknown name.
    pub fn positions_of(&self, attributes: &[String]) -> Result<Vec<usize>> {
        attributes
            .iter()
            .map(|a| {
                self.position(a).ok_or_else(|| AlgebraError::UnknownAttribute {
                    relation: self.name.clone(),
                    attribute: a.clone(),
                })
            })
            .collect()
    }

    /// Attributes of `self` that also appear in `other`, in `self`'s order.
    #[must_use]
    pub fn common_attributes(&self, other: &Relation) -> Vec<String> {
        self.attributes
            .iter()
            .filter(|a| other.contains_attribute(a))
            .cloned()
            .collect()
    }
}

impl PartialEq for Relation {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
            && self.attributes == other.attributes
            && self.tuples == other.tuples
    }
}

impl Eq for Relation {}

impl fmt::Display for Relation {
    /// Formats as `name(a, b, c)`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.name, self.attributes.iter().join(", "))
    }
}

#[derive(Deserialize)]
struct RelationDocument {
    name: String,
    attributes: Vec<String>,
    #[serde(default)]
    tuples: Vec<Tuple>,
}

impl TryFrom<RelationDocument> for Relation {
    type Error = AlgebraError;

    fn try_from(doc: RelationDocument) -> Result<Self> {
        Relation::new(doc.name, doc.attributes, doc.tuples)
    }
}
