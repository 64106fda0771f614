//! Declarative selection conditions.
//!
//! - [`ComparisonOperator`]: `== | != | > | >= | < | <=`
//! - [`Condition`]: `{attribute} {op} {value}`
//!
//! # Example
//! ```rust
//! use algebra::Value;
//! use jointree::{ComparisonOperator, Condition};
//! let cond = Condition::new("age", ComparisonOperator::GreaterEqualThan, Value::Int32(18));
//! assert_eq!(cond.to_string(), "age >= 18");
//! ```

use algebra::Value;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// Comparison operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ComparisonOperator {
    #[serde(rename = "==")]
    Equal,
    #[serde(rename = "!=")]
    NotEqual,
    #[serde(rename = ">")]
    GreaterThan,
    #[serde(rename = ">=")]
    GreaterEqualThan,
    #[serde(rename = "<")]
    LessThan,
    #[serde(rename = "<=")]
    LessEqualThan,
}

impl ComparisonOperator {
    /// Whether `left {op} right` holds.
    ///
    /// Incomparable values (text against a number) only satisfy `!=`.
    #[must_use]
    pub fn evaluate(&self, left: &Value, right: &Value) -> bool {
        match left.compare(right) {
            Some(ordering) => match self {
                Self::Equal => ordering == Ordering::Equal,
                Self::NotEqual => ordering != Ordering::Equal,
                Self::GreaterThan => ordering == Ordering::Greater,
                Self::GreaterEqualThan => ordering != Ordering::Less,
                Self::LessThan => ordering == Ordering::Less,
                Self::LessEqualThan => ordering != Ordering::Greater,
            },
            None => matches!(self, Self::NotEqual),
        }
    }
}

impl fmt::Display for ComparisonOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sym = match self {
            Self::Equal => "==",
            Self::NotEqual => "!=",
            Self::GreaterThan => ">",
            Self::GreaterEqualThan => ">=",
            Self::LessThan => "<",
            Self::LessEqualThan => "<=",
        };
        write!(f, "{sym}")
    }
}

/// `{attribute} {op} {value}` over a single column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Condition {
    attribute: String,
    op: ComparisonOperator,
    value: Value,
}

impl Condition {
    #[must_use]
    pub fn new(attribute: impl Into<String>, op: ComparisonOperator, value: Value) -> Self {
        Self {
            attribute: attribute.into(),
            op,
            value,
        }
    }

    #[must_use]
    #[inline]
    pub fn attribute(&self) -> &str {
        &self.attribute
    }

    #[must_use]
    #[inline]
    pub fn op(&self) -> ComparisonOperator {
        self.op
    }

    #[must_use]
    #[inline]
    pub fn value(&self) -> &Value {
        &self.value
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.attribute, self.op, self.value)
    }
}
