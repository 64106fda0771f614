//! Relation algebra for the Yannakakis join engine.
//!
//! Provides the [`Relation`] value type and the primitives the join pipeline
//! is built from: semi-join, natural equi-join, selection and projection.
//! Every operation returns a new relation; inputs are never modified.

pub mod error;
pub mod join;
pub mod key;
pub mod relation;
pub mod select;
pub mod semijoin;
pub mod value;

// Re-export core types for convenient access
pub use error::{AlgebraError, Result};
pub use key::JoinKey;
pub use relation::{Relation, Tuple};
pub use select::Strictness;
pub use value::Value;
