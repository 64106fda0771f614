use std::fmt::Debug;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AlgebraError {
    #[error("Algebra error: relation '{relation}' declares attribute '{attribute}' more than once")]
    DuplicateAttribute { relation: String, attribute: String },
    #[error("Algebra error: tuple {index} of relation '{relation}' has {found} values, expected {expected}")]
    ArityMismatch {
        relation: String,
        index: usize,
        expected: usize,
        found: usize,
    },
    #[error("Algebra error: relations '{left}' and '{right}' share no attribute to join on")]
    MissingJoinKey { left: String, right: String },
    #[error("Algebra error: relation '{relation}' has no attribute '{attribute}'")]
    UnknownAttribute { relation: String, attribute: String },
}

pub type Result<T> = std::result::Result<T, AlgebraError>;
