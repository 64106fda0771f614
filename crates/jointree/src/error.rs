use algebra::AlgebraError;
use std::fmt::Debug;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum JoinTreeError {
    #[error("Join tree error: selection refers to UNKNOWN relation '{0}'")]
    UnknownRelation(String),
    #[error("Join tree error: selection refers to relation '{0}', which appears in more than one node")]
    AmbiguousRelation(String),
    #[error("Join tree error: condition on relation '{relation}' refers to UNKNOWN attribute '{attribute}'")]
    UnknownAttribute { relation: String, attribute: String },
    #[error("Join tree error: malformed tree document: {0}")]
    Document(String),
    #[error("IO error: {0}")]
    Io(String),
    #[error(transparent)]
    Algebra(#[from] AlgebraError),
}

impl From<std::io::Error> for JoinTreeError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e.to_string())
    }
}

impl From<serde_json::Error> for JoinTreeError {
    fn from(e: serde_json::Error) -> Self {
        Self::Document(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, JoinTreeError>;
