use algebra::AlgebraError;
use jointree::{JoinTreeError, NodeId};
use std::fmt::Debug;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExecutorError {
    #[error("Executor error: invalid join tree: {0}")]
    InvalidJoinTree(String),
    #[error("Executor error: node {node} joins '{child}' under '{parent}' but they share no attribute")]
    MissingJoinKey {
        node: NodeId,
        parent: String,
        child: String,
    },
    #[error("Executor error: relation '{relation}' has no attribute '{attribute}'")]
    UnknownAttribute { relation: String, attribute: String },
    #[error(transparent)]
    Algebra(AlgebraError),
    #[error(transparent)]
    Tree(#[from] JoinTreeError),
    #[error("IO error: {0}")]
    Io(String),
    #[error("Serialization error: {0}")]
    Serialize(String),
}

impl From<AlgebraError> for ExecutorError {
    fn from(e: AlgebraError) -> Self {
        match e {
            AlgebraError::UnknownAttribute {
                relation,
                attribute,
            } => Self::UnknownAttribute {
                relation,
                attribute,
            },
            other => Self::Algebra(other),
        }
    }
}

impl From<std::io::Error> for ExecutorError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e.to_string())
    }
}

impl From<serde_json::Error> for ExecutorError {
    fn from(e: serde_json::Error) -> Self {
        Self::Serialize(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, ExecutorError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_attribute_is_lifted() {
        let err: ExecutorError = AlgebraError::UnknownAttribute {
            relation: "R".into(),
            attribute: "z".into(),
        }
        .into();
        assert_eq!(
            err,
            ExecutorError::UnknownAttribute {
                relation: "R".into(),
                attribute: "z".into()
            }
        );
    }

    #[test]
    fn missing_join_key_names_node() {
        let err = ExecutorError::MissingJoinKey {
            node: NodeId::new(2),
            parent: "A".into(),
            child: "C".into(),
        };
        assert_eq!(
            err.to_string(),
            "Executor error: node #2 joins 'C' under 'A' but they share no attribute"
        );
    }
}
