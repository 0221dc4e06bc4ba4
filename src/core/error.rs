//! Error taxonomy for the merge engine and the path resolver

use thiserror::Error;

use crate::core::node::NodeKind;

/// Failure while folding documents together
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MergeError {
    /// A mapping met a non-mapping, or a sequence met a non-sequence.
    /// `path` joins mapping keys with `/`, escaping `~` as `~0` and `/` as `~1`.
    #[error("cannot merge {actual} into {expected} at {path}")]
    TypeMismatch {
        path: String,
        expected: NodeKind,
        actual: NodeKind,
    },
}

/// Failure while walking a path into a tree
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PathError {
    #[error("key `{key}` not found")]
    KeyNotFound { key: String },

    #[error("index {index} out of bounds (length {length})")]
    IndexOutOfBounds { index: usize, length: usize },

    #[error("invalid sequence index `{token}`")]
    InvalidIndex { token: String },

    #[error("can't interpret token `{token}` on a {kind}")]
    NotIndexable { token: String, kind: NodeKind },
}
