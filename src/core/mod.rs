//! Core module - the document tree and the operations over it
//!
//! This module provides:
//! - The generic document tree (mapping / sequence / scalar)
//! - Deep merge of several documents into one
//! - Slash-delimited path extraction of a sub-node
//! - The error taxonomy of both operations

pub mod error;
pub mod merge;
pub mod node;
pub mod path;

pub use error::{MergeError, PathError};
pub use merge::{merge, merge_all, merge_pair};
pub use node::{Mapping, Node, NodeKind, Scalar};
pub use path::extract;
