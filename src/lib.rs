//! yyt - merge structured documents and select nodes out of them
//!
//! yyt provides:
//! - A generic document tree shared by the YAML and JSON codecs
//! - Deep merge of several documents (mapping union, sequence concatenation,
//!   later scalars win)
//! - Slash-delimited path extraction (`object/array/1`)
//! - Placeholder templates rendered against a selected node

pub mod cli;
pub mod codec;
pub mod core;
pub mod logging;
pub mod template;

pub use crate::core::{
    extract, merge, merge_all, merge_pair, Mapping, MergeError, Node, NodeKind, PathError, Scalar,
};
