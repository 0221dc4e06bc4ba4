//! Codec module - adapters between byte streams and the document tree
//!
//! - `load`: decode YAML/JSON files or stdin into documents
//! - `render`: encode a node as YAML, JSON or raw text

pub mod load;
pub mod render;
