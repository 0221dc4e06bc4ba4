//! Path resolver
//!
//! Paths are slash-delimited (`object/array/1`). They are cleaned like
//! absolute filesystem paths, then consumed one segment at a time: mapping
//! segments are keys, sequence segments are base-10 indices.

use crate::core::error::PathError;
use crate::core::node::Node;

/// Cleaned path with no segment left
pub const ROOT: &str = "/";

/// Lexically clean `path` as a rooted path.
///
/// A leading `/` is implied, empty and `.` segments are dropped, and `..`
/// removes the previous segment without ever climbing above the root.
pub fn clean(path: &str) -> String {
    let mut segments: Vec<&str> = Vec::new();
    for segment in path.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            s => segments.push(s),
        }
    }

    let mut cleaned = String::with_capacity(path.len() + 1);
    if segments.is_empty() {
        cleaned.push_str(ROOT);
    }
    for segment in segments {
        cleaned.push('/');
        cleaned.push_str(segment);
    }
    cleaned
}

/// Split the first segment off a path.
///
/// Returns `(head, tail)` where `tail` is the cleaned remainder, or [`ROOT`]
/// once nothing remains. The root itself yields an empty head.
pub fn tokenize(path: &str) -> (String, String) {
    let cleaned = clean(path);
    let rest = &cleaned[1..];
    match rest.find('/') {
        Some(i) => (rest[..i].to_string(), rest[i..].to_string()),
        None => (rest.to_string(), ROOT.to_string()),
    }
}

/// Lazily yields the segments of a path, one [`tokenize`] step at a time
#[derive(Debug, Clone)]
pub struct Segments {
    tail: String,
}

impl Segments {
    pub fn new(path: &str) -> Self {
        Self { tail: clean(path) }
    }
}

impl Iterator for Segments {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        if self.tail == ROOT {
            return None;
        }
        let (head, tail) = tokenize(&self.tail);
        self.tail = tail;
        Some(head)
    }
}

/// Walk `path` from `root` and borrow the node it designates.
///
/// An empty path (or one that cleans to `/`) designates `root` itself.
pub fn extract<'a>(root: &'a Node, path: &str) -> Result<&'a Node, PathError> {
    Segments::new(path).try_fold(root, |node, head| step(node, &head))
}

fn step<'a>(node: &'a Node, head: &str) -> Result<&'a Node, PathError> {
    match node {
        Node::Mapping(mapping) => mapping.get(head).ok_or_else(|| PathError::KeyNotFound {
            key: head.to_string(),
        }),
        Node::Sequence(items) => {
            let index = parse_index(head)?;
            items.get(index).ok_or(PathError::IndexOutOfBounds {
                index,
                length: items.len(),
            })
        }
        other => Err(PathError::NotIndexable {
            token: head.to_string(),
            kind: other.kind(),
        }),
    }
}

fn parse_index(token: &str) -> Result<usize, PathError> {
    if token.is_empty() || !token.bytes().all(|b| b.is_ascii_digit()) {
        return Err(PathError::InvalidIndex {
            token: token.to_string(),
        });
    }
    token.parse().map_err(|_| PathError::InvalidIndex {
        token: token.to_string(),
    })
}
