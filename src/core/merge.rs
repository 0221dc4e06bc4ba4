//! Merge engine
//!
//! Folds documents into one tree:
//! - mappings are unioned key by key, recursing where both sides hold a key
//! - sequences are concatenated in order
//! - scalars are replaced by whatever comes later
//!
//! Absent documents (`None`) are identity elements of the fold.

use std::fmt;

use crate::core::error::MergeError;
use crate::core::node::{Mapping, Node, NodeKind};

/// Location of a merge step, as the chain of mapping keys from the root
#[derive(Debug, Clone, Default)]
struct KeyPath(Vec<String>);

impl KeyPath {
    fn child(&self, key: &str) -> Self {
        let mut keys = self.0.clone();
        keys.push(key.to_string());
        KeyPath(keys)
    }
}

impl fmt::Display for KeyPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return f.write_str("/");
        }
        // `~` and `/` inside keys are escaped as `~0` and `~1`
        for key in &self.0 {
            write!(f, "/{}", key.replace('~', "~0").replace('/', "~1"))?;
        }
        Ok(())
    }
}

/// Merge `sources` into `target`, left to right.
///
/// Dispatch is on the accumulator's variant: a mapping only accepts
/// mappings, a sequence only accepts sequences, and a scalar is replaced by
/// the source whatever its variant. `None` sources are skipped.
///
/// A null value is a scalar, not an absence: merging `{a: null}` onto
/// `{a: {x: 1}}` is a `TypeMismatch` rather than keeping the mapping.
pub fn merge<I>(target: Node, sources: I) -> Result<Node, MergeError>
where
    I: IntoIterator,
    I::Item: Into<Option<Node>>,
{
    let root = KeyPath::default();
    sources
        .into_iter()
        .filter_map(Into::into)
        .try_fold(target, |acc, source| merge_node(acc, source, &root))
}

/// Merge two possibly absent documents; an absent side yields the other one.
pub fn merge_pair(a: Option<Node>, b: Option<Node>) -> Result<Option<Node>, MergeError> {
    match (a, b) {
        (None, b) => Ok(b),
        (a, None) => Ok(a),
        (Some(a), Some(b)) => merge(a, [b]).map(Some),
    }
}

/// Fold every document into the first one, stopping at the first error.
///
/// An empty input yields `None`.
pub fn merge_all<I>(documents: I) -> Result<Option<Node>, MergeError>
where
    I: IntoIterator,
    I::Item: Into<Option<Node>>,
{
    documents
        .into_iter()
        .enumerate()
        .try_fold(None, |acc, (index, document)| {
            tracing::trace!(document = index, "merging document");
            merge_pair(acc, document.into())
        })
}

fn merge_node(acc: Node, source: Node, path: &KeyPath) -> Result<Node, MergeError> {
    match acc {
        Node::Mapping(acc) => match source {
            Node::Mapping(source) => merge_mappings(acc, source, path).map(Node::Mapping),
            other => Err(mismatch(path, NodeKind::Mapping, &other)),
        },
        Node::Sequence(mut acc) => match source {
            Node::Sequence(source) => {
                acc.extend(source);
                Ok(Node::Sequence(acc))
            }
            other => Err(mismatch(path, NodeKind::Sequence, &other)),
        },
        Node::Scalar(_) => Ok(source),
    }
}

fn mismatch(path: &KeyPath, expected: NodeKind, actual: &Node) -> MergeError {
    MergeError::TypeMismatch {
        path: path.to_string(),
        expected,
        actual: actual.kind(),
    }
}

/// A key held by both sides: slot in the accumulator plus both values
struct Conflict {
    index: usize,
    key: String,
    existing: Node,
    incoming: Node,
}

fn merge_mappings(mut acc: Mapping, source: Mapping, path: &KeyPath) -> Result<Mapping, MergeError> {
    let mut conflicts = Vec::new();

    for (key, incoming) in source {
        match acc.get_index_of(&key) {
            Some(index) => {
                let existing = acc
                    .get_index_mut(index)
                    .map(|(_, slot)| std::mem::take(slot))
                    .unwrap_or_default();
                conflicts.push(Conflict {
                    index,
                    key,
                    existing,
                    incoming,
                });
            }
            None => {
                acc.insert(key, incoming);
            }
        }
    }

    for (index, merged) in resolve_conflicts(conflicts, path)? {
        if let Some((_, slot)) = acc.get_index_mut(index) {
            *slot = merged;
        }
    }

    Ok(acc)
}

#[cfg(not(feature = "parallel"))]
fn resolve_conflicts(
    conflicts: Vec<Conflict>,
    path: &KeyPath,
) -> Result<Vec<(usize, Node)>, MergeError> {
    conflicts.into_iter().map(|c| resolve(c, path)).collect()
}

/// Siblings are independent; collecting into `Vec<Result>` first keeps the
/// reported error the first one in key order.
#[cfg(feature = "parallel")]
fn resolve_conflicts(
    conflicts: Vec<Conflict>,
    path: &KeyPath,
) -> Result<Vec<(usize, Node)>, MergeError> {
    use rayon::prelude::*;

    let results: Vec<_> = conflicts
        .into_par_iter()
        .map(|c| resolve(c, path))
        .collect();
    results.into_iter().collect()
}

fn resolve(conflict: Conflict, path: &KeyPath) -> Result<(usize, Node), MergeError> {
    let child = path.child(&conflict.key);
    merge_node(conflict.existing, conflict.incoming, &child).map(|node| (conflict.index, node))
}
