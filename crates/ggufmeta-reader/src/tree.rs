//! Nested metadata tree built from dotted keys.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{GgufError, Result};
use crate::value::GgufValue;

/// Maximum number of path segments a key is split into.
///
/// Anything past the fifth dot stays part of the last segment.
pub const MAX_KEY_DEPTH: usize = 5;

/// A node of the metadata tree: either a decoded value or a nested mapping.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum MetadataNode {
    Value(GgufValue),
    Map(MetadataTree),
}

impl MetadataNode {
    pub fn as_value(&self) -> Option<&GgufValue> {
        match self {
            Self::Value(v) => Some(v),
            Self::Map(_) => None,
        }
    }

    pub fn as_map(&self) -> Option<&MetadataTree> {
        match self {
            Self::Map(m) => Some(m),
            Self::Value(_) => None,
        }
    }
}

/// Untyped metadata keyed by dotted path.
///
/// `llama.attention.head_count` lands under `llama` → `attention` →
/// `head_count`. Intermediate nodes are always mappings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MetadataTree {
    entries: BTreeMap<String, MetadataNode>,
}

fn split_key(key: &str) -> Vec<&str> {
    key.splitn(MAX_KEY_DEPTH, '.').collect()
}

impl MetadataTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert `value` at the dotted path `key`, creating mappings on the way.
    ///
    /// Fails with [`GgufError::KeyConflict`] when a prefix of the path already
    /// holds a value, or when the full path already holds a mapping. A value
    /// written twice under the same key keeps the later one.
    pub fn insert(&mut self, key: &str, value: GgufValue) -> Result<()> {
        let segments = split_key(key);
        let Some((leaf, parents)) = segments.split_last() else {
            return Ok(());
        };

        let mut node = self;
        for (depth, segment) in parents.iter().enumerate() {
            let child = node
                .entries
                .entry((*segment).to_string())
                .or_insert_with(|| MetadataNode::Map(MetadataTree::new()));
            node = match child {
                MetadataNode::Map(map) => map,
                MetadataNode::Value(_) => {
                    return Err(GgufError::KeyConflict {
                        key: key.to_string(),
                        at: segments[..=depth].join("."),
                    });
                }
            };
        }

        if let Some(MetadataNode::Map(_)) = node.entries.get(*leaf) {
            return Err(GgufError::KeyConflict { key: key.to_string(), at: key.to_string() });
        }
        if node.entries.insert((*leaf).to_string(), MetadataNode::Value(value)).is_some() {
            warn!(key, "duplicate metadata key, keeping the last value");
        }
        Ok(())
    }

    /// Look up a node by dotted path.
    pub fn get(&self, path: &str) -> Option<&MetadataNode> {
        let segments = split_key(path);
        let (leaf, parents) = segments.split_last()?;
        let mut node = self;
        for segment in parents {
            node = node.entries.get(*segment)?.as_map()?;
        }
        node.entries.get(*leaf)
    }

    /// Look up a value by dotted path.
    pub fn value(&self, path: &str) -> Option<&GgufValue> {
        self.get(path)?.as_value()
    }

    /// Look up a nested mapping by dotted path.
    pub fn map(&self, path: &str) -> Option<&MetadataTree> {
        self.get(path)?.as_map()
    }

    /// Direct child, without splitting on dots.
    pub fn child(&self, segment: &str) -> Option<&MetadataNode> {
        self.entries.get(segment)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &MetadataNode)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of direct children.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Every value with its full dotted key, in key order.
    pub fn leaves(&self) -> Vec<(String, &GgufValue)> {
        let mut out = Vec::new();
        self.collect_leaves("", &mut out);
        out
    }

    fn collect_leaves<'a>(&'a self, prefix: &str, out: &mut Vec<(String, &'a GgufValue)>) {
        for (name, node) in &self.entries {
            let key = if prefix.is_empty() { name.clone() } else { format!("{prefix}.{name}") };
            match node {
                MetadataNode::Value(v) => out.push((key, v)),
                MetadataNode::Map(m) => m.collect_leaves(&key, out),
            }
        }
    }
}
