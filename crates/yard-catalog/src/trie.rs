//! Compressed attribute trie.
//!
//! Maps an ordered path of attribute values to a variant key. Nodes live in
//! an arena and are addressed by index. Building happens in two passes:
//! every representative is inserted along the full attribute list, then a
//! post-order pass copies the tree into a fresh arena, collapsing any node
//! that has exactly one child and no leaf into that child. The result is
//! never mutated afterwards; a rebuild produces a new trie.

use std::collections::BTreeMap;

use serde::Serialize;
use thiserror::Error;

use crate::catalog::{AttrValue, Attribute, Variant};

/// Index of a node in the trie arena.
pub type NodeId = usize;

/// Errors from walking the trie.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TrieError {
    /// No child for the given value at this depth.
    #[error("No branch for value {value} at depth {depth}")]
    MissingBranch { depth: usize, value: String },

    /// The path ended on an interior node.
    #[error("Path of length {0} does not end at a leaf")]
    NotALeaf(usize),
}

#[derive(Debug, Clone, Default, PartialEq)]
struct TrieNode {
    children: BTreeMap<AttrValue, NodeId>,
    leaf: Option<String>,
}

/// Two keys whose representatives share the whole attribute path.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PathCollision {
    /// Key that owns the leaf.
    pub kept: String,
    /// Key that was overwritten.
    pub replaced: String,
}

/// Compressed decision tree over identifying attributes.
#[derive(Debug, Clone, PartialEq)]
pub struct AttributeTrie {
    nodes: Vec<TrieNode>,
    root: NodeId,
    collisions: Vec<PathCollision>,
}

impl AttributeTrie {
    /// Build from one representative variant per key, in key order.
    ///
    /// The leaf stores the terminal component of the representative's id.
    pub fn build<'a, I>(attributes: &[Attribute], representatives: I) -> Self
    where
        I: IntoIterator<Item = &'a Variant>,
    {
        let mut nodes = vec![TrieNode::default()];
        let mut collisions = Vec::new();

        for variant in representatives {
            let mut current = 0;
            for attr in attributes {
                let value = variant.attribute(*attr);
                let existing = nodes[current].children.get(&value).copied();
                current = match existing {
                    Some(child) => child,
                    None => {
                        nodes.push(TrieNode::default());
                        let child = nodes.len() - 1;
                        nodes[current].children.insert(value, child);
                        child
                    }
                };
            }

            let terminal = variant.id().terminal().to_string();
            if let Some(previous) = nodes[current].leaf.replace(terminal.clone()) {
                if previous != terminal {
                    collisions.push(PathCollision {
                        kept: terminal,
                        replaced: previous,
                    });
                }
            }
        }

        let mut compressed = Vec::with_capacity(nodes.len());
        let root = compress(&nodes, 0, &mut compressed);

        Self {
            nodes: compressed,
            root,
            collisions,
        }
    }

    /// Follow `path` from the root and return the leaf key.
    pub fn resolve(&self, path: &[AttrValue]) -> Result<&str, TrieError> {
        let mut current = self.root;
        for (depth, value) in path.iter().enumerate() {
            current = *self.nodes[current].children.get(value).ok_or_else(|| {
                TrieError::MissingBranch {
                    depth,
                    value: value.to_string(),
                }
            })?;
        }
        self.nodes[current]
            .leaf
            .as_deref()
            .ok_or(TrieError::NotALeaf(path.len()))
    }

    /// Values branching out of the node reached by `path`.
    pub fn branches(&self, path: &[AttrValue]) -> Result<Vec<&AttrValue>, TrieError> {
        let mut current = self.root;
        for (depth, value) in path.iter().enumerate() {
            current = *self.nodes[current].children.get(value).ok_or_else(|| {
                TrieError::MissingBranch {
                    depth,
                    value: value.to_string(),
                }
            })?;
        }
        Ok(self.nodes[current].children.keys().collect())
    }

    /// All leaf keys, depth first in value order.
    pub fn leaves(&self) -> Vec<&str> {
        let mut out = Vec::new();
        let mut stack = vec![self.root];
        while let Some(id) = stack.pop() {
            let node = &self.nodes[id];
            if let Some(leaf) = &node.leaf {
                out.push(leaf.as_str());
            }
            stack.extend(node.children.values().rev());
        }
        out
    }

    /// Every root-to-leaf path with its key.
    pub fn paths(&self) -> Vec<(Vec<AttrValue>, &str)> {
        let mut out = Vec::new();
        let mut stack = vec![(self.root, Vec::new())];
        while let Some((id, path)) = stack.pop() {
            let node = &self.nodes[id];
            if let Some(leaf) = &node.leaf {
                out.push((path.clone(), leaf.as_str()));
            }
            for (value, child) in node.children.iter().rev() {
                let mut next = path.clone();
                next.push(value.clone());
                stack.push((*child, next));
            }
        }
        out
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the root itself is a leaf (a single-key group).
    pub fn is_trivial(&self) -> bool {
        self.nodes[self.root].leaf.is_some()
    }

    /// Keys that were overwritten by a later key with the same path.
    pub fn collisions(&self) -> &[PathCollision] {
        &self.collisions
    }
}

/// Copy the subtree at `id` into `out`, collapsing single-child chains.
fn compress(src: &[TrieNode], id: NodeId, out: &mut Vec<TrieNode>) -> NodeId {
    let node = &src[id];
    if node.leaf.is_none() && node.children.len() == 1 {
        if let Some(&child) = node.children.values().next() {
            return compress(src, child, out);
        }
    }

    let children = node
        .children
        .iter()
        .map(|(value, &child)| (value.clone(), compress(src, child, out)))
        .collect();
    out.push(TrieNode {
        children,
        leaf: node.leaf.clone(),
    });
    out.len() - 1
}
