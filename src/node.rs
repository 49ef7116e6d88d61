use crate::class_map::ClassCounts;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A decision tree node.
///
/// Serialized with a `type` tag of `"leaf"` or `"node"`, and camelCase field
/// names, which is the persisted tree format.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Node {
    #[serde(rename = "leaf", rename_all = "camelCase")]
    Leaf {
        /// Class of the first record that reached this leaf.
        class: String,
        /// Number of records that reached this leaf.
        count: usize,
        class_counts: ClassCounts,
    },
    #[serde(rename = "node", rename_all = "camelCase")]
    Split {
        feature: String,
        gain: f64,
        /// Counts over every record reaching this node, before splitting.
        class_counts: ClassCounts,
        children: Vec<Branch>,
    },
}

/// One outgoing edge of a split, taken when the split feature equals `value`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Branch {
    pub value: String,
    pub subtree: Node,
}

impl Node {
    pub fn is_leaf(&self) -> bool {
        matches!(self, Node::Leaf { .. })
    }

    pub fn class_counts(&self) -> &ClassCounts {
        match self {
            Node::Leaf { class_counts, .. } | Node::Split { class_counts, .. } => class_counts,
        }
    }

    /// Child reached when the split feature equals `value`.
    pub fn child(&self, value: &str) -> Option<&Node> {
        match self {
            Node::Leaf { .. } => None,
            Node::Split { children, .. } => children.iter().find(|b| b.value == value).map(|b| &b.subtree),
        }
    }

    pub fn depth(&self) -> usize {
        match self {
            Node::Leaf { .. } => 0,
            Node::Split { children, .. } => 1 + children.iter().map(|b| b.subtree.depth()).max().unwrap_or(0),
        }
    }

    pub fn n_leaves(&self) -> usize {
        match self {
            Node::Leaf { .. } => 1,
            Node::Split { children, .. } => children.iter().map(|b| b.subtree.n_leaves()).sum(),
        }
    }

    pub fn n_nodes(&self) -> usize {
        match self {
            Node::Leaf { .. } => 1,
            Node::Split { children, .. } => 1 + children.iter().map(|b| b.subtree.n_nodes()).sum::<usize>(),
        }
    }

    fn fmt_indented(&self, f: &mut fmt::Formatter, depth: usize) -> fmt::Result {
        let pad = "      ".repeat(depth);
        match self {
            Node::Leaf { class, count, .. } => writeln!(f, "{}leaf={},count={}", pad, class, count),
            Node::Split {
                feature,
                gain,
                class_counts,
                children,
            } => {
                writeln!(f, "{}[{}] gain={:.4},count={}", pad, feature, gain, class_counts.total())?;
                for b in children {
                    writeln!(f, "{}  {}={}:", pad, feature, b.value)?;
                    b.subtree.fmt_indented(f, depth + 1)?;
                }
                Ok(())
            }
        }
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        self.fmt_indented(f, 0)
    }
}
