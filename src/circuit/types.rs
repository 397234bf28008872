//! Core types for circuit representation.

use std::fmt;

/// Position of a node in the solver's unknown vector.
///
/// Ground is the reference node; it is never an unknown and always reads 0 V.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum NodeIndex {
    /// The reference node.
    Ground,
    /// A non-ground node, numbered from 0.
    Node(usize),
}

impl NodeIndex {
    /// Convert from signed numbering where any negative value means ground.
    pub fn from_signed(index: i64) -> Self {
        if index < 0 {
            NodeIndex::Ground
        } else {
            NodeIndex::Node(index as usize)
        }
    }

    /// Check if this is the ground node.
    pub fn is_ground(&self) -> bool {
        matches!(self, NodeIndex::Ground)
    }

    /// Row/column in the MNA matrix, `None` for ground.
    pub fn index(&self) -> Option<usize> {
        match self {
            NodeIndex::Ground => None,
            NodeIndex::Node(i) => Some(*i),
        }
    }
}

impl fmt::Display for NodeIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeIndex::Ground => write!(f, "GND"),
            NodeIndex::Node(i) => write!(f, "N{}", i),
        }
    }
}
