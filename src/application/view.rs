//! Read-only snapshot of a session for renderers.

use std::collections::HashMap;

use generational_arena::Index;

use crate::domain::{HighlightTag, Highlights, RangeTree, Sum};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeView {
    pub id: Index,
    pub lo: usize,
    pub hi: usize,
    pub value: Sum,
    pub tag: HighlightTag,
    pub left: Option<Index>,
    pub right: Option<Index>,
}

/// Nodes in pre-order plus the current array.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeView {
    pub root: Index,
    pub nodes: Vec<NodeView>,
    pub leaves: Vec<i64>,
    /// Position of each node in `nodes`
    positions: HashMap<Index, usize>,
}

impl TreeView {
    pub fn capture(tree: &RangeTree, highlights: &Highlights) -> Self {
        let nodes: Vec<NodeView> = tree
            .iter()
            .map(|(id, node)| NodeView {
                id,
                lo: node.lo,
                hi: node.hi,
                value: node.value,
                tag: highlights.tag(id),
                left: node.left,
                right: node.right,
            })
            .collect();
        let positions = nodes
            .iter()
            .enumerate()
            .map(|(pos, node)| (node.id, pos))
            .collect();
        Self {
            root: tree.root(),
            nodes,
            leaves: tree.leaves(),
            positions,
        }
    }

    pub fn node(&self, id: Index) -> Option<&NodeView> {
        self.positions.get(&id).map(|&pos| &self.nodes[pos])
    }
}
