//! 2-D placement of tree nodes and the array row for renderers.
//!
//! Pure geometry: nothing here reads or writes values or tags.

use std::collections::HashMap;

use generational_arena::Index;

use crate::domain::arena::RangeTree;

pub const NODE_RADIUS: f32 = 25.0;
pub const VERTICAL_SPACING: f32 = 80.0;
pub const CELL_SIZE: f32 = 50.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Position {
    pub x: f32,
    pub y: f32,
}

/// Root placement and the horizontal spread available to the whole tree.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutParams {
    pub root_x: f32,
    pub root_y: f32,
    /// Spread at the root; halves with every level
    pub width: f32,
    pub vertical_spacing: f32,
}

impl Default for LayoutParams {
    fn default() -> Self {
        Self {
            root_x: 600.0,
            root_y: 50.0,
            width: 1000.0,
            vertical_spacing: VERTICAL_SPACING,
        }
    }
}

/// Assigns a position to every node.
///
/// Children sit one spacing below their parent at `x - width / 4` and
/// `x + width / 4`, and get half the parent's spread.
pub fn layout(tree: &RangeTree, params: &LayoutParams) -> HashMap<Index, Position> {
    let mut positions = HashMap::with_capacity(tree.node_count());
    place(
        tree,
        tree.root(),
        Position {
            x: params.root_x,
            y: params.root_y,
        },
        params.width,
        params.vertical_spacing,
        &mut positions,
    );
    positions
}

fn place(
    tree: &RangeTree,
    idx: Index,
    at: Position,
    width: f32,
    spacing: f32,
    positions: &mut HashMap<Index, Position>,
) {
    positions.insert(idx, at);
    let Some(node) = tree.get_node(idx) else {
        return;
    };
    let y = at.y + spacing;
    match (node.left, node.right) {
        (Some(left), Some(right)) => {
            let offset = width / 4.0;
            place(tree, left, Position { x: at.x - offset, y }, width / 2.0, spacing, positions);
            place(tree, right, Position { x: at.x + offset, y }, width / 2.0, spacing, positions);
        }
        (Some(only), None) | (None, Some(only)) => {
            place(tree, only, Position { x: at.x, y }, width / 2.0, spacing, positions);
        }
        (None, None) => {}
    }
}

/// Top-left corners of `len` square cells centred horizontally on `center_x`.
pub fn array_row(len: usize, center_x: f32, y: f32, cell: f32) -> Vec<Position> {
    let start_x = center_x - (len as f32 * cell) / 2.0;
    (0..len)
        .map(|i| Position {
            x: start_x + i as f32 * cell,
            y,
        })
        .collect()
}
