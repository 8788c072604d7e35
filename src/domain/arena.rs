use generational_arena::{Arena, Index};
use std::fmt;
use tracing::{debug, instrument};

use crate::domain::error::{DomainError, DomainResult};
use crate::domain::highlight::{HighlightTag, Highlights, Traced};

/// Aggregate type of node sums.
///
/// Elements are `i64`; sums over up to `usize::MAX` of them fit in `i128`.
pub type Sum = i128;

/// One closed interval `[lo, hi]` of the backing array and the sum over it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SegmentNode {
    pub lo: usize,
    pub hi: usize,
    /// Sum of the array elements in `[lo, hi]`, an `i64` for leaves
    pub value: Sum,
    /// Lower half `[lo, mid]`, None for leaves
    pub left: Option<Index>,
    /// Upper half `[mid + 1, hi]`, None for leaves
    pub right: Option<Index>,
}

impl SegmentNode {
    pub fn is_leaf(&self) -> bool {
        self.lo == self.hi
    }

    pub fn contains(&self, idx: usize) -> bool {
        self.lo <= idx && idx <= self.hi
    }

    fn overlaps(&self, l: usize, r: usize) -> bool {
        !(r < self.lo || self.hi < l)
    }

    fn within(&self, l: usize, r: usize) -> bool {
        l <= self.lo && self.hi <= r
    }
}

impl fmt::Display for SegmentNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}] = {}", self.lo, self.hi, self.value)
    }
}

/// Arena-based segment tree over a fixed-size integer array.
///
/// Nodes live in a generational arena and refer to their children by `Index`.
/// The tree is built once and never changes shape; only values are mutated.
/// Every internal node's value equals the sum of its children once an
/// operation returns.
#[derive(Debug, Clone)]
pub struct RangeTree {
    /// Arena storage for all tree nodes
    arena: Arena<SegmentNode>,
    /// Index of the root node, covering `[0, len - 1]`
    root: Index,
    /// Length of the backing array
    len: usize,
}

/// Leaves only ever hold `i64` values: build and update store one, and
/// `update_range` refuses a delta that would leave the range.
fn leaf_value(node: &SegmentNode) -> i64 {
    node.value as i64
}

fn ordered(l: usize, r: usize) -> (usize, usize) {
    if l > r {
        (r, l)
    } else {
        (l, r)
    }
}

impl RangeTree {
    /// Builds the tree by splitting `[0, n - 1]` at `mid = (lo + hi) / 2` recursively.
    ///
    /// Fails with `DomainError::InvalidInput` for an empty array.
    #[instrument(level = "debug", skip(values), fields(len = values.len()))]
    pub fn build(values: &[i64]) -> DomainResult<Self> {
        if values.is_empty() {
            return Err(DomainError::InvalidInput(
                "array must not be empty".to_string(),
            ));
        }
        let mut arena = Arena::with_capacity(2 * values.len() - 1);
        let root = Self::build_node(&mut arena, values, 0, values.len() - 1);
        debug!(nodes = arena.len(), total = arena[root].value, "tree built");
        Ok(Self {
            arena,
            root,
            len: values.len(),
        })
    }

    fn build_node(arena: &mut Arena<SegmentNode>, values: &[i64], lo: usize, hi: usize) -> Index {
        if lo == hi {
            return arena.insert(SegmentNode {
                lo,
                hi,
                value: Sum::from(values[lo]),
                left: None,
                right: None,
            });
        }
        let mid = lo + (hi - lo) / 2;
        let left = Self::build_node(arena, values, lo, mid);
        let right = Self::build_node(arena, values, mid + 1, hi);
        let value = arena[left].value + arena[right].value;
        arena.insert(SegmentNode {
            lo,
            hi,
            value,
            left: Some(left),
            right: Some(right),
        })
    }

    pub fn root(&self) -> Index {
        self.root
    }

    pub fn len(&self) -> usize {
        self.len
    }

    /// Always false: construction rejects empty arrays.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn node_count(&self) -> usize {
        self.arena.len()
    }

    pub fn get_node(&self, idx: Index) -> Option<&SegmentNode> {
        self.arena.get(idx)
    }

    /// Aggregate over the whole array.
    pub fn total(&self) -> Sum {
        self.arena[self.root].value
    }

    /// Sum over `[min(l, r), max(l, r)] ∩ [0, len - 1]`.
    ///
    /// Out-of-range parts of the request contribute 0.
    #[instrument(level = "debug", skip(self))]
    pub fn query(&self, l: usize, r: usize) -> Traced<Sum> {
        let (l, r) = ordered(l, r);
        let mut highlights = Highlights::new();
        let sum = self.query_node(self.root, l, r, &mut highlights);
        debug!(l, r, sum, "range query");
        Traced::new(sum, highlights)
    }

    fn query_node(&self, id: Index, l: usize, r: usize, highlights: &mut Highlights) -> Sum {
        let node = &self.arena[id];
        if !node.overlaps(l, r) {
            highlights.mark(id, HighlightTag::Outside);
            return 0;
        }
        if node.within(l, r) {
            highlights.mark(id, HighlightTag::Contained);
            return node.value;
        }
        highlights.mark(id, HighlightTag::Partial);
        let left = node
            .left
            .map_or(0, |child| self.query_node(child, l, r, highlights));
        let right = node
            .right
            .map_or(0, |child| self.query_node(child, l, r, highlights));
        left + right
    }

    /// Sets the element at `idx` to `value` and refreshes its ancestors.
    ///
    /// An `idx` beyond the array tags the root `Outside` and changes nothing;
    /// the output reports whether a leaf was written.
    #[instrument(level = "debug", skip(self))]
    pub fn update(&mut self, idx: usize, value: i64) -> Traced<bool> {
        let mut highlights = Highlights::new();
        let applied = self.update_node(self.root, idx, value, &mut highlights);
        debug!(idx, value, applied, "point update");
        Traced::new(applied, highlights)
    }

    /// Like [`RangeTree::update`] but rejects an index outside the array.
    pub fn try_update(&mut self, idx: usize, value: i64) -> DomainResult<Traced<bool>> {
        if idx >= self.len {
            return Err(DomainError::IndexOutOfBounds {
                index: idx,
                len: self.len,
            });
        }
        Ok(self.update(idx, value))
    }

    fn update_node(
        &mut self,
        id: Index,
        idx: usize,
        value: i64,
        highlights: &mut Highlights,
    ) -> bool {
        let node = self.arena[id];
        if !node.contains(idx) {
            highlights.mark(id, HighlightTag::Outside);
            return false;
        }
        if node.is_leaf() {
            highlights.mark(id, HighlightTag::Contained);
            self.arena[id].value = Sum::from(value);
            return true;
        }
        highlights.mark(id, HighlightTag::Partial);
        let applied = match (node.left, node.right) {
            (Some(left), _) if idx <= self.arena[left].hi => {
                self.update_node(left, idx, value, highlights)
            }
            (_, Some(right)) => self.update_node(right, idx, value, highlights),
            _ => false,
        };
        self.recalc(id);
        applied
    }

    /// Adds `delta` to every element in `[min(l, r), max(l, r)] ∩ [0, len - 1]`.
    ///
    /// Every overlapping internal node is descended into both children, down
    /// to the affected leaves. No deferred increments are kept. The output is
    /// the number of leaves changed.
    ///
    /// Fails with `DomainError::Overflow` and leaves the tree untouched when an
    /// element would leave the `i64` range.
    #[instrument(level = "debug", skip(self))]
    pub fn update_range(
        &mut self,
        l: usize,
        r: usize,
        delta: i64,
    ) -> DomainResult<Traced<usize>> {
        let (l, r) = ordered(l, r);
        if let Some((index, value)) = self.first_overflow(self.root, l, r, delta) {
            return Err(DomainError::Overflow {
                index,
                value,
                delta,
            });
        }
        let mut highlights = Highlights::new();
        let touched = self.update_range_node(self.root, l, r, delta, &mut highlights);
        debug!(l, r, delta, touched, "range update");
        Ok(Traced::new(touched, highlights))
    }

    /// First leaf in `[l, r]` whose value plus `delta` does not fit in `i64`.
    fn first_overflow(
        &self,
        id: Index,
        l: usize,
        r: usize,
        delta: i64,
    ) -> Option<(usize, i64)> {
        let node = &self.arena[id];
        if !node.overlaps(l, r) {
            return None;
        }
        if node.is_leaf() {
            let value = leaf_value(node);
            return value.checked_add(delta).is_none().then_some((node.lo, value));
        }
        self.children(id)
            .find_map(|child| self.first_overflow(child, l, r, delta))
    }

    fn update_range_node(
        &mut self,
        id: Index,
        l: usize,
        r: usize,
        delta: i64,
        highlights: &mut Highlights,
    ) -> usize {
        let node = self.arena[id];
        if !node.overlaps(l, r) {
            highlights.mark(id, HighlightTag::Outside);
            return 0;
        }
        if node.is_leaf() {
            highlights.mark(id, HighlightTag::Contained);
            self.arena[id].value += Sum::from(delta);
            return 1;
        }
        highlights.mark(id, HighlightTag::Partial);
        let mut touched = 0;
        if let Some(left) = node.left {
            touched += self.update_range_node(left, l, r, delta, highlights);
        }
        if let Some(right) = node.right {
            touched += self.update_range_node(right, l, r, delta, highlights);
        }
        self.recalc(id);
        touched
    }

    fn recalc(&mut self, id: Index) {
        let node = self.arena[id];
        if node.is_leaf() {
            return;
        }
        let left = node.left.map_or(0, |child| self.arena[child].value);
        let right = node.right.map_or(0, |child| self.arena[child].value);
        self.arena[id].value = left + right;
    }

    /// Current leaf values, left to right: the live state of the array.
    #[instrument(level = "trace", skip(self))]
    pub fn leaves(&self) -> Vec<i64> {
        self.iter()
            .filter(|(_, node)| node.is_leaf())
            .map(|(_, node)| leaf_value(node))
            .collect()
    }

    pub fn children(&self, idx: Index) -> impl Iterator<Item = Index> + '_ {
        self.arena
            .get(idx)
            .into_iter()
            .flat_map(|node| node.left.into_iter().chain(node.right))
    }

    #[instrument(level = "trace", skip(self))]
    pub fn depth(&self) -> usize {
        self.calculate_depth(self.root)
    }

    fn calculate_depth(&self, node_idx: Index) -> usize {
        1 + self
            .children(node_idx)
            .map(|child| self.calculate_depth(child))
            .max()
            .unwrap_or(0)
    }

    /// Pre-order traversal, left child before right.
    pub fn iter(&self) -> TreeIterator<'_> {
        TreeIterator::new(self)
    }

    /// Checks that every internal node holds the sum of its children.
    pub fn is_consistent(&self) -> bool {
        self.iter().all(|(_, node)| {
            node.is_leaf()
                || node.left.map_or(0, |c| self.arena[c].value)
                    + node.right.map_or(0, |c| self.arena[c].value)
                    == node.value
        })
    }
}

pub struct TreeIterator<'a> {
    tree: &'a RangeTree,
    stack: Vec<Index>,
}

impl<'a> TreeIterator<'a> {
    fn new(tree: &'a RangeTree) -> Self {
        Self {
            tree,
            stack: vec![tree.root],
        }
    }
}

impl<'a> Iterator for TreeIterator<'a> {
    type Item = (Index, &'a SegmentNode);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(current_idx) = self.stack.pop() {
            if let Some(node) = self.tree.get_node(current_idx) {
                // Right first so the left subtree is visited first
                self.stack.extend(node.right);
                self.stack.extend(node.left);
                return Some((current_idx, node));
            }
        }
        None
    }
}
