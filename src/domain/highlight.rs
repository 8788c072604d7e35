//! Per-node highlight tags produced by traversals.
//!
//! Tags are not stored on the tree. Every traversal returns the tags of the
//! nodes it visited; a holder of the visual state overlays them onto whatever
//! it showed before.

use std::collections::HashMap;
use std::fmt;

use generational_arena::Index;

/// Classification of a node relative to the most recent operation's range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum HighlightTag {
    #[default]
    Default,
    /// Node interval lies fully inside the range (or is the updated leaf)
    Contained,
    /// Node interval does not touch the range
    Outside,
    /// Node interval overlaps the range and the traversal descended
    Partial,
}

impl fmt::Display for HighlightTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            HighlightTag::Default => "default",
            HighlightTag::Contained => "contained",
            HighlightTag::Outside => "outside",
            HighlightTag::Partial => "partial",
        };
        f.write_str(name)
    }
}

/// Mapping from node handle to tag. Nodes without an entry read as `Default`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Highlights {
    tags: HashMap<Index, HighlightTag>,
}

impl Highlights {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn mark(&mut self, node: Index, tag: HighlightTag) {
        self.tags.insert(node, tag);
    }

    pub fn tag(&self, node: Index) -> HighlightTag {
        self.tags.get(&node).copied().unwrap_or_default()
    }

    /// Whether the node was visited by the traversal(s) recorded here.
    pub fn visited(&self, node: Index) -> bool {
        self.tags.contains_key(&node)
    }

    /// Apply a later traversal: visited nodes take the new tag, the rest keep theirs.
    pub fn overlay(&mut self, later: Highlights) {
        self.tags.extend(later.tags);
    }

    /// Return every node to `Default`.
    pub fn clear(&mut self) {
        self.tags.clear();
    }

    pub fn count(&self, tag: HighlightTag) -> usize {
        self.tags.values().filter(|&&t| t == tag).count()
    }

    pub fn len(&self) -> usize {
        self.tags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Index, HighlightTag)> + '_ {
        self.tags.iter().map(|(&idx, &tag)| (idx, tag))
    }
}

/// Result of a traversal together with the tags it assigned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Traced<T> {
    pub output: T,
    pub highlights: Highlights,
}

impl<T> Traced<T> {
    pub fn new(output: T, highlights: Highlights) -> Self {
        Self { output, highlights }
    }

    pub fn into_parts(self) -> (T, Highlights) {
        (self.output, self.highlights)
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Traced<U> {
        Traced {
            output: f(self.output),
            highlights: self.highlights,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use generational_arena::Arena;

    fn three_ids() -> (Index, Index, Index) {
        let mut arena = Arena::new();
        (arena.insert(()), arena.insert(()), arena.insert(()))
    }

    #[test]
    fn given_unmarked_node_when_reading_tag_then_default() {
        let (a, _, _) = three_ids();
        let highlights = Highlights::new();
        assert_eq!(highlights.tag(a), HighlightTag::Default);
        assert!(!highlights.visited(a));
    }

    #[test]
    fn given_overlay_when_applied_then_only_visited_nodes_change() {
        let (a, b, c) = three_ids();
        let mut current = Highlights::new();
        current.mark(a, HighlightTag::Partial);
        current.mark(b, HighlightTag::Outside);

        let mut later = Highlights::new();
        later.mark(b, HighlightTag::Contained);
        later.mark(c, HighlightTag::Outside);
        current.overlay(later);

        assert_eq!(current.tag(a), HighlightTag::Partial);
        assert_eq!(current.tag(b), HighlightTag::Contained);
        assert_eq!(current.tag(c), HighlightTag::Outside);
        assert_eq!(current.count(HighlightTag::Outside), 1);
    }

    #[test]
    fn given_marks_when_cleared_then_everything_default() {
        let (a, b, _) = three_ids();
        let mut highlights = Highlights::new();
        highlights.mark(a, HighlightTag::Contained);
        highlights.mark(b, HighlightTag::Partial);
        highlights.clear();
        assert!(highlights.is_empty());
        assert_eq!(highlights.tag(b), HighlightTag::Default);
    }

    #[test]
    fn test_tag_display() {
        assert_eq!(HighlightTag::Partial.to_string(), "partial");
        assert_eq!(HighlightTag::default().to_string(), "default");
    }
}
