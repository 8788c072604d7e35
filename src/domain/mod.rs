//! Domain layer: the segment tree and its traversal output
//!
//! This layer is independent of external concerns (no I/O, no CLI, no config loading).

pub mod arena;
pub mod error;
pub mod highlight;
pub mod layout;

pub use arena::{RangeTree, SegmentNode, Sum, TreeIterator};
pub use error::{DomainError, DomainResult};
pub use highlight::{HighlightTag, Highlights, Traced};
pub use layout::{array_row, layout, LayoutParams, Position};
