//! segviz: an arena-based segment tree over a fixed integer array.
//!
//! Range sums, point updates and eager range updates. Every traversal reports
//! how it classified the nodes it visited, for step-through rendering.

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod util;

pub use domain::{DomainError, HighlightTag, Highlights, RangeTree, Traced};
