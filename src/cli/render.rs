//! Text rendering of a tree snapshot: termtree of nodes plus the array row.

use colored::{ColoredString, Colorize};
use generational_arena::Index;
use itertools::Itertools;
use termtree::Tree;

use crate::application::{NodeView, TreeView};
use crate::domain::HighlightTag;

fn paint(text: String, tag: HighlightTag, colorize: bool) -> ColoredString {
    if !colorize {
        return text.normal();
    }
    match tag {
        HighlightTag::Contained => text.green().bold(),
        HighlightTag::Outside => text.red(),
        HighlightTag::Partial => text.yellow().bold(),
        HighlightTag::Default => text.normal(),
    }
}

/// `[lo, hi] = value`, with the tag spelled out when colors are off.
pub fn node_label(node: &NodeView, colorize: bool) -> String {
    let text = format!("[{}, {}] = {}", node.lo, node.hi, node.value);
    if colorize || node.tag == HighlightTag::Default {
        paint(text, node.tag, colorize).to_string()
    } else {
        format!("{} ({})", text, node.tag)
    }
}

pub fn to_tree(view: &TreeView, colorize: bool) -> Tree<String> {
    fn build_tree(view: &TreeView, idx: Index, colorize: bool) -> Tree<String> {
        match view.node(idx) {
            Some(node) => {
                let leaves: Vec<_> = node
                    .left
                    .into_iter()
                    .chain(node.right)
                    .map(|child| build_tree(view, child, colorize))
                    .collect();
                Tree::new(node_label(node, colorize)).with_leaves(leaves)
            }
            None => Tree::new("?".to_string()),
        }
    }

    build_tree(view, view.root, colorize)
}

/// Two lines: the leaf values in boxes, and their indices underneath.
pub fn array_row(leaves: &[i64]) -> String {
    let width = leaves
        .iter()
        .enumerate()
        .map(|(i, v)| v.to_string().len().max(i.to_string().len()))
        .max()
        .unwrap_or(1);
    let values = leaves
        .iter()
        .map(|v| format!(" {:^width$} ", v, width = width))
        .join("|");
    let indices = (0..leaves.len())
        .map(|i| format!(" {:^width$} ", i, width = width))
        .join(" ");
    format!("|{}|\n {}", values, indices)
}

pub fn legend(colorize: bool) -> String {
    [
        HighlightTag::Contained,
        HighlightTag::Partial,
        HighlightTag::Outside,
        HighlightTag::Default,
    ]
    .iter()
    .map(|&tag| paint(tag.to_string(), tag, colorize).to_string())
    .join("  ")
}
