//! Sibling separation and text-line handling.
//!
//! Whitespace in the source is mostly discarded; what survives is what the
//! parser recorded as adjacency flags (comment on the same line as its
//! neighbour, blank line before a node, a dangling close tag).

use crate::options::FormatOptions;
use crate::types::Node;

/// What goes between two rendered siblings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Separation {
    /// Nothing; the siblings touch.
    Glued,
    /// One hard line break.
    Line,
    /// Two hard line breaks.
    BlankLine,
}

/// Decide how `next` is separated from `prev`.
pub fn separation(prev: &Node, next: &Node, options: &FormatOptions) -> Separation {
    if next.blank_line_before() {
        return Separation::BlankLine;
    }
    if is_inline_text(prev) && is_inline_text(next) {
        return Separation::Glued;
    }
    if let Node::Comment(comment) = prev {
        if !comment.newline_after {
            return Separation::Glued;
        }
    }
    if let Node::Comment(comment) = next {
        if !comment.newline_before {
            return Separation::Glued;
        }
    }
    if is_block_level(prev, options) && is_block_level(next, options) {
        return Separation::BlankLine;
    }
    Separation::Line
}

/// A non-void element whose name is in the block-level set.
pub fn is_block_level(node: &Node, options: &FormatOptions) -> bool {
    match node {
        Node::Element(element) => !element.void && options.is_block_level(&element.name),
        _ => false,
    }
}

/// Text and entities, which join into a single run of text.
pub fn is_inline_text(node: &Node) -> bool {
    matches!(
        node,
        Node::Content(_) | Node::NamedEntity { .. } | Node::NumericEntity { .. }
    )
}

/// Content that only carries whitespace from the source layout.
pub fn is_layout_only(node: &Node) -> bool {
    match node {
        Node::Content(content) => content.value.trim().is_empty(),
        _ => false,
    }
}

/// Split text into trimmed lines, dropping empty lines at either end.
/// Blank lines in the middle are kept (as empty strings), runs of them
/// collapsed to one.
pub fn text_lines(text: &str) -> Vec<&str> {
    let mut lines: Vec<&str> = Vec::new();
    for line in text.lines().map(str::trim) {
        if line.is_empty() && lines.last().is_none_or(|last| last.is_empty()) {
            continue;
        }
        lines.push(line);
    }
    while lines.last().is_some_and(|last| last.is_empty()) {
        lines.pop();
    }
    lines
}

/// Collapse whitespace runs to single spaces and trim.
pub fn collapse(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
