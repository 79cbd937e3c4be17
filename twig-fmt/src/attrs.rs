//! Attribute layout policy and per-attribute rendering.
//!
//! Decides whether an element's attributes go one per line, and renders
//! each attribute with a normalized value. Attribute names, order and
//! duplicates are kept exactly as the parser delivered them.

use crate::doc::{self, Doc};
use crate::types::Attribute;

/// More attributes than this always break.
pub const MAX_INLINE_ATTRIBUTES: usize = 6;
/// A value longer than this always breaks.
pub const MAX_INLINE_VALUE_LEN: usize = 50;
/// A class list with more tokens than this breaks.
pub const MAX_INLINE_CLASS_TOKENS: usize = 2;
/// A class list longer than this breaks.
pub const MAX_INLINE_CLASS_LEN: usize = 40;

const COMPACT_ATTRIBUTES: usize = 4;
const COMPACT_ATTRIBUTE_LEN: usize = 20;

/// Why the attributes of an element were put on separate lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BreakReason {
    TooMany,
    LongValue,
    ClassList,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttributeLayout {
    /// No attributes at all.
    Empty,
    /// At most four short attributes.
    Compact,
    /// On the tag line, unless the tag does not fit the width.
    Inline,
    /// One attribute per line.
    Broken(BreakReason),
}

impl AttributeLayout {
    pub fn is_broken(self) -> bool {
        matches!(self, AttributeLayout::Broken(_))
    }
}

/// Apply the attribute-breaking rules, first match wins.
pub fn layout(attributes: &[Attribute]) -> AttributeLayout {
    if attributes.is_empty() {
        return AttributeLayout::Empty;
    }
    if attributes.len() > MAX_INLINE_ATTRIBUTES {
        return AttributeLayout::Broken(BreakReason::TooMany);
    }

    let values: Vec<Option<String>> = attributes
        .iter()
        .map(|a| a.value.as_deref().map(normalize_value))
        .collect();

    if values
        .iter()
        .flatten()
        .any(|v| v.chars().count() > MAX_INLINE_VALUE_LEN)
    {
        return AttributeLayout::Broken(BreakReason::LongValue);
    }

    let long_class = attributes.iter().zip(&values).any(|(attr, value)| {
        attr.name == "class" && value.as_deref().is_some_and(class_list_breaks)
    });
    if long_class {
        return AttributeLayout::Broken(BreakReason::ClassList);
    }

    let compact = attributes.len() <= COMPACT_ATTRIBUTES
        && attributes.iter().zip(&values).all(|(attr, value)| {
            let value_len = value.as_ref().map_or(0, |v| v.chars().count() + 3);
            attr.name.chars().count() + value_len <= COMPACT_ATTRIBUTE_LEN
        });
    if compact {
        AttributeLayout::Compact
    } else {
        AttributeLayout::Inline
    }
}

/// Whether a normalized class list is too busy to share the tag line.
pub fn class_list_breaks(classes: &str) -> bool {
    classes.split(' ').filter(|t| !t.is_empty()).count() > MAX_INLINE_CLASS_TOKENS
        || classes.chars().count() > MAX_INLINE_CLASS_LEN
}

/// Collapse every whitespace run, newlines included, to one space and trim.
pub fn normalize_value(value: &str) -> String {
    value.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Render one attribute as `name` or `name="value"`.
///
/// Values are double-quoted unless they contain `"` but no `'`. When both
/// quote characters occur, the rarer one wraps the value and is escaped
/// inside it.
pub fn render_attribute(attribute: &Attribute) -> String {
    let Some(value) = attribute.value.as_deref() else {
        return attribute.name.clone();
    };
    let value = normalize_value(value);

    let doubles = value.matches('"').count();
    let singles = value.matches('\'').count();
    let (quote, escaped) = if doubles > singles {
        ('\'', value.replace('\'', "&apos;"))
    } else {
        ('"', value.replace('"', "&quot;"))
    };

    format!("{}={quote}{escaped}{quote}", attribute.name)
}

/// The attribute part of an open tag: each attribute preceded by a line,
/// indented one level.
pub fn attributes_doc(attributes: &[Attribute]) -> Doc {
    if attributes.is_empty() {
        return doc::nil();
    }
    let mut parts = Vec::with_capacity(attributes.len() * 2);
    for attribute in attributes {
        parts.push(doc::line());
        parts.push(doc::text(render_attribute(attribute)));
    }
    doc::concat(parts)
}
