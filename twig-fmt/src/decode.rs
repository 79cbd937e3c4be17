//! Reading trees from their JSON interchange form.
//!
//! serde_json's recursion limit is lifted so nesting is bounded by
//! [`FormatOptions::max_depth`] alone. The JSON text is scanned for its
//! bracket depth before parsing, and the parsed value is measured in node
//! levels before it is converted.

use serde::Deserialize;
use serde_json::Value;

use crate::error::FormatError;
use crate::options::FormatOptions;
use crate::types::{NON_TRAVERSABLE_FIELDS, Node, is_node_shaped};

/// Bracket levels a single node level may take: the node object plus the
/// list holding it.
const NESTING_PER_LEVEL: usize = 2;

/// Allowance for position objects and other non-child nesting.
const NESTING_SLACK: usize = 64;

/// Parse a JSON tree, refusing trees nested deeper than `options.max_depth`.
pub fn parse_tree(json: &str, options: &FormatOptions) -> Result<Node, FormatError> {
    let limit = options.max_depth;

    let nesting = bracket_depth(json);
    if nesting > NESTING_PER_LEVEL * (limit + 1) + NESTING_SLACK {
        return Err(FormatError::TooDeep {
            depth: nesting / NESTING_PER_LEVEL,
            limit,
        });
    }

    let mut deserializer = serde_json::Deserializer::from_str(json);
    deserializer.disable_recursion_limit();
    let value = Value::deserialize(&mut deserializer)?;
    deserializer.end()?;

    let depth = node_depth(&value);
    if depth > limit {
        return Err(FormatError::TooDeep { depth, limit });
    }
    log::trace!(target: "twig_fmt::decode", "decoded tree of depth {depth}");

    Node::from_value(value).map_err(|message| FormatError::Json(serde::de::Error::custom(message)))
}

/// Deepest `{`/`[` nesting in a JSON text, ignoring brackets inside strings.
fn bracket_depth(json: &str) -> usize {
    let mut depth = 0usize;
    let mut deepest = 0;
    let mut in_string = false;
    let mut escaped = false;

    for byte in json.bytes() {
        if in_string {
            match byte {
                _ if escaped => escaped = false,
                b'\\' => escaped = true,
                b'"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match byte {
            b'"' => in_string = true,
            b'{' | b'[' => {
                depth += 1;
                deepest = deepest.max(depth);
            }
            b'}' | b']' => depth = depth.saturating_sub(1),
            _ => {}
        }
    }
    deepest
}

/// Deepest node level in a decoded value, counted the way
/// [`walk`](crate::traverse::walk) counts it: the root is level 0.
fn node_depth(root: &Value) -> usize {
    let mut deepest = 0;
    let mut stack = vec![(root, 0usize)];

    while let Some((value, depth)) = stack.pop() {
        match value {
            Value::Object(fields) if is_node_shaped(value) => {
                deepest = deepest.max(depth);
                for (name, field) in fields {
                    if !NON_TRAVERSABLE_FIELDS.contains(&name.as_str()) {
                        stack.push((field, depth + 1));
                    }
                }
            }
            Value::Object(fields) => stack.extend(fields.values().map(|field| (field, depth))),
            Value::Array(items) => stack.extend(items.iter().map(|item| (item, depth))),
            _ => {}
        }
    }
    deepest
}
