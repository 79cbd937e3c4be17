//! Structural checks run before a tree is formatted.
//!
//! Problems that make a node impossible to print are returned as a
//! [`FormatError`]. Everything else becomes a `Diagnostic` (non-fatal).

use crate::error::{Diagnostic, FormatError, Severity};
use crate::options::FormatOptions;
use crate::traverse::{self, Ancestry};
use crate::types::{Element, Node};

/// Validate a tree and return any diagnostics.
///
/// Fails on the first malformed node, or on nesting deeper than
/// `options.max_depth`. It never modifies the tree.
pub fn validate(root: &Node, options: &FormatOptions) -> Result<Vec<Diagnostic>, FormatError> {
    let mut diagnostics = Vec::new();

    traverse::walk(root, |node, ancestry| {
        if ancestry.depth > options.max_depth {
            return Err(FormatError::TooDeep {
                depth: ancestry.depth,
                limit: options.max_depth,
            });
        }
        validate_node(node, ancestry, &mut diagnostics)
    })?;

    Ok(diagnostics)
}

fn validate_node(
    node: &Node,
    ancestry: Ancestry<'_>,
    diagnostics: &mut Vec<Diagnostic>,
) -> Result<(), FormatError> {
    match node {
        Node::Element(element) => validate_element(element),
        Node::StatementDirective(directive) => directive
            .shape()
            .map(|_| ())
            .map_err(|message| FormatError::malformed(node.kind(), message)),
        Node::NamedEntity { value } | Node::NumericEntity { value } => {
            if value.is_empty() {
                return Err(FormatError::malformed(node.kind(), "entity has no value"));
            }
            Ok(())
        }
        Node::Extension(extension) => {
            diagnostics.push(Diagnostic {
                severity: Severity::Warning,
                message: format!(
                    "Unrecognized node kind '{}' (child {} of {}) is left out of the output",
                    extension.kind,
                    ancestry.index,
                    ancestry.parent.map_or("nothing", Node::kind),
                ),
                code: Some("F001".into()),
            });
            Ok(())
        }
        _ => Ok(()),
    }
}

fn validate_element(element: &Element) -> Result<(), FormatError> {
    if element.name.trim().is_empty() {
        return Err(FormatError::malformed("Element", "element has an empty name"));
    }
    if element.void && !element.children.is_empty() {
        return Err(FormatError::malformed(
            "Element",
            format!("void element <{}> cannot have children", element.name),
        ));
    }
    if let Some(position) = element.attributes.iter().position(|a| a.name.is_empty()) {
        return Err(FormatError::malformed(
            "Element",
            format!(
                "attribute {} of <{}> has an empty name",
                position + 1,
                element.name
            ),
        ));
    }
    Ok(())
}
