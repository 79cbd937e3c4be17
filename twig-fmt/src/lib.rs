//! `twig-fmt` — pretty-printer for Twig templates.
//!
//! Takes the syntax tree a Twig/HTML parser produces and prints it back as
//! canonically formatted template text. Formatting goes through an
//! intermediate document ([`Doc`]) that a width-aware renderer lays out.
//!
//! # Quick start
//!
//! ```
//! use twig_fmt::{Element, FormatOptions, Node};
//!
//! let tree = Node::root(vec![
//!     Element::new("p").attr("title", "Title").child(Node::text("String")).into(),
//! ]);
//! let out = twig_fmt::format(&tree, &FormatOptions::default()).unwrap();
//! assert_eq!(out, "<p title=\"Title\">String</p>");
//! ```

pub mod attrs;
pub mod decode;
pub mod doc;
pub mod error;
pub mod options;
pub mod print;
pub mod render;
#[cfg(feature = "terminal")]
pub mod render_term;
pub mod traverse;
pub mod types;
pub mod validate;
pub mod whitespace;

pub use decode::parse_tree;
pub use doc::Doc;
pub use error::*;
pub use options::{FormatOptions, TextWrap};
pub use types::*;

/// Result of a format pass: the formatted text plus any diagnostics.
#[derive(Debug, Clone)]
pub struct Formatted {
    pub output: String,
    pub diagnostics: Vec<Diagnostic>,
}

/// Format a tree and return the template text.
///
/// The output has no trailing newline; an empty template formats to the
/// empty string.
pub fn format(root: &Node, options: &FormatOptions) -> Result<String, FormatError> {
    format_with_report(root, options).map(|formatted| formatted.output)
}

/// Like [`format`], but also returns the non-fatal diagnostics.
pub fn format_with_report(root: &Node, options: &FormatOptions) -> Result<Formatted, FormatError> {
    let diagnostics = validate::validate(root, options)?;
    let doc = print::print_document(root, options)?;
    log::debug!(target: "twig_fmt::print", "document built, rendering at width {}", options.print_width);

    let output = render::render(doc, options.print_width, options.tab_width);
    Ok(Formatted {
        output,
        diagnostics,
    })
}

/// Parse a JSON tree and format it.
pub fn format_json(json: &str, options: &FormatOptions) -> Result<Formatted, FormatError> {
    let root = decode::parse_tree(json, options)?;
    format_with_report(&root, options)
}

/// Validate a tree and build its document without rendering it.
pub fn to_doc(root: &Node, options: &FormatOptions) -> Result<Doc, FormatError> {
    validate::validate(root, options)?;
    print::print_document(root, options)
}

impl Doc {
    /// Render this document's structure as ANSI-colored terminal text.
    #[cfg(feature = "terminal")]
    pub fn to_terminal(&self) -> String {
        render_term::to_terminal(self)
    }
}

impl Node {
    /// Validate this tree and return any diagnostics.
    pub fn validate(&self, options: &FormatOptions) -> Result<Vec<Diagnostic>, FormatError> {
        validate::validate(self, options)
    }
}
