//! Node-to-document translation.
//!
//! One rule per node kind. Children are translated first and composed with
//! the attribute policy ([`crate::attrs`]) and the sibling separation rules
//! ([`crate::whitespace`]).

use crate::attrs;
use crate::doc::{
    concat, fill, group, group_with_break, hardline, indent, join, line, nil, softline, text, Doc,
};
use crate::error::FormatError;
use crate::options::{FormatOptions, TextWrap};
use crate::traverse::Ancestry;
use crate::types::{Comment, DirectiveShape, Element, Node, StatementDirective};
use crate::whitespace::{self, Separation};

/// Text up to this many characters stays on the line of its element.
pub const MAX_INLINE_TEXT_LEN: usize = 30;

/// Translate a whole tree.
pub fn print_document(root: &Node, options: &FormatOptions) -> Result<Doc, FormatError> {
    print_node(root, Ancestry::root(), options)
}

/// Translate one node. `ancestry` says where the node sits.
pub fn print_node<'a>(
    node: &'a Node,
    ancestry: Ancestry<'a>,
    options: &FormatOptions,
) -> Result<Doc, FormatError> {
    match node {
        Node::Root { template } => print_node(template, ancestry.child(node, 0, 1), options),
        Node::Template { children } => print_siblings(node, children, ancestry, options),
        Node::StatementDirective(directive) => print_directive(node, directive, ancestry, options),
        Node::Element(element) => print_element(node, element, ancestry, options),
        Node::Content(content) => Ok(print_text(&content.value, options)),
        Node::Comment(comment) => Ok(print_comment(comment)),
        Node::Doctype { .. } => Ok(text("<!doctype html>")),
        Node::NamedEntity { value } | Node::NumericEntity { value } => Ok(text(value.as_str())),
        Node::Extension(extension) => {
            log::warn!(
                target: "twig_fmt::print",
                "no formatting rule for node kind '{}' (child {} of {}), rendering it empty",
                extension.kind,
                ancestry.index,
                ancestry.parent.map_or("nothing", Node::kind),
            );
            Ok(nil())
        }
    }
}

/// A stretch of siblings that renders as one unit.
enum Segment<'a> {
    /// Adjacent text and entity nodes, read as one piece of text.
    Text(Vec<&'a Node>),
    Node(usize, &'a Node),
}

impl<'a> Segment<'a> {
    fn first(&self) -> &'a Node {
        match self {
            Segment::Text(nodes) => nodes[0],
            Segment::Node(_, node) => *node,
        }
    }

    fn last(&self) -> &'a Node {
        match self {
            Segment::Text(nodes) => nodes[nodes.len() - 1],
            Segment::Node(_, node) => *node,
        }
    }
}

fn segments(children: &[Node]) -> Vec<Segment<'_>> {
    let mut segments: Vec<Segment<'_>> = Vec::new();
    for (index, child) in children.iter().enumerate() {
        if whitespace::is_inline_text(child) {
            if let Some(Segment::Text(run)) = segments.last_mut() {
                run.push(child);
                continue;
            }
            segments.push(Segment::Text(vec![child]));
        } else {
            segments.push(Segment::Node(index, child));
        }
    }
    segments.retain(|segment| match segment {
        Segment::Text(run) => !run.iter().all(|node| whitespace::is_layout_only(node)),
        Segment::Node(..) => true,
    });
    segments
}

/// The raw text of a run of text and entity nodes.
fn run_text(run: &[&Node]) -> String {
    let mut raw = String::new();
    for node in run {
        match node {
            Node::Content(content) => raw.push_str(&content.value),
            Node::NamedEntity { value } | Node::NumericEntity { value } => raw.push_str(value),
            _ => {}
        }
    }
    raw
}

/// Translate a list of siblings and join them per the separation rules.
fn print_siblings<'a>(
    parent: &'a Node,
    children: &'a [Node],
    ancestry: Ancestry<'a>,
    options: &FormatOptions,
) -> Result<Doc, FormatError> {
    let count = children.len();
    let mut parts = Vec::new();
    let mut previous: Option<&Node> = None;

    for segment in segments(children) {
        let doc = match &segment {
            Segment::Text(run) => print_text(&run_text(run), options),
            Segment::Node(index, child) => {
                print_node(child, ancestry.child(parent, *index, count), options)?
            }
        };
        if doc.is_empty() {
            continue;
        }

        if let Some(prev) = previous {
            match whitespace::separation(prev, segment.first(), options) {
                Separation::Glued => {}
                Separation::Line => parts.push(hardline()),
                Separation::BlankLine => {
                    parts.push(hardline());
                    parts.push(hardline());
                }
            }
        }
        parts.push(doc);
        previous = Some(segment.last());
    }

    Ok(concat(parts))
}

fn print_text(raw: &str, options: &FormatOptions) -> Doc {
    let lines = whitespace::text_lines(raw);
    match options.text_wrap {
        TextWrap::Preserve => join(hardline(), lines.into_iter().map(text).collect()),
        TextWrap::Fill => {
            let paragraphs: Vec<Doc> = lines
                .split(|row| row.is_empty())
                .filter(|paragraph| !paragraph.is_empty())
                .map(|paragraph| {
                    let words = paragraph
                        .iter()
                        .flat_map(|row| row.split_whitespace())
                        .map(text)
                        .collect();
                    fill(join_parts(line(), words))
                })
                .collect();
            join(concat(vec![hardline(), hardline()]), paragraphs)
        }
    }
}

/// Like [`join`], but returns the flat item list a fill expects.
fn join_parts(separator: Doc, docs: Vec<Doc>) -> Vec<Doc> {
    match join(separator, docs) {
        Doc::Concat(parts) => parts,
        other => vec![other],
    }
}

fn print_comment(comment: &Comment) -> Doc {
    let lines = whitespace::text_lines(&comment.value);
    match lines.as_slice() {
        [] => text("{#  #}"),
        [only] => text(format!("{{# {only} #}}")),
        _ => concat(vec![
            text("{# "),
            join(hardline(), lines.into_iter().map(text).collect()),
            text(" #}"),
        ]),
    }
}

fn print_directive<'a>(
    node: &'a Node,
    directive: &'a StatementDirective,
    ancestry: Ancestry<'a>,
    options: &FormatOptions,
) -> Result<Doc, FormatError> {
    let shape = directive
        .shape()
        .map_err(|message| FormatError::malformed(node.kind(), message))?;

    match shape {
        DirectiveShape::Call { name } => Ok(text(format!("{{% {name}() %}}"))),
        DirectiveShape::Pair {
            tag,
            variable,
            children,
        } => {
            let open = match variable {
                Some(variable) => format!("{{% {tag} {} %}}", whitespace::collapse(variable)),
                None => format!("{{% {tag} %}}"),
            };
            let close = format!("{{% end{tag} %}}");

            let body = print_siblings(node, children, ancestry, options)?;
            if body.is_empty() {
                return Ok(concat(vec![text(open), text(close)]));
            }
            Ok(concat(vec![
                text(open),
                indent(concat(vec![hardline(), body])),
                hardline(),
                text(close),
            ]))
        }
    }
}

fn print_element<'a>(
    node: &'a Node,
    element: &'a Element,
    ancestry: Ancestry<'a>,
    options: &FormatOptions,
) -> Result<Doc, FormatError> {
    let name = element.name.as_str();
    let layout = attrs::layout(&element.attributes);
    log::debug!(target: "twig_fmt::print", "<{name}> attributes: {layout:?}");

    let forced = layout.is_broken();
    let has_attributes = !element.attributes.is_empty();
    let attributes = || indent(attrs::attributes_doc(&element.attributes));

    if element.void {
        if !has_attributes {
            return Ok(text(format!("<{name} />")));
        }
        return Ok(group_with_break(
            concat(vec![
                text(format!("<{name}")),
                attributes(),
                line(),
                text("/>"),
            ]),
            forced,
        ));
    }

    let children = &element.children;
    let inline = inline_text(children).filter(|c| c.chars().count() <= MAX_INLINE_TEXT_LEN);

    if element.dangling_close {
        if let Some(content) = &inline {
            // <a href="..."
            //   >content</a
            // >
            return Ok(group_with_break(
                concat(vec![
                    text(format!("<{name}")),
                    indent(concat(vec![
                        attrs::attributes_doc(&element.attributes),
                        softline(),
                        text(">"),
                        text(content.as_str()),
                        text(format!("</{name}")),
                    ])),
                    softline(),
                    text(">"),
                ]),
                forced,
            ));
        }
    }

    let open = if has_attributes {
        group_with_break(
            concat(vec![
                text(format!("<{name}")),
                attributes(),
                softline(),
                text(">"),
            ]),
            forced,
        )
    } else {
        text(format!("<{name}>"))
    };
    let close = text(format!("</{name}>"));

    if let Some(content) = inline {
        return Ok(group(concat(vec![
            open,
            indent(concat(vec![softline(), text(content)])),
            softline(),
            close,
        ])));
    }

    let body = print_siblings(node, children, ancestry, options)?;
    if body.is_empty() {
        if !has_attributes {
            return Ok(text(format!("<{name}></{name}>")));
        }
        return Ok(group_with_break(
            concat(vec![
                text(format!("<{name}")),
                attributes(),
                softline(),
                text(format!("></{name}>")),
            ]),
            forced,
        ));
    }

    Ok(concat(vec![
        open,
        indent(concat(vec![hardline(), body])),
        hardline(),
        close,
    ]))
}

/// The collapsed text of `children` when they are nothing but text and
/// entities.
fn inline_text(children: &[Node]) -> Option<String> {
    if !children.iter().all(whitespace::is_inline_text) {
        return None;
    }
    let refs: Vec<&Node> = children.iter().collect();
    let collapsed = whitespace::collapse(&run_text(&refs));
    (!collapsed.is_empty()).then_some(collapsed)
}
