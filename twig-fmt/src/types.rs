//! Syntax tree handed over by the template parser, and its JSON decoding.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// A node of the syntax tree handed over by the template parser.
///
/// The tree is read-only for the formatter: it is built once by the parser
/// and only ever borrowed while a document is derived from it.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    /// Transparent wrapper around the top-level template.
    Root { template: Box<Node> },
    /// Ordered sequence of block-level children.
    Template { children: Vec<Node> },
    /// `{% parent() %}` or `{% block name %}...{% endblock %}`.
    StatementDirective(StatementDirective),
    /// An HTML element, components included.
    Element(Element),
    /// Raw text between tags.
    Content(Content),
    /// `{# ... #}`.
    Comment(Comment),
    Doctype { value: String },
    NamedEntity { value: String },
    NumericEntity { value: String },
    /// A node kind the formatter has no rule for.
    Extension(ExtensionNode),
}

/// Statement tag, in either of its two source shapes.
///
/// The close tag is structural: it is implied by `tag` and never appears as
/// a separate sibling.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatementDirective {
    /// Name of a bare function call, `parent` in `{% parent() %}`.
    #[serde(default)]
    pub function: Option<String>,
    #[serde(default, alias = "tagName")]
    pub tag: Option<String>,
    #[serde(default)]
    pub variable: Option<String>,
    /// Filled in by [`Node::from_value`].
    #[serde(skip_deserializing)]
    pub children: Vec<Node>,
    #[serde(default)]
    pub blank_line_before: bool,
}

/// The two shapes a well-formed directive can take.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DirectiveShape<'a> {
    Call {
        name: &'a str,
    },
    Pair {
        tag: &'a str,
        variable: Option<&'a str>,
        children: &'a [Node],
    },
}

impl StatementDirective {
    /// Classify the directive, or explain why it is malformed.
    pub fn shape(&self) -> Result<DirectiveShape<'_>, String> {
        match (&self.function, &self.tag) {
            (Some(name), None) => {
                let name = name.trim();
                if name.is_empty() {
                    return Err("function call has an empty name".into());
                }
                if !self.children.is_empty() {
                    return Err(format!("function call '{name}' cannot have children"));
                }
                Ok(DirectiveShape::Call { name })
            }
            (None, Some(tag)) => {
                let tag = tag.trim();
                if tag.is_empty() {
                    return Err("statement tag has an empty name".into());
                }
                let variable = self
                    .variable
                    .as_deref()
                    .map(str::trim)
                    .filter(|v| !v.is_empty());
                Ok(DirectiveShape::Pair {
                    tag,
                    variable,
                    children: &self.children,
                })
            }
            (Some(_), Some(_)) => Err("directive has both a function and a tag".into()),
            (None, None) => Err("directive has neither a function nor a tag".into()),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Element {
    /// Tag name, case preserved (`Table` and `table` are different tags).
    pub name: String,
    /// Source order, duplicates included.
    #[serde(default)]
    pub attributes: Vec<Attribute>,
    #[serde(default)]
    pub void: bool,
    #[serde(skip_deserializing)]
    pub children: Vec<Node>,
    #[serde(default)]
    pub blank_line_before: bool,
    /// The source wrote the final `>` of the close tag on its own line,
    /// touching the content (`text</a\n>`).
    #[serde(default)]
    pub dangling_close: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Attribute {
    pub name: String,
    /// `None` for boolean attributes such as `disabled`.
    #[serde(default)]
    pub value: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Content {
    pub value: String,
    #[serde(default)]
    pub blank_line_before: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    /// Inner text with the delimiters removed.
    pub value: String,
    /// A line break separated the comment from its previous sibling.
    #[serde(default)]
    pub newline_before: bool,
    /// A line break separated the comment from its next sibling.
    #[serde(default)]
    pub newline_after: bool,
    #[serde(default)]
    pub blank_line_before: bool,
}

/// A node of a kind unknown to the formatter, with the child slots found
/// on it when it was read.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtensionNode {
    pub kind: String,
    pub slots: Vec<(String, Slot)>,
}

/// One named child field of an [`ExtensionNode`].
#[derive(Debug, Clone, PartialEq)]
pub enum Slot {
    One(Box<Node>),
    Many(Vec<Node>),
}

/// Enumerates the child-bearing fields of an extensible node.
pub trait ChildSlots {
    fn child_slots(&self) -> Vec<(&str, &Slot)>;
}

impl ChildSlots for ExtensionNode {
    fn child_slots(&self) -> Vec<(&str, &Slot)> {
        self.slots
            .iter()
            .map(|(name, slot)| (name.as_str(), slot))
            .collect()
    }
}

/// Fields that carry positions or raw source, never children.
pub const NON_TRAVERSABLE_FIELDS: &[&str] =
    &["type", "loc", "span", "position", "range", "start", "end", "raw"];

impl ExtensionNode {
    fn from_object(kind: String, value: Value) -> Result<Self, String> {
        let Value::Object(fields) = value else {
            return Err(format!("node of kind '{kind}' is not an object"));
        };

        let mut slots = Vec::new();
        for (name, field) in fields {
            if NON_TRAVERSABLE_FIELDS.contains(&name.as_str()) {
                continue;
            }
            match field {
                object @ Value::Object(_) if is_node_shaped(&object) => {
                    slots.push((name, Slot::One(Box::new(Node::from_value(object)?))));
                }
                Value::Array(items) if !items.is_empty() && items.iter().all(is_node_shaped) => {
                    let nodes = items
                        .into_iter()
                        .map(Node::from_value)
                        .collect::<Result<Vec<_>, _>>()?;
                    slots.push((name, Slot::Many(nodes)));
                }
                _ => {}
            }
        }

        Ok(Self { kind, slots })
    }
}

/// Detach and decode the `children` list of a node object.
fn take_children(kind: &str, value: &mut Value) -> Result<Vec<Node>, String> {
    match value.get_mut("children").map(Value::take) {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(Value::Array(items)) => items.into_iter().map(Node::from_value).collect(),
        Some(_) => Err(format!("malformed {kind} node: `children` is not a list")),
    }
}

pub(crate) fn is_node_shaped(value: &Value) -> bool {
    value.get("type").is_some_and(Value::is_string)
}

/// The node kinds with a dedicated formatting rule.
pub const KNOWN_KINDS: &[&str] = &[
    "Root",
    "Template",
    "StatementDirective",
    "Element",
    "Content",
    "Comment",
    "Doctype",
    "NamedEntity",
    "NumericEntity",
];

/// Leaf fields of the known kinds. Child lists are decoded separately so
/// the JSON value is walked once.
#[derive(Deserialize)]
#[serde(tag = "type")]
enum KnownNode {
    StatementDirective(StatementDirective),
    Element(Element),
    Content(Content),
    Comment(Comment),
    Doctype {
        #[serde(default)]
        value: String,
    },
    NamedEntity {
        value: String,
    },
    NumericEntity {
        value: String,
    },
}

impl From<KnownNode> for Node {
    fn from(node: KnownNode) -> Self {
        match node {
            KnownNode::StatementDirective(d) => Node::StatementDirective(d),
            KnownNode::Element(e) => Node::Element(e),
            KnownNode::Content(c) => Node::Content(c),
            KnownNode::Comment(c) => Node::Comment(c),
            KnownNode::Doctype { value } => Node::Doctype { value },
            KnownNode::NamedEntity { value } => Node::NamedEntity { value },
            KnownNode::NumericEntity { value } => Node::NumericEntity { value },
        }
    }
}

impl Node {
    /// Decode a node from its JSON interchange form.
    ///
    /// Unknown `type` values become [`Node::Extension`] instead of failing.
    pub fn from_value(mut value: Value) -> Result<Self, String> {
        let kind = value
            .get("type")
            .and_then(Value::as_str)
            .ok_or_else(|| "node is missing a string `type` field".to_string())?
            .to_owned();

        match kind.as_str() {
            "Root" => {
                let template = value
                    .get_mut("template")
                    .map(Value::take)
                    .filter(|template| !template.is_null())
                    .ok_or_else(|| "malformed Root node: missing field `template`".to_string())?;
                Ok(Node::Root {
                    template: Box::new(Node::from_value(template)?),
                })
            }
            "Template" => Ok(Node::Template {
                children: take_children(&kind, &mut value)?,
            }),
            _ if KNOWN_KINDS.contains(&kind.as_str()) => {
                let children = match kind.as_str() {
                    "StatementDirective" | "Element" => take_children(&kind, &mut value)?,
                    _ => Vec::new(),
                };
                let mut node = serde_json::from_value::<KnownNode>(value)
                    .map(Node::from)
                    .map_err(|e| format!("malformed {kind} node: {e}"))?;
                match &mut node {
                    Node::StatementDirective(d) => d.children = children,
                    Node::Element(e) => e.children = children,
                    _ => {}
                }
                Ok(node)
            }
            _ => ExtensionNode::from_object(kind, value).map(Node::Extension),
        }
    }

    /// The type discriminator, as it appears in the interchange format.
    pub fn kind(&self) -> &str {
        match self {
            Node::Root { .. } => "Root",
            Node::Template { .. } => "Template",
            Node::StatementDirective(_) => "StatementDirective",
            Node::Element(_) => "Element",
            Node::Content(_) => "Content",
            Node::Comment(_) => "Comment",
            Node::Doctype { .. } => "Doctype",
            Node::NamedEntity { .. } => "NamedEntity",
            Node::NumericEntity { .. } => "NumericEntity",
            Node::Extension(ext) => &ext.kind,
        }
    }

    /// Direct children in source order.
    pub fn children(&self) -> Vec<&Node> {
        match self {
            Node::Root { template } => vec![template.as_ref()],
            Node::Template { children } => children.iter().collect(),
            Node::StatementDirective(d) => d.children.iter().collect(),
            Node::Element(e) => e.children.iter().collect(),
            Node::Content(_)
            | Node::Comment(_)
            | Node::Doctype { .. }
            | Node::NamedEntity { .. }
            | Node::NumericEntity { .. } => Vec::new(),
            Node::Extension(ext) => ext
                .child_slots()
                .into_iter()
                .flat_map(|(_, slot)| match slot {
                    Slot::One(node) => vec![node.as_ref()],
                    Slot::Many(nodes) => nodes.iter().collect(),
                })
                .collect(),
        }
    }

    /// Whether the parser saw a blank line between this node and its
    /// previous sibling.
    pub fn blank_line_before(&self) -> bool {
        match self {
            Node::StatementDirective(d) => d.blank_line_before,
            Node::Element(e) => e.blank_line_before,
            Node::Content(c) => c.blank_line_before,
            Node::Comment(c) => c.blank_line_before,
            _ => false,
        }
    }

    // ── Constructors ────────────────────────────────────────────────────

    pub fn root(children: Vec<Node>) -> Self {
        Node::Root {
            template: Box::new(Node::Template { children }),
        }
    }

    pub fn text(value: impl Into<String>) -> Self {
        Node::Content(Content {
            value: value.into(),
            blank_line_before: false,
        })
    }

    pub fn comment(value: impl Into<String>) -> Self {
        Node::Comment(Comment {
            value: value.into(),
            newline_before: true,
            newline_after: true,
            blank_line_before: false,
        })
    }

    pub fn call(name: impl Into<String>) -> Self {
        Node::StatementDirective(StatementDirective {
            function: Some(name.into()),
            ..Default::default()
        })
    }

    pub fn statement(tag: impl Into<String>, variable: Option<&str>, children: Vec<Node>) -> Self {
        Node::StatementDirective(StatementDirective {
            tag: Some(tag.into()),
            variable: variable.map(str::to_string),
            children,
            ..Default::default()
        })
    }

    pub fn doctype() -> Self {
        Node::Doctype {
            value: "html".into(),
        }
    }
}

impl<'de> Deserialize<'de> for Node {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Node::from_value(value).map_err(serde::de::Error::custom)
    }
}

impl Element {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// A void element such as `input` or `br`.
    pub fn void(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            void: true,
            ..Default::default()
        }
    }

    pub fn attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.push(Attribute {
            name: name.into(),
            value: Some(value.into()),
        });
        self
    }

    /// Add a valueless attribute.
    pub fn flag(mut self, name: impl Into<String>) -> Self {
        self.attributes.push(Attribute {
            name: name.into(),
            value: None,
        });
        self
    }

    pub fn child(mut self, node: impl Into<Node>) -> Self {
        self.children.push(node.into());
        self
    }

    pub fn with_dangling_close(mut self) -> Self {
        self.dangling_close = true;
        self
    }

    pub fn with_blank_line_before(mut self) -> Self {
        self.blank_line_before = true;
        self
    }
}

impl From<Element> for Node {
    fn from(element: Element) -> Self {
        Node::Element(element)
    }
}

impl From<Comment> for Node {
    fn from(comment: Comment) -> Self {
        Node::Comment(comment)
    }
}

impl From<Content> for Node {
    fn from(content: Content) -> Self {
        Node::Content(content)
    }
}
