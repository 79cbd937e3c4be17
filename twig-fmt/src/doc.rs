//! Document intermediate representation.
//!
//! A [`Doc`] describes layout intent: literal text, indentation, and the
//! places where a line may break. Nothing is measured while a `Doc` is
//! built; the renderer decides every [`Doc::Group`] when it prints.

use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Doc {
    /// Literal, unbreakable text. Never contains a newline.
    Text(String),
    Concat(Vec<Doc>),
    /// Raise the indentation of the contents by one unit.
    Indent(Box<Doc>),
    /// A space when flat, a newline when broken.
    Line,
    /// Nothing when flat, a newline when broken.
    SoftLine,
    /// Always a newline. Forces every enclosing group to break.
    HardLine,
    /// Rendered entirely flat or entirely broken.
    Group { contents: Box<Doc>, should_break: bool },
    /// Alternating content and separator items, packed greedily.
    Fill(Vec<Doc>),
    /// Picks one side by the mode of the nearest enclosing group.
    IfBreak { broken: Box<Doc>, flat: Box<Doc> },
}

// ── Constructors ────────────────────────────────────────────────────────

pub fn text(s: impl Into<String>) -> Doc {
    Doc::Text(s.into())
}

pub fn nil() -> Doc {
    Doc::Concat(Vec::new())
}

pub fn concat(parts: Vec<Doc>) -> Doc {
    Doc::Concat(parts)
}

pub fn indent(doc: Doc) -> Doc {
    Doc::Indent(Box::new(doc))
}

pub fn line() -> Doc {
    Doc::Line
}

pub fn softline() -> Doc {
    Doc::SoftLine
}

pub fn hardline() -> Doc {
    Doc::HardLine
}

/// A group left to the fits check.
pub fn group(doc: Doc) -> Doc {
    Doc::Group {
        contents: Box::new(doc),
        should_break: false,
    }
}

/// A group whose mode is decided by the caller: `true` breaks it unconditionally.
pub fn group_with_break(doc: Doc, should_break: bool) -> Doc {
    Doc::Group {
        contents: Box::new(doc),
        should_break,
    }
}

pub fn fill(parts: Vec<Doc>) -> Doc {
    Doc::Fill(parts)
}

pub fn if_break(broken: Doc, flat: Doc) -> Doc {
    Doc::IfBreak {
        broken: Box::new(broken),
        flat: Box::new(flat),
    }
}

/// Interleave `separator` between `docs`.
pub fn join(separator: Doc, docs: Vec<Doc>) -> Doc {
    let mut parts = Vec::with_capacity(docs.len() * 2);
    for (i, doc) in docs.into_iter().enumerate() {
        if i > 0 {
            parts.push(separator.clone());
        }
        parts.push(doc);
    }
    Doc::Concat(parts)
}

impl Doc {
    /// True for docs that print nothing in any mode.
    pub fn is_empty(&self) -> bool {
        match self {
            Doc::Text(s) => s.is_empty(),
            Doc::Concat(parts) | Doc::Fill(parts) => parts.iter().all(Doc::is_empty),
            Doc::Indent(inner) => inner.is_empty(),
            Doc::Group { contents, .. } => contents.is_empty(),
            Doc::IfBreak { broken, flat } => broken.is_empty() && flat.is_empty(),
            Doc::Line | Doc::SoftLine | Doc::HardLine => false,
        }
    }

    /// Mark every group that contains a hard line, or a group that must
    /// break, as broken. Returns whether `self` forces a break on its parent.
    ///
    /// Runs once before rendering so the fits check never meets a hard line
    /// inside a group it is trying to flatten.
    pub fn propagate_breaks(&mut self) -> bool {
        match self {
            Doc::HardLine => true,
            Doc::Text(_) | Doc::Line | Doc::SoftLine => false,
            Doc::Indent(inner) => inner.propagate_breaks(),
            Doc::Concat(parts) | Doc::Fill(parts) => {
                // Every part is visited; no short-circuit.
                parts
                    .iter_mut()
                    .fold(false, |forced, part| part.propagate_breaks() | forced)
            }
            Doc::Group {
                contents,
                should_break,
            } => {
                let inner = contents.propagate_breaks();
                *should_break |= inner;
                *should_break
            }
            Doc::IfBreak { broken, flat } => {
                let b = broken.propagate_breaks();
                let f = flat.propagate_breaks();
                b | f
            }
        }
    }

    /// Whether rendering this doc necessarily emits a newline.
    pub fn has_forced_break(&self) -> bool {
        match self {
            Doc::HardLine => true,
            Doc::Text(_) | Doc::Line | Doc::SoftLine => false,
            Doc::Indent(inner) => inner.has_forced_break(),
            Doc::Concat(parts) | Doc::Fill(parts) => parts.iter().any(Doc::has_forced_break),
            Doc::Group {
                contents,
                should_break,
            } => *should_break || contents.has_forced_break(),
            Doc::IfBreak { broken, flat } => broken.has_forced_break() && flat.has_forced_break(),
        }
    }
}

impl fmt::Display for Doc {
    /// Builder notation, one call per node: `group([text("<p"), line])`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Doc::Text(s) => write!(f, "text({s:?})"),
            Doc::Concat(parts) => write_list(f, "", parts),
            Doc::Indent(inner) => write!(f, "indent({inner})"),
            Doc::Line => f.write_str("line"),
            Doc::SoftLine => f.write_str("softline"),
            Doc::HardLine => f.write_str("hardline"),
            Doc::Group {
                contents,
                should_break,
            } => {
                if *should_break {
                    write!(f, "group({contents}, break)")
                } else {
                    write!(f, "group({contents})")
                }
            }
            Doc::Fill(parts) => write_list(f, "fill", parts),
            Doc::IfBreak { broken, flat } => write!(f, "ifBreak({broken}, {flat})"),
        }
    }
}

fn write_list(f: &mut fmt::Formatter<'_>, name: &str, parts: &[Doc]) -> fmt::Result {
    write!(f, "{name}[")?;
    for (i, part) in parts.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{part}")?;
    }
    f.write_str("]")
}
