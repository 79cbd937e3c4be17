//! Layout renderer.
//!
//! Prints a [`Doc`] with an explicit work stack, so stack usage does not
//! grow with the nesting depth of the document. Each [`Doc::Group`] is
//! printed flat when its contents, plus whatever follows it up to the next
//! possible line break, fit in the remaining width.

use crate::doc::Doc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Flat,
    Break,
}

#[derive(Clone, Copy)]
enum Item<'a> {
    Doc(&'a Doc),
    /// The not-yet-printed tail of a fill, starting at a content item.
    Fill(&'a [Doc]),
}

/// A pending piece of work. `mode` is the mode of the innermost group
/// enclosing the item.
#[derive(Clone, Copy)]
struct Cmd<'a> {
    indent: usize,
    mode: Mode,
    item: Item<'a>,
}

impl<'a> Cmd<'a> {
    fn with(self, doc: &'a Doc) -> Self {
        Self {
            item: Item::Doc(doc),
            ..self
        }
    }
}

/// Render `doc` within `max_width` columns, indenting by `indent_unit`
/// spaces per level.
///
/// The width is a target, not a guarantee: text is never split, so an
/// unbreakable token wider than the budget overflows. No line of the
/// output carries trailing whitespace.
pub fn render(mut doc: Doc, max_width: usize, indent_unit: usize) -> String {
    doc.propagate_breaks();

    let mut printer = Printer {
        out: String::new(),
        pos: 0,
        max_width,
        indent_unit,
    };
    printer.print(&doc);
    let end = printer.out.trim_end().len();
    printer.out.truncate(end);
    printer.out
}

struct Printer {
    out: String,
    pos: usize,
    max_width: usize,
    indent_unit: usize,
}

impl Printer {
    fn print(&mut self, doc: &Doc) {
        let mut cmds = vec![Cmd {
            indent: 0,
            mode: Mode::Break,
            item: Item::Doc(doc),
        }];

        while let Some(cmd) = cmds.pop() {
            let doc = match cmd.item {
                Item::Fill(parts) => {
                    self.fill(cmd, parts, &mut cmds);
                    continue;
                }
                Item::Doc(doc) => doc,
            };

            match doc {
                Doc::Text(s) => {
                    self.out.push_str(s);
                    self.pos += width(s);
                }
                Doc::Concat(parts) => {
                    cmds.extend(parts.iter().rev().map(|part| cmd.with(part)));
                }
                Doc::Indent(inner) => cmds.push(Cmd {
                    indent: cmd.indent + 1,
                    ..cmd.with(inner)
                }),
                Doc::Line => match cmd.mode {
                    Mode::Flat => {
                        self.out.push(' ');
                        self.pos += 1;
                    }
                    Mode::Break => self.newline(cmd.indent),
                },
                Doc::SoftLine => {
                    if cmd.mode == Mode::Break {
                        self.newline(cmd.indent);
                    }
                }
                // Break propagation leaves no hard line inside a flat group.
                Doc::HardLine => self.newline(cmd.indent),
                Doc::Group {
                    contents,
                    should_break,
                } => {
                    let mode = if *should_break {
                        Mode::Break
                    } else if cmd.mode == Mode::Flat {
                        Mode::Flat
                    } else {
                        let flat = Cmd {
                            mode: Mode::Flat,
                            ..cmd.with(contents)
                        };
                        if fits(&[flat], &cmds, self.remaining(), false) {
                            Mode::Flat
                        } else {
                            Mode::Break
                        }
                    };
                    log::trace!(target: "twig_fmt::render", "group at column {}: {mode:?}", self.pos);
                    cmds.push(Cmd {
                        mode,
                        ..cmd.with(contents)
                    });
                }
                Doc::Fill(parts) => cmds.push(Cmd {
                    item: Item::Fill(parts),
                    ..cmd
                }),
                Doc::IfBreak { broken, flat } => {
                    let chosen = match cmd.mode {
                        Mode::Break => broken,
                        Mode::Flat => flat,
                    };
                    cmds.push(cmd.with(chosen));
                }
            }
        }
    }

    /// Print one content item of a fill and decide the separator after it:
    /// the separator stays flat only if the next content item still fits
    /// on the current line.
    fn fill<'a>(&mut self, cmd: Cmd<'a>, parts: &'a [Doc], cmds: &mut Vec<Cmd<'a>>) {
        let Some((content, rest)) = parts.split_first() else {
            return;
        };
        let content_cmd = Cmd {
            mode: if content.has_forced_break() {
                Mode::Break
            } else {
                Mode::Flat
            },
            ..cmd.with(content)
        };

        let Some((separator, rest)) = rest.split_first() else {
            cmds.push(content_cmd);
            return;
        };

        let flat = |doc: &'a Doc| Cmd {
            mode: Mode::Flat,
            ..cmd.with(doc)
        };
        let separator_mode = match rest.first() {
            Some(next) => {
                let line = [flat(content), flat(separator), flat(next)];
                if fits(&line, &[], self.remaining(), true) {
                    Mode::Flat
                } else {
                    Mode::Break
                }
            }
            None => Mode::Flat,
        };

        if !rest.is_empty() {
            cmds.push(Cmd {
                item: Item::Fill(rest),
                ..cmd
            });
        }
        cmds.push(Cmd {
            mode: separator_mode,
            ..cmd.with(separator)
        });
        cmds.push(content_cmd);
    }

    fn newline(&mut self, indent: usize) {
        trim_trailing_whitespace(&mut self.out);
        self.out.push('\n');
        let spaces = indent * self.indent_unit;
        self.out.extend(std::iter::repeat_n(' ', spaces));
        self.pos = spaces;
    }

    fn remaining(&self) -> isize {
        self.max_width as isize - self.pos as isize
    }
}

/// Simulate printing `next` (in order) followed by the pending `rest`
/// commands, until the first line break. Returns whether that stretch of
/// the line fits in `remaining` columns.
///
/// With `must_be_flat`, a group that is already marked broken counts as
/// not fitting.
fn fits(next: &[Cmd<'_>], rest: &[Cmd<'_>], mut remaining: isize, must_be_flat: bool) -> bool {
    let mut stack: Vec<(Mode, &Doc)> = Vec::new();
    let mut pending: Vec<Cmd<'_>> = next.iter().rev().copied().collect();
    let mut rest_idx = rest.len();

    loop {
        let (mode, doc) = match stack.pop() {
            Some(entry) => entry,
            None => {
                let cmd = match pending.pop() {
                    Some(cmd) => cmd,
                    None if rest_idx > 0 => {
                        rest_idx -= 1;
                        rest[rest_idx]
                    }
                    None => return true,
                };
                match cmd.item {
                    Item::Doc(doc) => (cmd.mode, doc),
                    Item::Fill(parts) => {
                        stack.extend(parts.iter().rev().map(|p| (cmd.mode, p)));
                        continue;
                    }
                }
            }
        };

        match doc {
            Doc::Text(s) => {
                remaining -= width(s) as isize;
                if remaining < 0 {
                    return false;
                }
            }
            Doc::Concat(parts) | Doc::Fill(parts) => {
                stack.extend(parts.iter().rev().map(|p| (mode, p)));
            }
            Doc::Indent(inner) => stack.push((mode, inner)),
            Doc::Group {
                contents,
                should_break,
            } => {
                if must_be_flat && *should_break {
                    return false;
                }
                let mode = if *should_break { Mode::Break } else { mode };
                stack.push((mode, contents));
            }
            Doc::IfBreak { broken, flat } => {
                let chosen = match mode {
                    Mode::Break => broken,
                    Mode::Flat => flat,
                };
                stack.push((mode, chosen));
            }
            Doc::Line => match mode {
                Mode::Break => return true,
                Mode::Flat => {
                    remaining -= 1;
                    if remaining < 0 {
                        return false;
                    }
                }
            },
            Doc::SoftLine => {
                if mode == Mode::Break {
                    return true;
                }
            }
            Doc::HardLine => return true,
        }
    }
}

fn width(s: &str) -> usize {
    s.chars().count()
}

fn trim_trailing_whitespace(out: &mut String) {
    let trimmed = out.trim_end_matches([' ', '\t']).len();
    out.truncate(trimmed);
}
