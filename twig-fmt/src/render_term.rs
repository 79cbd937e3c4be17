//! ANSI terminal rendering of a [`Doc`].
//!
//! Prints the document tree one node per line with indentation, using the
//! `colored` crate. Meant for inspecting how a template was laid out.

use colored::Colorize;

use crate::doc::Doc;

/// Render a `Doc` as an indented, colored tree.
pub fn to_terminal(doc: &Doc) -> String {
    let mut lines = Vec::new();
    render(doc, 0, &mut lines);
    lines.join("\n")
}

fn render(doc: &Doc, depth: usize, lines: &mut Vec<String>) {
    let pad = "  ".repeat(depth);
    match doc {
        Doc::Text(s) => lines.push(format!("{pad}{}", format!("{s:?}").green())),
        Doc::Line => lines.push(format!("{pad}{}", "line".cyan())),
        Doc::SoftLine => lines.push(format!("{pad}{}", "softline".cyan())),
        Doc::HardLine => lines.push(format!("{pad}{}", "hardline".cyan().bold())),
        Doc::Concat(parts) => {
            // Concats only group their parts; print them in place.
            for part in parts {
                render(part, depth, lines);
            }
        }
        Doc::Indent(inner) => {
            lines.push(format!("{pad}{}", "indent".yellow()));
            render(inner, depth + 1, lines);
        }
        Doc::Group {
            contents,
            should_break,
        } => {
            let label = if *should_break {
                format!("{} {}", "group".magenta().bold(), "(break)".red())
            } else {
                format!("{}", "group".magenta().bold())
            };
            lines.push(format!("{pad}{label}"));
            render(contents, depth + 1, lines);
        }
        Doc::Fill(parts) => {
            lines.push(format!("{pad}{}", "fill".blue().bold()));
            for part in parts {
                render(part, depth + 1, lines);
            }
        }
        Doc::IfBreak { broken, flat } => {
            lines.push(format!("{pad}{}", "ifBreak".yellow()));
            lines.push(format!("{pad}  {}", "broken:".dimmed()));
            render(broken, depth + 2, lines);
            lines.push(format!("{pad}  {}", "flat:".dimmed()));
            render(flat, depth + 2, lines);
        }
    }
}
