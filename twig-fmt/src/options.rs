use std::collections::BTreeSet;

use serde::Deserialize;

/// Element names separated by a blank line when two of them are adjacent.
pub const BLOCK_LEVEL_TAGS: &[&str] = &[
    "div", "p", "h1", "h2", "h3", "h4", "h5", "h6", "section", "article", "header", "footer",
    "main", "nav",
];

/// How text content is laid out.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextWrap {
    /// Keep the source line structure of text.
    #[default]
    Preserve,
    /// Re-pack words to the print width.
    Fill,
}

/// Formatting options.
///
/// Deserializes from the same camelCase keys a `twigfmt.json` file uses;
/// every key is optional.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormatOptions {
    #[serde(default = "default_print_width")]
    pub print_width: usize,

    /// Spaces per indentation level.
    #[serde(default = "default_tab_width")]
    pub tab_width: usize,

    /// Extra block-level tag names, on top of [`BLOCK_LEVEL_TAGS`].
    #[serde(default)]
    pub block_tags: BTreeSet<String>,

    #[serde(default)]
    pub text_wrap: TextWrap,

    /// Deepest tree accepted before formatting is refused.
    #[serde(default = "default_max_depth")]
    pub max_depth: usize,
}

fn default_print_width() -> usize {
    80
}
fn default_tab_width() -> usize {
    2
}
fn default_max_depth() -> usize {
    256
}

impl Default for FormatOptions {
    fn default() -> Self {
        Self {
            print_width: default_print_width(),
            tab_width: default_tab_width(),
            block_tags: BTreeSet::new(),
            text_wrap: TextWrap::default(),
            max_depth: default_max_depth(),
        }
    }
}

impl FormatOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn print_width(mut self, width: usize) -> Self {
        self.print_width = width;
        self
    }

    pub fn tab_width(mut self, width: usize) -> Self {
        self.tab_width = width;
        self
    }

    /// Register a custom tag as block-level.
    pub fn block_tag(mut self, name: impl Into<String>) -> Self {
        self.block_tags.insert(name.into());
        self
    }

    pub fn text_wrap(mut self, wrap: TextWrap) -> Self {
        self.text_wrap = wrap;
        self
    }

    pub fn max_depth(mut self, depth: usize) -> Self {
        self.max_depth = depth;
        self
    }

    pub fn is_block_level(&self, name: &str) -> bool {
        BLOCK_LEVEL_TAGS.contains(&name) || self.block_tags.contains(name)
    }
}
