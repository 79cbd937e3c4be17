use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use twig_fmt::FormatOptions;

/// Name of the config file looked up in the working directory.
pub const CONFIG_FILE: &str = "twigfmt.json";

/// Command-line settings that take precedence over the config file.
#[derive(Debug, Default)]
pub struct Overrides {
    pub print_width: Option<usize>,
    pub tab_width: Option<usize>,
    pub block_tags: Vec<String>,
}

/// Load formatting options.
///
/// An explicit `--config` path must exist. Without one, `twigfmt.json` in
/// `cwd` is used if present, else the defaults. Overrides are applied last.
pub fn load_options(explicit: Option<&Path>, cwd: &Path, overrides: Overrides) -> Result<FormatOptions> {
    let path: Option<PathBuf> = match explicit {
        Some(path) => Some(path.to_path_buf()),
        None => Some(cwd.join(CONFIG_FILE)).filter(|p| p.exists()),
    };

    let mut options = match path {
        Some(path) => {
            let raw = std::fs::read_to_string(&path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            serde_json::from_str::<FormatOptions>(&raw)
                .with_context(|| format!("Failed to parse {}", path.display()))?
        }
        None => FormatOptions::default(),
    };

    if let Some(width) = overrides.print_width {
        options.print_width = width;
    }
    if let Some(width) = overrides.tab_width {
        options.tab_width = width;
    }
    for tag in overrides.block_tags {
        options = options.block_tag(tag);
    }
    Ok(options)
}
