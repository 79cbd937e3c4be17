use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use twig_fmt::{Diagnostic, FormatOptions, Node, Severity};
use walkdir::WalkDir;

mod config;

#[derive(Parser)]
#[command(name = "twigfmt", version, about = "Formatter for Twig templates")]
struct Cli {
    /// Suppress non-essential output
    #[arg(long, global = true)]
    quiet: bool,

    /// Path to a twigfmt.json config file (default: ./twigfmt.json if present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Maximum line width
    #[arg(long, global = true)]
    print_width: Option<usize>,

    /// Spaces per indentation level
    #[arg(long, global = true)]
    tab_width: Option<usize>,

    /// Treat a custom tag as block-level (repeatable)
    #[arg(long = "block-tag", global = true)]
    block_tags: Vec<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Format template tree file(s)
    Format {
        /// Tree files (.json) or directories to search for them
        #[arg(required = true)]
        paths: Vec<PathBuf>,

        /// Write `<stem>.twig` next to each input instead of printing
        #[arg(long)]
        write: bool,
    },

    /// Print the layout document built for a tree
    Doc {
        /// Path to the tree file
        file: PathBuf,

        /// Builder notation without colors
        #[arg(long)]
        plain: bool,
    },

    /// List the node kinds in a tree
    Inspect {
        /// Path to the tree file
        file: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let cwd = std::env::current_dir().context("Failed to read the working directory")?;
    let overrides = config::Overrides {
        print_width: cli.print_width,
        tab_width: cli.tab_width,
        block_tags: cli.block_tags,
    };
    let options = config::load_options(cli.config.as_deref(), &cwd, overrides)?;

    match cli.command {
        Commands::Format { paths, write } => {
            handle_format(&paths, write, &options, cli.quiet)?;
        }
        Commands::Doc { file, plain } => {
            handle_doc(&file, plain, &options)?;
        }
        Commands::Inspect { file } => {
            handle_inspect(&file, &options, cli.quiet)?;
        }
    }

    Ok(())
}

fn read_tree(file: &Path, options: &FormatOptions) -> Result<Node> {
    let content = std::fs::read_to_string(file)
        .with_context(|| format!("Failed to read '{}'", file.display()))?;
    twig_fmt::parse_tree(&content, options)
        .with_context(|| format!("Failed to decode tree in '{}'", file.display()))
}

/// Expand directories into the tree files below them, in name order.
fn collect_inputs(paths: &[PathBuf]) -> Vec<PathBuf> {
    let mut files = Vec::new();
    for path in paths {
        if !path.is_dir() {
            files.push(path.clone());
            continue;
        }
        for entry in WalkDir::new(path).sort_by_file_name().into_iter().filter_map(|e| e.ok()) {
            let candidate = entry.path();
            let is_tree = candidate.extension().is_some_and(|ext| ext == "json")
                && candidate.file_name().is_some_and(|name| name != config::CONFIG_FILE);
            if entry.file_type().is_file() && is_tree {
                files.push(candidate.to_path_buf());
            }
        }
    }
    files
}

fn handle_format(paths: &[PathBuf], write: bool, options: &FormatOptions, quiet: bool) -> Result<()> {
    let mut has_errors = false;

    for file in collect_inputs(paths) {
        let formatted = match read_tree(&file, options)
            .and_then(|root| twig_fmt::format_with_report(&root, options).map_err(anyhow::Error::from))
        {
            Ok(formatted) => formatted,
            Err(e) => {
                has_errors = true;
                eprintln!("{}: {}: {:#}", file.display(), "error".red().bold(), e);
                continue;
            }
        };

        for diag in &formatted.diagnostics {
            if quiet && diag.severity != Severity::Error {
                continue;
            }
            eprintln!("{}", describe(&file, diag));
        }

        let mut output = formatted.output;
        if write {
            // Files end with a newline; the library output does not.
            if !output.is_empty() {
                output.push('\n');
            }
            let target = file.with_extension("twig");
            std::fs::write(&target, &output)
                .with_context(|| format!("Failed to write '{}'", target.display()))?;
            if !quiet {
                println!("{} -> {}", file.display(), target.display().to_string().green());
            }
        } else if !output.is_empty() {
            println!("{output}");
        }
    }

    if has_errors {
        std::process::exit(1);
    }

    Ok(())
}

fn describe(file: &Path, diag: &Diagnostic) -> String {
    let severity_str = match diag.severity {
        Severity::Error => format!("{}", "error".red().bold()),
        Severity::Warning => format!("{}", "warning".yellow().bold()),
        Severity::Info => format!("{}", "info".cyan().bold()),
    };
    let code_str = match &diag.code {
        Some(c) => format!("[{c}] "),
        None => String::new(),
    };
    format!("{}: {severity_str}: {code_str}{}", file.display(), diag.message)
}

fn handle_doc(file: &Path, plain: bool, options: &FormatOptions) -> Result<()> {
    let root = read_tree(file, options)?;
    let doc = twig_fmt::to_doc(&root, options)
        .with_context(|| format!("Failed to build the document for '{}'", file.display()))?;

    if plain {
        println!("{doc}");
    } else {
        println!("{}", doc.to_terminal());
    }
    Ok(())
}

fn handle_inspect(file: &Path, options: &FormatOptions, quiet: bool) -> Result<()> {
    let root = read_tree(file, options)?;

    let mut counts: BTreeMap<String, usize> = BTreeMap::new();
    twig_fmt::traverse::walk::<()>(&root, |node, _| {
        *counts.entry(node.kind().to_string()).or_default() += 1;
        Ok(())
    })
    .ok();
    let deepest = twig_fmt::traverse::max_depth(&root);

    let mut unknown = 0;
    for (kind, count) in &counts {
        if twig_fmt::KNOWN_KINDS.contains(&kind.as_str()) {
            println!("{kind:<20} {count}");
        } else {
            unknown += count;
            println!("{:<20} {count} {}", kind.yellow(), "(unrecognized)".dimmed());
        }
    }

    if !quiet {
        let total: usize = counts.values().sum();
        println!();
        println!("{} nodes, depth {}", total.to_string().bold(), deepest);
        if unknown > 0 {
            println!("{}", format!("{unknown} node(s) have no formatting rule").yellow());
        }
    }
    Ok(())
}
