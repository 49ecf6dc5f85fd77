//! `mdsect` — CLI front-end for the mdsect library.
//!
//! Thin orchestration only: argument parsing, logging setup, and JSON
//! output. All parsing semantics live in the library.

use anyhow::Context;
use clap::Parser;
use mdsect::{parse_file, ParseConfig};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    name = "mdsect",
    version,
    about = "Extract a section tree with figures, tables, and equations from a Markdown document",
    long_about = "Parses a Markdown file (optionally with the content_list.json emitted by a \
PDF conversion pipeline) into a hierarchical section tree, attaches every figure, table, and \
equation to the section that owns it, and prints the result as JSON."
)]
struct Args {
    /// Markdown file to parse
    #[arg(value_name = "FILE")]
    input: PathBuf,

    /// Structured content list JSON (auto-discovered next to FILE when omitted)
    #[arg(long, value_name = "JSON")]
    content_list: Option<PathBuf>,

    /// Base directory for resolving relative image links
    /// (defaults to the Markdown file's directory)
    #[arg(long, value_name = "DIR")]
    base_path: Option<PathBuf>,

    /// Separator between ancestor titles in section paths
    #[arg(long, default_value = mdsect::DEFAULT_PATH_SEPARATOR, value_name = "SEP")]
    path_separator: String,

    /// Skip per-section word/char counts
    #[arg(long)]
    no_sizes: bool,

    /// Write JSON here instead of stdout
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Pretty-print the JSON output
    #[arg(long)]
    pretty: bool,

    /// Increase log verbosity (-v: debug, -vv: trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    let mut builder = ParseConfig::builder()
        .path_separator(&args.path_separator)
        .include_sizes(!args.no_sizes);
    if let Some(base) = &args.base_path {
        builder = builder.base_path(base);
    }
    let config = builder.build()?;

    let output = parse_file(&args.input, args.content_list.as_deref(), &config)?;

    eprintln!(
        "{} sections ({} top-level), {} figures, {} tables, {} formulas, {} words",
        output.metadata.total_sections,
        output.metadata.top_level_sections,
        output.metadata.total_figures,
        output.metadata.total_tables,
        output.metadata.total_formulas,
        output.metadata.total_words,
    );

    let json = if args.pretty {
        serde_json::to_string_pretty(&output)?
    } else {
        serde_json::to_string(&output)?
    };

    match &args.output {
        Some(path) => std::fs::write(path, json)
            .with_context(|| format!("failed to write output to '{}'", path.display()))?,
        None => println!("{json}"),
    }

    Ok(())
}

fn init_logging(verbosity: u8) {
    let default = match verbosity {
        0 => "warn",
        1 => "mdsect=debug,info",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
