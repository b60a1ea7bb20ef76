//! CLI module - Command-line interface definitions and handlers

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::cache::error::CacheError;
use crate::cache::generation::GenerationStore;
use crate::cache::uri::build_uri;
use crate::core::model::{ItemError, Meta, ResultItem, ResultSet};
use crate::core::paths::{normalize_path, DEFAULT_CACHE_ROOT};
use crate::core::render::{OutputFormat, RenderConfig, Renderer};
use crate::query::parse::parse_parameters;

/// minstatic - cache generations and cache-busting URIs for a static minify cache.
#[derive(Parser, Debug)]
#[command(name = "minstatic")]
#[command(
    author,
    version,
    about,
    long_about = r#"minstatic manages the single timestamp-named generation directory of a
static minification cache, builds URIs that embed it, and strictly validates
the query strings used to name cached files.

Each command prints a ResultSet in the selected format (default: jsonl).

Examples:
    minstatic --root static generation --create
    minstatic uri /min/static "?b=scripts&f=1.js,2.js"
    minstatic parse "f=a.js&z=.css"
    minstatic flush
"#
)]
pub struct Cli {
    /// Cache root holding the generation directory.
    #[arg(
        long,
        global = true,
        env = "MINSTATIC_CACHE_ROOT",
        default_value = DEFAULT_CACHE_ROOT,
        value_name = "DIR",
        long_help = "Cache root directory. Generation directories are created directly\n\
beneath it. The directory must already exist and be writable."
    )]
    pub root: PathBuf,

    /// Output format (jsonl/json/md/raw).
    #[arg(
        long,
        global = true,
        default_value = "jsonl",
        value_name = "FORMAT",
        long_help = "Select the output format for ResultSet.\n\n\
Supported values:\n\
- jsonl (default)\n\
- json\n\
- md (markdown)\n\
- raw (the bare generation id, URI or canonical query)"
    )]
    pub format: String,

    /// Pretty-print JSON/JSONL output with indentation.
    #[arg(long, global = true)]
    pub pretty: bool,

    /// Quiet mode (errors only on stderr).
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Verbose mode (debug logging on stderr).
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show the current generation.
    #[command(
        long_about = "Print the current generation id and its directory.\n\n\
Without --create, nothing is printed when no generation exists."
    )]
    Generation {
        /// Create a new generation when none exists.
        #[arg(long)]
        create: bool,
    },

    /// Build a cache-busting URI embedding the current generation.
    #[command(long_about = "Build \"{BASE}/{generation}/{QUERY}\". Trailing '/' are trimmed \
from BASE and a leading '?' from QUERY.\n\n\
Creates a generation directory when none exists.")]
    Uri {
        /// Static base path, e.g. /min/static
        #[arg(value_name = "BASE")]
        base: String,

        /// Raw query string, e.g. ?b=scripts&f=1.js
        #[arg(value_name = "QUERY", allow_hyphen_values = true)]
        query: String,
    },

    /// Delete the current generation and everything under it.
    Flush,

    /// Strictly parse a query string.
    #[command(
        long_about = "Validate QUERY against the b/f/g/z grammar and print the decoded\n\
parameters together with the canonical query string.\n\n\
Exits with a non-zero status when the query is rejected."
    )]
    Parse {
        /// Query string, e.g. b=min/foo&f=hello.js
        #[arg(value_name = "QUERY", allow_hyphen_values = true)]
        query: String,
    },
}

pub fn run(cli: Cli) -> Result<()> {
    let format: OutputFormat = cli.format.parse().unwrap_or_default();
    let renderer = Renderer::with_config(RenderConfig::with_pretty(format, cli.pretty));
    let store = GenerationStore::new(cli.root);

    match cli.command {
        Commands::Generation { create } => run_generation(&store, create, &renderer),
        Commands::Uri { base, query } => run_uri(&store, &base, &query, &renderer),
        Commands::Flush => run_flush(&store, &renderer),
        Commands::Parse { query } => run_parse(&query, &renderer),
    }
}

fn run_generation(store: &GenerationStore, create: bool, renderer: &Renderer) -> Result<()> {
    let found = if create {
        Some(
            store
                .ensure_generation_created()
                .map_err(|e| cache_failure(e, renderer, "Failed to create generation"))?,
        )
    } else {
        store
            .current_generation(false)
            .map_err(|e| cache_failure(e, renderer, "Failed to look up current generation"))?
            .map(|id| (id, false))
    };

    let result_set: ResultSet = found
        .into_iter()
        .map(|(id, created)| {
            let path = normalize_path(&store.path_of(&id));
            ResultItem::generation(id.as_str(), path).with_meta(Meta {
                created,
                removed: false,
            })
        })
        .collect();

    renderer.print(&result_set);
    Ok(())
}

fn run_uri(store: &GenerationStore, base: &str, query: &str, renderer: &Renderer) -> Result<()> {
    let built = build_uri(store, base, query)
        .map_err(|e| cache_failure(e, renderer, "Failed to build cache URI"))?;

    let mut result_set = ResultSet::new();
    result_set.push(ResultItem::uri(built.generation.as_str(), built.uri));
    renderer.print(&result_set);
    Ok(())
}

fn run_flush(store: &GenerationStore, renderer: &Renderer) -> Result<()> {
    let flushed = store
        .flush()
        .map_err(|e| cache_failure(e, renderer, "Failed to flush cache"))?;

    let result_set: ResultSet = flushed
        .into_iter()
        .map(|id| {
            let path = normalize_path(&store.path_of(&id));
            ResultItem::flush(id.as_str(), path)
        })
        .collect();

    renderer.print(&result_set);
    Ok(())
}

/// Print a cache failure as an error item and wrap it for the exit status
fn cache_failure(e: CacheError, renderer: &Renderer, context: &'static str) -> anyhow::Error {
    let mut result_set = ResultSet::new();
    result_set.push(ResultItem::error(ItemError::new(e.code(), e.to_string())));
    renderer.print(&result_set);
    anyhow::Error::new(e).context(context)
}

fn run_parse(query: &str, renderer: &Renderer) -> Result<()> {
    let mut result_set = ResultSet::new();

    match parse_parameters(query) {
        Ok(parsed) => {
            result_set.push(ResultItem::query(serde_json::json!({
                "params": parsed.to_json(),
                "canonical": parsed.to_query_string(),
            })));
            renderer.print(&result_set);
            Ok(())
        }
        Err(e) => {
            result_set.push(ResultItem::error(ItemError::new(e.code(), e.to_string())));
            renderer.print(&result_set);
            Err(e).context("Query rejected")
        }
    }
}
