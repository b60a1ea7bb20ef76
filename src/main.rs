//! minstatic - cache-busting support for a static minification cache
//!
//! minstatic provides:
//! - A single timestamp-named generation directory under a cache root
//! - Cache-busting URIs embedding that generation
//! - Flushing the generation to invalidate client caches
//! - Strict parsing of the b/f/g/z query strings that name cached files

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod cache;
mod cli;
mod core;
mod query;

/// Initialize logging on stderr so stdout stays machine-readable.
///
/// `--verbose` forces debug, `--quiet` forces errors only, otherwise
/// `RUST_LOG` applies with a default of warn.
fn init_tracing(verbose: bool, quiet: bool) {
    let filter = if verbose {
        EnvFilter::new("minstatic=debug")
    } else if quiet {
        EnvFilter::new("minstatic=error")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("minstatic=warn"))
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(filter)
        .init();
}

fn main() -> Result<()> {
    let cli = cli::Cli::parse();
    init_tracing(cli.verbose, cli.quiet);

    tracing::debug!("minstatic starting with args: {:?}", cli);

    cli::run(cli)
}
