//! Command-line interface for the feature photo resolver.
//!
//! `featurephoto resolve <feature.json>` resolves one photo for a feature
//! document and prints the [`Resolution`](featurephoto_core::Resolution) as
//! JSON. Passing `--skeleton <skeleton.json>` resolves a skeleton
//! observation of the same feature first, the way a map client observes a
//! feature before its tags have loaded.
#![forbid(unsafe_code)]

use clap::{ArgAction, Parser, Subcommand};
use log::LevelFilter;

mod document;
mod error;
mod resolve;

pub use error::CliError;
use resolve::{ResolveArgs, run_resolve};
#[cfg(test)]
use resolve::{FetcherBuilder, ResolveConfig, run_resolve_with};

pub(crate) const ARG_FEATURE: &str = "feature";
pub(crate) const ARG_SKELETON: &str = "skeleton";
pub(crate) const ARG_MAPILLARY_CLIENT_ID: &str = "mapillary-client-id";
pub(crate) const ARG_SOURCE_TIMEOUT_SECS: &str = "source-timeout-secs";
pub(crate) const ARG_HTTP_TIMEOUT_SECS: &str = "http-timeout-secs";
pub(crate) const ARG_CACHE_TTL_SECS: &str = "cache-ttl-secs";
pub(crate) const ENV_FEATURE: &str = "FEATUREPHOTO_CMDS_RESOLVE_FEATURE_PATH";

/// Run the CLI with the current process arguments and environment.
///
/// # Errors
///
/// Returns [`CliError`] when arguments or configuration are invalid, a
/// feature document cannot be read, or resolution fails.
pub fn run() -> Result<(), CliError> {
    let cli = Cli::try_parse().map_err(CliError::ArgumentParsing)?;
    init_logging(cli.verbose);
    match cli.command {
        Command::Resolve(args) => run_resolve(args),
    }
}

fn init_logging(verbose: u8) {
    let mut clog = colog::default_builder();
    clog.filter(None, level_for(verbose));
    clog.init();
}

const fn level_for(verbose: u8) -> LevelFilter {
    match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}

#[derive(Debug, Parser)]
#[command(
    name = "featurephoto",
    about = "Find a representative photo for a map feature",
    version
)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Resolve a photo for a feature document.
    Resolve(ResolveArgs),
}

#[cfg(test)]
mod tests;
