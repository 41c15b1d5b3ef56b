//! fxr CLI
//!
//! Diagnostics front end for framework and dependency resolution.

mod cli;
mod commands;
mod error;

use clap::Parser;
use colored::Colorize;
use tracing_subscriber::EnvFilter;

use cli::{Cli, Commands};
use error::{CliError, Result};

/// Environment variable holding a tracing filter, e.g. `fxr_core=debug`.
const LOG_ENV: &str = "FXR_LOG";

fn main() {
    if let Err(e) = run() {
        match e.kind() {
            Some(kind) => eprintln!("{}: {}: {}", "error".red().bold(), kind, e),
            None => eprintln!("{}: {}", "error".red().bold(), e),
        }
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    execute_command(cli.command)
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default));
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(verbose)
        .finish();
    if tracing::subscriber::set_global_default(subscriber).is_err() {
        eprintln!("{}: tracing already initialised", "warning".yellow());
    }
}

fn execute_command(cmd: Commands) -> Result<()> {
    match cmd {
        Commands::Resolve {
            app,
            dotnet_root,
            rid,
            additional_deps,
            overrides,
            fx_version,
            roll_forward,
            json,
        } => commands::run_resolve(commands::ResolveArgs {
            app,
            dotnet_root,
            rid,
            additional_deps,
            overrides,
            fx_version,
            roll_forward,
            json,
        }),
        Commands::Frameworks {
            dotnet_root,
            name,
            json,
        } => commands::run_frameworks(dotnet_root, name.as_deref(), json),
        Commands::Rids { deps, rid } => commands::run_rids(&deps, rid),
    }
}

/// Install root from the flag or `DOTNET_ROOT`.
pub(crate) fn require_dotnet_root(
    dotnet_root: Option<std::path::PathBuf>,
) -> Result<std::path::PathBuf> {
    dotnet_root.ok_or_else(|| {
        CliError::user("no install root given; pass --dotnet-root or set DOTNET_ROOT")
    })
}
