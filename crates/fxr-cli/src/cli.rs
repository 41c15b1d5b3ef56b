//! CLI argument parsing using clap derive

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use fxr_version::{FxVersion, RollForwardPolicy};

/// fxr - Inspect framework and dependency resolution for managed apps
#[derive(Parser, Debug)]
#[command(name = "fxr")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable debug tracing (FXR_LOG takes precedence)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// The command to run
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Resolve frameworks and assets for an application
    ///
    /// Examples:
    ///   fxr resolve --app app/Hello.dll --dotnet-root /usr/share/dotnet
    ///   fxr resolve --app app/Hello.dll --roll-forward LatestMinor --json
    Resolve {
        /// Application binary; its .deps.json and .runtimeconfig.json sit next to it
        #[arg(long)]
        app: PathBuf,

        /// Install root holding shared/ and store/
        #[arg(long, env = "DOTNET_ROOT")]
        dotnet_root: Option<PathBuf>,

        /// Runtime identifier to resolve for (defaults to the host's)
        #[arg(long)]
        rid: Option<String>,

        /// Extra dependency manifests, processed after the app's
        #[arg(long = "additional-deps")]
        additional_deps: Vec<PathBuf>,

        /// TOML file with caller override settings
        #[arg(long)]
        overrides: Option<PathBuf>,

        /// Pin the first framework to this exact version
        #[arg(long)]
        fx_version: Option<FxVersion>,

        /// Roll-forward policy overriding every configuration tier
        #[arg(long)]
        roll_forward: Option<RollForwardPolicy>,

        /// Output as JSON for scripting
        #[arg(long)]
        json: bool,
    },

    /// List installed framework versions
    Frameworks {
        /// Install root holding shared/
        #[arg(long, env = "DOTNET_ROOT")]
        dotnet_root: Option<PathBuf>,

        /// Only list this framework
        #[arg(long)]
        name: Option<String>,

        /// Output as JSON for scripting
        #[arg(long)]
        json: bool,
    },

    /// Print the RID fallback chain declared by a manifest
    Rids {
        /// Dependency manifest with a `runtimes` section
        #[arg(long)]
        deps: PathBuf,

        /// Runtime identifier to expand (defaults to the host's)
        #[arg(long)]
        rid: Option<String>,
    },
}
