//! Resolve command implementation

use std::fs;
use std::path::{Path, PathBuf};

use colored::Colorize;
use fxr_config::{HostEnvironment, OverrideSettings};
use fxr_core::{HostContext, ResolveRequest, ResolvedPaths, resolve};
use fxr_fs::HostFs;
use fxr_version::{FxVersion, RollForwardPolicy};

use crate::error::Result;
use crate::require_dotnet_root;

/// Arguments of `fxr resolve`
#[derive(Debug, Clone, Default)]
pub struct ResolveArgs {
    pub app: PathBuf,
    pub dotnet_root: Option<PathBuf>,
    pub rid: Option<String>,
    pub additional_deps: Vec<PathBuf>,
    pub overrides: Option<PathBuf>,
    pub fx_version: Option<FxVersion>,
    pub roll_forward: Option<RollForwardPolicy>,
    pub json: bool,
}

/// Run the resolve command
pub fn run_resolve(args: ResolveArgs) -> Result<()> {
    let dotnet_root = require_dotnet_root(args.dotnet_root)?;
    let mut ctx = HostContext::new(HostFs, dotnet_root).with_env(HostEnvironment::from_process());
    if let Some(rid) = args.rid {
        ctx = ctx.with_rid(rid)?;
    }

    let mut overrides = match &args.overrides {
        Some(path) => load_overrides(path)?,
        None => OverrideSettings::default(),
    };
    if args.fx_version.is_some() {
        overrides.fx_version = args.fx_version;
    }
    if args.roll_forward.is_some() {
        overrides.roll_forward = args.roll_forward;
    }

    let mut request = ResolveRequest::new(&args.app).with_overrides(overrides);
    for deps in args.additional_deps {
        request = request.with_additional_deps(deps);
    }

    let paths = resolve(&ctx, &request)?;
    if args.json {
        println!("{}", serde_json::to_string_pretty(&paths)?);
    } else {
        print_report(&args.app, &paths);
    }
    Ok(())
}

/// Read caller overrides from a TOML file.
pub fn load_overrides(path: &Path) -> Result<OverrideSettings> {
    let content = fs::read_to_string(path)?;
    Ok(toml::from_str(&content)?)
}

fn print_report(app: &Path, paths: &ResolvedPaths) {
    println!("{}", "Resolution".bold());
    println!();
    println!("{}:   {}", "App".dimmed(), app.display());
    println!("{}:   {}", "RID".dimmed(), paths.rid.cyan());
    println!();

    println!("{}:", "Frameworks".bold());
    if paths.frameworks.is_empty() {
        println!("  {} (self-contained)", "None".dimmed());
    }
    for fx in &paths.frameworks {
        let rolled = if fx.rolled_forward_across_minor_or_major {
            " rolled forward".yellow()
        } else {
            "".normal()
        };
        println!(
            "  {} {} {} (requested {}){}",
            "+".green(),
            fx.name.cyan(),
            fx.resolved_version,
            fx.requested_version,
            rolled
        );
        println!("    {}", fx.dir.display().to_string().dimmed());
    }
    println!();

    print_paths("Assemblies (TPA)", &paths.tpa);
    print_paths("Native search directories", &paths.native_search_dirs);
    print_paths("Resource search directories", &paths.resource_search_dirs);

    if !paths.properties.is_empty() {
        println!("{}:", "Properties".bold());
        for (key, value) in &paths.properties {
            println!("  {} = {}", key.cyan(), value);
        }
    }
}

fn print_paths(title: &str, paths: &[PathBuf]) {
    println!("{} ({}):", title.bold(), paths.len());
    for path in paths {
        println!("  {}", path.display());
    }
    println!();
}
