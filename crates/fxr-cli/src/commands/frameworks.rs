//! Frameworks command implementation

use std::path::PathBuf;

use colored::Colorize;
use fxr_core::{FrameworkResolver, HostContext};
use fxr_fs::{FileSystem, HostFs};
use serde::Serialize;

use crate::error::Result;
use crate::require_dotnet_root;

#[derive(Debug, Serialize)]
struct ListedFramework {
    name: String,
    version: String,
    dir: PathBuf,
}

/// Run the frameworks command
pub fn run_frameworks(dotnet_root: Option<PathBuf>, name: Option<&str>, json: bool) -> Result<()> {
    let dotnet_root = require_dotnet_root(dotnet_root)?;
    let ctx = HostContext::new(HostFs, &dotnet_root);
    let listed = list_frameworks(&ctx, name);

    if json {
        println!("{}", serde_json::to_string_pretty(&listed)?);
        return Ok(());
    }

    if listed.is_empty() {
        println!(
            "{} under {}",
            "No frameworks installed".yellow(),
            dotnet_root.display()
        );
        return Ok(());
    }
    for fx in &listed {
        println!("{} {} [{}]", fx.name.cyan(), fx.version, fx.dir.display());
    }
    Ok(())
}

fn list_frameworks(ctx: &HostContext<HostFs>, only: Option<&str>) -> Vec<ListedFramework> {
    let names = match only {
        Some(name) => vec![name.to_string()],
        None => ctx
            .fs()
            .list_directories(&ctx.dotnet_root().join(fxr_core::context::SHARED_DIR)),
    };

    let resolver = FrameworkResolver::new(ctx);
    names
        .into_iter()
        .flat_map(|name| {
            resolver
                .installed_versions(&name)
                .into_iter()
                .map(move |installed| ListedFramework {
                    name: name.clone(),
                    version: installed.version.to_string(),
                    dir: installed.dir,
                })
        })
        .collect()
}
