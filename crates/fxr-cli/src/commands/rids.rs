//! Rids command implementation

use std::path::Path;

use colored::Colorize;
use fxr_deps::{DependencyManifest, current_rid};
use fxr_fs::HostFs;

use crate::error::{CliError, Result};

/// Run the rids command
pub fn run_rids(deps: &Path, rid: Option<String>) -> Result<()> {
    let manifest = DependencyManifest::load(&HostFs, deps)?;
    if !manifest.exists() {
        return Err(CliError::user(format!(
            "dependency manifest not found: {}",
            deps.display()
        )));
    }
    let rid = rid.unwrap_or_else(current_rid);
    let graph = manifest.rid_fallback_graph().cloned().unwrap_or_default();

    if graph.fallbacks(&rid).is_empty() {
        println!("{} has no declared fallbacks", rid.yellow());
    }
    for (depth, candidate) in graph.candidates(&rid).into_iter().enumerate() {
        println!("{:>2}. {}", depth, candidate);
    }
    Ok(())
}
