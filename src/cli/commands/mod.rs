//! CLI command implementations

pub mod cache;
pub mod config;
pub mod run;

pub use cache::execute as cache;
pub use config::execute as config;
pub use run::execute as run;

use crate::error::{PrebundleError, PrebundleResult};
use crate::resolve::find_node_modules;
use std::env;
use std::path::PathBuf;

/// Nearest `node_modules` above `--root`, or above the current directory
pub(crate) fn search_root(root: Option<PathBuf>) -> PrebundleResult<PathBuf> {
    let project_dir = match root {
        Some(p) => p
            .canonicalize()
            .map_err(|e| PrebundleError::io(format!("resolving {}", p.display()), e))?,
        None => env::current_dir().map_err(|e| PrebundleError::io("getting current directory", e))?,
    };

    find_node_modules(&project_dir)
}
