//! Config command - show configuration

use crate::cli::args::{ConfigAction, ConfigArgs};
use crate::config::{Config, ConfigManager};
use crate::error::PrebundleResult;
use std::path::Path;

/// Execute the config command
pub async fn execute(
    args: ConfigArgs,
    config: &Config,
    manager: &ConfigManager,
    local: Option<&Path>,
) -> PrebundleResult<()> {
    match args.action {
        None | Some(ConfigAction::Show) => show_config(config)?,
        Some(ConfigAction::Path) => show_path(manager, local),
    }

    Ok(())
}

fn show_config(config: &Config) -> PrebundleResult<()> {
    println!("{}", toml::to_string_pretty(config)?);
    Ok(())
}

/// Global path first, then the local override if one is in effect
fn show_path(manager: &ConfigManager, local: Option<&Path>) {
    println!("{}", manager.path().display());
    if let Some(local) = local {
        println!("{}", local.display());
    }
}
