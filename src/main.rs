//! prebundle - Dependency pre-bundler
//!
//! CLI entry point that dispatches to subcommands.

use clap::Parser;
use console::style;
use prebundle::cli::{Cli, Commands};
use prebundle::config::ConfigManager;
use prebundle::error::{PrebundleError, PrebundleResult};
use std::process::ExitCode;
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {}", style("Error:").red().bold(), e);
            if let Some(hint) = e.hint() {
                eprintln!("{} {}", style("Hint:").yellow(), hint);
            }
            ExitCode::FAILURE
        }
    }
}

async fn run() -> PrebundleResult<()> {
    let cli = Cli::parse();

    let config_manager = match cli.config {
        Some(ref path) => ConfigManager::with_path(path.clone()),
        None => ConfigManager::new(),
    };

    let local_config_path = if cli.no_local {
        None
    } else {
        let cwd = std::env::current_dir()
            .map_err(|e| PrebundleError::io("getting current directory", e))?;
        ConfigManager::find_local_config(&cwd)
    };

    let config = config_manager
        .load_merged(local_config_path.as_deref())
        .await?;

    // 0 = warn, 1 = info, 2+ = debug
    let filter = match cli.verbose {
        0 => EnvFilter::new("prebundle=warn"),
        1 => EnvFilter::new("prebundle=info"),
        _ => EnvFilter::new("prebundle=debug"),
    };

    // stdout carries command output, so logs go to stderr
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr);
    if config.general.log_format == "json" {
        subscriber.json().init();
    } else {
        subscriber.without_time().init();
    }

    if cli.no_local {
        debug!("Local config discovery disabled (--no-local)");
    } else if let Some(ref path) = local_config_path {
        debug!("Found local config: {}", path.display());
    }

    match cli.command {
        Commands::Run(args) => prebundle::cli::commands::run(args, &config).await,
        Commands::Cache(args) => prebundle::cli::commands::cache(args, &config).await,
        Commands::Config(args) => {
            prebundle::cli::commands::config(
                args,
                &config,
                &config_manager,
                local_config_path.as_deref(),
            )
            .await
        }
    }
}
