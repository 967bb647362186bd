//! Run command - pre-bundle modules and emit the host configuration

use crate::cli::args::RunArgs;
use crate::cli::commands::search_root;
use crate::config::Config;
use crate::error::{PrebundleError, PrebundleResult};
use crate::pipeline::{self, ArtifactStatus, HostConfig, RunContext, RunReport};
use console::style;
use tokio::fs;
use tracing::debug;

/// Execute the run command
pub async fn execute(args: RunArgs, config: &Config) -> PrebundleResult<()> {
    let search_root = search_root(args.root)?;
    debug!("Using search root {}", search_root.display());

    let requests = if args.modules.is_empty() {
        config.optimizer.include.clone()
    } else {
        args.modules
    };

    // An existing output file is merged into, not replaced
    let mut host = match &args.output {
        Some(path) => HostConfig::load(path).await?,
        None => HostConfig::default(),
    };
    if requests.is_empty() {
        eprintln!(
            "{} Nothing to pre-bundle (pass module names or set optimizer.include)",
            style("!").yellow()
        );
    } else {
        let ctx = RunContext::from_config(config, &search_root);
        let report = pipeline::run(&ctx, &requests, &mut host).await?;
        print_summary(&report);
    }

    let json = serde_json::to_string_pretty(&host)?;
    match args.output {
        Some(path) => {
            fs::write(&path, format!("{}\n", json))
                .await
                .map_err(|e| PrebundleError::io(format!("writing {}", path.display()), e))?;
            eprintln!("Host configuration written to {}", path.display());
        }
        None => println!("{}", json),
    }

    Ok(())
}

fn print_summary(report: &RunReport) {
    for outcome in &report.succeeded {
        let status = match outcome.status {
            ArtifactStatus::Generated => style("generated").green(),
            ArtifactStatus::Cached => style("cached").dim(),
        };
        eprintln!("  {} {} ({}, {})", style("✓").green(), outcome.name, outcome.kind, status);
    }

    for failure in &report.failures {
        eprintln!("  {} {}: {}", style("✗").red(), failure.name, failure.reason);
    }

    for name in &report.builtins {
        eprintln!("  {} {} (built-in)", style("-").dim(), name);
    }

    eprintln!();
    eprintln!(
        "Pre-bundled {} module(s): {} rebuilt, {} failed",
        report.succeeded.len(),
        report.generated_count(),
        report.failures.len()
    );
}
