//! Cache command - inspect recorded artifacts

use crate::cache::{CacheRecord, CacheStore};
use crate::cli::args::{CacheAction, CacheArgs, OutputFormat};
use crate::cli::commands::search_root;
use crate::config::Config;
use crate::error::PrebundleResult;
use chrono::DateTime;
use console::style;
use std::path::{Path, PathBuf};

/// Characters of the digest shown in tables
const SHORT_HASH_LEN: usize = 12;

/// Execute the cache command
pub async fn execute(args: CacheArgs, config: &Config) -> PrebundleResult<()> {
    match args.action {
        CacheAction::List { root, format } => {
            let store = open_store(root, config)?;
            list_entries(&store, format).await
        }
        CacheAction::Check { root } => {
            let store = open_store(root, config)?;
            check_entries(&store).await;
            Ok(())
        }
    }
}

fn open_store(root: Option<PathBuf>, config: &Config) -> PrebundleResult<CacheStore> {
    let search_root = search_root(root)?;
    Ok(CacheStore::new(search_root.join(&config.optimizer.cache_dir)))
}

/// List all recorded artifacts
async fn list_entries(store: &CacheStore, format: OutputFormat) -> PrebundleResult<()> {
    let record = store.read().await;

    if record.optimized.is_empty() && !matches!(format, OutputFormat::Json) {
        println!("No cache entries found in {}", store.root().display());
        return Ok(());
    }

    match format {
        OutputFormat::Table => print_table(&record),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&record)?),
        OutputFormat::Plain => {
            for path in record.optimized.keys() {
                println!("{}", path);
            }
        }
    }

    Ok(())
}

fn print_table(record: &CacheRecord) {
    println!("{:<14} PATH", "HASH");
    println!("{}", "-".repeat(80));

    for (path, entry) in &record.optimized {
        let short = entry.hash.get(..SHORT_HASH_LEN).unwrap_or(&entry.hash);
        println!("{:<14} {}", short, path);
    }

    println!();
    let updated = DateTime::from_timestamp_millis(record.timestamp)
        .map(|t| t.format("%Y-%m-%d %H:%M:%S UTC").to_string())
        .unwrap_or_else(|| "unknown".to_string());
    println!(
        "Total: {} entr{} (last updated {})",
        record.optimized.len(),
        if record.optimized.len() == 1 { "y" } else { "ies" },
        updated
    );
}

/// Re-digest every recorded artifact and report which still match
async fn check_entries(store: &CacheStore) {
    let record = store.read().await;

    if record.optimized.is_empty() {
        println!("No cache entries found in {}", store.root().display());
        return;
    }

    let mut stale = 0;
    for path in record.optimized.keys() {
        if store.is_valid(Path::new(path)).await {
            println!("  {} {}", style("valid").green(), path);
        } else {
            stale += 1;
            println!("  {} {}", style("stale").yellow(), path);
        }
    }

    println!();
    println!(
        "{} valid, {} stale (stale artifacts are rebuilt on the next run)",
        record.optimized.len() - stale,
        stale
    );
}
