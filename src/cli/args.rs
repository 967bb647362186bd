//! CLI argument definitions using clap derive

use crate::resolve::ModuleRequest;
use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// prebundle - Dependency pre-bundler
///
/// Converts npm packages into cached CommonJS shims a dev server can import
/// directly.
#[derive(Parser, Debug)]
#[command(name = "prebundle")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity (-v info, -vv debug)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Configuration file path
    #[arg(short, long, global = true, env = "PREBUNDLE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Skip local prebundle.toml discovery
    #[arg(long, global = true)]
    pub no_local: bool,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Pre-bundle modules and print the host configuration
    Run(RunArgs),

    /// Inspect the artifact cache
    Cache(CacheArgs),

    /// Show configuration
    Config(ConfigArgs),
}

/// Arguments for the run command
#[derive(Parser, Debug)]
pub struct RunArgs {
    /// Modules to pre-bundle, as NAME or NAME=module|commonjs
    /// (defaults to optimizer.include)
    pub modules: Vec<ModuleRequest>,

    /// Project directory (defaults to current directory)
    #[arg(short, long)]
    pub root: Option<PathBuf>,

    /// Write the host configuration to a file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Arguments for the cache command
#[derive(Parser, Debug)]
pub struct CacheArgs {
    /// Subcommand for cache
    #[command(subcommand)]
    pub action: CacheAction,
}

/// Cache subcommands
#[derive(Subcommand, Debug)]
pub enum CacheAction {
    /// List recorded artifacts
    List {
        /// Project directory (defaults to current directory)
        #[arg(short, long)]
        root: Option<PathBuf>,

        /// Output format
        #[arg(short, long, default_value = "table")]
        format: OutputFormat,
    },

    /// Check which recorded artifacts are still valid
    Check {
        /// Project directory (defaults to current directory)
        #[arg(short, long)]
        root: Option<PathBuf>,
    },
}

/// Arguments for the config command
#[derive(Parser, Debug)]
pub struct ConfigArgs {
    /// Subcommand for config
    #[command(subcommand)]
    pub action: Option<ConfigAction>,
}

/// Config subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Show configuration file path
    Path,
}

/// Output format for listings
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable table
    Table,
    /// JSON output
    Json,
    /// Simple text (one per line)
    Plain,
}
