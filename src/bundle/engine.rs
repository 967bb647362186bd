//! Bundling engine abstraction
//!
//! The pipeline only needs an engine that turns one ES module entry into one
//! CommonJS file. Engines report per-entry build errors in [`BuildResult`];
//! an `Err` is reserved for the engine itself being unusable.

use crate::error::PrebundleResult;
use async_trait::async_trait;
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::Path;

/// Opaque engine options passed through from configuration
pub type BundleOptions = BTreeMap<String, Value>;

/// One bundling job
#[derive(Debug, Clone)]
pub struct BundleRequest<'a> {
    /// Sole input file
    pub entry: &'a Path,
    /// CommonJS output file; the source map is written next to it
    pub outfile: &'a Path,
    /// Target runtime (e.g. "node14")
    pub target: &'a str,
    /// Modules left as runtime `require` calls
    pub externals: &'a [String],
    /// Extra options merged over the defaults
    pub extra: &'a BundleOptions,
}

/// Diagnostics from a finished engine invocation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildResult {
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

impl BuildResult {
    /// Whether the output file can be used
    pub fn is_success(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Abstract bundling engine interface
#[async_trait]
pub trait BundleEngine: Send + Sync {
    /// Bundle `request.entry` into `request.outfile`
    ///
    /// Returns `Err(EngineMissing)` when the engine cannot be started at all.
    async fn bundle(&self, request: &BundleRequest<'_>) -> PrebundleResult<BuildResult>;

    /// Get the human-readable engine name for display
    fn engine_name(&self) -> &'static str;
}
