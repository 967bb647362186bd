//! Per-run pipeline state
//!
//! Everything one run needs (search root, cache store, engine, export
//! enumerator) lives here and is dropped when the run ends.

use crate::bundle::{BundleEngine, BundleOptions, EsbuildEngine};
use crate::cache::CacheStore;
use crate::config::schema::DEFAULT_CACHE_DIR;
use crate::config::Config;
use crate::shim::{ExportEnumerator, NodeExports};
use std::path::{Path, PathBuf};

/// Shim file name inside each module's artifact directory
pub const SHIM_FILE: &str = "index.js";

/// Intermediate bundle file name for ES module dependencies
pub const BUNDLE_FILE: &str = "index.cjs";

/// Default bundler target runtime
pub const DEFAULT_TARGET: &str = "node14";

/// State scoped to a single pipeline invocation
pub struct RunContext {
    search_root: PathBuf,
    cache_dir: String,
    cache: CacheStore,
    engine: Box<dyn BundleEngine>,
    exports: Box<dyn ExportEnumerator>,
    target: String,
    bundle_options: BundleOptions,
}

impl RunContext {
    /// Create a context with default cache location and target
    pub fn new(
        search_root: impl Into<PathBuf>,
        engine: Box<dyn BundleEngine>,
        exports: Box<dyn ExportEnumerator>,
    ) -> Self {
        let search_root = search_root.into();
        let cache = CacheStore::new(search_root.join(DEFAULT_CACHE_DIR));
        Self {
            search_root,
            cache_dir: DEFAULT_CACHE_DIR.to_string(),
            cache,
            engine,
            exports,
            target: DEFAULT_TARGET.to_string(),
            bundle_options: BundleOptions::new(),
        }
    }

    /// Create a context using esbuild and Node.js as configured
    pub fn from_config(config: &Config, search_root: impl Into<PathBuf>) -> Self {
        Self::new(
            search_root,
            Box::new(EsbuildEngine::new(&config.bundler.command)),
            Box::new(NodeExports::new(&config.runtime.command)),
        )
        .with_cache_dir(&config.optimizer.cache_dir)
        .with_target(&config.bundler.target)
        .with_bundle_options(config.bundler.options.clone())
    }

    /// Use a different cache directory under the search root
    pub fn with_cache_dir(mut self, cache_dir: impl Into<String>) -> Self {
        self.cache_dir = cache_dir.into();
        self.cache = CacheStore::new(self.search_root.join(&self.cache_dir));
        self
    }

    /// Set the bundler target runtime
    pub fn with_target(mut self, target: impl Into<String>) -> Self {
        self.target = target.into();
        self
    }

    /// Set pass-through bundler options
    pub fn with_bundle_options(mut self, options: BundleOptions) -> Self {
        self.bundle_options = options;
        self
    }

    /// `node_modules` directory modules are resolved in
    pub fn search_root(&self) -> &Path {
        &self.search_root
    }

    pub fn cache(&self) -> &CacheStore {
        &self.cache
    }

    pub fn engine(&self) -> &dyn BundleEngine {
        self.engine.as_ref()
    }

    pub fn exports(&self) -> &dyn ExportEnumerator {
        self.exports.as_ref()
    }

    pub fn target(&self) -> &str {
        &self.target
    }

    pub fn bundle_options(&self) -> &BundleOptions {
        &self.bundle_options
    }

    /// Directory holding one module's artifacts
    pub fn artifact_dir(&self, name: &str) -> PathBuf {
        self.cache.root().join(name)
    }

    /// Shim path for a module; the alias replacement
    pub fn shim_path(&self, name: &str) -> PathBuf {
        self.artifact_dir(name).join(SHIM_FILE)
    }

    /// Intermediate bundle path for an ES module
    pub fn bundle_path(&self, name: &str) -> PathBuf {
        self.artifact_dir(name).join(BUNDLE_FILE)
    }

    /// Bare specifier a shim uses to require a module's bundle
    ///
    /// Resolved through `node_modules` at runtime, so it does not depend on
    /// where the importing page lives.
    pub fn bundle_require_target(&self, name: &str) -> String {
        format!("{}/{}/{}", self.cache_dir.trim_matches('/'), name, BUNDLE_FILE)
    }
}
