//! Configuration schema for prebundle
//!
//! Configuration is stored at `~/.config/prebundle/config.toml`, optionally
//! overridden per project by a `prebundle.toml` file.

use crate::bundle::BundleOptions;
use crate::resolve::ModuleRequest;
use serde::{Deserialize, Serialize};

/// Directory under `node_modules` holding generated artifacts
pub const DEFAULT_CACHE_DIR: &str = "@prebundle/deps";

/// Root configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// General settings
    pub general: GeneralConfig,

    /// Which modules to pre-bundle and where
    pub optimizer: OptimizerConfig,

    /// Bundling engine settings
    pub bundler: BundlerConfig,

    /// JavaScript runtime used to list CommonJS exports
    pub runtime: RuntimeConfig,
}

/// General application settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Log format: "text" or "json"
    pub log_format: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_format: "text".to_string(),
        }
    }
}

/// Module selection and output location
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OptimizerConfig {
    /// Modules to pre-bundle when none are given on the command line
    pub include: Vec<ModuleRequest>,

    /// Cache directory relative to `node_modules`; also the `require`
    /// prefix of generated bundles
    pub cache_dir: String,
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        Self {
            include: vec![],
            cache_dir: DEFAULT_CACHE_DIR.to_string(),
        }
    }
}

/// Bundling engine configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BundlerConfig {
    /// esbuild executable
    pub command: String,

    /// Target runtime
    pub target: String,

    /// Extra esbuild options (camelCase names, as in esbuild's JS API)
    pub options: BundleOptions,
}

impl Default for BundlerConfig {
    fn default() -> Self {
        Self {
            command: "esbuild".to_string(),
            target: "node14".to_string(),
            options: BundleOptions::new(),
        }
    }
}

/// Runtime used to load CommonJS modules for export listing
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    /// Node.js executable
    pub command: String,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            command: "node".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolve::ModuleKind;

    #[test]
    fn default_config_serializes() {
        let config = Config::default();
        let toml = toml::to_string_pretty(&config).unwrap();
        assert!(toml.contains("[general]"));
        assert!(toml.contains("[optimizer]"));
    }

    #[test]
    fn config_deserializes_empty() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.optimizer.cache_dir, DEFAULT_CACHE_DIR);
        assert_eq!(config.bundler.target, "node14");
        assert!(config.optimizer.include.is_empty());
    }

    #[test]
    fn config_deserializes_partial() {
        let toml = r#"
            [optimizer]
            include = ["lodash", { name = "lodash-es", type = "module" }]

            [bundler.options]
            minify = true
            define = { DEBUG = "false" }
        "#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(
            config.optimizer.include[1],
            ModuleRequest::Typed("lodash-es".into(), ModuleKind::Module)
        );
        assert_eq!(config.bundler.options["minify"], serde_json::json!(true));
        assert_eq!(config.bundler.command, "esbuild"); // default preserved
    }
}
