//! Error types for prebundle
//!
//! All modules use `PrebundleResult<T>` as their return type. Failures that only
//! affect a single module are not errors at this level; see
//! [`crate::pipeline::ModuleFailure`].

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for prebundle operations
pub type PrebundleResult<T> = Result<T, PrebundleError>;

/// All errors that can occur in prebundle
#[derive(Error, Debug)]
pub enum PrebundleError {
    // Tooling errors
    #[error("Bundling engine not found: {command}")]
    EngineMissing {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("JavaScript runtime not found: {command}")]
    RuntimeMissing {
        command: String,
        #[source]
        source: std::io::Error,
    },

    // Resolution errors
    #[error("No node_modules directory found above {0}")]
    NodeModulesNotFound(PathBuf),

    #[error("Can not resolve module: {0}")]
    ModuleNotFound(String),

    #[error("Failed to list exports of {path}: {reason}")]
    ExportEnumeration { path: PathBuf, reason: String },

    #[error("Build failed for {name}: {}", .errors.join("; "))]
    BuildFailed { name: String, errors: Vec<String> },

    // Cache errors
    #[error("Failed to create cache root {path}: {source}")]
    CacheRootCreate {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Cannot record missing artifact: {0}")]
    ArtifactMissing(PathBuf),

    // Configuration errors
    #[error("Invalid configuration at {path}: {reason}")]
    ConfigInvalid { path: PathBuf, reason: String },

    #[error("Invalid module request '{0}': expected NAME or NAME=module|commonjs")]
    InvalidRequest(String),

    // IO errors
    #[error("IO error: {context}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    // Process errors
    #[error("Command failed: {command}")]
    CommandFailed {
        command: String,
        #[source]
        source: std::io::Error,
    },

    // Serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),
}

impl PrebundleError {
    /// Create an IO error with context
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }

    /// Create a command failed error
    pub fn command_failed(command: impl Into<String>, source: std::io::Error) -> Self {
        Self::CommandFailed {
            command: command.into(),
            source,
        }
    }

    /// Whether this error aborts the whole run rather than a single module
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::EngineMissing { .. } | Self::RuntimeMissing { .. } | Self::CacheRootCreate { .. }
        )
    }

    /// Get actionable hint for the error
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            Self::EngineMissing { .. } => {
                Some("Install esbuild (npm install -D esbuild) or set bundler.command")
            }
            Self::RuntimeMissing { .. } => Some("Install Node.js or set runtime.command"),
            Self::NodeModulesNotFound(_) => Some("Run your package manager's install first"),
            _ => None,
        }
    }
}
