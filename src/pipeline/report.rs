//! Per-module outcomes collected over one run

use crate::error::PrebundleError;
use crate::pipeline::collaborator::Alias;
use crate::resolve::ModuleKind;
use std::fmt;
use std::path::PathBuf;

/// Whether an artifact was rebuilt this run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactStatus {
    /// Written this run
    Generated,
    /// Reused from a previous run
    Cached,
}

/// A module whose shim is in place
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleOutcome {
    pub name: String,
    pub kind: ModuleKind,
    pub shim_path: PathBuf,
    pub status: ArtifactStatus,
}

/// Why a module was skipped
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureReason {
    /// Entry file could not be located
    Resolution,
    /// The bundling engine ran and reported errors
    EngineBuild(Vec<String>),
    /// The module could not be loaded to list its exports
    ExportEnumeration(String),
    /// Writing an artifact or invoking a tool failed
    Generation(String),
}

impl FailureReason {
    /// Classify a non-fatal error raised while processing one module
    pub fn from_error(err: &PrebundleError) -> Self {
        match err {
            PrebundleError::ModuleNotFound(_) => Self::Resolution,
            PrebundleError::BuildFailed { errors, .. } => Self::EngineBuild(errors.clone()),
            PrebundleError::ExportEnumeration { reason, .. } => {
                Self::ExportEnumeration(reason.clone())
            }
            other => Self::Generation(other.to_string()),
        }
    }
}

impl fmt::Display for FailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Resolution => write!(f, "can not resolve module"),
            Self::EngineBuild(errors) => write!(f, "build failed: {}", errors.join("; ")),
            Self::ExportEnumeration(reason) => write!(f, "can not list exports: {}", reason),
            Self::Generation(reason) => write!(f, "{}", reason),
        }
    }
}

/// A module dropped from the run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleFailure {
    pub name: String,
    pub reason: FailureReason,
}

impl ModuleFailure {
    pub fn new(name: impl Into<String>, reason: FailureReason) -> Self {
        Self {
            name: name.into(),
            reason,
        }
    }
}

/// Everything a run produced, in request order
#[derive(Debug, Clone, Default)]
pub struct RunReport {
    /// Modules with a usable shim
    pub succeeded: Vec<ModuleOutcome>,
    /// Modules dropped from the output
    pub failures: Vec<ModuleFailure>,
    /// Built-in modules that were not processed
    pub builtins: Vec<String>,
}

impl RunReport {
    /// Alias pairs for every successful module
    pub fn aliases(&self) -> Vec<Alias> {
        self.succeeded
            .iter()
            .map(|outcome| Alias {
                find: outcome.name.clone(),
                replacement: outcome.shim_path.clone(),
            })
            .collect()
    }

    /// Module names the host must not pre-process itself
    pub fn exclusions(&self) -> Vec<String> {
        self.succeeded.iter().map(|o| o.name.clone()).collect()
    }

    /// Number of artifacts rebuilt this run
    pub fn generated_count(&self) -> usize {
        self.succeeded
            .iter()
            .filter(|o| o.status == ArtifactStatus::Generated)
            .count()
    }
}
