//! Pre-bundling pipeline
//!
//! Resolves each requested module, shims CommonJS packages directly, bundles
//! ES modules to CommonJS before shimming them, and reports the resulting
//! aliases to the host build tool in one batch.

pub mod collaborator;
pub mod context;
mod orchestrator;
pub mod report;

pub use collaborator::{Alias, BuildToolConfig, HostConfig};
pub use context::{RunContext, BUNDLE_FILE, SHIM_FILE};
pub use orchestrator::run;
pub use report::{ArtifactStatus, FailureReason, ModuleFailure, ModuleOutcome, RunReport};
