//! Export enumeration for CommonJS modules
//!
//! Listing the members of a CommonJS module requires executing it. This is the
//! only place the pipeline does so: the module is loaded once in a separate
//! runtime process, its own property keys are printed as JSON, and the process
//! exits. Nothing else about the module is inspected.

use crate::error::{PrebundleError, PrebundleResult};
use crate::process::{error_tail, spawn_error};
use async_trait::async_trait;
use std::path::Path;
use std::process::Stdio;
use tokio::process::Command;
use tracing::debug;

/// Script run by the runtime; `process.argv[1]` is the module path
///
/// Transpilers define `__esModule` as a non-enumerable property, so it is
/// reported separately from the own enumerable keys.
const LIST_EXPORTS_SCRIPT: &str = "const m = require(process.argv[1]);\
const keys = m !== null && (typeof m === 'object' || typeof m === 'function') ? Object.keys(m) : [];\
if (m && m.__esModule && !keys.includes('__esModule')) keys.push('__esModule');\
process.stdout.write(JSON.stringify(keys));";

/// Lists the exported member names of a CommonJS module
#[async_trait]
pub trait ExportEnumerator: Send + Sync {
    /// Own enumerable keys of the loaded module, in definition order
    async fn exports(&self, module_path: &Path) -> PrebundleResult<Vec<String>>;
}

/// Enumerates exports by loading the module in a Node.js child process
pub struct NodeExports {
    command: String,
}

impl NodeExports {
    /// Create an enumerator using the given runtime executable
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
        }
    }
}

impl Default for NodeExports {
    fn default() -> Self {
        Self::new("node")
    }
}

#[async_trait]
impl ExportEnumerator for NodeExports {
    async fn exports(&self, module_path: &Path) -> PrebundleResult<Vec<String>> {
        debug!("Listing exports of {}", module_path.display());

        let mut command = Command::new(&self.command);
        command
            .arg("-e")
            .arg(LIST_EXPORTS_SCRIPT)
            .arg(module_path)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        if let Some(dir) = module_path.parent() {
            command.current_dir(dir);
        }

        let output = command.output().await.map_err(|e| {
            spawn_error(&self.command, e, |command, source| {
                PrebundleError::RuntimeMissing { command, source }
            })
        })?;

        let stdout = String::from_utf8_lossy(&output.stdout);
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(PrebundleError::ExportEnumeration {
                path: module_path.to_path_buf(),
                reason: error_tail("", &stderr).join("\n"),
            });
        }

        serde_json::from_str(stdout.trim()).map_err(|e| PrebundleError::ExportEnumeration {
            path: module_path.to_path_buf(),
            reason: format!("unexpected output: {}", e),
        })
    }
}
