//! esbuild command-line engine
//!
//! Implements the BundleEngine trait by running the `esbuild` executable.
//! Format, bundling, outfile and externals are fixed; everything else in the
//! configured options is translated to esbuild flags.

use crate::bundle::engine::{BuildResult, BundleEngine, BundleRequest};
use crate::error::{PrebundleError, PrebundleResult};
use crate::process::{error_tail, spawn_error};
use async_trait::async_trait;
use serde_json::Value;
use std::process::Stdio;
use tokio::process::Command;
use tracing::{debug, warn};

/// Options the pipeline depends on; never taken from pass-through options
const FIXED_OPTIONS: &[&str] = &[
    "bundle",
    "entryPoints",
    "format",
    "outdir",
    "outfile",
    "stdin",
    "write",
];

/// Options given as repeated `--name:value` flags rather than `--name=value`
const COLON_LIST_OPTIONS: &[&str] = &["drop", "external", "inject", "pure"];

/// Options with no `=false` form; `false` leaves the flag out
const FLAG_ONLY_OPTIONS: &[&str] = &["sourcemap"];

/// Bundling engine backed by the esbuild CLI
pub struct EsbuildEngine {
    command: String,
}

impl EsbuildEngine {
    /// Create an engine using the given esbuild executable
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
        }
    }
}

impl Default for EsbuildEngine {
    fn default() -> Self {
        Self::new("esbuild")
    }
}

#[async_trait]
impl BundleEngine for EsbuildEngine {
    async fn bundle(&self, request: &BundleRequest<'_>) -> PrebundleResult<BuildResult> {
        let args = build_args(request);
        debug!("Executing: {} {:?}", self.command, args);

        let output = Command::new(&self.command)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(|e| {
                spawn_error(&self.command, e, |command, source| {
                    PrebundleError::EngineMissing { command, source }
                })
            })?;

        let stdout = String::from_utf8_lossy(&output.stdout);
        let stderr = String::from_utf8_lossy(&output.stderr);
        Ok(parse_diagnostics(output.status.success(), &stdout, &stderr))
    }

    fn engine_name(&self) -> &'static str {
        "esbuild"
    }
}

/// Build the esbuild argument list for a request
fn build_args(request: &BundleRequest<'_>) -> Vec<String> {
    let mut args = vec![
        request.entry.display().to_string(),
        "--bundle".to_string(),
        "--format=cjs".to_string(),
        format!("--outfile={}", request.outfile.display()),
        "--log-level=warning".to_string(),
        "--color=false".to_string(),
    ];

    if !request.extra.contains_key("target") {
        args.push(format!("--target={}", request.target));
    }
    if !request.extra.contains_key("sourcemap") {
        args.push("--sourcemap".to_string());
    }

    args.extend(
        request
            .externals
            .iter()
            .map(|external| format!("--external:{}", external)),
    );

    for (key, value) in request.extra {
        if FIXED_OPTIONS.contains(&key.as_str()) {
            warn!("Ignoring bundler option '{}': it is managed by prebundle", key);
            continue;
        }
        args.extend(option_flags(key, value));
    }

    args
}

/// Translate one pass-through option to esbuild flags
fn option_flags(key: &str, value: &Value) -> Vec<String> {
    let flag = kebab_case(key);
    let colon_list = COLON_LIST_OPTIONS.contains(&key);

    match value {
        Value::Null => vec![],
        Value::Bool(true) => vec![format!("--{}", flag)],
        Value::Bool(false) if FLAG_ONLY_OPTIONS.contains(&key) => vec![],
        Value::Bool(false) => vec![format!("--{}=false", flag)],
        Value::Number(n) => vec![format!("--{}={}", flag, n)],
        Value::String(s) if colon_list => vec![format!("--{}:{}", flag, s)],
        Value::String(s) => vec![format!("--{}={}", flag, s)],
        Value::Array(items) if colon_list => items
            .iter()
            .map(|item| format!("--{}:{}", flag, scalar(item)))
            .collect(),
        Value::Array(items) => {
            let joined: Vec<String> = items.iter().map(scalar).collect();
            vec![format!("--{}={}", flag, joined.join(","))]
        }
        Value::Object(map) => map
            .iter()
            .map(|(k, v)| format!("--{}:{}={}", flag, k, scalar(v)))
            .collect(),
    }
}

fn scalar(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// `logLevel` -> `log-level`
fn kebab_case(key: &str) -> String {
    let mut out = String::with_capacity(key.len() + 4);
    for c in key.chars() {
        if c.is_ascii_uppercase() {
            out.push('-');
            out.push(c.to_ascii_lowercase());
        } else {
            out.push(c);
        }
    }
    out
}

/// Split esbuild's log output into errors and warnings
fn parse_diagnostics(success: bool, stdout: &str, stderr: &str) -> BuildResult {
    let warnings = stderr
        .lines()
        .filter(|line| line.contains("[WARNING]"))
        .map(|line| line.trim().to_string())
        .collect();

    let errors = if success {
        vec![]
    } else {
        let tagged: Vec<String> = stderr
            .lines()
            .filter(|line| line.contains("[ERROR]"))
            .map(|line| line.trim().to_string())
            .collect();
        if tagged.is_empty() {
            let tail = error_tail(stdout, stderr);
            if tail.is_empty() {
                vec!["esbuild exited with an error".to_string()]
            } else {
                tail
            }
        } else {
            tagged
        }
    };

    BuildResult { errors, warnings }
}
