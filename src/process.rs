//! Helpers for external tool invocations

use crate::error::PrebundleError;
use std::io::ErrorKind;

/// Max number of output lines to include in diagnostics.
const ERROR_TAIL_LINES: usize = 50;

/// Extract the useful tail of tool output for error diagnostics.
///
/// Combines stdout and stderr, then returns the last `ERROR_TAIL_LINES`
/// non-empty lines so messages stay actionable without being overwhelming.
pub(crate) fn error_tail(stdout: &str, stderr: &str) -> Vec<String> {
    let lines: Vec<&str> = stdout
        .lines()
        .chain(stderr.lines())
        .filter(|line| !line.trim().is_empty())
        .collect();
    let start = lines.len().saturating_sub(ERROR_TAIL_LINES);
    lines[start..].iter().map(|line| line.to_string()).collect()
}

/// Map a spawn failure, treating a missing executable as missing tooling
pub(crate) fn spawn_error(
    command: &str,
    source: std::io::Error,
    missing: fn(String, std::io::Error) -> PrebundleError,
) -> PrebundleError {
    if source.kind() == ErrorKind::NotFound {
        missing(command.to_string(), source)
    } else {
        PrebundleError::command_failed(command, source)
    }
}
