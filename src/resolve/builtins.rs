//! Platform built-in module names
//!
//! Built-ins are never pre-bundled: the orchestrator skips them and the bundler
//! leaves them as runtime `require` calls, in both bare and `node:` form.

/// Node.js built-in modules (public ones, without `_`-prefixed internals)
pub const NODE_BUILTINS: &[&str] = &[
    "assert",
    "assert/strict",
    "async_hooks",
    "buffer",
    "child_process",
    "cluster",
    "console",
    "constants",
    "crypto",
    "dgram",
    "diagnostics_channel",
    "dns",
    "dns/promises",
    "domain",
    "events",
    "fs",
    "fs/promises",
    "http",
    "http2",
    "https",
    "inspector",
    "inspector/promises",
    "module",
    "net",
    "os",
    "path",
    "path/posix",
    "path/win32",
    "perf_hooks",
    "process",
    "punycode",
    "querystring",
    "readline",
    "readline/promises",
    "repl",
    "stream",
    "stream/consumers",
    "stream/promises",
    "stream/web",
    "string_decoder",
    "sys",
    "timers",
    "timers/promises",
    "tls",
    "trace_events",
    "tty",
    "url",
    "util",
    "util/types",
    "v8",
    "vm",
    "wasi",
    "worker_threads",
    "zlib",
];

/// Modules supplied by the host runtime rather than installed packages
pub const HOST_PROVIDED: &[&str] = &["electron"];

/// Check whether a module name refers to a built-in
pub fn is_builtin(name: &str) -> bool {
    if HOST_PROVIDED.contains(&name) {
        return true;
    }
    let bare = name.strip_prefix("node:").unwrap_or(name);
    NODE_BUILTINS.contains(&bare)
}

/// Externals list handed to the bundling engine
pub fn externals() -> Vec<String> {
    NODE_BUILTINS
        .iter()
        .map(|m| (*m).to_string())
        .chain(NODE_BUILTINS.iter().map(|m| format!("node:{}", m)))
        .chain(HOST_PROVIDED.iter().map(|m| (*m).to_string()))
        .collect()
}
