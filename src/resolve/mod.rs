//! Module resolution
//!
//! Turns caller requests into dependencies with a located entry file and a
//! decided module format.

pub mod builtins;
pub mod request;
pub mod resolver;

pub use builtins::{externals, is_builtin};
pub use request::{ModuleKind, ModuleRequest};
pub use resolver::{find_node_modules, resolve, ResolvedDependency};
