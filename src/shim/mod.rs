//! CommonJS shim generation
//!
//! Wraps a CommonJS module (an installed package or a freshly built bundle) in
//! a static-export module the host build tool can import.

pub mod exports;
pub mod generator;

pub use exports::{ExportEnumerator, NodeExports};
pub use generator::{generate, require_line, write_shim, BINDING};
