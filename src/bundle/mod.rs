//! ES module bundling
//!
//! Delegates to an external engine to turn an ES module entry into a single
//! CommonJS file that can then be shimmed like any CommonJS package.

mod engine;
mod esbuild;

pub use engine::{BuildResult, BundleEngine, BundleOptions, BundleRequest};
pub use esbuild::EsbuildEngine;
