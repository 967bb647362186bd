//! prebundle - Dependency pre-bundler
//!
//! Turns installed npm packages into cached static-export shims over
//! CommonJS, bundling ES module packages to CommonJS first, and reports the
//! resulting import aliases to a host build tool.

pub mod bundle;
pub mod cache;
pub mod cli;
pub mod config;
pub mod error;
pub mod pipeline;
mod process;
pub mod resolve;
pub mod shim;

pub use error::{PrebundleError, PrebundleResult};
