//! Module requests and format classification

use crate::error::PrebundleError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Module system a dependency is written in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModuleKind {
    /// Synchronous `module.exports`; shimmed directly
    Commonjs,
    /// Static `export`; bundled to CommonJS first, then shimmed
    Module,
}

impl fmt::Display for ModuleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Commonjs => "commonjs",
            Self::Module => "module",
        };
        write!(f, "{}", name)
    }
}

impl FromStr for ModuleKind {
    type Err = PrebundleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "commonjs" | "cjs" => Ok(Self::Commonjs),
            "module" | "esm" => Ok(Self::Module),
            _ => Err(PrebundleError::InvalidRequest(s.to_string())),
        }
    }
}

/// One entry of the caller's module list
///
/// In config files a request is either a plain string or
/// `{ name = "...", type = "module" | "commonjs" }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawRequest", into = "RawRequest")]
pub enum ModuleRequest {
    /// Format detected from the package
    Bare(String),
    /// Format forced by the caller
    Typed(String, ModuleKind),
}

impl ModuleRequest {
    /// Requested module name
    pub fn name(&self) -> &str {
        match self {
            Self::Bare(name) | Self::Typed(name, _) => name,
        }
    }

    /// Explicit kind, if any
    pub fn explicit_kind(&self) -> Option<ModuleKind> {
        match self {
            Self::Bare(_) => None,
            Self::Typed(_, kind) => Some(*kind),
        }
    }
}

impl FromStr for ModuleRequest {
    type Err = PrebundleError;

    /// Parse `name` or `name=module|commonjs`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.split_once('=') {
            None if !s.is_empty() => Ok(Self::Bare(s.to_string())),
            Some((name, kind)) if !name.is_empty() => {
                let kind = kind
                    .parse()
                    .map_err(|_| PrebundleError::InvalidRequest(s.to_string()))?;
                Ok(Self::Typed(name.to_string(), kind))
            }
            _ => Err(PrebundleError::InvalidRequest(s.to_string())),
        }
    }
}

#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum RawRequest {
    Name(String),
    Table {
        name: String,
        #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
        kind: Option<ModuleKind>,
    },
}

impl From<RawRequest> for ModuleRequest {
    fn from(raw: RawRequest) -> Self {
        match raw {
            RawRequest::Name(name) | RawRequest::Table { name, kind: None } => Self::Bare(name),
            RawRequest::Table {
                name,
                kind: Some(kind),
            } => Self::Typed(name, kind),
        }
    }
}

impl From<ModuleRequest> for RawRequest {
    fn from(request: ModuleRequest) -> Self {
        match request {
            ModuleRequest::Bare(name) => Self::Name(name),
            ModuleRequest::Typed(name, kind) => Self::Table {
                name,
                kind: Some(kind),
            },
        }
    }
}
