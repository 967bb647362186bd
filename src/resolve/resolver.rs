//! Entry file resolution and format classification
//!
//! Resolution order for a module `name` under a search root:
//! 1. `{root}/{name}/package.json`: the manifest `type` field decides the
//!    format, and `exports` / `module` / `main` / `index` locate the entry
//! 2. `{root}/{name}` as a path: exact file, extension probe, directory
//!    `index` probe. A `.mjs` entry is an ES module, anything else CommonJS

use crate::error::{PrebundleError, PrebundleResult};
use crate::resolve::request::{ModuleKind, ModuleRequest};
use serde::Deserialize;
use serde_json::Value;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Extensions tried when a path has none, in order
const EXTENSIONS: &[&str] = &["js", "cjs", "mjs", "json"];

/// Extensions that can only hold ES module code
const ESM_ONLY_EXTENSIONS: &[&str] = &["mjs"];

/// `exports` conditions preferred when bundling an ES module
const MODULE_CONDITIONS: &[&str] = &["import", "module", "node", "default", "require"];

/// `exports` conditions preferred when requiring a CommonJS module
const COMMONJS_CONDITIONS: &[&str] = &["require", "node", "default"];

/// A module with a located entry file and a decided format
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedDependency {
    pub name: String,
    pub kind: ModuleKind,
    /// Existing regular file
    pub entry_path: PathBuf,
}

/// Fields of `package.json` used for resolution
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct PackageManifest {
    #[serde(rename = "type")]
    module_type: Option<String>,
    main: Option<String>,
    module: Option<String>,
    exports: Option<Value>,
}

impl PackageManifest {
    fn kind(&self) -> ModuleKind {
        match self.module_type.as_deref() {
            Some("module") => ModuleKind::Module,
            _ => ModuleKind::Commonjs,
        }
    }

    /// Candidate entry paths relative to the package directory
    fn entry_candidates(&self, kind: ModuleKind) -> Vec<&str> {
        let conditions = match kind {
            ModuleKind::Module => MODULE_CONDITIONS,
            ModuleKind::Commonjs => COMMONJS_CONDITIONS,
        };

        let mut candidates = Vec::new();
        candidates.extend(
            self.exports
                .as_ref()
                .and_then(|exports| exports_entry(exports, conditions)),
        );
        if kind == ModuleKind::Module {
            candidates.extend(self.module.as_deref());
        }
        candidates.extend(self.main.as_deref());
        candidates.push("index");
        candidates
    }
}

/// Find the nearest `node_modules` directory at or above `start`
pub fn find_node_modules(start: &Path) -> PrebundleResult<PathBuf> {
    start
        .ancestors()
        .map(|dir| dir.join("node_modules"))
        .find(|candidate| candidate.is_dir())
        .ok_or_else(|| PrebundleError::NodeModulesNotFound(start.to_path_buf()))
}

/// Resolve a request to its entry file and format
///
/// Built-ins must be filtered out by the caller. An explicit kind on the
/// request overrides classification but the entry is still located.
pub async fn resolve(
    request: &ModuleRequest,
    search_root: &Path,
) -> PrebundleResult<ResolvedDependency> {
    let name = request.name();
    let package_dir = search_root.join(name);
    let manifest_path = package_dir.join("package.json");

    let (detected, entry_path) = if manifest_path.is_file() {
        let manifest = read_manifest(&manifest_path).await;
        let kind = request.explicit_kind().unwrap_or_else(|| manifest.kind());
        let entry = manifest
            .entry_candidates(kind)
            .into_iter()
            .map(|candidate| package_dir.join(candidate.trim_start_matches("./")))
            .find_map(|candidate| resolve_path(&candidate));
        (manifest.kind(), entry)
    } else {
        let entry = resolve_path(&package_dir);
        let kind = entry
            .as_deref()
            .map(kind_from_extension)
            .unwrap_or(ModuleKind::Commonjs);
        (kind, entry)
    };

    let entry_path = entry_path.ok_or_else(|| PrebundleError::ModuleNotFound(name.to_string()))?;
    let kind = request.explicit_kind().unwrap_or(detected);

    debug!("Resolved {} ({}) to {}", name, kind, entry_path.display());
    Ok(ResolvedDependency {
        name: name.to_string(),
        kind,
        entry_path,
    })
}

async fn read_manifest(path: &Path) -> PackageManifest {
    let content = match tokio::fs::read_to_string(path).await {
        Ok(content) => content,
        Err(e) => {
            warn!("Failed to read {}: {}", path.display(), e);
            return PackageManifest::default();
        }
    };

    serde_json::from_str(&content).unwrap_or_else(|e| {
        warn!("Ignoring malformed {}: {}", path.display(), e);
        PackageManifest::default()
    })
}

/// File, extension probe, then directory index probe
fn resolve_path(base: &Path) -> Option<PathBuf> {
    if base.is_file() {
        return Some(base.to_path_buf());
    }

    if let Some(found) = probe_extensions(base) {
        return Some(found);
    }

    if base.is_dir() {
        return probe_extensions(&base.join("index"));
    }

    None
}

fn probe_extensions(base: &Path) -> Option<PathBuf> {
    let file_name = base.file_name()?.to_string_lossy().into_owned();
    EXTENSIONS
        .iter()
        .map(|ext| base.with_file_name(format!("{}.{}", file_name, ext)))
        .find(|candidate| candidate.is_file())
}

fn kind_from_extension(path: &Path) -> ModuleKind {
    let is_esm = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ESM_ONLY_EXTENSIONS.contains(&ext));

    if is_esm {
        ModuleKind::Module
    } else {
        ModuleKind::Commonjs
    }
}

/// Pick the package root entry out of an `exports` field
fn exports_entry<'v>(exports: &'v Value, conditions: &[&str]) -> Option<&'v str> {
    let root = match exports {
        Value::Object(map) if map.keys().any(|k| k.starts_with('.')) => map.get(".")?,
        other => other,
    };
    conditional_target(root, conditions)
}

fn conditional_target<'v>(value: &'v Value, conditions: &[&str]) -> Option<&'v str> {
    match value {
        Value::String(target) => Some(target.as_str()),
        Value::Array(items) => items
            .iter()
            .find_map(|item| conditional_target(item, conditions)),
        Value::Object(map) => conditions
            .iter()
            .find_map(|c| map.get(*c).and_then(|v| conditional_target(v, conditions))),
        _ => None,
    }
}
