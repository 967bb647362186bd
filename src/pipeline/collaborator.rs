//! Host build-tool configuration hand-off
//!
//! At the end of a run the pipeline hands the host one batch of aliases (module
//! name -> shim path) and module names the host must not pre-process itself.

use crate::error::{PrebundleError, PrebundleResult};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Import alias from a module name to its generated shim
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Alias {
    pub find: String,
    pub replacement: PathBuf,
}

/// Receiver of the end-of-run alias and exclusion batch
pub trait BuildToolConfig {
    /// Called exactly once per run, after every module reached a final state
    fn apply(&mut self, aliases: Vec<Alias>, exclude: Vec<String>);
}

/// Host configuration fragment touched by a run
///
/// Serializes as `{ "resolve": { "alias": [...] }, "optimizeDeps": { "exclude": [...] } }`.
/// Keys prebundle does not manage are kept as they were read.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HostConfig {
    pub resolve: ResolveConfig,
    pub optimize_deps: OptimizeDepsConfig,
    #[serde(flatten)]
    pub other: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolveConfig {
    /// Read as a list of `{find, replacement}` or a `{find: replacement}` object
    #[serde(deserialize_with = "alias_list")]
    pub alias: Vec<Alias>,
    #[serde(flatten)]
    pub other: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OptimizeDepsConfig {
    pub exclude: Vec<String>,
    #[serde(flatten)]
    pub other: Map<String, Value>,
}

impl HostConfig {
    /// Load a previously written host configuration; a missing file is empty
    pub async fn load(path: &Path) -> PrebundleResult<Self> {
        let content = match tokio::fs::read_to_string(path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("No host configuration at {}, starting empty", path.display());
                return Ok(Self::default());
            }
            Err(e) => {
                return Err(PrebundleError::io(format!("reading {}", path.display()), e));
            }
        };

        serde_json::from_str(&content).map_err(|e| PrebundleError::ConfigInvalid {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    }
}

impl BuildToolConfig for HostConfig {
    /// Aliases replace earlier ones for the same module; exclusions already
    /// present are not repeated
    fn apply(&mut self, aliases: Vec<Alias>, exclude: Vec<String>) {
        self.resolve
            .alias
            .retain(|existing| !aliases.iter().any(|alias| alias.find == existing.find));
        self.resolve.alias.extend(aliases);
        for name in exclude {
            if !self.optimize_deps.exclude.contains(&name) {
                self.optimize_deps.exclude.push(name);
            }
        }
    }
}

fn alias_list<'de, D>(deserializer: D) -> Result<Vec<Alias>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum AliasField {
        List(Vec<Alias>),
        Object(BTreeMap<String, PathBuf>),
    }

    Ok(match AliasField::deserialize(deserializer)? {
        AliasField::List(aliases) => aliases,
        AliasField::Object(map) => map
            .into_iter()
            .map(|(find, replacement)| Alias { find, replacement })
            .collect(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn apply_appends_and_dedupes_exclusions() {
        let mut host = HostConfig::default();
        host.optimize_deps.exclude.push("lodash".to_string());

        host.apply(
            vec![Alias {
                find: "lodash".to_string(),
                replacement: PathBuf::from("/nm/@prebundle/deps/lodash/index.js"),
            }],
            vec!["lodash".to_string(), "uuid".to_string()],
        );

        assert_eq!(host.resolve.alias.len(), 1);
        assert_eq!(host.optimize_deps.exclude, vec!["lodash", "uuid"]);
    }

    #[test]
    fn apply_replaces_alias_for_same_module() {
        let mut host = HostConfig::default();
        let alias = |find: &str, to: &str| Alias {
            find: find.to_string(),
            replacement: PathBuf::from(to),
        };
        host.apply(vec![alias("lodash", "/old"), alias("react", "/r")], vec![]);

        host.apply(vec![alias("lodash", "/new")], vec![]);

        assert_eq!(host.resolve.alias, vec![alias("react", "/r"), alias("lodash", "/new")]);
    }

    #[test]
    fn alias_object_is_read_as_list() {
        let host: HostConfig = serde_json::from_str(
            r#"{ "resolve": { "alias": { "react": "/r" }, "dedupe": ["vue"] }, "root": "src" }"#,
        )
        .unwrap();

        assert_eq!(
            host.resolve.alias,
            vec![Alias {
                find: "react".to_string(),
                replacement: PathBuf::from("/r"),
            }]
        );
        let json = serde_json::to_value(&host).unwrap();
        assert_eq!(json["root"], "src");
        assert_eq!(json["resolve"]["dedupe"], serde_json::json!(["vue"]));
        assert_eq!(json["resolve"]["alias"][0]["find"], "react");
    }

    #[tokio::test]
    async fn load_missing_file_is_empty() {
        let temp = tempfile::TempDir::new().unwrap();
        let host = HostConfig::load(&temp.path().join("host.json")).await.unwrap();
        assert_eq!(host, HostConfig::default());
    }

    #[tokio::test]
    async fn load_rejects_malformed_file() {
        let temp = tempfile::TempDir::new().unwrap();
        let path = temp.path().join("host.json");
        std::fs::write(&path, "{ nope").unwrap();

        let err = HostConfig::load(&path).await.unwrap_err();
        assert!(matches!(err, PrebundleError::ConfigInvalid { .. }));
    }

    #[test]
    fn serialized_shape() {
        let json = serde_json::to_value(HostConfig::default()).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "resolve": { "alias": [] }, "optimizeDeps": { "exclude": [] } })
        );
    }
}
