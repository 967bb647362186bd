//! Static-export shim source generation
//!
//! A shim loads its target once with `require` into `_M_` and re-exports each
//! member as a static ES export read off that binding. The text depends only
//! on the name sequence and the target, so regenerating an unchanged module
//! yields byte-identical output and an unchanged digest.

use crate::error::{PrebundleError, PrebundleResult};
use std::collections::HashSet;
use std::path::Path;

/// Internal binding holding the required module
pub const BINDING: &str = "_M_";

/// Words that cannot be a `const` binding but are valid export names
const RESERVED_WORDS: &[&str] = &[
    "await", "break", "case", "catch", "class", "const", "continue", "debugger", "default",
    "delete", "do", "else", "enum", "export", "extends", "false", "finally", "for", "function",
    "if", "implements", "import", "in", "instanceof", "interface", "let", "new", "null",
    "package", "private", "protected", "public", "return", "static", "super", "switch", "this",
    "throw", "true", "try", "typeof", "var", "void", "while", "with", "yield", "arguments",
    "eval",
];

/// Generate shim source for `require_target` exporting `exported_names`
///
/// Duplicate names keep their first position. `default` and `__esModule`
/// never become named exports; the default export is `_M_.default` for
/// transpiled ES modules and the whole binding otherwise. Non-identifiers and
/// names colliding with `_M_` or its `_M_$` locals stay reachable only through
/// the default export.
pub fn generate(exported_names: &[String], require_target: &str) -> String {
    let mut code = require_line(require_target);
    code.push('\n');

    let mut seen = HashSet::new();
    let mut transpiled = false;
    let mut has_default = false;

    for name in exported_names {
        if !seen.insert(name.as_str()) {
            continue;
        }
        match name.as_str() {
            "__esModule" => transpiled = true,
            "default" => has_default = true,
            _ if !is_identifier_name(name) || shadows_binding(name) => {}
            _ if RESERVED_WORDS.contains(&name.as_str()) => {
                code.push_str(&format!(
                    "const {b}${n} = {b}.{n};\nexport {{ {b}${n} as {n} }};\n",
                    b = BINDING,
                    n = name
                ));
            }
            _ => code.push_str(&format!("export const {n} = {b}.{n};\n", b = BINDING, n = name)),
        }
    }

    if transpiled && has_default {
        code.push_str(&format!("export default {}.default;\n", BINDING));
    } else {
        code.push_str(&format!("export default {};\n", BINDING));
    }

    code
}

/// First line of every shim generated for `require_target`
pub fn require_line(require_target: &str) -> String {
    let target = serde_json::Value::from(require_target).to_string();
    format!("const {} = require({});", BINDING, target)
}

/// Names that would redeclare the binding or an aliased local
fn shadows_binding(name: &str) -> bool {
    name.strip_prefix(BINDING)
        .is_some_and(|rest| rest.is_empty() || rest.starts_with('$'))
}

/// Write generated shim source, creating parent directories as needed
pub async fn write_shim(path: &Path, code: &str) -> PrebundleResult<()> {
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|e| PrebundleError::io(format!("creating {}", parent.display()), e))?;
    }

    tokio::fs::write(path, code)
        .await
        .map_err(|e| PrebundleError::io(format!("writing shim {}", path.display()), e))
}

/// ASCII identifier check; other names are dropped from the shim
fn is_identifier_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' || c == '$' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn generate_is_deterministic() {
        let first = generate(&names(&["a", "b"]), "lodash");
        let second = generate(&names(&["a", "b"]), "lodash");
        assert_eq!(first, second);
    }

    #[test]
    fn generate_basic_shape() {
        let code = generate(&names(&["a", "b"]), "lodash");
        assert_eq!(
            code,
            "const _M_ = require(\"lodash\");\n\
             export const a = _M_.a;\n\
             export const b = _M_.b;\n\
             export default _M_;\n"
        );
    }

    #[test]
    fn order_follows_input() {
        let ab = generate(&names(&["a", "b"]), "x");
        let ba = generate(&names(&["b", "a"]), "x");
        assert_ne!(ab, ba);
        assert!(ba.find("const b").unwrap() < ba.find("const a").unwrap());
    }

    #[test]
    fn duplicates_are_dropped() {
        let code = generate(&names(&["a", "a"]), "x");
        assert_eq!(code.matches("export const a").count(), 1);
    }

    #[test]
    fn transpiled_default() {
        let code = generate(&names(&["__esModule", "default", "x"]), "pkg");
        assert!(code.contains("export default _M_.default;\n"));
        assert!(!code.contains("export const __esModule"));
        assert!(!code.contains("export const default"));
    }

    #[test]
    fn transpiled_default_marker_may_come_last() {
        let code = generate(&names(&["a", "default", "__esModule"]), "pkg");
        assert!(code.ends_with("export const a = _M_.a;\nexport default _M_.default;\n"));
    }

    #[test]
    fn default_without_marker_exports_whole_module() {
        let code = generate(&names(&["default", "x"]), "pkg");
        assert!(code.ends_with("export default _M_;\n"));
    }

    #[test]
    fn binding_names_are_not_redeclared() {
        let code = generate(&names(&["_M_", "_M_$delete", "delete", "_M_x", "a"]), "pkg");
        assert_eq!(
            code,
            "const _M_ = require(\"pkg\");\n\
             const _M_$delete = _M_.delete;\n\
             export { _M_$delete as delete };\n\
             export const _M_x = _M_._M_x;\n\
             export const a = _M_.a;\n\
             export default _M_;\n"
        );
    }

    #[test]
    fn require_line_matches_generated_output() {
        let target = "@prebundle/deps/x/index.cjs";
        let first = require_line(target);
        assert_eq!(generate(&names(&["a"]), target).lines().next(), Some(first.as_str()));
    }

    #[test]
    fn reserved_and_invalid_names() {
        let code = generate(&names(&["delete", "my-key", "1st", "$ok"]), "pkg");
        assert!(code.contains("const _M_$delete = _M_.delete;\nexport { _M_$delete as delete };\n"));
        assert!(code.contains("export const $ok = _M_.$ok;\n"));
        assert!(!code.contains("my-key"));
        assert!(!code.contains("1st"));
    }

    #[test]
    fn require_target_is_escaped() {
        let code = generate(&[], "@prebundle/deps/we\"ird/index.cjs");
        assert!(code.starts_with("const _M_ = require(\"@prebundle/deps/we\\\"ird/index.cjs\");\n"));
    }

    #[tokio::test]
    async fn write_creates_parents() {
        let temp = tempfile::TempDir::new().unwrap();
        let path = temp.path().join("@scope/pkg/index.js");
        write_shim(&path, "export default 1;\n").await.unwrap();
        assert_eq!(std::fs::read_to_string(path).unwrap(), "export default 1;\n");
    }
}
