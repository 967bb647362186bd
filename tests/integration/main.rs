//! Integration tests for prebundle

mod cli_tests {
    use assert_cmd::{cargo::cargo_bin_cmd, Command};
    use predicates::prelude::*;
    use std::fs;
    use tempfile::TempDir;

    /// Command isolated from any user or project configuration
    fn prebundle(temp: &TempDir) -> Command {
        let mut cmd = cargo_bin_cmd!("prebundle");
        cmd.env("PREBUNDLE_CONFIG", temp.path().join("global.toml"))
            .current_dir(temp.path())
            .arg("--no-local");
        cmd
    }

    fn project() -> TempDir {
        let temp = TempDir::new().unwrap();
        fs::create_dir_all(temp.path().join("node_modules")).unwrap();
        temp
    }

    #[test]
    fn help_displays() {
        let temp = TempDir::new().unwrap();
        prebundle(&temp)
            .arg("--help")
            .assert()
            .success()
            .stdout(predicate::str::contains("pre-bundler"));
    }

    #[test]
    fn version_displays() {
        let temp = TempDir::new().unwrap();
        prebundle(&temp)
            .arg("--version")
            .assert()
            .success()
            .stdout(predicate::str::contains("prebundle"));
    }

    #[test]
    fn config_path() {
        let temp = TempDir::new().unwrap();
        prebundle(&temp)
            .args(["config", "path"])
            .assert()
            .success()
            .stdout(predicate::str::contains("global.toml"));
    }

    #[test]
    fn config_show() {
        let temp = TempDir::new().unwrap();
        prebundle(&temp)
            .args(["config", "show"])
            .assert()
            .success()
            .stdout(predicate::str::contains("[bundler]"))
            .stdout(predicate::str::contains("node14"));
    }

    #[test]
    fn config_show_reads_global_file() {
        let temp = TempDir::new().unwrap();
        fs::write(
            temp.path().join("global.toml"),
            "[bundler]\ntarget = \"node18\"\n",
        )
        .unwrap();

        prebundle(&temp)
            .args(["config", "show"])
            .assert()
            .success()
            .stdout(predicate::str::contains("node18"));
    }

    #[test]
    fn invalid_config_fails() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("global.toml"), "[bundler\n").unwrap();

        prebundle(&temp)
            .args(["config", "show"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("Invalid configuration"));
    }

    #[test]
    fn run_unresolvable_module_still_succeeds() {
        let temp = project();
        prebundle(&temp)
            .args(["run", "ghost-pkg", "--root"])
            .arg(temp.path())
            .assert()
            .success()
            .stdout(predicate::str::contains("\"alias\": []"))
            .stdout(predicate::str::contains("optimizeDeps"))
            .stderr(predicate::str::contains("ghost-pkg"));
    }

    #[test]
    fn run_skips_builtins() {
        let temp = project();
        prebundle(&temp)
            .args(["run", "fs", "node:path", "--root"])
            .arg(temp.path())
            .assert()
            .success()
            .stderr(predicate::str::contains("built-in"));
    }

    #[test]
    fn run_without_modules_does_nothing() {
        let temp = project();
        prebundle(&temp)
            .args(["run", "--root"])
            .arg(temp.path())
            .assert()
            .success()
            .stderr(predicate::str::contains("Nothing to pre-bundle"))
            .stdout(predicate::str::contains("\"exclude\": []"));
    }

    #[test]
    fn run_writes_output_file() {
        let temp = project();
        let output = temp.path().join("host.json");

        prebundle(&temp)
            .args(["run", "ghost-pkg", "--root"])
            .arg(temp.path())
            .arg("--output")
            .arg(&output)
            .assert()
            .success();

        let written = fs::read_to_string(&output).unwrap();
        let host: serde_json::Value = serde_json::from_str(&written).unwrap();
        assert!(host["resolve"]["alias"].as_array().unwrap().is_empty());
    }

    #[test]
    fn run_merges_into_existing_output_file() {
        let temp = project();
        let output = temp.path().join("host.json");
        fs::write(
            &output,
            r#"{ "resolve": { "alias": { "react": "/vendor/react.js" } }, "base": "/app/" }"#,
        )
        .unwrap();

        prebundle(&temp)
            .args(["run", "ghost-pkg", "--root"])
            .arg(temp.path())
            .arg("--output")
            .arg(&output)
            .assert()
            .success();

        let host: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&output).unwrap()).unwrap();
        assert_eq!(host["base"], "/app/");
        assert_eq!(host["resolve"]["alias"][0]["find"], "react");
        assert_eq!(host["resolve"]["alias"][0]["replacement"], "/vendor/react.js");
        assert!(host["optimizeDeps"]["exclude"].as_array().unwrap().is_empty());
    }

    #[test]
    fn run_rejects_unknown_module_type() {
        let temp = project();
        prebundle(&temp)
            .args(["run", "lodash=umd"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("lodash=umd"));
    }

    #[test]
    fn run_without_node_modules_fails() {
        let temp = TempDir::new().unwrap();
        prebundle(&temp)
            .args(["run", "lodash", "--root"])
            .arg(temp.path())
            .assert()
            .failure()
            .stderr(predicate::str::contains("node_modules"));
    }

    #[test]
    fn cache_list_empty() {
        let temp = project();
        prebundle(&temp)
            .args(["cache", "list", "--root"])
            .arg(temp.path())
            .assert()
            .success()
            .stdout(predicate::str::contains("No cache entries"));
    }

    #[test]
    fn cache_check_reports_stale_entries() {
        let temp = project();
        let cache_root = temp.path().join("node_modules/@prebundle/deps");
        fs::create_dir_all(&cache_root).unwrap();
        let artifact = cache_root.join("lodash/index.js");
        let metadata = serde_json::json!({
            "timestamp": 0,
            "optimized": { (artifact.to_string_lossy().into_owned()): { "hash": "00" } }
        });
        fs::write(cache_root.join("_metadata.json"), metadata.to_string()).unwrap();

        prebundle(&temp)
            .args(["cache", "list", "--format", "plain", "--root"])
            .arg(temp.path())
            .assert()
            .success()
            .stdout(predicate::str::contains("lodash"));

        prebundle(&temp)
            .args(["cache", "check", "--root"])
            .arg(temp.path())
            .assert()
            .success()
            .stdout(predicate::str::contains("stale"));
    }
}
