//! Integration tests for swbuild

mod cli_tests {
    use assert_cmd::{cargo::cargo_bin_cmd, Command};
    use predicates::prelude::*;
    use std::path::Path;
    use tempfile::TempDir;

    fn swbuild(dir: &Path) -> Command {
        let mut cmd = cargo_bin_cmd!("swbuild");
        cmd.current_dir(dir).env_remove("SWBUILD_CONFIG").env("CI", "1");
        cmd
    }

    fn project(config: &str) -> TempDir {
        let temp = TempDir::new().unwrap();
        std::fs::create_dir_all(temp.path().join("dist/css")).unwrap();
        std::fs::create_dir_all(temp.path().join("src")).unwrap();
        std::fs::write(temp.path().join("dist/index.html"), "<html></html>").unwrap();
        std::fs::write(temp.path().join("dist/app.js"), "console.log('hi')").unwrap();
        std::fs::write(temp.path().join("dist/css/site.css"), "body{}").unwrap();
        std::fs::write(
            temp.path().join("src/sw.js"),
            "precacheAndRoute(self.__WB_MANIFEST);\n",
        )
        .unwrap();
        std::fs::write(temp.path().join("swbuild.toml"), config).unwrap();
        temp
    }

    const BASIC: &str = r#"
[manifest]
glob_directory = "dist"

[inject]
sw_src = "src/sw.js"
sw_dest = "dist/sw.js"
"#;

    #[test]
    fn help_displays() {
        let temp = TempDir::new().unwrap();
        swbuild(temp.path())
            .arg("--help")
            .assert()
            .success()
            .stdout(predicate::str::contains("precache manifest builder"));
    }

    #[test]
    fn version_displays() {
        let temp = TempDir::new().unwrap();
        swbuild(temp.path())
            .arg("--version")
            .assert()
            .success()
            .stdout(predicate::str::contains("swbuild"));
    }

    #[test]
    fn manifest_json_lists_files() {
        let temp = project(BASIC);
        swbuild(temp.path())
            .args(["manifest", "--format", "json"])
            .assert()
            .success()
            .stdout(predicate::str::contains("\"url\": \"css/site.css\""))
            .stdout(predicate::str::contains("\"count\": 3"));
    }

    #[test]
    fn manifest_found_from_subdirectory() {
        let temp = project(BASIC);
        swbuild(&temp.path().join("src"))
            .args(["manifest", "--format", "json"])
            .assert()
            .success()
            .stdout(predicate::str::contains("index.html"));
    }

    #[test]
    fn inject_writes_service_worker() {
        let temp = project(BASIC);
        swbuild(temp.path()).arg("inject").assert().success();

        let written = std::fs::read_to_string(temp.path().join("dist/sw.js")).unwrap();
        assert!(written.starts_with("precacheAndRoute([{\"url\":\"app.js\""));
        assert!(!written.contains("__WB_MANIFEST"));
    }

    #[test]
    fn inject_without_injection_point_fails() {
        let temp = project(BASIC);
        std::fs::write(temp.path().join("src/sw.js"), "// nothing here\n").unwrap();

        swbuild(temp.path())
            .arg("inject")
            .assert()
            .failure()
            .stderr(predicate::str::contains("not found"))
            .stderr(predicate::str::contains("Hint:"));
    }

    #[test]
    fn routes_lists_rules() {
        let config = format!(
            "{BASIC}\n{}",
            r#"
[[runtime_caching]]
url_regex = '^/api/'
handler = "NetworkFirst"

[runtime_caching.options]
network_timeout_seconds = 3
"#
        );
        let temp = project(&config);
        swbuild(temp.path())
            .args(["routes", "--format", "json"])
            .assert()
            .success()
            .stdout(predicate::str::contains("NetworkFirst"))
            .stdout(predicate::str::contains("/^/api//"));
    }

    #[test]
    fn routes_rejects_unknown_strategy() {
        let config = format!(
            "{BASIC}\n{}",
            r#"
[[runtime_caching]]
url_pattern = "/index.html"
handler = "CacheSometimes"
"#
        );
        let temp = project(&config);
        swbuild(temp.path())
            .arg("routes")
            .assert()
            .failure()
            .stderr(predicate::str::contains("Unknown caching strategy"));
    }

    #[test]
    fn config_path_prefers_local_file() {
        let temp = project(BASIC);
        swbuild(temp.path())
            .args(["config", "path"])
            .assert()
            .success()
            .stdout(predicate::str::contains("swbuild.toml"));
    }

    #[test]
    fn config_show() {
        let temp = project(BASIC);
        swbuild(temp.path())
            .args(["config", "show"])
            .assert()
            .success()
            .stdout(predicate::str::contains("[manifest]"));
    }

    #[test]
    fn init_then_refuse_overwrite() {
        let temp = TempDir::new().unwrap();
        swbuild(temp.path()).arg("init").assert().success();
        assert!(temp.path().join("swbuild.toml").exists());

        swbuild(temp.path())
            .arg("init")
            .assert()
            .failure()
            .stderr(predicate::str::contains("already exists"));
    }
}
