//! Integration tests for bunv

mod cli_tests {
    use assert_cmd::{cargo::cargo_bin_cmd, Command};
    use predicates::prelude::*;
    use tempfile::TempDir;

    fn bunv() -> Command {
        cargo_bin_cmd!("bunv")
    }

    /// Command isolated from the user's config and cache
    fn isolated(temp: &TempDir) -> Command {
        let mut cmd = bunv();
        cmd.env_remove("BUNV_CONFIG")
            .env_remove("BUNV_CACHE_DIR")
            .arg("--config")
            .arg(temp.path().join("config.toml"))
            .arg("--cache-dir")
            .arg(temp.path().join("cache"));
        cmd
    }

    #[test]
    fn help_displays() {
        bunv()
            .arg("--help")
            .assert()
            .success()
            .stdout(predicate::str::contains("single-file Bun scripts"));
    }

    #[test]
    fn version_displays() {
        bunv()
            .arg("--version")
            .assert()
            .success()
            .stdout(predicate::str::contains("bunv"));
    }

    #[test]
    fn run_missing_script() {
        let temp = TempDir::new().unwrap();
        isolated(&temp)
            .args(["run", "does-not-exist.ts"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("Script not found"));

        assert!(!temp.path().join("cache").exists());
    }

    #[test]
    fn add_requires_packages() {
        bunv()
            .args(["add", "--script", "x.ts"])
            .assert()
            .code(1);
    }

    #[test]
    fn run_without_script_exits_one() {
        bunv()
            .arg("run")
            .assert()
            .code(1)
            .stderr(predicate::str::contains("required"));
    }

    #[test]
    fn unknown_flag_exits_one() {
        bunv()
            .args(["run", "x.ts", "--bogus"])
            .assert()
            .code(1);
    }

    #[test]
    fn subcommand_help_succeeds() {
        bunv()
            .args(["run", "--help"])
            .assert()
            .success()
            .stdout(predicate::str::contains("--with"));
    }

    #[test]
    fn config_path_follows_flag() {
        let temp = TempDir::new().unwrap();
        isolated(&temp)
            .args(["config", "path"])
            .assert()
            .success()
            .stdout(predicate::str::contains("config.toml"));
    }

    #[test]
    fn config_show_defaults() {
        let temp = TempDir::new().unwrap();
        isolated(&temp)
            .args(["config", "show"])
            .assert()
            .success()
            .stdout(predicate::str::contains("[runtime]"))
            .stdout(predicate::str::contains("program = \"bun\""));
    }

    #[test]
    fn config_set_unknown_key() {
        let temp = TempDir::new().unwrap();
        isolated(&temp)
            .args(["config", "set", "runtime.colour", "red"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("Unknown config key"));
    }

    #[test]
    fn cache_dir_prints_override() {
        let temp = TempDir::new().unwrap();
        isolated(&temp)
            .args(["cache", "dir"])
            .assert()
            .success()
            .stdout(predicate::str::contains("cache"));
    }

    #[test]
    fn cache_list_empty() {
        let temp = TempDir::new().unwrap();
        isolated(&temp)
            .args(["cache", "list"])
            .assert()
            .success()
            .stdout(predicate::str::contains("No cached environments"));
    }

    #[test]
    fn add_writes_metadata_block() {
        let temp = TempDir::new().unwrap();
        let script = temp.path().join("tool.ts");
        std::fs::write(&script, "console.log(\"hi\");\n").unwrap();

        isolated(&temp)
            .args(["add", "--script"])
            .arg(&script)
            .args(["zod@3", "chalk"])
            .assert()
            .success();

        let updated = std::fs::read_to_string(&script).unwrap();
        assert!(updated.starts_with("// /// script\n"));
        assert!(updated.contains("\"zod\": \"3\""));
        assert!(updated.contains("\"chalk\": \"latest\""));
        assert!(updated.ends_with("console.log(\"hi\");\n"));
    }
}

/// End-to-end runs against a stand-in `bun` that records its invocations
#[cfg(unix)]
mod run_tests {
    use assert_cmd::{cargo::cargo_bin_cmd, Command};
    use predicates::prelude::*;
    use std::os::unix::fs::PermissionsExt;
    use std::path::{Path, PathBuf};
    use tempfile::TempDir;

    const FAKE_BUN: &str = r#"#!/bin/sh
echo "$*" >> "$FAKE_BUN_LOG"
case "$1" in
  install)
    echo "installing" >&1
    mkdir -p node_modules
    ;;
  run)
    shift
    echo "script=$(basename "$1")"
    shift
    echo "args=$*"
    echo "module_path=$NODE_PATH"
    exit "${FAKE_BUN_EXIT:-0}"
    ;;
esac
"#;

    const COMMANDER_SCRIPT: &str = r#"// /// script
// {"dependencies": {"commander": "latest"}}
// ///
import { program } from "commander";
"#;

    struct Sandbox {
        temp: TempDir,
        log: PathBuf,
    }

    impl Sandbox {
        fn new() -> Self {
            let temp = TempDir::new().unwrap();

            let bun = temp.path().join("fake-bun");
            std::fs::write(&bun, FAKE_BUN).unwrap();
            std::fs::set_permissions(&bun, std::fs::Permissions::from_mode(0o755)).unwrap();

            std::fs::write(
                temp.path().join("config.toml"),
                format!("[runtime]\nprogram = \"{}\"\n", bun.display()),
            )
            .unwrap();

            let log = temp.path().join("bun.log");
            Self { temp, log }
        }

        fn script(&self, name: &str, source: &str) -> PathBuf {
            let path = self.temp.path().join(name);
            std::fs::write(&path, source).unwrap();
            path
        }

        fn cache_root(&self) -> PathBuf {
            self.temp.path().join("cache")
        }

        fn bunv(&self) -> Command {
            let mut cmd = cargo_bin_cmd!("bunv");
            cmd.env_remove("BUNV_CONFIG")
                .env_remove("BUNV_CACHE_DIR")
                .env_remove("NODE_PATH")
                .env("FAKE_BUN_LOG", &self.log)
                .arg("--config")
                .arg(self.temp.path().join("config.toml"))
                .arg("--cache-dir")
                .arg(self.cache_root());
            cmd
        }

        fn run(&self, script: &Path) -> Command {
            let mut cmd = self.bunv();
            cmd.arg("run").arg(script);
            cmd
        }

        fn invocations(&self) -> Vec<String> {
            std::fs::read_to_string(&self.log)
                .unwrap_or_default()
                .lines()
                .map(str::to_string)
                .collect()
        }

        fn install_count(&self) -> usize {
            self.invocations()
                .iter()
                .filter(|line| line.starts_with("install"))
                .count()
        }

        fn entries(&self) -> Vec<PathBuf> {
            std::fs::read_dir(self.cache_root())
                .map(|dir| dir.filter_map(|e| e.ok()).map(|e| e.path()).collect())
                .unwrap_or_default()
        }
    }

    #[test]
    fn first_run_installs_then_reuses() {
        let sandbox = Sandbox::new();
        let script = sandbox.script("cli.ts", COMMANDER_SCRIPT);

        sandbox
            .run(&script)
            .assert()
            .success()
            .stdout(predicate::str::contains("script=cli.ts"))
            // installer output must not reach stdout
            .stdout(predicate::str::contains("installing").not());

        let entries = sandbox.entries();
        assert_eq!(entries.len(), 1);
        let manifest = std::fs::read_to_string(entries[0].join("package.json")).unwrap();
        assert!(manifest.contains("\"commander\": \"latest\""));
        assert!(manifest.contains("\"@types/node\": \"latest\""));
        assert_eq!(sandbox.install_count(), 1);

        sandbox.run(&script).assert().success();

        assert_eq!(sandbox.entries().len(), 1);
        assert_eq!(sandbox.install_count(), 1);
    }

    #[test]
    fn with_overrides_and_forwarded_args() {
        let sandbox = Sandbox::new();
        let script = sandbox.script("plain.ts", "console.log(process.argv);\n");

        sandbox
            .run(&script)
            .args(["--with", "lodash@4.17.21", "--", "--flag", "value"])
            .assert()
            .success()
            .stdout(predicate::str::contains("args=--flag value"));

        let entries = sandbox.entries();
        assert_eq!(entries.len(), 1);
        let manifest = std::fs::read_to_string(entries[0].join("package.json")).unwrap();
        assert!(manifest.contains("\"lodash\": \"4.17.21\""));
    }

    #[test]
    fn module_path_points_into_entry() {
        let sandbox = Sandbox::new();
        let script = sandbox.script("cli.ts", COMMANDER_SCRIPT);

        let output = sandbox.run(&script).output().unwrap();
        let stdout = String::from_utf8_lossy(&output.stdout);

        let entry = &sandbox.entries()[0];
        let expected = format!("module_path={}\n", entry.display());
        assert!(stdout.contains(&expected), "stdout was: {}", stdout);
    }

    #[test]
    fn base_only_script_skips_install() {
        let sandbox = Sandbox::new();
        let script = sandbox.script("bare.ts", "console.log(1);\n");

        sandbox.run(&script).assert().success();

        assert_eq!(sandbox.install_count(), 0);
        let entries = sandbox.entries();
        assert_eq!(entries.len(), 1);
        assert!(entries[0].join("package.json").exists());
    }

    #[test]
    fn exit_code_propagates() {
        let sandbox = Sandbox::new();
        let script = sandbox.script("fail.ts", "process.exit(3);\n");

        sandbox
            .run(&script)
            .env("FAKE_BUN_EXIT", "3")
            .assert()
            .code(3);
    }

    #[test]
    fn declared_version_wins_over_with() {
        let sandbox = Sandbox::new();
        let script = sandbox.script("cli.ts", COMMANDER_SCRIPT);

        sandbox
            .run(&script)
            .args(["--with", "commander@12"])
            .assert()
            .success();

        let entries = sandbox.entries();
        let manifest = std::fs::read_to_string(entries[0].join("package.json")).unwrap();
        assert!(manifest.contains("\"commander\": \"latest\""));
    }

    #[test]
    fn fresh_reinstalls() {
        let sandbox = Sandbox::new();
        let script = sandbox.script("cli.ts", COMMANDER_SCRIPT);

        sandbox.run(&script).assert().success();
        sandbox.bunv().args(["run", "--fresh"]).arg(&script).assert().success();

        assert_eq!(sandbox.install_count(), 2);
        assert_eq!(sandbox.entries().len(), 1);
    }

    #[test]
    fn cache_list_shows_entry() {
        let sandbox = Sandbox::new();
        let script = sandbox.script("cli.ts", COMMANDER_SCRIPT);
        sandbox.run(&script).assert().success();

        let name = sandbox.entries()[0]
            .file_name()
            .unwrap()
            .to_string_lossy()
            .into_owned();

        sandbox
            .bunv()
            .args(["cache", "list", "--format", "plain"])
            .assert()
            .success()
            .stdout(predicate::str::contains(name));
    }
}
