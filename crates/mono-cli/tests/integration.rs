#![allow(deprecated)]
use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn mono(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("mono").unwrap();
    cmd.current_dir(dir.path())
        .env("MONO_ROOT", dir.path())
        .env_remove("MONO_CONFIG")
        .env_remove("RUST_LOG");
    cmd
}

/// A monorepo with `py/` and `ts/` roots whose actions are plain `sh`
/// snippets, so the tests do not need uv or pnpm installed.
const FIXTURE: &str = r#"
namespaces:
  - name: py
    root: py
    actions:
      - name: sync
        command: [sh, -c, "echo py-sync >> ../log.txt"]
      - name: lint
        command: [sh, -c, "echo py-lint >> ../log.txt; exit ${PY_LINT_EXIT:-0}"]
      - name: format
        command: [sh, -c, "pwd > ../format-cwd.txt"]
      - name: check
        command: [sh, -c, "exit 0"]
  - name: py-pkg
    root: py
    actions:
      - name: run
        command: [sh, -c, 'echo "run:$0" >> ../log.txt', "{target}"]
        args:
          - name: target
            required: true
      - name: tool
        command: mono-test-missing-tool-9c1e {target}
        args:
          - name: target
            required: true
  - name: ts
    root: ts
    actions:
      - name: lint
        command: [sh, -c, "echo ts-lint >> ../log.txt"]
      - name: fail
        command: [sh, -c, "exit 4"]
composites:
  - name: lint
    steps:
      - [py, lint]
      - [ts, lint]
"#;

fn fixture() -> TempDir {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("mono.yaml"), FIXTURE).unwrap();
    std::fs::create_dir_all(dir.path().join("py")).unwrap();
    std::fs::create_dir_all(dir.path().join("ts")).unwrap();
    dir
}

fn log(dir: &TempDir) -> Vec<String> {
    std::fs::read_to_string(dir.path().join("log.txt"))
        .unwrap_or_default()
        .lines()
        .map(str::to_string)
        .collect()
}

// ---------------------------------------------------------------------------
// listing
// ---------------------------------------------------------------------------

#[test]
fn no_args_lists_the_table() {
    let dir = fixture();
    mono(&dir)
        .assert()
        .success()
        .stdout(predicate::str::contains("py lint"))
        .stdout(predicate::str::contains("py-pkg run <target>"))
        .stdout(predicate::str::contains("COMPOSITE"));
}

#[test]
fn help_and_list_flag_match_no_args() {
    let dir = fixture();
    let bare = mono(&dir).output().unwrap().stdout;
    let help = mono(&dir).arg("help").output().unwrap().stdout;
    let list = mono(&dir).arg("--list").output().unwrap().stdout;
    assert_eq!(bare, help);
    assert_eq!(bare, list);
}

#[test]
fn list_json_keeps_table_order() {
    let dir = fixture();
    let out = mono(&dir).args(["--list", "--json"]).output().unwrap();
    assert!(out.status.success());

    let value: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
    let names: Vec<&str> = value["namespaces"]
        .as_array()
        .unwrap()
        .iter()
        .map(|ns| ns["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["py", "py-pkg", "ts"]);
    assert_eq!(value["composites"][0]["steps"][1], "ts lint");
    assert_eq!(value["namespaces"][1]["actions"][1]["available"], false);
}

#[test]
fn builtin_table_is_used_without_config() {
    let dir = TempDir::new().unwrap();
    mono(&dir)
        .arg("--list")
        .assert()
        .success()
        .stdout(predicate::str::contains("ts-pkg build <target>"))
        .stdout(predicate::str::contains("uv run ruff check ."));
}

// ---------------------------------------------------------------------------
// single dispatch
// ---------------------------------------------------------------------------

#[test]
fn dispatch_runs_in_namespace_root() {
    let dir = fixture();
    mono(&dir).args(["py", "format"]).assert().success();

    let cwd = std::fs::read_to_string(dir.path().join("format-cwd.txt")).unwrap();
    let expected = dir.path().join("py").canonicalize().unwrap();
    assert_eq!(std::path::PathBuf::from(cwd.trim()).canonicalize().unwrap(), expected);
}

#[test]
fn dispatch_echoes_command_to_stderr() {
    let dir = fixture();
    mono(&dir)
        .args(["py", "check"])
        .assert()
        .success()
        .stderr(predicate::str::contains("[py] sh -c"));
}

#[test]
fn quiet_suppresses_echo() {
    let dir = fixture();
    mono(&dir)
        .args(["--quiet", "py", "check"])
        .assert()
        .success()
        .stderr(predicate::str::is_empty());
}

#[test]
fn child_exit_code_is_propagated() {
    let dir = fixture();
    mono(&dir).args(["ts", "fail"]).assert().code(4);
}

#[test]
fn pkg_namespace_forwards_target() {
    let dir = fixture();
    mono(&dir)
        .args(["py-pkg", "run", "example"])
        .assert()
        .success();
    assert_eq!(log(&dir), vec!["run:example"]);
}

#[test]
fn repeated_dispatch_is_independent() {
    let dir = fixture();
    mono(&dir).args(["py", "sync"]).assert().success();
    mono(&dir).args(["py", "sync"]).assert().success();
    assert_eq!(log(&dir), vec!["py-sync", "py-sync"]);
}

// ---------------------------------------------------------------------------
// errors
// ---------------------------------------------------------------------------

#[test]
fn unknown_action_lists_available_actions() {
    let dir = fixture();
    mono(&dir)
        .args(["py", "bogus"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Unknown py command: bogus"))
        .stderr(predicate::str::contains("Available: sync, lint, format, check"));
    assert!(log(&dir).is_empty());
}

#[test]
fn unknown_namespace_lists_namespaces() {
    let dir = fixture();
    mono(&dir)
        .args(["go", "build"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Unknown command: go"))
        .stderr(predicate::str::contains("py, py-pkg, ts"));
}

#[test]
fn missing_action_lists_available_actions() {
    let dir = fixture();
    mono(&dir)
        .arg("ts")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Missing ts command"))
        .stderr(predicate::str::contains("Available: lint, fail"));
}

#[test]
fn missing_target_shows_usage() {
    let dir = fixture();
    mono(&dir)
        .args(["py-pkg", "run"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Usage: mono py-pkg run <target>"));
    assert!(log(&dir).is_empty());
}

#[test]
fn missing_executable_exits_127() {
    let dir = fixture();
    mono(&dir)
        .args(["py-pkg", "tool", "example"])
        .assert()
        .code(127)
        .stderr(predicate::str::contains("mono-test-missing-tool-9c1e: command not found"));
}

#[test]
fn missing_namespace_root_is_reported() {
    let dir = fixture();
    std::fs::remove_dir_all(dir.path().join("ts")).unwrap();
    mono(&dir)
        .args(["ts", "lint"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("ts root does not exist"));
}

#[test]
fn composite_rejects_arguments() {
    let dir = fixture();
    mono(&dir)
        .args(["lint", "--fix"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("takes no arguments"));
}

// ---------------------------------------------------------------------------
// composites
// ---------------------------------------------------------------------------

#[test]
fn composite_runs_steps_in_order() {
    let dir = fixture();
    mono(&dir).arg("lint").assert().success();
    assert_eq!(log(&dir), vec!["py-lint", "ts-lint"]);
}

#[test]
fn composite_stops_at_first_failure() {
    let dir = fixture();
    mono(&dir)
        .arg("lint")
        .env("PY_LINT_EXIT", "2")
        .assert()
        .code(2);
    assert_eq!(log(&dir), vec!["py-lint"]);
}

// ---------------------------------------------------------------------------
// dry run, validate, init
// ---------------------------------------------------------------------------

#[test]
fn dry_run_prints_without_running() {
    let dir = fixture();
    mono(&dir)
        .args(["--dry-run", "lint"])
        .assert()
        .success()
        .stderr(predicate::str::contains("[py] sh -c"))
        .stderr(predicate::str::contains("[ts] sh -c"));
    assert!(log(&dir).is_empty());
}

#[test]
fn dry_run_resolves_builtin_pkg_command() {
    let dir = TempDir::new().unwrap();
    mono(&dir)
        .args(["-n", "py-pkg", "run", "example"])
        .assert()
        .success()
        .stderr(predicate::str::contains("[py-pkg] uv run example"));
}

#[test]
fn validate_reports_clean_table() {
    let dir = fixture();
    mono(&dir)
        .arg("--validate")
        .assert()
        .success()
        .stdout(predicate::str::contains("Command table is valid"));
}

#[test]
fn invalid_table_blocks_dispatch() {
    let dir = TempDir::new().unwrap();
    std::fs::write(
        dir.path().join("mono.yaml"),
        "namespaces:\n  - name: py\n    root: .\n    actions:\n      - { name: lint, command: 'true' }\ncomposites:\n  - name: all\n    steps:\n      - [ts, lint]\n",
    )
    .unwrap();

    mono(&dir)
        .arg("--validate")
        .assert()
        .code(1)
        .stdout(predicate::str::contains("[error]"));
    mono(&dir)
        .args(["py", "lint"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("command table has errors"));
}

#[test]
fn malformed_config_is_reported() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("mono.yaml"), "namespaces: {not: [a list\n").unwrap();
    mono(&dir)
        .args(["py", "lint"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("failed to load command table"));
}

#[test]
fn explicit_config_flag_overrides_root_file() {
    let dir = fixture();
    let other = dir.path().join("alt.yaml");
    std::fs::write(
        &other,
        "namespaces:\n  - name: docs\n    root: .\n    actions:\n      - { name: build, command: 'true' }\n",
    )
    .unwrap();
    mono(&dir)
        .arg("--config")
        .arg(&other)
        .arg("--list")
        .assert()
        .success()
        .stdout(predicate::str::contains("docs build"))
        .stdout(predicate::str::contains("py lint").not());
}

#[test]
fn init_writes_builtin_table_once() {
    let dir = TempDir::new().unwrap();
    mono(&dir)
        .arg("--init")
        .assert()
        .success()
        .stdout(predicate::str::contains("Created"));
    assert!(dir.path().join("mono.yaml").exists());

    std::fs::write(dir.path().join("mono.yaml"), FIXTURE).unwrap();
    mono(&dir)
        .arg("--init")
        .assert()
        .success()
        .stdout(predicate::str::contains("already exists"));
    let content = std::fs::read_to_string(dir.path().join("mono.yaml")).unwrap();
    assert_eq!(content, FIXTURE);
}

#[test]
fn validate_json_reports_warning_levels() {
    let dir = TempDir::new().unwrap();
    std::fs::write(
        dir.path().join("mono.yaml"),
        "namespaces:\n  - name: py\n    root: .\n    actions:\n      - { name: lint, command: 'true' }\ncomposites:\n  - name: all\n    steps:\n      - [ts, lint]\n  - name: none\n    steps: []\n",
    )
    .unwrap();

    let out = mono(&dir).args(["--validate", "--json"]).output().unwrap();
    assert_eq!(out.status.code(), Some(1));

    let value: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
    let levels: Vec<&str> = value["warnings"]
        .as_array()
        .unwrap()
        .iter()
        .map(|w| w["level"].as_str().unwrap())
        .collect();
    assert!(levels.contains(&"error"));
    assert!(levels.contains(&"warning"));
}

// ---------------------------------------------------------------------------
// logging
// ---------------------------------------------------------------------------

#[test]
fn rust_log_bare_level_enables_debug_output() {
    let dir = fixture();
    mono(&dir)
        .env("RUST_LOG", "debug")
        .args(["-n", "py", "lint"])
        .assert()
        .success()
        .stderr(predicate::str::contains("DEBUG"));
}

#[test]
fn default_log_level_hides_debug_output() {
    let dir = fixture();
    mono(&dir)
        .args(["-n", "py", "lint"])
        .assert()
        .success()
        .stderr(predicate::str::contains("DEBUG").not());
}
