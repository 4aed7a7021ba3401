//! Integration tests for the tracetrim binary.

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

const TRACE: &str = "Error: Objects are not valid as a React child
    at ReactErrorUtils.invokeGuardedCallback (react-dom.development.js:138:15)
    at ReactErrorUtils.invokeGuardedCallback (react-dom.development.js:138:15)
    at ReactErrorUtils.invokeGuardedCallback (react-dom.development.js:138:15)
    at ReactCompositeComponent._renderValidatedComponent (react-dom.development.js:185:13)
";

/// Binary isolated from the user's configuration.
fn tracetrim(home: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("tracetrim").unwrap();
    cmd.current_dir(home.path())
        .env("HOME", home.path())
        .env("XDG_CONFIG_HOME", home.path().join(".config"))
        .env_remove("RUST_LOG")
        .env_remove("TRACETRIM_CONFIG");
    cmd
}

#[test]
fn clean_stdin_collapses_frames() {
    let home = TempDir::new().unwrap();
    tracetrim(&home)
        .arg("clean")
        .write_stdin(TRACE)
        .assert()
        .success()
        .stdout(predicate::str::starts_with(
            "// Removed 2 repetitive stack frame(s)\nError: Objects are not valid as a React child\n",
        ))
        .stdout(predicate::str::contains("_renderValidatedComponent"));
}

#[test]
fn clean_passes_prose_through_verbatim() {
    let home = TempDir::new().unwrap();
    let text = "This is just regular text that should not be processed as a stack trace\n";
    tracetrim(&home)
        .arg("clean")
        .write_stdin(text)
        .assert()
        .success()
        .stdout(text);
}

#[test]
fn clean_strict_fails_on_prose() {
    let home = TempDir::new().unwrap();
    tracetrim(&home)
        .args(["clean", "--strict"])
        .write_stdin("nothing to see here, just words")
        .assert()
        .code(2)
        .stdout("")
        .stderr(predicate::str::contains("No stack trace detected"));
}

#[test]
fn clean_strict_fails_on_empty_input() {
    let home = TempDir::new().unwrap();
    tracetrim(&home)
        .args(["clean", "--strict"])
        .write_stdin("   \n")
        .assert()
        .code(2);
}

#[test]
fn clean_json_format() {
    let home = TempDir::new().unwrap();
    let output = tracetrim(&home)
        .args(["clean", "--format", "json"])
        .write_stdin(TRACE)
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let json: serde_json::Value = serde_json::from_slice(&output).unwrap();
    assert_eq!(json["removed_count"], 2);
    assert_eq!(json["lines_before"], 6);
    assert_eq!(
        json["error_info"]["message"],
        "Error: Objects are not valid as a React child"
    );
}

#[test]
fn clean_json_format_on_empty_input() {
    let home = TempDir::new().unwrap();
    let output = tracetrim(&home)
        .args(["clean", "--format", "json"])
        .write_stdin("")
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let json: serde_json::Value = serde_json::from_slice(&output).unwrap();
    assert_eq!(json["removed_count"], 0);
    assert_eq!(json["cleaned"], "");
    assert!(json.get("error_info").map_or(true, serde_json::Value::is_null));
}

#[test]
fn clean_stats_format() {
    let home = TempDir::new().unwrap();
    tracetrim(&home)
        .args(["clean", "--format", "stats"])
        .write_stdin(TRACE)
        .assert()
        .success()
        .stdout(predicate::str::contains("Frames removed: 2"))
        .stdout(predicate::str::contains("Kind:           React"));
}

#[test]
fn clean_in_place_rewrites_file() {
    let home = TempDir::new().unwrap();
    let path = home.path().join("trace.txt");
    std::fs::write(&path, TRACE).unwrap();

    tracetrim(&home)
        .args(["--quiet", "clean", "--in-place"])
        .arg(&path)
        .assert()
        .success()
        .stdout("");

    let cleaned = std::fs::read_to_string(&path).unwrap();
    assert!(cleaned.starts_with("// Removed 2 repetitive stack frame(s)\n"));
}

#[test]
fn clean_missing_file() {
    let home = TempDir::new().unwrap();
    tracetrim(&home)
        .args(["clean", "does-not-exist.txt"])
        .assert()
        .code(3)
        .stderr(predicate::str::contains("does-not-exist.txt"));
}

#[test]
fn check_reports_trace() {
    let home = TempDir::new().unwrap();
    tracetrim(&home)
        .arg("check")
        .write_stdin(TRACE)
        .assert()
        .success()
        .stdout("React stack trace detected\n");
}

#[test]
fn check_rejects_prose() {
    let home = TempDir::new().unwrap();
    tracetrim(&home)
        .arg("check")
        .write_stdin("Hello, this is a normal sentence.")
        .assert()
        .code(1)
        .stdout("No stack trace detected\n");
}

#[test]
fn detection_flags_override_defaults() {
    let home = TempDir::new().unwrap();
    tracetrim(&home)
        .args(["--min-stack-lines", "1", "check"])
        .write_stdin("Something failed somewhere\n    at main (index.js:1:1)")
        .assert()
        .success();
}

#[test]
fn project_config_is_applied() {
    let home = TempDir::new().unwrap();
    std::fs::write(
        home.path().join(".tracetrim.toml"),
        "[parser]\nmin_detection_lines = 1\n",
    )
    .unwrap();

    tracetrim(&home)
        .arg("check")
        .write_stdin("Something failed somewhere\n    at main (index.js:1:1)")
        .assert()
        .success();
}

#[test]
fn invalid_config_fails_with_config_exit_code() {
    let home = TempDir::new().unwrap();
    let config = home.path().join("bad.toml");
    std::fs::write(&config, "[clipboard]\npolling_interval_ms = 1\n").unwrap();

    tracetrim(&home)
        .arg("--config")
        .arg(&config)
        .args(["config", "validate"])
        .assert()
        .code(5)
        .stderr(predicate::str::contains("polling interval"));
}

#[test]
fn malformed_global_config_is_reported() {
    let home = TempDir::new().unwrap();
    let dir = home.path().join(".config").join("tracetrim");
    std::fs::create_dir_all(&dir).unwrap();
    std::fs::write(dir.join("config.toml"), "[parser\nthis is not toml\n").unwrap();

    tracetrim(&home)
        .args(["config", "validate"])
        .assert()
        .code(5)
        .stdout("")
        .stderr(predicate::str::contains("config.toml"));
}

#[test]
fn invalid_custom_pattern_is_rejected() {
    let home = TempDir::new().unwrap();
    tracetrim(&home)
        .args(["--custom-pattern", "(", "check"])
        .write_stdin(TRACE)
        .assert()
        .code(5);
}

#[test]
fn config_init_then_validate() {
    let home = TempDir::new().unwrap();
    tracetrim(&home)
        .args(["config", "init", "--project"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Created configuration file"));

    assert!(home.path().join(".tracetrim.toml").exists());

    tracetrim(&home)
        .args(["config", "validate"])
        .assert()
        .success()
        .stdout("Configuration is valid\n");
}

#[test]
fn no_subcommand_in_pipeline_runs_clean() {
    let home = TempDir::new().unwrap();
    tracetrim(&home)
        .write_stdin(TRACE)
        .assert()
        .success()
        .stdout(predicate::str::starts_with("// Removed 2 repetitive stack frame(s)"));
}

#[test]
fn completions_generate() {
    let home = TempDir::new().unwrap();
    tracetrim(&home)
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("tracetrim"));
}
