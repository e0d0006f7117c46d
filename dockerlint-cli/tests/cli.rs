//! Runs the compiled binary, either with no linter at all or against a
//! stand-in `hadolint` script.

use std::path::{Path, PathBuf};
use std::process::{Command, Output};

const MISSING_HADOLINT: &str = "dockerlint-test-missing-hadolint";

fn dockerlint(args: &[&str]) -> Output {
    dockerlint_in(&scratch_dir(), MISSING_HADOLINT, args)
}

fn dockerlint_in(dir: &Path, hadolint: &str, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_dockerlint"))
        .args(args)
        .current_dir(dir)
        .env("DOCKERLINT_HADOLINT_BIN", hadolint)
        .env("DOCKERLINT_CONTAINER_RUNTIME", "dockerlint-test-missing-runtime")
        .output()
        .expect("run dockerlint")
}

/// Stand-in hadolint: answers `--version`, echoes to both streams, and
/// rejects any target whose file name is `A`.
#[cfg(unix)]
fn fake_hadolint(dir: &Path) -> String {
    use std::os::unix::fs::PermissionsExt;

    let script = dir.join("fake-hadolint");
    std::fs::write(
        &script,
        "#!/bin/sh\n\
         if [ \"$1\" = \"--version\" ]; then echo 'Haskell Dockerfile Linter 0.0'; exit 0; fi\n\
         if [ \"$1\" != \"--failure-threshold\" ]; then exit 2; fi\n\
         echo \"LEAKED-CHILD-STDOUT $*\"\n\
         echo \"child stderr $*\" >&2\n\
         case \"$3\" in */A) exit 1;; esac\n\
         exit 0\n",
    )
    .expect("write fake hadolint");
    let mut permissions = std::fs::metadata(&script).expect("metadata").permissions();
    permissions.set_mode(0o755);
    std::fs::set_permissions(&script, permissions).expect("chmod fake hadolint");
    script.display().to_string()
}

#[cfg(unix)]
fn strings(value: &serde_json::Value) -> Vec<String> {
    value
        .as_array()
        .expect("array")
        .iter()
        .map(|item| item.as_str().expect("string").to_string())
        .collect()
}

fn report(output: &Output) -> serde_json::Value {
    let stdout = String::from_utf8(output.stdout.clone()).expect("utf8 stdout");
    serde_json::from_str(&stdout).expect("stdout holds exactly one JSON object")
}

fn scratch_dir() -> PathBuf {
    let nanos = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .expect("system time")
        .as_nanos();
    let dir = std::env::temp_dir().join(format!("dockerlint_cli_test_{nanos}"));
    std::fs::create_dir_all(&dir).expect("create scratch dir");
    dir
}

#[test]
fn help_prints_usage_on_stderr_and_empty_report() {
    let output = dockerlint(&["-f", "Dockerfile", "--help"]);
    assert_eq!(output.status.code(), Some(0));

    let value = report(&output);
    assert_eq!(value["exitCode"], 0);
    assert_eq!(value["runner"], "unknown");
    assert_eq!(value["targets"], serde_json::json!([]));
    assert_eq!(value["missing"], serde_json::json!([]));
    assert_eq!(value["failed"], serde_json::json!([]));

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("--failure-threshold"));
}

#[test]
fn unknown_flag_fails_with_report() {
    let output = dockerlint(&["--bogus"]);
    assert_eq!(output.status.code(), Some(1));
    assert_eq!(report(&output)["exitCode"], 1);
    assert!(String::from_utf8_lossy(&output.stderr).contains("--bogus"));
}

#[test]
fn unavailable_environment_keeps_resolution() {
    let output = dockerlint(&["-t", "error", "--strict-files"]);
    assert_eq!(output.status.code(), Some(1));

    let value = report(&output);
    assert_eq!(value["exitCode"], 1);
    assert_eq!(value["threshold"], "error");
    assert_eq!(value["strict"], true);
    assert_eq!(value["runner"], "unknown");
    let missing = value["missing"].as_array().expect("missing array");
    assert_eq!(missing.len(), 1);
    assert!(missing[0].as_str().expect("path").ends_with("Dockerfile"));
    assert!(value["finishedAtEpochMs"].as_i64() >= value["startedAtEpochMs"].as_i64());

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("dockerlint-test-missing-hadolint"));
    assert!(stderr.contains("dockerlint-test-missing-runtime"));
}

#[cfg(unix)]
#[test]
fn binary_runner_lints_existing_target() {
    let dir = scratch_dir();
    std::fs::write(dir.join("Dockerfile.dev"), "FROM alpine:3.19\n").expect("write target");
    let hadolint = fake_hadolint(&dir);

    let output = dockerlint_in(&dir, &hadolint, &["-f", "Dockerfile.dev", "-t", "error"]);
    assert_eq!(output.status.code(), Some(0));

    let value = report(&output);
    assert_eq!(value["exitCode"], 0);
    assert_eq!(value["threshold"], "error");
    assert_eq!(value["runner"], "binary");
    let targets = strings(&value["targets"]);
    assert_eq!(targets.len(), 1);
    assert!(targets[0].ends_with("/Dockerfile.dev"));
    assert!(strings(&value["missing"]).is_empty());
    assert!(strings(&value["failed"]).is_empty());

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("LEAKED-CHILD-STDOUT --failure-threshold error"));
}

#[cfg(unix)]
#[test]
fn failing_target_does_not_stop_later_targets() {
    let dir = scratch_dir();
    std::fs::write(dir.join("A"), "FROM alpine:3.19\n").expect("write A");
    std::fs::write(dir.join("B"), "FROM alpine:3.19\n").expect("write B");
    let hadolint = fake_hadolint(&dir);

    let output = dockerlint_in(&dir, &hadolint, &["-f", "A", "-f", "B"]);
    assert_eq!(output.status.code(), Some(1));

    let stdout = String::from_utf8(output.stdout.clone()).expect("utf8 stdout");
    assert!(!stdout.contains("LEAKED-CHILD-STDOUT"));
    let value = report(&output);
    assert_eq!(value["exitCode"], 1);
    assert_eq!(value["runner"], "binary");
    let targets = strings(&value["targets"]);
    assert_eq!(targets.len(), 2);
    assert!(targets[0].ends_with("/A"));
    assert!(targets[1].ends_with("/B"));
    assert_eq!(strings(&value["failed"]), vec![targets[0].clone()]);

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("child stderr --failure-threshold warning"));
    let second = format!("LEAKED-CHILD-STDOUT --failure-threshold warning {}", targets[1]);
    assert!(stderr.contains(&second));
    assert!(stderr.contains("1/2 target(s) passed with the binary runner"));
}
