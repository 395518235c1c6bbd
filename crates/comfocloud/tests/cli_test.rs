#![allow(clippy::unwrap_used)]
// Smoke tests for the CLI surface: argument parsing, help text, exit codes.
// Anything touching the network lives in comfocloud-core's tests.

use assert_cmd::Command;
use predicates::prelude::*;

fn cmd() -> Command {
    Command::cargo_bin("comfocloud").unwrap()
}

#[test]
fn help_lists_commands() {
    cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("devices"))
        .stdout(predicate::str::contains("login"))
        .stdout(predicate::str::contains("fan"))
        .stdout(predicate::str::contains("bypass"));
}

#[test]
fn version_prints() {
    cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("comfocloud"));
}

#[test]
fn no_args_shows_usage() {
    cmd()
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("Usage"));
}

#[test]
fn unknown_subcommand_is_a_usage_error() {
    cmd().arg("frobnicate").assert().failure().code(2);
}

#[test]
fn fan_rejects_out_of_range_percentage() {
    cmd()
        .args(["fan", "12345", "--percentage", "150"])
        .assert()
        .failure()
        .code(2);
}

#[test]
fn fan_rejects_conflicting_flags() {
    cmd()
        .args(["fan", "12345", "--percentage", "50", "--off"])
        .assert()
        .failure()
        .code(2);
}

#[test]
fn completions_generate_for_bash() {
    cmd()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("comfocloud"));
}

#[test]
fn config_path_prints_a_path() {
    cmd()
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("config.toml"));
}
