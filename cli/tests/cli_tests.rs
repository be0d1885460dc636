//! Integration tests for the tfsmoke CLI surface.
//!
//! These tests exercise argument parsing and pre-provisioning validation;
//! nothing here touches a real terraform binary or the network.

#![allow(clippy::expect_used)]

use assert_cmd::Command;
use predicates::prelude::*;

fn tfsmoke() -> Command {
    Command::cargo_bin("tfsmoke").expect("tfsmoke binary should exist")
}

// --- Help and version tests ---

#[test]
fn test_cli_no_args_shows_help_and_exits_two() {
    // clap with arg_required_else_help shows help on stderr and exits 2
    tfsmoke()
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Terraform smoke tests"));
}

#[test]
fn test_cli_help_flag_shows_help() {
    tfsmoke()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage:"))
        .stdout(predicate::str::contains("Commands:"));
}

#[test]
fn test_help_lists_all_commands() {
    tfsmoke()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("run"))
        .stdout(predicate::str::contains("probe"))
        .stdout(predicate::str::contains("destroy"))
        .stdout(predicate::str::contains("version"));
}

#[test]
fn test_version_command_shows_version() {
    tfsmoke()
        .arg("version")
        .assert()
        .success()
        .stdout(predicate::str::contains("tfsmoke 0.1.0"));
}

#[test]
fn test_version_command_json_outputs_valid_json() {
    tfsmoke()
        .arg("version")
        .arg("--json")
        .assert()
        .success()
        .stdout(predicate::str::contains(r#"{"version":"0.1.0"}"#));
}

// --- run argument validation ---

#[test]
fn test_run_requires_dir_or_config() {
    tfsmoke()
        .arg("run")
        .assert()
        .failure()
        .stderr(predicate::str::contains("--dir"));
}

#[test]
fn test_run_rejects_nonexistent_dir() {
    tfsmoke()
        .args(["run", "--dir", "/definitely/not/a/real/dir"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("does not exist"));
}

#[test]
fn test_run_rejects_zero_attempts() {
    // Validation fails before any terraform command is spawned.
    tfsmoke()
        .args(["run", "--dir", ".", "--max-attempts", "0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("at least 1"));
}

#[test]
fn test_run_reports_missing_terraform_binary() {
    tfsmoke()
        .args(["run", "--dir", "."])
        .env("TFSMOKE_TERRAFORM_BIN", "tfsmoke-missing-binary")
        .assert()
        .failure()
        .stderr(predicate::str::contains("not found on PATH"));
}

#[test]
fn test_run_rejects_dir_and_config_together() {
    tfsmoke()
        .args(["run", "--dir", ".", "--config", "tfsmoke.yaml"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("cannot be used with"));
}

// --- probe ---

#[test]
fn test_probe_unreachable_url_exhausts_attempts() {
    tfsmoke()
        .args([
            "probe",
            "http://127.0.0.1:9/health",
            "--max-attempts",
            "2",
            "--delay",
            "0",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("gave up after 2 attempts"));
}

// --- destroy ---

#[test]
fn test_destroy_requires_dir() {
    tfsmoke().arg("destroy").assert().code(2);
}

#[test]
fn test_destroy_without_yes_can_be_cancelled() {
    tfsmoke()
        .args(["destroy", "--dir", "."])
        .write_stdin("n\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Cancelled."));
}
