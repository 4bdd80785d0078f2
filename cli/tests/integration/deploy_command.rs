//! Integration tests for the production confirmation gate and deploy
//! preconditions. None of these reach docker: the gate declines, or a
//! missing Dockerfile stops the pipeline first.

#![allow(clippy::expect_used)]

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn agentctl_in(dir: &TempDir) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("agentctl"));
    cmd.env("NO_COLOR", "1").current_dir(dir.path());
    cmd
}

#[test]
fn test_production_deploy_prompts_and_cancels_on_no() {
    let dir = TempDir::new().expect("tempdir");
    agentctl_in(&dir)
        .args(["deploy", "deploy", "--env", "production"])
        .write_stdin("no\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Deploy to production?"))
        .stdout(predicate::str::contains("Cancelled."));
}

#[test]
fn test_production_deploy_cancels_on_any_non_affirmative_answer() {
    let dir = TempDir::new().expect("tempdir");
    agentctl_in(&dir)
        .args(["deploy", "deploy", "-e", "production"])
        .write_stdin("nah\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Cancelled."));
}

#[test]
fn test_production_deploy_cancels_on_closed_stdin() {
    let dir = TempDir::new().expect("tempdir");
    agentctl_in(&dir)
        .args(["deploy", "deploy", "--env", "production"])
        .write_stdin("")
        .assert()
        .success()
        .stdout(predicate::str::contains("Cancelled."));
}

#[test]
fn test_production_deploy_with_force_skips_gate_and_proceeds() {
    // The gate is skipped, so the pipeline reaches the Dockerfile
    // precondition and fails there — proving no prompt was consulted.
    let dir = TempDir::new().expect("tempdir");
    agentctl_in(&dir)
        .args(["deploy", "deploy", "--env", "production", "--force"])
        .write_stdin("")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Dockerfile not found"));
}

#[test]
fn test_staging_deploy_never_prompts() {
    // Closed stdin would cancel a gated deploy; staging must instead reach
    // the Dockerfile precondition.
    let dir = TempDir::new().expect("tempdir");
    agentctl_in(&dir)
        .args(["deploy", "deploy"])
        .write_stdin("")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Dockerfile not found"));
}

#[test]
fn test_production_deploy_affirmative_answer_reaches_build() {
    // "yes" passes the gate; the missing Dockerfile then stops the
    // pipeline before anything is spawned.
    let dir = TempDir::new().expect("tempdir");
    agentctl_in(&dir)
        .args(["deploy", "deploy", "--env", "production"])
        .write_stdin("yes\n")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Dockerfile not found"));
}

#[test]
fn test_deploy_build_requires_dockerfile() {
    let dir = TempDir::new().expect("tempdir");
    agentctl_in(&dir)
        .args(["deploy", "build"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Dockerfile not found"));
}
