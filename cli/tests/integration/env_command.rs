//! Integration tests for `.env` management: init, check, set (with backup),
//! and masked show.

#![allow(clippy::expect_used)]

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn agentctl_in(dir: &TempDir) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("agentctl"));
    cmd.env("NO_COLOR", "1")
        .env_remove("OPENAI_API_KEY")
        .current_dir(dir.path());
    cmd
}

fn backups_in(dir: &TempDir) -> Vec<String> {
    std::fs::read_dir(dir.path())
        .expect("read_dir")
        .filter_map(|entry| {
            let name = entry.expect("dir entry").file_name().into_string().ok()?;
            name.starts_with(".env.backup.").then_some(name)
        })
        .collect()
}

#[test]
fn test_env_init_creates_file_with_placeholder() {
    let dir = TempDir::new().expect("tempdir");
    agentctl_in(&dir)
        .args(["env", "init"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Created"));

    let content = std::fs::read_to_string(dir.path().join(".env")).expect("read .env");
    assert!(content.contains("OPENAI_API_KEY=your_openai_api_key_here"));
    assert!(content.contains("API_PORT=8000"));
}

#[test]
fn test_env_init_is_idempotent() {
    let dir = TempDir::new().expect("tempdir");
    agentctl_in(&dir).args(["env", "init"]).assert().success();
    agentctl_in(&dir)
        .args(["env", "init"])
        .assert()
        .success()
        .stdout(predicate::str::contains("already exists"));
}

#[test]
fn test_env_check_fails_without_file() {
    let dir = TempDir::new().expect("tempdir");
    agentctl_in(&dir)
        .args(["env", "check"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not found"));
}

#[test]
fn test_env_check_rejects_placeholder_key() {
    let dir = TempDir::new().expect("tempdir");
    agentctl_in(&dir).args(["env", "init"]).assert().success();
    agentctl_in(&dir)
        .args(["env", "check"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("placeholder"));
}

#[test]
fn test_env_set_backs_up_and_check_passes() {
    let dir = TempDir::new().expect("tempdir");
    agentctl_in(&dir).args(["env", "init"]).assert().success();

    agentctl_in(&dir)
        .args(["env", "set", "OPENAI_API_KEY", "sk-test-abc123"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Set OPENAI_API_KEY"));

    assert_eq!(backups_in(&dir).len(), 1, "one timestamped backup expected");

    agentctl_in(&dir)
        .args(["env", "check"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Configuration looks good"));
}

#[test]
fn test_env_set_preserves_unrelated_lines() {
    let dir = TempDir::new().expect("tempdir");
    agentctl_in(&dir).args(["env", "init"]).assert().success();
    agentctl_in(&dir)
        .args(["env", "set", "API_PORT", "9000"])
        .assert()
        .success();

    let content = std::fs::read_to_string(dir.path().join(".env")).expect("read .env");
    assert!(content.contains("API_PORT=9000"));
    assert!(content.contains("LOG_LEVEL=INFO"), "unrelated keys survive");
    assert!(
        content.contains("# Intelligent agent configuration"),
        "comments survive"
    );
}

#[test]
fn test_env_set_without_file_creates_it() {
    let dir = TempDir::new().expect("tempdir");
    agentctl_in(&dir)
        .args(["env", "set", "API_PORT", "9000"])
        .assert()
        .success();
    assert!(backups_in(&dir).is_empty(), "no backup for a fresh file");
    let content = std::fs::read_to_string(dir.path().join(".env")).expect("read .env");
    assert!(content.contains("API_PORT=9000"));
}

#[test]
fn test_env_show_masks_secret_values() {
    let dir = TempDir::new().expect("tempdir");
    agentctl_in(&dir).args(["env", "init"]).assert().success();
    agentctl_in(&dir)
        .args(["env", "set", "OPENAI_API_KEY", "sk-test-abc123"])
        .assert()
        .success();

    agentctl_in(&dir)
        .args(["env", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("sk-t****"))
        .stdout(predicate::str::contains("sk-test-abc123").not());
}

#[test]
fn test_env_respects_explicit_file_flag() {
    let dir = TempDir::new().expect("tempdir");
    agentctl_in(&dir)
        .args(["env", "init", "--file", "custom.env"])
        .assert()
        .success();
    assert!(dir.path().join("custom.env").exists());
    assert!(!dir.path().join(".env").exists());
}
