//! Unit tests for the deploy pipeline: gate short-circuit, build-then-up
//! ordering, preconditions, and the advisory health probe.

#![allow(clippy::expect_used)]

use std::io::Cursor;
use std::time::Duration;

use tempfile::TempDir;

use agentctl_cli::commands::deploy::{self, DeployArgs, Stack};
use agentctl_common::Environment;

use crate::helpers::{call_log, calls, quiet_ctx, CallLog, MockCompose, MockDocker, MockProbe};

fn args(env: Environment, force: bool) -> DeployArgs {
    DeployArgs {
        env,
        image: "intelligent-agent".to_string(),
        tag: "latest".to_string(),
        force,
    }
}

fn stack(log: &CallLog) -> Stack<MockDocker, MockCompose, MockProbe> {
    Stack {
        docker: MockDocker::new(log.clone()),
        compose: MockCompose::new(log.clone()),
        probe: MockProbe { status: Some(200) },
    }
}

/// Project directory holding the files the deploy preconditions look for.
fn project_dir() -> TempDir {
    let dir = TempDir::new().expect("tempdir");
    std::fs::write(dir.path().join("Dockerfile"), "FROM python:3.11-slim\n").expect("Dockerfile");
    std::fs::write(dir.path().join("docker-compose.yml"), "services: {}\n").expect("compose yml");
    dir
}

// ── full pipeline ─────────────────────────────────────────────────────────────

#[tokio::test]
async fn deploy_runs_build_then_up_in_order() {
    let dir = project_dir();
    let log = call_log();
    deploy::deploy(
        &args(Environment::Staging, false),
        &stack(&log),
        Duration::ZERO,
        Cursor::new(""),
        dir.path(),
        &quiet_ctx(),
    )
    .await
    .expect("deploy");

    assert_eq!(
        calls(&log),
        vec![
            "docker build intelligent-agent:latest",
            "compose up detach=true build=false"
        ]
    );
}

#[tokio::test]
async fn deploy_succeeds_even_when_health_probe_fails() {
    let dir = project_dir();
    let log = call_log();
    let mut stack = stack(&log);
    stack.probe = MockProbe { status: None };

    deploy::deploy(
        &args(Environment::Staging, false),
        &stack,
        Duration::ZERO,
        Cursor::new(""),
        dir.path(),
        &quiet_ctx(),
    )
    .await
    .expect("probe failure is advisory, deploy still succeeds");
}

#[tokio::test]
async fn deploy_fails_when_compose_up_fails() {
    let dir = project_dir();
    let log = call_log();
    let mut stack = stack(&log);
    stack.compose.fail_up = true;

    let err = deploy::deploy(
        &args(Environment::Staging, false),
        &stack,
        Duration::ZERO,
        Cursor::new(""),
        dir.path(),
        &quiet_ctx(),
    )
    .await
    .expect_err("compose failure must propagate");
    assert!(err.to_string().contains("docker-compose up"), "{err}");
}

// ── confirmation gate ─────────────────────────────────────────────────────────

#[tokio::test]
async fn production_deploy_declined_runs_nothing_and_succeeds() {
    let dir = project_dir();
    let log = call_log();
    deploy::deploy(
        &args(Environment::Production, false),
        &stack(&log),
        Duration::ZERO,
        Cursor::new("no\n"),
        dir.path(),
        &quiet_ctx(),
    )
    .await
    .expect("declined deploy exits cleanly");

    assert!(calls(&log).is_empty(), "nothing may run after a decline");
}

#[tokio::test]
async fn production_deploy_confirmed_proceeds() {
    let dir = project_dir();
    let log = call_log();
    deploy::deploy(
        &args(Environment::Production, false),
        &stack(&log),
        Duration::ZERO,
        Cursor::new("yes\n"),
        dir.path(),
        &quiet_ctx(),
    )
    .await
    .expect("deploy");

    assert_eq!(calls(&log).len(), 2, "build and up must both run");
}

#[tokio::test]
async fn production_deploy_forced_skips_the_prompt() {
    let dir = project_dir();
    let log = call_log();
    // Closed stdin would decline if the gate were consulted.
    deploy::deploy(
        &args(Environment::Production, true),
        &stack(&log),
        Duration::ZERO,
        Cursor::new(""),
        dir.path(),
        &quiet_ctx(),
    )
    .await
    .expect("deploy");

    assert_eq!(calls(&log).len(), 2);
}

// ── preconditions ─────────────────────────────────────────────────────────────

#[tokio::test]
async fn deploy_fails_before_any_call_when_dockerfile_missing() {
    let dir = TempDir::new().expect("tempdir");
    std::fs::write(dir.path().join("docker-compose.yml"), "services: {}\n").expect("compose yml");
    let log = call_log();

    let err = deploy::deploy(
        &args(Environment::Staging, false),
        &stack(&log),
        Duration::ZERO,
        Cursor::new(""),
        dir.path(),
        &quiet_ctx(),
    )
    .await
    .expect_err("missing Dockerfile must fail");
    assert!(err.to_string().contains("Dockerfile not found"), "{err}");
    assert!(calls(&log).is_empty());
}

#[tokio::test]
async fn deploy_fails_after_build_when_compose_file_missing() {
    let dir = TempDir::new().expect("tempdir");
    std::fs::write(dir.path().join("Dockerfile"), "FROM python:3.11-slim\n").expect("Dockerfile");
    let log = call_log();

    let err = deploy::deploy(
        &args(Environment::Staging, false),
        &stack(&log),
        Duration::ZERO,
        Cursor::new(""),
        dir.path(),
        &quiet_ctx(),
    )
    .await
    .expect_err("missing compose file must fail");
    assert!(err.to_string().contains("compose file not found"), "{err}");
    assert_eq!(
        calls(&log),
        vec!["docker build intelligent-agent:latest"],
        "the build ran, compose up did not"
    );
}

// ── remaining actions ─────────────────────────────────────────────────────────

#[tokio::test]
async fn restart_maps_to_compose_restart() {
    let log = call_log();
    deploy::restart(&MockCompose::new(log.clone()), &quiet_ctx())
        .await
        .expect("restart");
    assert_eq!(calls(&log), vec!["compose restart"]);
}

#[tokio::test]
async fn stop_maps_to_compose_down_without_volumes() {
    let log = call_log();
    deploy::stop(&MockCompose::new(log.clone()), &quiet_ctx())
        .await
        .expect("stop");
    assert_eq!(calls(&log), vec!["compose down volumes=false"]);
}

#[tokio::test]
async fn logs_passes_follow_through() {
    let log = call_log();
    deploy::logs(&MockCompose::new(log.clone()), true, &quiet_ctx())
        .await
        .expect("logs");
    assert_eq!(calls(&log), vec!["compose logs follow=true"]);
}

#[tokio::test]
async fn status_lists_services_and_tolerates_unreachable_health() {
    let log = call_log();
    let mut stack = stack(&log);
    stack.docker.state = Some("running".to_string());
    stack.probe = MockProbe { status: None };

    deploy::status(&stack, &quiet_ctx())
        .await
        .expect("status must not fail on an unreachable probe");
    assert!(calls(&log).contains(&"compose ps".to_string()));
}
