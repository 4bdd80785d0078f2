//! Unit tests for the compose command handler: YAML precondition and the
//! action-to-invocation mapping.

#![allow(clippy::expect_used)]

use tempfile::TempDir;

use agentctl_cli::commands::compose::{self, ComposeArgs, ComposeCommand};
use agentctl_common::ComposeFile;

use crate::helpers::{call_log, calls, quiet_ctx, MockCompose};

fn compose_args(file: ComposeFile) -> ComposeArgs {
    ComposeArgs { file }
}

/// Directory containing the full compose YAML.
fn project_dir() -> TempDir {
    let dir = TempDir::new().expect("tempdir");
    std::fs::write(dir.path().join("docker-compose.yml"), "services: {}\n").expect("compose yml");
    dir
}

#[tokio::test]
async fn up_passes_detach_and_build_flags_through() {
    let dir = project_dir();
    let log = call_log();
    let cmd = ComposeCommand::Up {
        args: compose_args(ComposeFile::Full),
        detach: true,
        build: true,
    };

    compose::run(&cmd, &MockCompose::new(log.clone()), dir.path(), &quiet_ctx())
        .await
        .expect("up");
    assert_eq!(calls(&log), vec!["compose up detach=true build=true"]);
}

#[tokio::test]
async fn down_passes_volumes_flag_through() {
    let dir = project_dir();
    let log = call_log();
    let cmd = ComposeCommand::Down {
        args: compose_args(ComposeFile::Full),
        volumes: true,
    };

    compose::run(&cmd, &MockCompose::new(log.clone()), dir.path(), &quiet_ctx())
        .await
        .expect("down");
    assert_eq!(calls(&log), vec!["compose down volumes=true"]);
}

#[tokio::test]
async fn status_maps_to_compose_ps() {
    let dir = project_dir();
    let log = call_log();
    let cmd = ComposeCommand::Status {
        args: compose_args(ComposeFile::Full),
    };

    compose::run(&cmd, &MockCompose::new(log.clone()), dir.path(), &quiet_ctx())
        .await
        .expect("status");
    assert_eq!(calls(&log), vec!["compose ps"]);
}

#[tokio::test]
async fn missing_yaml_fails_before_any_invocation() {
    let dir = TempDir::new().expect("tempdir");
    let log = call_log();
    let cmd = ComposeCommand::Up {
        args: compose_args(ComposeFile::Simple),
        detach: false,
        build: false,
    };

    let err = compose::run(&cmd, &MockCompose::new(log.clone()), dir.path(), &quiet_ctx())
        .await
        .expect_err("missing YAML must fail");
    assert!(err.to_string().contains("docker-compose.simple.yml"), "{err}");
    assert!(calls(&log).is_empty(), "nothing may be spawned");
}
