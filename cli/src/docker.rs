//! Docker CLI abstraction — enables test doubles for all `docker` commands.

use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::command_runner::{CommandRunner, TokioCommandRunner};

/// Binary every production invocation shells out to.
pub const DOCKER_BIN: &str = "docker";

/// Parameters for `docker build`. Struct-based so call sites and test
/// doubles survive future flag additions.
pub struct BuildOpts {
    /// Dockerfile path passed via `-f`.
    pub dockerfile: PathBuf,
    /// Image reference to tag, e.g. `intelligent-agent-basic:latest`.
    pub tag: String,
    /// When set, `--no-cache` is appended.
    pub no_cache: bool,
    /// `--build-arg KEY=VALUE` pairs.
    pub build_args: Vec<(String, String)>,
}

impl BuildOpts {
    /// Full argument vector for `docker build`, context fixed to `.`.
    #[must_use]
    pub fn to_args(&self) -> Vec<String> {
        let mut args = vec![
            "build".to_string(),
            "-f".to_string(),
            self.dockerfile.display().to_string(),
            "-t".to_string(),
            self.tag.clone(),
        ];
        if self.no_cache {
            args.push("--no-cache".to_string());
        }
        for (key, value) in &self.build_args {
            args.push("--build-arg".to_string());
            args.push(format!("{key}={value}"));
        }
        args.push(".".to_string());
        args
    }
}

/// Parameters for `docker run`.
pub struct RunOpts {
    /// Image reference to run.
    pub image: String,
    /// Container name (`--name`).
    pub name: String,
    /// Host port mapped onto the service's container port.
    pub host_port: u16,
    /// Env file passed via `--env-file`, when present.
    pub env_file: Option<PathBuf>,
    /// Run detached (`-d`).
    pub detach: bool,
    /// Remove the container on exit (`--rm`).
    pub remove: bool,
}

impl RunOpts {
    /// Full argument vector for `docker run`.
    #[must_use]
    pub fn to_args(&self) -> Vec<String> {
        let mut args = vec![
            "run".to_string(),
            "--name".to_string(),
            self.name.clone(),
            "-p".to_string(),
            format!("{}:{}", self.host_port, agentctl_common::CONTAINER_PORT),
        ];
        if self.detach {
            args.push("-d".to_string());
        }
        if self.remove {
            args.push("--rm".to_string());
        }
        if let Some(env_file) = &self.env_file {
            args.push("--env-file".to_string());
            args.push(env_file.display().to_string());
        }
        args.push(self.image.clone());
        args
    }
}

/// Abstraction over the docker CLI, enabling test doubles.
///
/// Long-running operations (build, run, ps, logs) are attached — the child
/// inherits stdio so the user watches docker's own output. Queries capture
/// their output and are inspected here.
#[allow(async_fn_in_trait)]
pub trait Docker {
    /// Run `docker build` attached.
    ///
    /// # Errors
    ///
    /// Returns an error if the build cannot be spawned or exits non-zero.
    async fn build(&self, opts: &BuildOpts) -> Result<()>;

    /// Run `docker run` attached.
    ///
    /// # Errors
    ///
    /// Returns an error if the container cannot be spawned or exits non-zero.
    async fn run_container(&self, opts: &RunOpts) -> Result<()>;

    /// Run `docker stop <name>`.
    ///
    /// # Errors
    ///
    /// Returns an error if the stop fails. Callers performing best-effort
    /// cleanup of a pre-existing container ignore the result.
    async fn stop_container(&self, name: &str) -> Result<()>;

    /// Run `docker rm <name>`.
    ///
    /// # Errors
    ///
    /// Returns an error if the removal fails. Best-effort callers ignore it.
    async fn remove_container(&self, name: &str) -> Result<()>;

    /// Whether a container with this name exists (any state).
    ///
    /// # Errors
    ///
    /// Returns an error if docker cannot be spawned.
    async fn container_exists(&self, name: &str) -> Result<bool>;

    /// Whether this image reference exists locally.
    ///
    /// # Errors
    ///
    /// Returns an error if docker cannot be spawned.
    async fn image_exists(&self, image: &str) -> Result<bool>;

    /// Container status string from `docker inspect` (`running`, `exited`,
    /// ...), or `None` when the container does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if docker cannot be spawned.
    async fn container_state(&self, name: &str) -> Result<Option<String>>;

    /// Run `docker ps` attached.
    ///
    /// # Errors
    ///
    /// Returns an error if the listing fails.
    async fn ps(&self, all: bool) -> Result<()>;

    /// Run `docker logs <name>` attached.
    ///
    /// # Errors
    ///
    /// Returns an error if the log stream fails.
    async fn logs(&self, name: &str, follow: bool) -> Result<()>;
}

/// Production implementation — shells out to the `docker` binary.
pub struct DockerCli<R: CommandRunner> {
    runner: R,
}

impl DockerCli<TokioCommandRunner> {
    /// Docker client backed by the default tokio runner.
    #[must_use]
    pub fn new() -> Self {
        Self {
            runner: TokioCommandRunner::default(),
        }
    }
}

impl Default for DockerCli<TokioCommandRunner> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: CommandRunner> DockerCli<R> {
    /// Docker client over an explicit runner (used in tests).
    pub fn with_runner(runner: R) -> Self {
        Self { runner }
    }

    async fn attached(&self, args: &[&str]) -> Result<()> {
        let status = self.runner.run_status(DOCKER_BIN, args, &[]).await?;
        anyhow::ensure!(
            status.success(),
            "docker {} exited with {status}",
            args.first().copied().unwrap_or_default()
        );
        Ok(())
    }
}

impl<R: CommandRunner> Docker for DockerCli<R> {
    async fn build(&self, opts: &BuildOpts) -> Result<()> {
        let args = opts.to_args();
        let refs: Vec<&str> = args.iter().map(String::as_str).collect();
        self.attached(&refs).await
    }

    async fn run_container(&self, opts: &RunOpts) -> Result<()> {
        let args = opts.to_args();
        let refs: Vec<&str> = args.iter().map(String::as_str).collect();
        self.attached(&refs).await
    }

    async fn stop_container(&self, name: &str) -> Result<()> {
        let output = self
            .runner
            .run(DOCKER_BIN, &["stop", name])
            .await
            .context("failed to run docker stop")?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            anyhow::bail!("failed to stop container {name}: {}", stderr.trim());
        }
        Ok(())
    }

    async fn remove_container(&self, name: &str) -> Result<()> {
        let output = self
            .runner
            .run(DOCKER_BIN, &["rm", name])
            .await
            .context("failed to run docker rm")?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            anyhow::bail!("failed to remove container {name}: {}", stderr.trim());
        }
        Ok(())
    }

    async fn container_exists(&self, name: &str) -> Result<bool> {
        let output = self
            .runner
            .run(DOCKER_BIN, &["container", "inspect", name])
            .await
            .context("failed to run docker container inspect")?;
        Ok(output.status.success())
    }

    async fn image_exists(&self, image: &str) -> Result<bool> {
        let output = self
            .runner
            .run(DOCKER_BIN, &["image", "inspect", image])
            .await
            .context("failed to run docker image inspect")?;
        Ok(output.status.success())
    }

    async fn container_state(&self, name: &str) -> Result<Option<String>> {
        let output = self
            .runner
            .run(
                DOCKER_BIN,
                &["inspect", "--format", "{{json .State}}", name],
            )
            .await
            .context("failed to run docker inspect")?;

        if !output.status.success() {
            // Container doesn't exist
            return Ok(None);
        }

        let state: serde_json::Value = serde_json::from_slice(&output.stdout)
            .context("failed to parse docker inspect output")?;
        Ok(parse_container_status(&state).map(str::to_string))
    }

    async fn ps(&self, all: bool) -> Result<()> {
        if all {
            self.attached(&["ps", "-a"]).await
        } else {
            self.attached(&["ps"]).await
        }
    }

    async fn logs(&self, name: &str, follow: bool) -> Result<()> {
        if follow {
            self.attached(&["logs", "-f", name]).await
        } else {
            self.attached(&["logs", name]).await
        }
    }
}

/// Extract the `Status` field from a `docker inspect` State object.
///
/// Returns `None` if the JSON structure is invalid or the field is missing.
#[must_use]
pub fn parse_container_status(state: &serde_json::Value) -> Option<&str> {
    state.get("Status")?.as_str()
}
