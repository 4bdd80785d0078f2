//! docker-compose CLI abstraction — enables test doubles and centralizes the
//! variable exports compose files substitute.

use anyhow::{Context, Result};
use agentctl_common::{ComposeFile, Environment, DEFAULT_IMAGE, DEFAULT_TAG};

use crate::command_runner::{CommandRunner, TokioCommandRunner};

/// Binary every production invocation shells out to.
pub const COMPOSE_BIN: &str = "docker-compose";

/// Variables exported into every docker-compose child process for
/// `${IMAGE_NAME}`-style substitution in the YAML.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComposeEnv {
    /// Image name (`IMAGE_NAME`).
    pub image: String,
    /// Image tag (`IMAGE_TAG`).
    pub tag: String,
    /// Target environment (`ENVIRONMENT`).
    pub environment: Environment,
}

impl ComposeEnv {
    #[must_use]
    pub fn new(image: String, tag: String, environment: Environment) -> Self {
        Self {
            image,
            tag,
            environment,
        }
    }

    /// Read `IMAGE_NAME`/`IMAGE_TAG`/`ENVIRONMENT` from the process
    /// environment, falling back to the built-in defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if `ENVIRONMENT` is set to a value outside the
    /// allowed set.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// [`from_env`](Self::from_env) over an arbitrary variable lookup, so
    /// tests don't have to mutate the process environment.
    ///
    /// # Errors
    ///
    /// Returns an error if the looked-up `ENVIRONMENT` is outside the
    /// allowed set.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let image = lookup("IMAGE_NAME").unwrap_or_else(|| DEFAULT_IMAGE.to_string());
        let tag = lookup("IMAGE_TAG").unwrap_or_else(|| DEFAULT_TAG.to_string());
        let environment = match lookup("ENVIRONMENT") {
            Some(value) => value
                .parse::<Environment>()
                .context("reading ENVIRONMENT from the process environment")?,
            None => Environment::default(),
        };
        Ok(Self::new(image, tag, environment))
    }

    /// Key/value pairs exported to the compose child process.
    #[must_use]
    pub fn exports(&self) -> Vec<(String, String)> {
        vec![
            ("IMAGE_NAME".to_string(), self.image.clone()),
            ("IMAGE_TAG".to_string(), self.tag.clone()),
            ("ENVIRONMENT".to_string(), self.environment.to_string()),
        ]
    }
}

/// Abstraction over the docker-compose CLI, enabling test doubles.
///
/// All operations are attached — compose streams its own progress output.
#[allow(async_fn_in_trait)]
pub trait Compose {
    /// Run `docker-compose up`.
    ///
    /// # Errors
    ///
    /// Returns an error if the command cannot be spawned or exits non-zero.
    async fn up(&self, detach: bool, build: bool) -> Result<()>;

    /// Run `docker-compose down`.
    ///
    /// # Errors
    ///
    /// Returns an error if the command cannot be spawned or exits non-zero.
    async fn down(&self, volumes: bool) -> Result<()>;

    /// Run `docker-compose restart`.
    ///
    /// # Errors
    ///
    /// Returns an error if the command cannot be spawned or exits non-zero.
    async fn restart(&self) -> Result<()>;

    /// Run `docker-compose logs`.
    ///
    /// # Errors
    ///
    /// Returns an error if the command cannot be spawned or exits non-zero.
    async fn logs(&self, follow: bool) -> Result<()>;

    /// Run `docker-compose ps`.
    ///
    /// # Errors
    ///
    /// Returns an error if the command cannot be spawned or exits non-zero.
    async fn ps(&self) -> Result<()>;

    /// Run `docker-compose build`.
    ///
    /// # Errors
    ///
    /// Returns an error if the command cannot be spawned or exits non-zero.
    async fn build(&self) -> Result<()>;
}

/// Production implementation — shells out to the `docker-compose` binary,
/// always passing `-f <yaml>` and the substitution exports.
pub struct ComposeCli<R: CommandRunner> {
    runner: R,
    file: ComposeFile,
    env: ComposeEnv,
}

impl ComposeCli<TokioCommandRunner> {
    /// Compose client backed by the default tokio runner.
    #[must_use]
    pub fn new(file: ComposeFile, env: ComposeEnv) -> Self {
        Self {
            runner: TokioCommandRunner::default(),
            file,
            env,
        }
    }
}

impl<R: CommandRunner> ComposeCli<R> {
    /// Compose client over an explicit runner (used in tests).
    pub fn with_runner(runner: R, file: ComposeFile, env: ComposeEnv) -> Self {
        Self { runner, file, env }
    }

    async fn attached(&self, verb_args: &[&str]) -> Result<()> {
        let path = self.file.path();
        let mut args = vec!["-f", path];
        args.extend_from_slice(verb_args);

        let exports = self.env.exports();
        let env_refs: Vec<(&str, &str)> = exports
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
            .collect();

        let status = self.runner.run_status(COMPOSE_BIN, &args, &env_refs).await?;
        anyhow::ensure!(
            status.success(),
            "docker-compose {} exited with {status}",
            verb_args.first().copied().unwrap_or_default()
        );
        Ok(())
    }
}

impl<R: CommandRunner> Compose for ComposeCli<R> {
    async fn up(&self, detach: bool, build: bool) -> Result<()> {
        let mut args = vec!["up"];
        if detach {
            args.push("-d");
        }
        if build {
            args.push("--build");
        }
        self.attached(&args).await
    }

    async fn down(&self, volumes: bool) -> Result<()> {
        if volumes {
            self.attached(&["down", "-v"]).await
        } else {
            self.attached(&["down"]).await
        }
    }

    async fn restart(&self) -> Result<()> {
        self.attached(&["restart"]).await
    }

    async fn logs(&self, follow: bool) -> Result<()> {
        if follow {
            self.attached(&["logs", "-f"]).await
        } else {
            self.attached(&["logs"]).await
        }
    }

    async fn ps(&self) -> Result<()> {
        self.attached(&["ps"]).await
    }

    async fn build(&self) -> Result<()> {
        self.attached(&["build"]).await
    }
}
