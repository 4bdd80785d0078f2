//! `agentctl run` — run the service container, replacing any previous one
//! with the same name.

use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::Args;
use agentctl_common::{BuildType, CONTAINER_PORT, DEFAULT_CONTAINER, DEFAULT_ENV_FILE, DEFAULT_IMAGE};

use crate::docker::{BuildOpts, Docker, RunOpts};
use crate::output::OutputContext;

/// Arguments for the run command.
#[derive(Args, Clone)]
pub struct RunArgs {
    /// Image to run (defaults to the basic build output)
    #[arg(short, long)]
    pub image: Option<String>,

    /// Host port mapped onto the service port
    #[arg(short, long, default_value_t = CONTAINER_PORT)]
    pub port: u16,

    /// Container name
    #[arg(short, long, default_value = DEFAULT_CONTAINER)]
    pub name: String,

    /// Env file passed to the container
    #[arg(short, long = "env", value_name = "FILE")]
    pub env_file: Option<PathBuf>,

    /// Run in the background
    #[arg(short, long)]
    pub detach: bool,

    /// Remove the container when it exits
    #[arg(short, long)]
    pub remove: bool,

    /// Build the image before running
    #[arg(short, long)]
    pub build: bool,
}

impl RunArgs {
    /// Image reference to run.
    #[must_use]
    pub fn image(&self) -> String {
        self.image
            .clone()
            .unwrap_or_else(|| BuildType::Basic.default_image(DEFAULT_IMAGE))
    }
}

/// Run the run command.
///
/// # Errors
///
/// Returns an error if a given env file is missing, the image is neither
/// present nor built, or the container fails to start.
pub async fn run(
    args: &RunArgs,
    docker: &impl Docker,
    root: &Path,
    ctx: &OutputContext,
) -> Result<()> {
    let image = args.image();

    // An explicit env file must exist; the default one is picked up only
    // when present.
    let env_file = match &args.env_file {
        Some(path) => {
            let path = root.join(path);
            anyhow::ensure!(path.exists(), "env file not found at {}", path.display());
            Some(path)
        }
        None => {
            let path = root.join(DEFAULT_ENV_FILE);
            path.exists().then_some(path)
        }
    };

    if args.build {
        let dockerfile = root.join(BuildType::Basic.dockerfile());
        anyhow::ensure!(
            dockerfile.exists(),
            "Dockerfile not found at {}",
            dockerfile.display()
        );
        ctx.info(&format!("Building {image}"));
        docker
            .build(&BuildOpts {
                dockerfile,
                tag: image.clone(),
                no_cache: false,
                build_args: vec![],
            })
            .await?;
    } else {
        anyhow::ensure!(
            docker.image_exists(&image).await?,
            "image {image} not found locally (build it with: agentctl build)"
        );
    }

    // Replace any previous container with the same name. Cleanup is
    // best-effort: a failure here must not block the new container.
    if docker.container_exists(&args.name).await? {
        ctx.info(&format!("Replacing existing container {}", args.name));
        let _ = docker.stop_container(&args.name).await;
        let _ = docker.remove_container(&args.name).await;
    }

    docker
        .run_container(&RunOpts {
            image,
            name: args.name.clone(),
            host_port: args.port,
            env_file,
            detach: args.detach,
            remove: args.remove,
        })
        .await?;

    if args.detach {
        ctx.success(&format!(
            "Container {} started on port {}",
            args.name, args.port
        ));
        ctx.kv("Logs", &format!("docker logs -f {}", args.name));
        ctx.kv("Health", agentctl_common::HEALTH_URL);
    }
    Ok(())
}
