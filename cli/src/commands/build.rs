//! `agentctl build` — build a service image from one of the Dockerfile
//! flavors.

use std::path::Path;

use anyhow::Result;
use clap::Args;
use agentctl_common::{BuildType, DEFAULT_IMAGE};

use crate::docker::{BuildOpts, Docker};
use crate::output::OutputContext;

/// Arguments for the build command.
#[derive(Args, Clone)]
pub struct BuildArgs {
    /// Build type, selecting the Dockerfile
    #[arg(short = 't', long = "type", value_enum, default_value_t = BuildType::Basic)]
    pub build_type: BuildType,

    /// Image base name; the build type is appended
    #[arg(short, long, default_value = DEFAULT_IMAGE)]
    pub name: String,

    /// Rebuild from scratch (no layer cache)
    #[arg(short, long)]
    pub force: bool,
}

impl BuildArgs {
    /// Image name this build produces, e.g. `intelligent-agent-basic`.
    #[must_use]
    pub fn image(&self) -> String {
        self.build_type.default_image(&self.name)
    }
}

/// Run the build command.
///
/// # Errors
///
/// Returns an error if the mapped Dockerfile is missing or the build fails.
pub async fn run(
    args: &BuildArgs,
    docker: &impl Docker,
    root: &Path,
    ctx: &OutputContext,
) -> Result<()> {
    let dockerfile = root.join(args.build_type.dockerfile());
    anyhow::ensure!(
        dockerfile.exists(),
        "Dockerfile for build type '{}' not found at {}",
        args.build_type,
        dockerfile.display()
    );

    ctx.info(&format!(
        "Building {} from {}",
        args.image(),
        dockerfile.display()
    ));
    docker
        .build(&BuildOpts {
            dockerfile,
            tag: args.image(),
            no_cache: args.force,
            build_args: vec![],
        })
        .await?;
    ctx.success(&format!("Built {}", args.image()));
    Ok(())
}
