//! `agentctl compose` — drive the docker-compose stack directly.

use std::path::Path;

use anyhow::Result;
use clap::{Args, Subcommand};
use agentctl_common::ComposeFile;

use crate::compose::Compose;
use crate::output::OutputContext;

/// Compose subcommands.
#[derive(Subcommand)]
pub enum ComposeCommand {
    /// Start services
    Up {
        #[command(flatten)]
        args: ComposeArgs,

        /// Run services in the background
        #[arg(short, long)]
        detach: bool,

        /// Build images before starting
        #[arg(short, long)]
        build: bool,
    },

    /// Stop and remove services
    Down {
        #[command(flatten)]
        args: ComposeArgs,

        /// Also remove named volumes
        #[arg(short, long)]
        volumes: bool,
    },

    /// Restart services
    Restart {
        #[command(flatten)]
        args: ComposeArgs,
    },

    /// Show service logs
    Logs {
        #[command(flatten)]
        args: ComposeArgs,

        /// Stream logs in real time
        #[arg(long)]
        follow: bool,
    },

    /// Show service status
    Status {
        #[command(flatten)]
        args: ComposeArgs,
    },

    /// Build service images
    Build {
        #[command(flatten)]
        args: ComposeArgs,
    },
}

impl ComposeCommand {
    /// Shared flags of whichever variant this is.
    #[must_use]
    pub fn args(&self) -> &ComposeArgs {
        match self {
            Self::Up { args, .. }
            | Self::Down { args, .. }
            | Self::Restart { args }
            | Self::Logs { args, .. }
            | Self::Status { args }
            | Self::Build { args } => args,
        }
    }
}

/// Flags shared by every compose subcommand.
#[derive(Args, Clone)]
pub struct ComposeArgs {
    /// Compose file selector
    #[arg(short, long, value_enum, default_value_t = ComposeFile::Full)]
    pub file: ComposeFile,
}

/// Run the compose command.
///
/// The selected YAML must exist before anything is spawned; an invalid
/// selector never reaches this point (clap rejects it).
///
/// # Errors
///
/// Returns an error if the YAML is missing or the compose invocation fails.
pub async fn run(
    cmd: &ComposeCommand,
    compose: &impl Compose,
    root: &Path,
    ctx: &OutputContext,
) -> Result<()> {
    let file = cmd.args().file;
    let path = root.join(file.path());
    anyhow::ensure!(
        path.exists(),
        "compose file not found at {} (selector '{file}')",
        path.display()
    );

    match cmd {
        ComposeCommand::Up { detach, build, .. } => {
            compose.up(*detach, *build).await?;
            ctx.success("Services started.");
        }
        ComposeCommand::Down { volumes, .. } => {
            compose.down(*volumes).await?;
            ctx.success("Services stopped.");
        }
        ComposeCommand::Restart { .. } => {
            compose.restart().await?;
            ctx.success("Services restarted.");
        }
        ComposeCommand::Logs { follow, .. } => {
            compose.logs(*follow).await?;
        }
        ComposeCommand::Status { .. } => {
            compose.ps().await?;
        }
        ComposeCommand::Build { .. } => {
            compose.build().await?;
            ctx.success("Service images built.");
        }
    }
    Ok(())
}
