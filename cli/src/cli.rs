//! CLI argument parsing with clap derive

use std::path::Path;

use anyhow::Result;
use clap::{Parser, Subcommand};
use agentctl_common::ComposeFile;

use crate::command_runner::TokioCommandRunner;
use crate::commands;
use crate::commands::deploy::{self, DeployArgs, DeployCommand, Stack};
use crate::compose::{ComposeCli, ComposeEnv};
use crate::docker::DockerCli;
use crate::health::{HttpProbe, POST_DEPLOY_WAIT};
use crate::output::OutputContext;

/// Deployment and orchestration CLI for the intelligent-agent service
#[derive(Parser)]
#[command(
    name = "agentctl",
    version,
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    /// Suppress non-error output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Build, ship, and inspect the deployed stack
    #[command(subcommand)]
    Deploy(DeployCommand),

    /// Drive the docker-compose stack directly
    #[command(subcommand)]
    Compose(commands::compose::ComposeCommand),

    /// Build a service image
    Build(commands::build::BuildArgs),

    /// Run the service container
    Run(commands::run::RunArgs),

    /// Start the API server locally
    Server(commands::server::ServerArgs),

    /// Manage the .env configuration file
    #[command(subcommand)]
    Env(commands::env::EnvCommand),

    /// Show version
    Version {
        /// Output in JSON format
        #[arg(long)]
        json: bool,
    },
}

impl Cli {
    /// Execute the CLI command.
    ///
    /// # Errors
    ///
    /// Returns an error if the command fails.
    pub async fn run(self) -> Result<()> {
        let Cli {
            quiet,
            no_color,
            command,
        } = self;
        let ctx = OutputContext::new(no_color, quiet);
        let root = Path::new(".");

        match command {
            Command::Version { json } => {
                commands::version::run(json);
                Ok(())
            }
            Command::Deploy(cmd) => dispatch_deploy(cmd, root, &ctx).await,
            Command::Compose(cmd) => {
                let env = ComposeEnv::from_env()?;
                let compose = ComposeCli::new(cmd.args().file, env);
                commands::compose::run(&cmd, &compose, root, &ctx).await
            }
            Command::Build(args) => {
                commands::build::run(&args, &DockerCli::new(), root, &ctx).await
            }
            Command::Run(args) => commands::run::run(&args, &DockerCli::new(), root, &ctx).await,
            Command::Server(args) => {
                commands::server::run(&args, &TokioCommandRunner::default(), root, &ctx).await
            }
            Command::Env(cmd) => commands::env::run(&cmd, &ctx),
        }
    }
}

/// Deploy actions always target the full compose stack, with the image
/// reference from the flags exported for substitution.
fn stack_for(args: &DeployArgs) -> Stack<DockerCli<TokioCommandRunner>, ComposeCli<TokioCommandRunner>, HttpProbe> {
    Stack {
        docker: DockerCli::new(),
        compose: ComposeCli::new(
            ComposeFile::Full,
            ComposeEnv::new(args.image.clone(), args.tag.clone(), args.env),
        ),
        probe: HttpProbe::default(),
    }
}

async fn dispatch_deploy(cmd: DeployCommand, root: &Path, ctx: &OutputContext) -> Result<()> {
    match cmd {
        DeployCommand::Build(args) => deploy::build(&args, &DockerCli::new(), root, ctx).await,
        DeployCommand::Deploy(args) => {
            let stack = stack_for(&args);
            deploy::deploy(
                &args,
                &stack,
                POST_DEPLOY_WAIT,
                std::io::stdin().lock(),
                root,
                ctx,
            )
            .await
        }
        DeployCommand::Restart(args) => deploy::restart(&stack_for(&args).compose, ctx).await,
        DeployCommand::Stop(args) => deploy::stop(&stack_for(&args).compose, ctx).await,
        DeployCommand::Status(args) => deploy::status(&stack_for(&args), ctx).await,
        DeployCommand::Logs { args, follow } => {
            deploy::logs(&stack_for(&args).compose, follow, ctx).await
        }
    }
}
