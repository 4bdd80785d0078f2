//! `agentctl deploy` — build, ship, and inspect the deployed stack.

use std::io::BufRead;
use std::path::Path;
use std::time::Duration;

use anyhow::Result;
use clap::{Args, Subcommand};
use agentctl_common::{BuildType, ComposeFile, Environment, DEFAULT_CONTAINER, DEFAULT_IMAGE, DEFAULT_TAG};

use crate::compose::Compose;
use crate::docker::{BuildOpts, Docker};
use crate::health::HealthProbe;
use crate::output::{progress, OutputContext};

/// Deploy subcommands.
#[derive(Subcommand)]
pub enum DeployCommand {
    /// Build the deployment image
    Build(DeployArgs),

    /// Build, bring the stack up, and probe its health
    Deploy(DeployArgs),

    /// Restart the running stack
    Restart(DeployArgs),

    /// Tear the stack down
    Stop(DeployArgs),

    /// Show stack and container status
    Status(DeployArgs),

    /// Show stack logs
    Logs {
        #[command(flatten)]
        args: DeployArgs,

        /// Stream logs in real time
        #[arg(long)]
        follow: bool,
    },
}

/// Flags shared by every deploy subcommand.
#[derive(Args, Clone)]
pub struct DeployArgs {
    /// Target environment
    #[arg(short, long, value_enum, default_value_t = Environment::Staging)]
    pub env: Environment,

    /// Image name
    #[arg(short, long, default_value = DEFAULT_IMAGE)]
    pub image: String,

    /// Image tag
    #[arg(short, long, default_value = DEFAULT_TAG)]
    pub tag: String,

    /// Skip the production confirmation prompt
    #[arg(short, long)]
    pub force: bool,
}

impl DeployArgs {
    /// Full image reference, e.g. `intelligent-agent:latest`.
    #[must_use]
    pub fn image_ref(&self) -> String {
        format!("{}:{}", self.image, self.tag)
    }
}

/// Production collaborators for the deploy command, grouped so handler
/// signatures stay stable as the stack grows.
pub struct Stack<D, C, P> {
    pub docker: D,
    pub compose: C,
    pub probe: P,
}

/// True when this action must block on interactive confirmation.
#[must_use]
pub fn needs_confirmation(env: Environment, force: bool) -> bool {
    env.is_production() && !force
}

/// Affirmative answers for the production gate, case-insensitive.
#[must_use]
pub fn is_affirmative(answer: &str) -> bool {
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}

/// Prompt for confirmation and read one line. Anything other than an
/// affirmative answer — including closed stdin — declines.
///
/// # Errors
///
/// Returns an error if stdout or the input cannot be used.
pub fn confirm(mut input: impl BufRead, env: Environment) -> Result<bool> {
    use std::io::Write;
    print!("Deploy to {env}? [yes/no]: ");
    std::io::stdout().flush()?;
    let mut line = String::new();
    let n = input.read_line(&mut line)?;
    Ok(n > 0 && is_affirmative(&line))
}

/// Run `agentctl deploy build`.
///
/// # Errors
///
/// Returns an error if the Dockerfile is missing or the build fails.
pub async fn build(
    args: &DeployArgs,
    docker: &impl Docker,
    root: &Path,
    ctx: &OutputContext,
) -> Result<()> {
    let dockerfile = root.join(BuildType::Main.dockerfile());
    anyhow::ensure!(
        dockerfile.exists(),
        "Dockerfile not found at {} (run from the project root)",
        dockerfile.display()
    );

    ctx.info(&format!("Building {} for {}", args.image_ref(), args.env));
    docker
        .build(&BuildOpts {
            dockerfile,
            tag: args.image_ref(),
            no_cache: false,
            build_args: vec![("ENVIRONMENT".to_string(), args.env.to_string())],
        })
        .await?;
    ctx.success(&format!("Built {}", args.image_ref()));
    Ok(())
}

/// Run `agentctl deploy deploy` — gate, build, up, settle, probe.
///
/// The health probe is advisory: its failure prints a warning and the
/// deploy still reports success. A declined gate is not an error either.
///
/// # Errors
///
/// Returns an error if the build or the compose up fails.
pub async fn deploy<D: Docker, C: Compose, P: HealthProbe>(
    args: &DeployArgs,
    stack: &Stack<D, C, P>,
    settle: Duration,
    confirm_input: impl BufRead,
    root: &Path,
    ctx: &OutputContext,
) -> Result<()> {
    if needs_confirmation(args.env, args.force) && !confirm(confirm_input, args.env)? {
        ctx.info("Cancelled.");
        return Ok(());
    }

    build(args, &stack.docker, root, ctx).await?;

    let compose_file = root.join(ComposeFile::Full.path());
    anyhow::ensure!(
        compose_file.exists(),
        "compose file not found at {}",
        compose_file.display()
    );

    ctx.info(&format!("Starting the {} stack...", args.env));
    stack.compose.up(true, false).await?;

    wait_for_settle(settle, ctx).await;
    match stack.probe.probe() {
        Ok(code) => ctx.success(&format!("Health check passed (HTTP {code})")),
        Err(e) => ctx.warn(&format!(
            "Health check failed: {e:#} (the service may still be starting)"
        )),
    }

    ctx.success(&format!("Deployed {} to {}", args.image_ref(), args.env));
    Ok(())
}

/// Run `agentctl deploy restart`.
///
/// # Errors
///
/// Returns an error if the restart fails.
pub async fn restart(compose: &impl Compose, ctx: &OutputContext) -> Result<()> {
    ctx.info("Restarting stack...");
    compose.restart().await?;
    ctx.success("Stack restarted.");
    Ok(())
}

/// Run `agentctl deploy stop`.
///
/// # Errors
///
/// Returns an error if the teardown fails.
pub async fn stop(compose: &impl Compose, ctx: &OutputContext) -> Result<()> {
    ctx.info("Stopping stack...");
    compose.down(false).await?;
    ctx.success("Stack stopped.");
    Ok(())
}

/// Run `agentctl deploy status` — compose listing, container state, and an
/// advisory health probe.
///
/// # Errors
///
/// Returns an error if the compose listing fails.
pub async fn status<D: Docker, C: Compose, P: HealthProbe>(
    stack: &Stack<D, C, P>,
    ctx: &OutputContext,
) -> Result<()> {
    ctx.header("Deployment status");
    stack.compose.ps().await?;

    match stack.docker.container_state(DEFAULT_CONTAINER).await {
        Ok(Some(state)) => ctx.kv("Container", &state),
        Ok(None) => ctx.kv("Container", "not found"),
        Err(e) => ctx.warn(&format!("Could not inspect container: {e:#}")),
    }

    match stack.probe.probe() {
        Ok(code) => ctx.kv("Health", &format!("ok (HTTP {code})")),
        Err(e) => ctx.kv("Health", &format!("unreachable ({e:#})")),
    }
    Ok(())
}

/// Run `agentctl deploy logs`.
///
/// # Errors
///
/// Returns an error if the log stream fails.
pub async fn logs(compose: &impl Compose, follow: bool, ctx: &OutputContext) -> Result<()> {
    if follow {
        ctx.info("Streaming stack logs (Ctrl+C to stop)...");
    }
    compose.logs(follow).await
}

async fn wait_for_settle(duration: Duration, ctx: &OutputContext) {
    if duration.is_zero() {
        return;
    }
    if ctx.show_progress() {
        let pb = progress::spinner("Waiting for the service to settle...");
        tokio::time::sleep(duration).await;
        progress::finish_ok(&pb, "Settle window elapsed");
    } else {
        tokio::time::sleep(duration).await;
    }
}
