//! `agentctl server` — start the FastAPI server locally via uvicorn.

use std::path::Path;

use anyhow::Result;
use clap::Args;
use agentctl_common::{AppVariant, ServerMode, API_KEY_VAR, CONTAINER_PORT, DEFAULT_BIND_HOST, DEFAULT_ENV_FILE};

use crate::command_runner::CommandRunner;
use crate::env_file::{self, EnvFile};
use crate::output::OutputContext;

/// Arguments for the server command.
#[derive(Args, Clone)]
pub struct ServerArgs {
    /// Launcher mode
    #[arg(short, long, value_enum, default_value_t = ServerMode::Poetry)]
    pub mode: ServerMode,

    /// Port to listen on
    #[arg(short, long, default_value_t = CONTAINER_PORT)]
    pub port: u16,

    /// Host to bind
    #[arg(short = 'H', long, default_value = DEFAULT_BIND_HOST)]
    pub host: String,

    /// Serve the reduced application without tool integrations
    #[arg(long, conflicts_with = "full")]
    pub simple: bool,

    /// Serve the full agent application (default)
    #[arg(long)]
    pub full: bool,
}

impl ServerArgs {
    /// Application variant selected by the `--simple`/`--full` flags.
    #[must_use]
    pub fn variant(&self) -> AppVariant {
        if self.simple {
            AppVariant::Simple
        } else {
            AppVariant::Full
        }
    }
}

/// Command line for the chosen mode. Poetry and venv are development modes
/// and get `--reload`; simple mode runs plain.
#[must_use]
pub fn launch_plan(
    mode: ServerMode,
    variant: AppVariant,
    host: &str,
    port: u16,
) -> (&'static str, Vec<String>) {
    let target = variant.uvicorn_target().to_string();
    let port = port.to_string();
    match mode {
        ServerMode::Poetry => (
            "poetry",
            vec![
                "run".to_string(),
                "uvicorn".to_string(),
                target,
                "--host".to_string(),
                host.to_string(),
                "--port".to_string(),
                port,
                "--reload".to_string(),
            ],
        ),
        ServerMode::Venv => (
            "uvicorn",
            vec![
                target,
                "--host".to_string(),
                host.to_string(),
                "--port".to_string(),
                port,
                "--reload".to_string(),
            ],
        ),
        ServerMode::Simple => (
            "uvicorn",
            vec![
                target,
                "--host".to_string(),
                host.to_string(),
                "--port".to_string(),
                port,
            ],
        ),
    }
}

/// Run the server command. The child inherits stdio and runs until it exits
/// or the user interrupts it.
///
/// # Errors
///
/// Returns an error if the mode's precondition fails (missing
/// `pyproject.toml`, inactive virtualenv) or the server exits non-zero.
pub async fn run(
    args: &ServerArgs,
    runner: &impl CommandRunner,
    root: &Path,
    ctx: &OutputContext,
) -> Result<()> {
    match args.mode {
        ServerMode::Poetry => {
            let pyproject = root.join("pyproject.toml");
            anyhow::ensure!(
                pyproject.exists(),
                "pyproject.toml not found at {} (poetry mode needs the project root)",
                pyproject.display()
            );
        }
        ServerMode::Venv => {
            anyhow::ensure!(
                std::env::var_os("VIRTUAL_ENV").is_some(),
                "VIRTUAL_ENV is not set; activate the virtualenv or use --mode simple"
            );
        }
        ServerMode::Simple => {}
    }

    warn_on_unconfigured_key(root, ctx);

    let variant = args.variant();
    let (program, cmd_args) = launch_plan(args.mode, variant, &args.host, args.port);
    ctx.info(&format!(
        "Starting {} on {}:{} ({} mode)",
        variant.uvicorn_target(),
        args.host,
        args.port,
        args.mode
    ));

    let refs: Vec<&str> = cmd_args.iter().map(String::as_str).collect();
    let status = runner.run_status(program, &refs, &[]).await?;
    anyhow::ensure!(status.success(), "server exited with {status}");
    Ok(())
}

/// Advisory only — the server fails on its own if it truly needs the key.
fn warn_on_unconfigured_key(root: &Path, ctx: &OutputContext) {
    let env = EnvFile::with_path(root.join(DEFAULT_ENV_FILE));
    let key = if env.exists() {
        env.get(API_KEY_VAR).ok().flatten()
    } else {
        None
    };
    let key = key.or_else(|| std::env::var(API_KEY_VAR).ok());

    if key.as_deref().is_none_or(env_file::is_placeholder) {
        ctx.warn(&format!(
            "{API_KEY_VAR} is not configured; agent endpoints will fail (run: agentctl env init)"
        ));
    }
}
