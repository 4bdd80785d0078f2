//! `agentctl env` — manage the service's `.env` configuration file.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, Subcommand};
use agentctl_common::{API_KEY_VAR, DEFAULT_ENV_FILE};

use crate::env_file::{self, EnvFile};
use crate::output::OutputContext;

/// Env subcommands.
#[derive(Subcommand)]
pub enum EnvCommand {
    /// Create the env file from the built-in template
    Init(EnvArgs),

    /// Validate the configuration (exit 1 on a missing or placeholder key)
    Check(EnvArgs),

    /// Set KEY to VALUE, backing the file up first
    Set {
        #[command(flatten)]
        args: EnvArgs,

        /// Configuration key
        key: String,

        /// Configuration value
        value: String,
    },

    /// Show the configuration with secret values masked
    Show(EnvArgs),
}

/// Flags shared by every env subcommand.
#[derive(Args, Clone)]
pub struct EnvArgs {
    /// Env file to operate on
    #[arg(long, default_value = DEFAULT_ENV_FILE)]
    pub file: PathBuf,
}

/// Run the env command.
///
/// # Errors
///
/// Returns an error on filesystem failures, or from `check` when the API key
/// is missing or still the placeholder.
pub fn run(cmd: &EnvCommand, ctx: &OutputContext) -> Result<()> {
    match cmd {
        EnvCommand::Init(args) => init(&EnvFile::with_path(args.file.clone()), ctx),
        EnvCommand::Check(args) => check(&EnvFile::with_path(args.file.clone()), ctx),
        EnvCommand::Set { args, key, value } => {
            set(&EnvFile::with_path(args.file.clone()), key, value, ctx)
        }
        EnvCommand::Show(args) => show(&EnvFile::with_path(args.file.clone()), ctx),
    }
}

fn init(env: &EnvFile, ctx: &OutputContext) -> Result<()> {
    if env.exists() {
        ctx.info(&format!("{} already exists.", env.path().display()));
        return Ok(());
    }
    env.write_template()?;
    ctx.success(&format!("Created {}", env.path().display()));

    // On a terminal, offer to replace the placeholder right away.
    if ctx.is_tty {
        let key: String = dialoguer::Input::<String>::new()
            .with_prompt("OpenAI API key (leave empty to keep the placeholder)")
            .allow_empty(true)
            .interact_text()?;
        if !key.trim().is_empty() {
            let _ = env.set(API_KEY_VAR, key.trim())?;
            ctx.success("API key saved.");
            return Ok(());
        }
    }
    ctx.info(&format!(
        "Set your API key with: agentctl env set {API_KEY_VAR} <key>"
    ));
    Ok(())
}

fn check(env: &EnvFile, ctx: &OutputContext) -> Result<()> {
    anyhow::ensure!(
        env.exists(),
        "{} not found (run: agentctl env init)",
        env.path().display()
    );

    // The file takes precedence; a key exported in the shell also counts.
    let key = env
        .get(API_KEY_VAR)?
        .or_else(|| std::env::var(API_KEY_VAR).ok());
    match key {
        None => anyhow::bail!(
            "{API_KEY_VAR} is not set in {}",
            env.path().display()
        ),
        Some(value) if env_file::is_placeholder(&value) => anyhow::bail!(
            "{API_KEY_VAR} is still the placeholder value; set a real key"
        ),
        Some(_) => {
            ctx.success("Configuration looks good.");
            Ok(())
        }
    }
}

fn set(env: &EnvFile, key: &str, value: &str, ctx: &OutputContext) -> Result<()> {
    let backup = env.set(key, value)?;
    ctx.success(&format!("Set {key}"));
    match backup {
        Some(path) => ctx.kv("Backup", &path.display().to_string()),
        None => ctx.kv("Created", &env.path().display().to_string()),
    }
    Ok(())
}

fn show(env: &EnvFile, ctx: &OutputContext) -> Result<()> {
    anyhow::ensure!(
        env.exists(),
        "{} not found (run: agentctl env init)",
        env.path().display()
    );
    ctx.header(&env.path().display().to_string());
    for (key, value) in env_file::entries(&env.load()?) {
        ctx.kv(&key, &render_value(&key, &value));
    }
    Ok(())
}

/// Secrets are shown as a short prefix only; everything else verbatim.
#[must_use]
pub fn render_value(key: &str, value: &str) -> String {
    if !is_secret(key) || value.is_empty() {
        return value.to_string();
    }
    let prefix: String = value.chars().take(4).collect();
    format!("{prefix}****")
}

fn is_secret(key: &str) -> bool {
    let upper = key.to_ascii_uppercase();
    ["KEY", "SECRET", "TOKEN", "PASSWORD"]
        .iter()
        .any(|marker| upper.contains(marker))
}
