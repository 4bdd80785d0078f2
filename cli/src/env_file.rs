//! `.env` file management — lookup, in-place edits with a timestamped
//! backup, and the template written by `agentctl env init`.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use agentctl_common::{API_KEY_PLACEHOLDER, DEFAULT_ENV_FILE};

/// Template written when no `.env` exists yet. Keys mirror the service's
/// settings module; the API key ships as a placeholder the check command
/// rejects.
pub const ENV_TEMPLATE: &str = "\
# Intelligent agent configuration
# Created by agentctl env init

OPENAI_API_KEY=your_openai_api_key_here
OPENAI_MODEL=gpt-4-turbo-preview

API_HOST=0.0.0.0
API_PORT=8000
LOG_LEVEL=INFO

ENVIRONMENT=staging
IMAGE_NAME=intelligent-agent
IMAGE_TAG=latest
";

/// Manager for one `.env` file.
pub struct EnvFile {
    path: PathBuf,
}

impl EnvFile {
    /// Manager for `./.env`.
    #[must_use]
    pub fn new() -> Self {
        Self::with_path(PathBuf::from(DEFAULT_ENV_FILE))
    }

    /// Manager with an explicit path (used by `--file` and in tests).
    #[must_use]
    pub fn with_path(path: PathBuf) -> Self {
        Self { path }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    #[must_use]
    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Raw lines of the file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file is missing or unreadable.
    pub fn load(&self) -> Result<Vec<String>> {
        let content = std::fs::read_to_string(&self.path)
            .with_context(|| format!("reading env file {}", self.path.display()))?;
        Ok(content.lines().map(str::to_string).collect())
    }

    /// Value of `key`, or `None` when the key is absent.
    ///
    /// # Errors
    ///
    /// Returns an error if the file is missing or unreadable.
    pub fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(lookup(&self.load()?, key))
    }

    /// Set `key=value` in place, preserving unrelated lines and comments.
    /// When the file already exists, a timestamped backup is written first;
    /// its path is returned. A missing file is created with the single entry.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, backed up, or written.
    pub fn set(&self, key: &str, value: &str) -> Result<Option<PathBuf>> {
        let (mut lines, backup) = if self.exists() {
            (self.load()?, Some(self.backup()?))
        } else {
            (Vec::new(), None)
        };
        upsert(&mut lines, key, value);
        self.write_lines(&lines)?;
        Ok(backup)
    }

    /// Write the init template. Fails if the file already exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists or cannot be written.
    pub fn write_template(&self) -> Result<()> {
        anyhow::ensure!(
            !self.exists(),
            "{} already exists; refusing to overwrite",
            self.path.display()
        );
        std::fs::write(&self.path, ENV_TEMPLATE)
            .with_context(|| format!("writing env file {}", self.path.display()))
    }

    fn write_lines(&self, lines: &[String]) -> Result<()> {
        let mut content = lines.join("\n");
        content.push('\n');
        std::fs::write(&self.path, content)
            .with_context(|| format!("writing env file {}", self.path.display()))
    }

    fn backup(&self) -> Result<PathBuf> {
        let stamp = chrono::Local::now().format("%Y%m%d-%H%M%S");
        let backup_path = PathBuf::from(format!("{}.backup.{stamp}", self.path.display()));
        std::fs::copy(&self.path, &backup_path)
            .with_context(|| format!("backing up to {}", backup_path.display()))?;
        Ok(backup_path)
    }
}

impl Default for EnvFile {
    fn default() -> Self {
        Self::new()
    }
}

/// Value of `key` among raw `KEY=VALUE` lines. Comments and blank lines are
/// skipped; an optional `export ` prefix and surrounding quotes are stripped.
#[must_use]
pub fn lookup(lines: &[String], key: &str) -> Option<String> {
    for line in lines {
        let trimmed = line.trim_start();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        let entry = trimmed.strip_prefix("export ").unwrap_or(trimmed);
        if let Some((k, v)) = entry.split_once('=') {
            if k.trim() == key {
                return Some(unquote(v.trim()).to_string());
            }
        }
    }
    None
}

/// Replace the first `key=...` line, or append one. Returns `true` when an
/// existing line was replaced.
pub fn upsert(lines: &mut Vec<String>, key: &str, value: &str) -> bool {
    for line in lines.iter_mut() {
        let trimmed = line.trim_start();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        let entry = trimmed.strip_prefix("export ").unwrap_or(trimmed);
        if let Some((k, _)) = entry.split_once('=') {
            if k.trim() == key {
                *line = format!("{key}={value}");
                return true;
            }
        }
    }
    lines.push(format!("{key}={value}"));
    false
}

/// All `(key, value)` entries among raw lines, in file order.
#[must_use]
pub fn entries(lines: &[String]) -> Vec<(String, String)> {
    let mut out = Vec::new();
    for line in lines {
        let trimmed = line.trim_start();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        let entry = trimmed.strip_prefix("export ").unwrap_or(trimmed);
        if let Some((k, v)) = entry.split_once('=') {
            out.push((k.trim().to_string(), unquote(v.trim()).to_string()));
        }
    }
    out
}

/// Whether a key value is effectively unset (empty or the shipped sentinel).
#[must_use]
pub fn is_placeholder(value: &str) -> bool {
    value.is_empty() || value == API_KEY_PLACEHOLDER
}

fn unquote(value: &str) -> &str {
    let stripped = value
        .strip_prefix('"')
        .and_then(|v| v.strip_suffix('"'))
        .or_else(|| value.strip_prefix('\'').and_then(|v| v.strip_suffix('\'')));
    stripped.unwrap_or(value)
}
