use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Error for a value outside one of the closed option domains.
///
/// The message names the offending value and the full allowed set, so it can
/// be surfaced to the user verbatim.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid {domain} '{value}' (allowed: {allowed})")]
pub struct InvalidOption {
    /// Human name of the option domain, e.g. `"environment"`.
    pub domain: &'static str,
    /// The rejected input.
    pub value: String,
    /// Comma-separated allowed set.
    pub allowed: &'static str,
}

impl InvalidOption {
    fn new(domain: &'static str, value: &str, allowed: &'static str) -> Self {
        Self {
            domain,
            value: value.to_string(),
            allowed,
        }
    }
}

/// Deployment target environment.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
pub enum Environment {
    #[default]
    Staging,
    Production,
}

impl Environment {
    /// All legal values, in display order.
    pub const ALL: [Self; 2] = [Self::Staging, Self::Production];

    const ALLOWED: &'static str = "staging, production";

    /// Production deploys require interactive confirmation unless forced.
    #[must_use]
    pub fn is_production(self) -> bool {
        matches!(self, Self::Production)
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Staging => f.write_str("staging"),
            Self::Production => f.write_str("production"),
        }
    }
}

impl FromStr for Environment {
    type Err = InvalidOption;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "staging" => Ok(Self::Staging),
            "production" => Ok(Self::Production),
            other => Err(InvalidOption::new("environment", other, Self::ALLOWED)),
        }
    }
}

/// Image build flavor, selecting which Dockerfile is used.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
pub enum BuildType {
    #[default]
    Basic,
    Poetry,
    Main,
}

impl BuildType {
    /// All legal values, in display order.
    pub const ALL: [Self; 3] = [Self::Basic, Self::Poetry, Self::Main];

    const ALLOWED: &'static str = "basic, poetry, main";

    /// Dockerfile path this build type maps to, relative to the project root.
    #[must_use]
    pub fn dockerfile(self) -> &'static str {
        match self {
            Self::Basic => "Dockerfile.basic",
            Self::Poetry => "Dockerfile.poetry",
            Self::Main => "Dockerfile",
        }
    }

    /// Default image name for this build type, e.g. `intelligent-agent-basic`.
    #[must_use]
    pub fn default_image(self, base: &str) -> String {
        format!("{base}-{suffix}", suffix = self)
    }
}

impl fmt::Display for BuildType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Basic => f.write_str("basic"),
            Self::Poetry => f.write_str("poetry"),
            Self::Main => f.write_str("main"),
        }
    }
}

impl FromStr for BuildType {
    type Err = InvalidOption;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "basic" => Ok(Self::Basic),
            "poetry" => Ok(Self::Poetry),
            "main" => Ok(Self::Main),
            other => Err(InvalidOption::new("build type", other, Self::ALLOWED)),
        }
    }
}

/// Compose file selector, mapping to a docker-compose YAML path.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
pub enum ComposeFile {
    Simple,
    Poetry,
    #[default]
    Full,
}

impl ComposeFile {
    /// All legal values, in display order.
    pub const ALL: [Self; 3] = [Self::Simple, Self::Poetry, Self::Full];

    const ALLOWED: &'static str = "simple, poetry, full";

    /// YAML path this selector maps to, relative to the project root.
    #[must_use]
    pub fn path(self) -> &'static str {
        match self {
            Self::Simple => "docker-compose.simple.yml",
            Self::Poetry => "docker-compose.poetry.yml",
            Self::Full => "docker-compose.yml",
        }
    }
}

impl fmt::Display for ComposeFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Simple => f.write_str("simple"),
            Self::Poetry => f.write_str("poetry"),
            Self::Full => f.write_str("full"),
        }
    }
}

impl FromStr for ComposeFile {
    type Err = InvalidOption;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "simple" => Ok(Self::Simple),
            "poetry" => Ok(Self::Poetry),
            "full" => Ok(Self::Full),
            other => Err(InvalidOption::new("compose file", other, Self::ALLOWED)),
        }
    }
}

/// Launcher used for the local API server.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
pub enum ServerMode {
    #[default]
    Poetry,
    Venv,
    Simple,
}

impl ServerMode {
    /// All legal values, in display order.
    pub const ALL: [Self; 3] = [Self::Poetry, Self::Venv, Self::Simple];

    const ALLOWED: &'static str = "poetry, venv, simple";
}

impl fmt::Display for ServerMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Poetry => f.write_str("poetry"),
            Self::Venv => f.write_str("venv"),
            Self::Simple => f.write_str("simple"),
        }
    }
}

impl FromStr for ServerMode {
    type Err = InvalidOption;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "poetry" => Ok(Self::Poetry),
            "venv" => Ok(Self::Venv),
            "simple" => Ok(Self::Simple),
            other => Err(InvalidOption::new("server mode", other, Self::ALLOWED)),
        }
    }
}

/// Which FastAPI application module uvicorn should serve.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum AppVariant {
    /// Full agent application with the tool registry.
    #[default]
    Full,
    /// Reduced application without external tool integrations.
    Simple,
}

impl AppVariant {
    /// uvicorn import target for this variant.
    #[must_use]
    pub fn uvicorn_target(self) -> &'static str {
        match self {
            Self::Full => "src.api.main:app",
            Self::Simple => "src.api.main_simple:app",
        }
    }
}

impl fmt::Display for AppVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Full => f.write_str("full"),
            Self::Simple => f.write_str("simple"),
        }
    }
}
