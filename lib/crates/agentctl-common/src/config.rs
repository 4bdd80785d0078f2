//! Hard-coded deployment defaults shared by every agentctl command.
//!
//! These mirror the service's own settings (FastAPI binds 0.0.0.0:8000 and
//! exposes `/health`), so the CLI and the deployed container agree without
//! any configuration file.

/// Base image name; build types append their suffix (`intelligent-agent-basic`).
pub const DEFAULT_IMAGE: &str = "intelligent-agent";

/// Default image tag.
pub const DEFAULT_TAG: &str = "latest";

/// Default container name for `agentctl run`.
pub const DEFAULT_CONTAINER: &str = "intelligent-agent";

/// Port the FastAPI service listens on inside the container.
pub const CONTAINER_PORT: u16 = 8000;

/// Default bind host for the local server.
pub const DEFAULT_BIND_HOST: &str = "0.0.0.0";

/// Health endpoint probed after a deploy. Advisory only.
pub const HEALTH_URL: &str = "http://localhost:8000/health";

/// Environment variable holding the OpenAI API key.
pub const API_KEY_VAR: &str = "OPENAI_API_KEY";

/// Sentinel value shipped in the `.env` template. A key equal to this is
/// treated the same as a missing key.
pub const API_KEY_PLACEHOLDER: &str = "your_openai_api_key_here";

/// Default env file path, relative to the project root.
pub const DEFAULT_ENV_FILE: &str = ".env";
