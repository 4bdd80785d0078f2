//! Advisory health probe of the deployed service.

use std::time::Duration;

use anyhow::{Context, Result};

/// Timeout for the probe request itself.
pub const PROBE_TIMEOUT: Duration = Duration::from_secs(5);

/// Fixed settle time between `docker-compose up -d` and the single probe.
/// There is no retry loop — one probe, then the deploy reports success.
pub const POST_DEPLOY_WAIT: Duration = Duration::from_secs(5);

/// Single-shot service health check.
///
/// Probe failure is advisory: callers print a warning and keep their own
/// exit status.
pub trait HealthProbe {
    /// GET the health endpoint once.
    ///
    /// # Errors
    ///
    /// Returns an error if the endpoint is unreachable or answers with a
    /// non-success status.
    fn probe(&self) -> Result<u16>;
}

/// Production probe — blocking HTTP GET against the service health endpoint.
pub struct HttpProbe {
    url: String,
}

impl HttpProbe {
    #[must_use]
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }
}

impl Default for HttpProbe {
    fn default() -> Self {
        Self::new(agentctl_common::HEALTH_URL)
    }
}

impl HealthProbe for HttpProbe {
    fn probe(&self) -> Result<u16> {
        let agent = ureq::AgentBuilder::new().timeout(PROBE_TIMEOUT).build();
        match agent.get(&self.url).call() {
            Ok(response) => Ok(response.status()),
            Err(ureq::Error::Status(code, _)) => {
                anyhow::bail!("health endpoint returned HTTP {code}")
            }
            Err(e) => Err(e).with_context(|| format!("probing {}", self.url)),
        }
    }
}
