//! Client configuration

use std::time::Duration;

use crate::poller::DEFAULT_POLL_INTERVAL;

/// Deployment environment
///
/// Selected at build time; each environment fixes a base URL and a request
/// timeout. There is no runtime override surface beyond [`ClientConfig`]
/// construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Environment {
    #[default]
    Development,
    Staging,
    Production,
}

impl Environment {
    pub fn base_url(&self) -> &'static str {
        match self {
            Self::Development => "http://localhost:3001/api",
            Self::Staging => "https://staging-api.fermentocefalu.it/api",
            Self::Production => "https://api.fermentocefalu.it/api",
        }
    }

    pub fn timeout(&self) -> Duration {
        match self {
            Self::Development => Duration::from_millis(10_000),
            Self::Staging => Duration::from_millis(12_000),
            Self::Production => Duration::from_millis(15_000),
        }
    }
}

/// Client configuration for connecting to the reservation backend
///
/// Read-only after the client is constructed from it.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// API base URL including the `/api` prefix
    /// (e.g. "http://localhost:3001/api")
    pub base_url: String,

    /// Per-request timeout; the in-flight call is aborted when it elapses
    pub timeout: Duration,

    /// Cadence of the reservation change-detection poller
    pub poll_interval: Duration,
}

impl ClientConfig {
    /// Create a new client configuration with default timeouts
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout: Environment::Development.timeout(),
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }

    /// Configuration for a deployment environment
    pub fn for_env(env: Environment) -> Self {
        Self::new(env.base_url()).with_timeout(env.timeout())
    }

    /// Set the request timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the polling cadence
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::for_env(Environment::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn environments_fix_url_and_timeout() {
        assert_eq!(
            Environment::Development.base_url(),
            "http://localhost:3001/api"
        );
        assert_eq!(Environment::Staging.timeout(), Duration::from_millis(12_000));
        assert_eq!(
            Environment::Production.timeout(),
            Duration::from_millis(15_000)
        );
    }

    #[test]
    fn builder_overrides() {
        let config = ClientConfig::new("http://127.0.0.1:9999/api")
            .with_timeout(Duration::from_secs(2))
            .with_poll_interval(Duration::from_millis(100));
        assert_eq!(config.timeout, Duration::from_secs(2));
        assert_eq!(config.poll_interval, Duration::from_millis(100));
    }

    #[test]
    fn default_is_development() {
        let config = ClientConfig::default();
        assert_eq!(config.base_url, "http://localhost:3001/api");
        assert_eq!(config.poll_interval, DEFAULT_POLL_INTERVAL);
    }
}
