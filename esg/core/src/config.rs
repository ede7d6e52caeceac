use std::env;
use std::time::Duration;

/// Environment variable holding the configured API origin.
pub const API_ORIGIN_ENV: &str = "ESG_API_ORIGIN";
pub const GATEWAY_PORT_ENV: &str = "ESG_GATEWAY_PORT";
pub const FALLBACK_ORIGIN_ENV: &str = "ESG_FALLBACK_ORIGIN";
pub const REQUEST_TIMEOUT_ENV: &str = "ESG_REQUEST_TIMEOUT_SECS";

/// Port the API gateway listens on, next to the page's own host.
pub const DEFAULT_GATEWAY_PORT: u16 = 8000;

/// Service-discovery name used when neither a configured origin nor a page
/// location is available.
pub const DEFAULT_FALLBACK_ORIGIN: &str = "http://gateway:8000";

pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Static settings of an [`crate::ApiClient`].
///
/// The configured origin is deliberately not part of this struct: it is read
/// through a [`ConfigSource`] on every dispatch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub gateway_port: u16,
    pub fallback_origin: String,
    pub timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            gateway_port: DEFAULT_GATEWAY_PORT,
            fallback_origin: DEFAULT_FALLBACK_ORIGIN.to_string(),
            timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }
}

impl ClientConfig {
    /// Build a config from `ESG_*` environment variables, falling back to
    /// defaults for anything unset or unparsable.
    pub fn from_env() -> Self {
        let gateway_port = env::var(GATEWAY_PORT_ENV)
            .ok()
            .and_then(|v| v.trim().parse().ok())
            .unwrap_or(DEFAULT_GATEWAY_PORT);
        let fallback_origin = env::var(FALLBACK_ORIGIN_ENV)
            .ok()
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_FALLBACK_ORIGIN.to_string());
        let timeout = env::var(REQUEST_TIMEOUT_ENV)
            .ok()
            .and_then(|v| v.trim().parse::<u64>().ok())
            .map(Duration::from_secs)
            .unwrap_or(DEFAULT_REQUEST_TIMEOUT);

        Self {
            gateway_port,
            fallback_origin,
            timeout,
        }
    }

    pub fn with_gateway_port(mut self, port: u16) -> Self {
        self.gateway_port = port;
        self
    }

    pub fn with_fallback_origin(mut self, origin: impl Into<String>) -> Self {
        self.fallback_origin = origin.into();
        self
    }
}

/// Supplies the configured API origin, if any.
pub trait ConfigSource: Send + Sync {
    fn configured_origin(&self) -> Option<String>;
}

/// Reads the origin from an environment variable on every call, so a changed
/// environment is picked up without rebuilding the client.
#[derive(Debug, Clone)]
pub struct EnvOrigin {
    var: String,
}

impl EnvOrigin {
    pub fn new(var: impl Into<String>) -> Self {
        Self { var: var.into() }
    }
}

impl Default for EnvOrigin {
    fn default() -> Self {
        Self::new(API_ORIGIN_ENV)
    }
}

impl ConfigSource for EnvOrigin {
    fn configured_origin(&self) -> Option<String> {
        env::var(&self.var).ok()
    }
}

/// A fixed origin, e.g. from a command line flag or baked in at build time.
#[derive(Debug, Clone, Default)]
pub struct StaticOrigin(pub Option<String>);

impl StaticOrigin {
    pub fn new(origin: impl Into<String>) -> Self {
        Self(Some(origin.into()))
    }

    pub fn none() -> Self {
        Self(None)
    }
}

impl ConfigSource for StaticOrigin {
    fn configured_origin(&self) -> Option<String> {
        self.0.clone()
    }
}
