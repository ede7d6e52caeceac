use std::sync::Arc;

use crate::config::{ClientConfig, ConfigSource};
use crate::context::ExecutionContext;

/// Marker left in a configured value whose build-time substitution never ran.
const PLACEHOLDER_MARKER: &str = "${";

/// Whether a configured origin can be used as is.
///
/// Empty values, the literal `undefined` and values still carrying a `${...}`
/// placeholder are rejected.
pub fn is_usable_origin(origin: &str) -> bool {
    let trimmed = origin.trim();
    !trimmed.is_empty() && trimmed != "undefined" && !trimmed.contains(PLACEHOLDER_MARKER)
}

/// Computes the base origin prepended to relative API paths.
///
/// Nothing is cached; every call consults the config source and execution
/// context again.
#[derive(Clone)]
pub struct EndpointResolver {
    source: Arc<dyn ConfigSource>,
    context: Arc<dyn ExecutionContext>,
    gateway_port: u16,
    fallback_origin: String,
}

impl EndpointResolver {
    pub fn new(
        source: Arc<dyn ConfigSource>,
        context: Arc<dyn ExecutionContext>,
        config: &ClientConfig,
    ) -> Self {
        Self {
            source,
            context,
            gateway_port: config.gateway_port,
            fallback_origin: config.fallback_origin.clone(),
        }
    }

    pub fn resolve(&self) -> String {
        if let Some(origin) = self.source.configured_origin() {
            if is_usable_origin(&origin) {
                return origin;
            }
            log::debug!("Ignoring unusable configured origin: {origin:?}");
        }

        if self.context.has_browser_location() {
            if let Some(location) = self.context.current_location() {
                return format!(
                    "{}//{}:{}",
                    location.protocol, location.hostname, self.gateway_port
                );
            }
        }

        self.fallback_origin.clone()
    }

    /// Prefix `path` with the resolved origin. Absolute URLs pass through.
    pub fn resolve_url(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            return path.to_string();
        }
        format!("{}{}", self.resolve(), path)
    }
}

impl std::fmt::Debug for EndpointResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EndpointResolver")
            .field("gateway_port", &self.gateway_port)
            .field("fallback_origin", &self.fallback_origin)
            .finish_non_exhaustive()
    }
}
