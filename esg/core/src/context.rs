use url::Url;

/// Protocol and hostname of the page the client runs in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    /// Scheme including the trailing colon, e.g. `https:`.
    pub protocol: String,
    pub hostname: String,
}

impl Location {
    pub fn new(protocol: impl Into<String>, hostname: impl Into<String>) -> Self {
        let mut protocol = protocol.into();
        if !protocol.ends_with(':') {
            protocol.push(':');
        }
        Self {
            protocol,
            hostname: hostname.into(),
        }
    }

    /// Parse a page URL such as `https://dash.example.com:3000/kpi`.
    pub fn parse(page_url: &str) -> Option<Self> {
        let url = Url::parse(page_url).ok()?;
        let host = url.host_str()?;
        Some(Self::new(url.scheme(), host))
    }
}

/// Capability describing where the client is executing.
pub trait ExecutionContext: Send + Sync {
    /// Whether a browser-like page location is available.
    fn has_browser_location(&self) -> bool {
        self.current_location().is_some()
    }

    fn current_location(&self) -> Option<Location>;
}

/// Server-side or command line execution: no page location.
#[derive(Debug, Clone, Copy, Default)]
pub struct ServerContext;

impl ExecutionContext for ServerContext {
    fn has_browser_location(&self) -> bool {
        false
    }

    fn current_location(&self) -> Option<Location> {
        None
    }
}

/// A page location fixed at construction.
#[derive(Debug, Clone)]
pub struct FixedLocation(pub Location);

impl ExecutionContext for FixedLocation {
    fn has_browser_location(&self) -> bool {
        true
    }

    fn current_location(&self) -> Option<Location> {
        Some(self.0.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_location_normalizes_protocol() {
        assert_eq!(Location::new("https", "a").protocol, "https:");
        assert_eq!(Location::new("http:", "a").protocol, "http:");
    }

    #[test]
    fn test_parse_page_url_drops_port_and_path() {
        let loc = Location::parse("https://dash.example.com:3000/kpi?x=1").unwrap();
        assert_eq!(loc, Location::new("https:", "dash.example.com"));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(Location::parse("not a url").is_none());
    }

    #[test]
    fn test_server_context_has_no_location() {
        assert!(!ServerContext.has_browser_location());
        assert!(ServerContext.current_location().is_none());
    }
}
