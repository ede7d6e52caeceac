use std::env;
use std::sync::{Arc, RwLock};

pub const API_TOKEN_ENV: &str = "ESG_API_TOKEN";

const BEARER_PREFIX: &str = "Bearer ";

/// Format a token as an `Authorization` header value.
///
/// Tokens already carrying the `Bearer ` prefix are returned unchanged.
pub fn bearer_value(token: &str) -> String {
    if token.starts_with(BEARER_PREFIX) {
        token.to_string()
    } else {
        format!("{BEARER_PREFIX}{token}")
    }
}

/// Synchronous accessor for the current auth token. The client only reads it.
pub trait TokenStore: Send + Sync {
    fn token(&self) -> Option<String>;
}

/// No credentials at all.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoToken;

impl TokenStore for NoToken {
    fn token(&self) -> Option<String> {
        None
    }
}

#[derive(Debug, Clone)]
pub struct StaticToken(pub String);

impl TokenStore for StaticToken {
    fn token(&self) -> Option<String> {
        Some(self.0.clone())
    }
}

/// Reads the token from an environment variable on every call.
#[derive(Debug, Clone)]
pub struct EnvToken {
    var: String,
}

impl EnvToken {
    pub fn new(var: impl Into<String>) -> Self {
        Self { var: var.into() }
    }
}

impl Default for EnvToken {
    fn default() -> Self {
        Self::new(API_TOKEN_ENV)
    }
}

impl TokenStore for EnvToken {
    fn token(&self) -> Option<String> {
        env::var(&self.var).ok()
    }
}

/// Shared in-memory token, set and cleared by the login layer.
#[derive(Debug, Clone, Default)]
pub struct MemoryTokenStore {
    inner: Arc<RwLock<Option<String>>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&self, token: impl Into<String>) {
        let mut guard = self.inner.write().unwrap_or_else(|e| e.into_inner());
        *guard = Some(token.into());
    }

    pub fn clear(&self) {
        let mut guard = self.inner.write().unwrap_or_else(|e| e.into_inner());
        *guard = None;
    }
}

impl TokenStore for MemoryTokenStore {
    fn token(&self) -> Option<String> {
        self.inner
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }
}
