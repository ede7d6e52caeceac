use esg_core::config::StaticOrigin;
use esg_core::context::{ExecutionContext, Location};
use esg_core::token::TokenStore;

/// localStorage key holding the bearer token written by the login page.
pub const TOKEN_KEY: &str = "esg.token";

/// Origin baked in at build time, e.g. `ESG_API_ORIGIN=https://api.example dx build`.
/// Left-over placeholders are filtered out by the resolver.
pub fn build_time_origin() -> StaticOrigin {
    StaticOrigin(option_env!("ESG_API_ORIGIN").map(str::to_string))
}

pub fn local_storage() -> Option<web_sys::Storage> {
    web_sys::window()?.local_storage().ok()?
}

/// Reads `window.location` on every call.
#[derive(Debug, Clone, Copy, Default)]
pub struct BrowserContext;

impl ExecutionContext for BrowserContext {
    fn has_browser_location(&self) -> bool {
        web_sys::window().is_some()
    }

    fn current_location(&self) -> Option<Location> {
        let location = web_sys::window()?.location();
        let protocol = location.protocol().ok()?;
        let hostname = location.hostname().ok()?;
        Some(Location::new(protocol, hostname))
    }
}

/// Token kept in `localStorage` by the (external) login flow.
#[derive(Debug, Clone)]
pub struct LocalStorageToken {
    key: String,
}

impl Default for LocalStorageToken {
    fn default() -> Self {
        Self {
            key: TOKEN_KEY.to_string(),
        }
    }
}

impl TokenStore for LocalStorageToken {
    fn token(&self) -> Option<String> {
        local_storage()?.get_item(&self.key).ok()?
    }
}
