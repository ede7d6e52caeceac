//! Shared HTTP client for the ESG dashboard.
//!
//! Every outgoing call goes through [`ApiClient::dispatch`], which
//!
//! * resolves the API origin on each request ([`resolver`]),
//! * attaches the bearer token from a [`token::TokenStore`],
//! * cancels an identical request that is still in flight ([`registry`]).

pub mod client;
pub mod config;
pub mod context;
pub mod error;
pub mod registry;
pub mod resolver;
pub mod signature;
pub mod token;
pub mod transport;

pub use client::{parse_method, ApiClient, ApiClientBuilder};
pub use error::{ClientError, Result};
pub use reqwest::Method;

pub mod prelude {
    pub use crate::client::{parse_method, ApiClient, ApiClientBuilder};
    pub use crate::config::{ClientConfig, ConfigSource, EnvOrigin, StaticOrigin};
    pub use crate::context::{ExecutionContext, FixedLocation, Location, ServerContext};
    pub use crate::error::{ClientError, Result};
    pub use crate::registry::PendingRegistry;
    pub use crate::resolver::EndpointResolver;
    pub use crate::signature::RequestSignature;
    pub use crate::token::{EnvToken, MemoryTokenStore, NoToken, StaticToken, TokenStore};
    pub use crate::transport::{ApiResponse, HttpRequest, ReqwestTransport, Transport};
    pub use reqwest::Method;
}
