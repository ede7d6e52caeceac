use std::pin::pin;
use std::sync::Arc;

use futures::future::{self, Either};
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use url::Url;

use crate::config::{ClientConfig, ConfigSource, EnvOrigin};
use crate::context::{ExecutionContext, ServerContext};
use crate::error::{ClientError, Result};
use crate::registry::{PendingGuard, PendingRegistry};
use crate::resolver::EndpointResolver;
use crate::signature::RequestSignature;
use crate::token::{bearer_value, EnvToken, TokenStore};
use crate::transport::{header_map, ApiResponse, HttpRequest, ReqwestTransport, Transport};

const AUTHORIZATION: &str = "Authorization";

/// Parse an HTTP method name, case-insensitively.
pub fn parse_method(method: &str) -> Result<Method> {
    Method::from_bytes(method.trim().to_ascii_uppercase().as_bytes())
        .map_err(|_| ClientError::InvalidRequest(format!("invalid HTTP method: {method:?}")))
}

/// Shared client used by every dashboard service.
///
/// Each dispatch resolves the base origin, attaches the bearer token and
/// cancels any in-flight request with the same signature.
#[derive(Clone)]
pub struct ApiClient {
    resolver: EndpointResolver,
    tokens: Arc<dyn TokenStore>,
    registry: Arc<PendingRegistry>,
    transport: Arc<dyn Transport>,
}

impl ApiClient {
    pub fn builder() -> ApiClientBuilder {
        ApiClientBuilder::default()
    }

    /// Client for command line and server-side use: origin and token from
    /// `ESG_*` environment variables, no page location.
    pub fn from_env() -> Result<Self> {
        let config = ClientConfig::from_env();
        Self::builder()
            .transport(ReqwestTransport::new(&config)?)
            .config(config)
            .build()
    }

    pub fn registry(&self) -> &Arc<PendingRegistry> {
        &self.registry
    }

    pub fn resolver(&self) -> &EndpointResolver {
        &self.resolver
    }

    /// Build the request that `dispatch` would send, without sending it.
    pub fn prepare(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
        headers: &[(String, String)],
    ) -> Result<HttpRequest> {
        let url = self.resolver.resolve_url(path);
        Url::parse(&url).map_err(|e| ClientError::InvalidRequest(format!("{url}: {e}")))?;

        let token = self.tokens.token().filter(|t| !t.trim().is_empty());
        let mut all_headers: Vec<(String, String)> = headers
            .iter()
            .filter(|(name, _)| token.is_none() || !name.eq_ignore_ascii_case(AUTHORIZATION))
            .cloned()
            .collect();
        if let Some(token) = token {
            all_headers.push((AUTHORIZATION.to_string(), bearer_value(&token)));
        }
        header_map(&all_headers)?;

        Ok(HttpRequest {
            method,
            url,
            headers: all_headers,
            body,
        })
    }

    /// Send a request, superseding any identical request still in flight.
    ///
    /// A superseded call resolves as [`ClientError::Cancelled`]; the registry
    /// entry is released on settlement only if it is still this call's own.
    pub async fn dispatch(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
        headers: &[(String, String)],
    ) -> Result<ApiResponse> {
        let request = self.prepare(method, path, body, headers)?;
        let signature =
            RequestSignature::new(request.method.as_str(), &request.url, request.body.as_ref());

        let (id, signal) = self.registry.register(&signature);
        let _guard = PendingGuard::new(self.registry.clone(), signature, id);
        log::debug!("Dispatching {} {}", request.method, request.url);

        let cancelled = pin!(signal.cancelled());
        let send = self.transport.send(request);

        // Cancellation is polled first so a superseded request never reports
        // a response that arrived in the same poll.
        match future::select(cancelled, send).await {
            Either::Left((reason, _)) => {
                log::debug!("Request cancelled: {reason}");
                Err(ClientError::Cancelled { reason })
            }
            Either::Right((result, _)) => {
                match &result {
                    Ok(resp) => log::debug!("Request settled with status {}", resp.status),
                    Err(e) => log::debug!("Request failed: {e}"),
                }
                result
            }
        }
    }

    pub async fn get(&self, path: &str) -> Result<ApiResponse> {
        self.dispatch(Method::GET, path, None, &[]).await
    }

    pub async fn post(&self, path: &str, body: Value) -> Result<ApiResponse> {
        self.dispatch(Method::POST, path, Some(body), &[]).await
    }

    pub async fn put(&self, path: &str, body: Value) -> Result<ApiResponse> {
        self.dispatch(Method::PUT, path, Some(body), &[]).await
    }

    pub async fn patch(&self, path: &str, body: Value) -> Result<ApiResponse> {
        self.dispatch(Method::PATCH, path, Some(body), &[]).await
    }

    pub async fn delete(&self, path: &str) -> Result<ApiResponse> {
        self.dispatch(Method::DELETE, path, None, &[]).await
    }

    pub async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        self.get(path).await?.json()
    }

    pub async fn post_json<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T> {
        self.post(path, to_body(body)?).await?.json()
    }

    pub async fn put_json<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T> {
        self.put(path, to_body(body)?).await?.json()
    }

    pub async fn delete_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        self.delete(path).await?.json()
    }
}

fn to_body<B: Serialize + ?Sized>(body: &B) -> Result<Value> {
    serde_json::to_value(body)
        .map_err(|e| ClientError::InvalidRequest(format!("failed to serialize body: {e}")))
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("resolver", &self.resolver)
            .field("pending", &self.registry.len())
            .finish_non_exhaustive()
    }
}

/// Assembles an [`ApiClient`] from its collaborators.
///
/// Unset parts default to: `ESG_API_ORIGIN`, no page location, `ESG_API_TOKEN`,
/// a fresh registry and `reqwest`.
#[derive(Default)]
pub struct ApiClientBuilder {
    config: Option<ClientConfig>,
    source: Option<Arc<dyn ConfigSource>>,
    context: Option<Arc<dyn ExecutionContext>>,
    tokens: Option<Arc<dyn TokenStore>>,
    registry: Option<Arc<PendingRegistry>>,
    transport: Option<Arc<dyn Transport>>,
}

impl ApiClientBuilder {
    pub fn config(mut self, config: ClientConfig) -> Self {
        self.config = Some(config);
        self
    }

    pub fn origin_source(mut self, source: impl ConfigSource + 'static) -> Self {
        self.source = Some(Arc::new(source));
        self
    }

    pub fn context(mut self, context: impl ExecutionContext + 'static) -> Self {
        self.context = Some(Arc::new(context));
        self
    }

    pub fn tokens(mut self, tokens: impl TokenStore + 'static) -> Self {
        self.tokens = Some(Arc::new(tokens));
        self
    }

    pub fn registry(mut self, registry: Arc<PendingRegistry>) -> Self {
        self.registry = Some(registry);
        self
    }

    pub fn transport(mut self, transport: impl Transport + 'static) -> Self {
        self.transport = Some(Arc::new(transport));
        self
    }

    pub fn shared_transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = Some(transport);
        self
    }

    pub fn build(self) -> Result<ApiClient> {
        let config = self.config.unwrap_or_default();
        let transport = match self.transport {
            Some(transport) => transport,
            None => Arc::new(ReqwestTransport::new(&config)?),
        };
        let resolver = EndpointResolver::new(
            self.source.unwrap_or_else(|| Arc::new(EnvOrigin::default())),
            self.context.unwrap_or_else(|| Arc::new(ServerContext)),
            &config,
        );

        Ok(ApiClient {
            resolver,
            tokens: self.tokens.unwrap_or_else(|| Arc::new(EnvToken::default())),
            registry: self.registry.unwrap_or_default(),
            transport,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::StaticOrigin;
    use crate::token::{NoToken, StaticToken};

    struct Unreachable;

    #[cfg_attr(target_arch = "wasm32", async_trait::async_trait(?Send))]
    #[cfg_attr(not(target_arch = "wasm32"), async_trait::async_trait)]
    impl Transport for Unreachable {
        async fn send(&self, _request: HttpRequest) -> Result<ApiResponse> {
            Err(ClientError::Network("unreachable".to_string()))
        }
    }

    fn client(tokens: impl TokenStore + 'static) -> ApiClient {
        ApiClient::builder()
            .origin_source(StaticOrigin::new("https://api.example.com"))
            .tokens(tokens)
            .transport(Unreachable)
            .build()
            .unwrap()
    }

    #[test]
    fn test_prepare_prefixes_origin() {
        let req = client(NoToken)
            .prepare(Method::GET, "/api/v1/kpis", None, &[])
            .unwrap();
        assert_eq!(req.url, "https://api.example.com/api/v1/kpis");
        assert_eq!(req.header("authorization"), None);
    }

    #[test]
    fn test_prepare_attaches_bearer_once() {
        let bare = client(StaticToken("abc".to_string()))
            .prepare(Method::GET, "/x", None, &[])
            .unwrap();
        assert_eq!(bare.header("Authorization"), Some("Bearer abc"));

        let prefixed = client(StaticToken("Bearer abc".to_string()))
            .prepare(Method::GET, "/x", None, &[])
            .unwrap();
        assert_eq!(prefixed.header("Authorization"), Some("Bearer abc"));
    }

    #[test]
    fn test_token_overrides_caller_authorization() {
        let req = client(StaticToken("abc".to_string()))
            .prepare(
                Method::GET,
                "/x",
                None,
                &[
                    ("authorization".to_string(), "Basic zzz".to_string()),
                    ("X-Tenant".to_string(), "acme".to_string()),
                ],
            )
            .unwrap();
        assert_eq!(req.header("Authorization"), Some("Bearer abc"));
        assert_eq!(req.header("x-tenant"), Some("acme"));
        assert_eq!(req.headers.len(), 2);
    }

    #[test]
    fn test_caller_authorization_kept_without_token() {
        let req = client(NoToken)
            .prepare(
                Method::GET,
                "/x",
                None,
                &[("Authorization".to_string(), "Basic zzz".to_string())],
            )
            .unwrap();
        assert_eq!(req.header("Authorization"), Some("Basic zzz"));
    }

    #[test]
    fn test_empty_token_is_ignored() {
        let req = client(StaticToken(String::new()))
            .prepare(Method::GET, "/x", None, &[])
            .unwrap();
        assert_eq!(req.header("Authorization"), None);
    }

    #[test]
    fn test_parse_method() {
        assert_eq!(parse_method("post").unwrap(), Method::POST);
        assert!(matches!(
            parse_method("NOT A METHOD"),
            Err(ClientError::InvalidRequest(_))
        ));
    }

    #[test]
    fn test_invalid_url_rejected_before_registration() {
        let client = ApiClient::builder()
            .origin_source(StaticOrigin::new("not-a-url"))
            .tokens(NoToken)
            .transport(Unreachable)
            .build()
            .unwrap();
        let err = futures::executor::block_on(client.get("/x")).unwrap_err();
        assert!(matches!(err, ClientError::InvalidRequest(_)));
        assert!(client.registry().is_empty());
    }
}
