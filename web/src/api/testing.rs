//! In-process backend for exercising `DashboardApi` without a network.

use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::{Arc, Mutex};
use std::task::Poll;

use async_trait::async_trait;
use esg_core::config::StaticOrigin;
use esg_core::token::NoToken;
use esg_core::transport::{ApiResponse, HttpRequest, Transport};
use esg_core::{ApiClient, ClientError, Method};
use serde_json::{json, Value};

use super::DashboardApi;

pub(crate) const ORIGIN: &str = "http://api.test";

/// Answers like a CRUD backend:
/// list → `listing`, get → `{"id": n, ..}` from `listing`, create → body with
/// a new id, update → body, delete → empty 204. Paths ending in `/missing`
/// answer 404.
pub(crate) struct ScriptedBackend {
    listing: Value,
    next_id: AtomicI64,
    seen: Mutex<Vec<(Method, String)>>,
}

impl ScriptedBackend {
    pub(crate) fn new(listing: Value) -> Arc<Self> {
        Arc::new(Self {
            listing,
            next_id: AtomicI64::new(100),
            seen: Mutex::new(Vec::new()),
        })
    }

    /// `(method, path)` of every request that reached the backend.
    pub(crate) fn seen(&self) -> Vec<(Method, String)> {
        self.seen.lock().unwrap().clone()
    }

    pub(crate) fn api(self: &Arc<Self>) -> DashboardApi {
        let client = ApiClient::builder()
            .origin_source(StaticOrigin::new(ORIGIN))
            .tokens(NoToken)
            .shared_transport(self.clone())
            .build()
            .unwrap();
        DashboardApi::new(client)
    }

    fn respond(&self, request: &HttpRequest, path: &str) -> Result<ApiResponse, ClientError> {
        if path.ends_with("/missing") {
            return Err(ClientError::HttpStatus {
                status: 404,
                body: "no such record".to_string(),
            });
        }
        let id = path
            .rsplit('/')
            .next()
            .and_then(|last| last.parse::<i64>().ok());
        let body = match (request.method.as_str(), id) {
            ("GET", None) => self.listing.clone(),
            ("GET", Some(id)) => self
                .listing
                .as_array()
                .and_then(|all| all.iter().find(|r| r["id"] == json!(id)).cloned())
                .unwrap_or(Value::Null),
            ("POST", _) => {
                let mut body = request.body.clone().unwrap_or(Value::Null);
                body["id"] = json!(self.next_id.fetch_add(1, Ordering::SeqCst));
                body
            }
            ("PUT", _) => request.body.clone().unwrap_or(Value::Null),
            ("DELETE", _) => return Ok(ApiResponse::new(204, "")),
            _ => Value::Null,
        };
        Ok(ApiResponse::new(200, body.to_string()))
    }
}

/// Returns `Pending` once so concurrently started requests overlap.
async fn yield_now() {
    let mut yielded = false;
    futures::future::poll_fn(|cx| {
        if yielded {
            Poll::Ready(())
        } else {
            yielded = true;
            cx.waker().wake_by_ref();
            Poll::Pending
        }
    })
    .await
}

#[async_trait]
impl Transport for ScriptedBackend {
    async fn send(&self, request: HttpRequest) -> esg_core::Result<ApiResponse> {
        let path = request
            .url
            .strip_prefix(ORIGIN)
            .unwrap_or(&request.url)
            .to_string();
        self.seen
            .lock()
            .unwrap()
            .push((request.method.clone(), path.clone()));
        yield_now().await;
        self.respond(&request, &path)
    }
}
