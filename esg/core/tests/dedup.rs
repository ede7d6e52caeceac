use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, RwLock};

use async_trait::async_trait;
use esg_core::prelude::*;
use esg_core::registry::SUPERSEDED_REASON;
use serde_json::{json, Value};
use tokio::sync::Semaphore;

#[derive(Debug, Clone)]
struct Seen {
    url: String,
    authorization: Option<String>,
    pending: usize,
}

/// In-process transport. Optionally waits on a gate before answering so
/// tests control when requests settle.
struct ScriptedTransport {
    registry: Arc<PendingRegistry>,
    gate: Option<Arc<Semaphore>>,
    calls: AtomicUsize,
    seen: Mutex<Vec<Seen>>,
}

impl ScriptedTransport {
    fn new(registry: Arc<PendingRegistry>, gate: Option<Arc<Semaphore>>) -> Arc<Self> {
        Arc::new(Self {
            registry,
            gate,
            calls: AtomicUsize::new(0),
            seen: Mutex::new(Vec::new()),
        })
    }

    fn seen(&self) -> Vec<Seen> {
        self.seen.lock().unwrap().clone()
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn send(&self, request: HttpRequest) -> Result<ApiResponse> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        self.seen.lock().unwrap().push(Seen {
            url: request.url.clone(),
            authorization: request.header("Authorization").map(str::to_string),
            pending: self.registry.len(),
        });

        if let Some(gate) = &self.gate {
            gate.acquire().await.expect("gate closed").forget();
        }

        if request.url.ends_with("/down") {
            return Err(ClientError::Network("connection refused".to_string()));
        }
        if request.url.ends_with("/missing") {
            return Err(ClientError::HttpStatus {
                status: 404,
                body: r#"{"detail":"not found"}"#.to_string(),
            });
        }
        let body = json!({ "call": call, "echo": request.body });
        Ok(ApiResponse::new(200, body.to_string()))
    }
}

struct Harness {
    client: ApiClient,
    registry: Arc<PendingRegistry>,
    transport: Arc<ScriptedTransport>,
}

fn harness(gate: Option<Arc<Semaphore>>) -> Harness {
    let registry = Arc::new(PendingRegistry::new());
    let transport = ScriptedTransport::new(registry.clone(), gate);
    let client = ApiClient::builder()
        .origin_source(StaticOrigin::new("http://api.test"))
        .tokens(StaticToken("secret".to_string()))
        .registry(registry.clone())
        .shared_transport(transport.clone())
        .build()
        .unwrap();
    Harness {
        client,
        registry,
        transport,
    }
}

fn call_number(resp: &ApiResponse) -> u64 {
    resp.json::<Value>().unwrap()["call"].as_u64().unwrap()
}

#[tokio::test]
async fn test_back_to_back_duplicates_cancel_the_first() {
    let gate = Arc::new(Semaphore::new(0));
    let h = harness(Some(gate.clone()));

    let first = h.client.get("/api/v1/x");
    let second = h.client.get("/api/v1/x");
    let release = async {
        tokio::task::yield_now().await;
        gate.add_permits(2);
    };
    let (first, second, ()) = tokio::join!(first, second, release);

    match first {
        Err(ClientError::Cancelled { reason }) => assert_eq!(reason, SUPERSEDED_REASON),
        other => panic!("expected cancellation, got {other:?}"),
    }
    let second = second.unwrap();
    assert_eq!(second.status, 200);
    assert_eq!(call_number(&second), 2);
    assert!(h.registry.is_empty());
}

#[tokio::test]
async fn test_at_most_one_entry_per_signature() {
    let gate = Arc::new(Semaphore::new(0));
    let h = harness(Some(gate.clone()));

    let a = h.client.get("/api/v1/x");
    let b = h.client.get("/api/v1/x");
    let c = h.client.get("/api/v1/x");
    let release = async {
        tokio::task::yield_now().await;
        assert_eq!(h.registry.len(), 1);
        gate.add_permits(3);
    };
    let (a, b, c, ()) = tokio::join!(a, b, c, release);

    assert!(a.unwrap_err().is_cancelled());
    assert!(b.unwrap_err().is_cancelled());
    assert_eq!(call_number(&c.unwrap()), 3);
    assert!(h.transport.seen().iter().all(|s| s.pending == 1));
}

#[tokio::test]
async fn test_superseded_settlement_keeps_newer_entry() {
    let gate = Arc::new(Semaphore::new(0));
    let h = harness(Some(gate.clone()));
    let signature = RequestSignature::new("GET", "http://api.test/api/v1/x", None);

    let first = async {
        let result = h.client.get("/api/v1/x").await;
        let still_registered = h.registry.contains(&signature);
        gate.add_permits(1);
        (result, still_registered)
    };
    let second = h.client.get("/api/v1/x");
    let ((first, still_registered), second) = tokio::join!(first, second);

    assert!(first.unwrap_err().is_cancelled());
    assert!(still_registered, "superseding entry was removed");
    assert!(second.is_ok());
    assert!(h.registry.is_empty());
}

#[tokio::test]
async fn test_registry_cleared_after_every_outcome() {
    let h = harness(None);

    assert!(h.client.get("/api/v1/ok").await.is_ok());
    assert!(h.registry.is_empty());

    let err = h.client.get("/api/v1/down").await.unwrap_err();
    assert!(matches!(err, ClientError::Network(_)));
    assert!(h.registry.is_empty());

    let err = h.client.get("/api/v1/missing").await.unwrap_err();
    assert_eq!(err.status(), Some(404));
    match err {
        ClientError::HttpStatus { body, .. } => assert!(body.contains("not found")),
        other => panic!("unexpected error {other:?}"),
    }
    assert!(h.registry.is_empty());
}

#[tokio::test]
async fn test_settled_request_is_not_a_duplicate() {
    let h = harness(None);

    let first = h.client.post("/api/v1/y", json!({"n": 1})).await.unwrap();
    assert!(h.registry.is_empty());
    let second = h.client.post("/api/v1/y", json!({"n": 1})).await.unwrap();
    assert!(h.registry.is_empty());

    assert_eq!(call_number(&first), 1);
    assert_eq!(call_number(&second), 2);
    assert_eq!(second.json::<Value>().unwrap()["echo"], json!({"n": 1}));
}

#[tokio::test]
async fn test_different_signatures_run_concurrently() {
    let gate = Arc::new(Semaphore::new(0));
    let h = harness(Some(gate.clone()));

    let a = h.client.get("/api/v1/emissions");
    let b = h.client.post("/api/v1/emissions", json!({"scope": 1}));
    let c = h.client.post("/api/v1/emissions", json!({"scope": 2}));
    let release = async {
        tokio::task::yield_now().await;
        assert_eq!(h.registry.len(), 3);
        gate.add_permits(3);
    };
    let (a, b, c, ()) = tokio::join!(a, b, c, release);

    assert!(a.is_ok() && b.is_ok() && c.is_ok());
    assert!(h.registry.is_empty());
}

#[tokio::test]
async fn test_reordered_body_keys_are_duplicates() {
    let gate = Arc::new(Semaphore::new(0));
    let h = harness(Some(gate.clone()));

    let a_body: Value = serde_json::from_str(r#"{"a":1,"b":2}"#).unwrap();
    let b_body: Value = serde_json::from_str(r#"{"b":2,"a":1}"#).unwrap();
    let a = h.client.put("/api/v1/kpis/3", a_body);
    let b = h.client.put("/api/v1/kpis/3", b_body);
    let release = async {
        tokio::task::yield_now().await;
        gate.add_permits(2);
    };
    let (a, b, ()) = tokio::join!(a, b, release);

    assert!(a.unwrap_err().is_cancelled());
    assert!(b.is_ok());
}

#[tokio::test]
async fn test_abandoned_request_releases_entry() {
    let gate = Arc::new(Semaphore::new(0));
    let h = harness(Some(gate));

    let pending = h.client.get("/api/v1/x");
    let outcome = tokio::time::timeout(std::time::Duration::from_millis(20), pending).await;
    assert!(outcome.is_err());
    assert!(h.registry.is_empty());
}

#[tokio::test]
async fn test_bearer_header_attached() {
    let h = harness(None);
    h.client.get("/api/v1/ok").await.unwrap();
    let seen = h.transport.seen();
    assert_eq!(seen[0].authorization.as_deref(), Some("Bearer secret"));
    assert_eq!(seen[0].url, "http://api.test/api/v1/ok");
}

#[derive(Clone)]
struct SwitchableOrigin(Arc<RwLock<Option<String>>>);

impl ConfigSource for SwitchableOrigin {
    fn configured_origin(&self) -> Option<String> {
        self.0.read().unwrap().clone()
    }
}

#[tokio::test]
async fn test_origin_change_applies_to_next_dispatch() {
    let registry = Arc::new(PendingRegistry::new());
    let transport = ScriptedTransport::new(registry.clone(), None);
    let origin = SwitchableOrigin(Arc::new(RwLock::new(Some("${API_URL}".to_string()))));
    let client = ApiClient::builder()
        .origin_source(origin.clone())
        .context(FixedLocation(Location::new("https", "esg.example.com")))
        .tokens(NoToken)
        .registry(registry)
        .shared_transport(transport.clone())
        .build()
        .unwrap();

    client.get("/api/v1/kpis").await.unwrap();
    *origin.0.write().unwrap() = Some("https://api.esg.example.com".to_string());
    client.get("/api/v1/kpis").await.unwrap();

    let urls: Vec<String> = transport.seen().into_iter().map(|s| s.url).collect();
    assert_eq!(
        urls,
        vec![
            "https://esg.example.com:8000/api/v1/kpis".to_string(),
            "https://api.esg.example.com/api/v1/kpis".to_string(),
        ]
    );
    assert!(transport.seen().iter().all(|s| s.authorization.is_none()));
}
