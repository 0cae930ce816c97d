//! Integration tests for Lumina Luxe.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p lumina-luxe-integration-tests
//! ```
//!
//! Nothing external is needed: every test starts a mock Gemini server on an
//! ephemeral port and points the storefront at it, with the catalog held in
//! [`MemoryStorage`].
//!
//! # Test Categories
//!
//! - `catalog` - Catalog persistence and admin operations
//! - `stylist` - Stylist requests against the mock model
//! - `concierge` - Concierge conversations against the mock model
//! - `routes` - The full router over HTTP, with cookies

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::{
    Json, Router,
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::post,
};
use lumina_luxe_storefront::catalog::{CatalogStore, KeyValueStorage, MemoryStorage};
use lumina_luxe_storefront::config::{GeminiConfig, StorefrontConfig};
use lumina_luxe_storefront::state::AppState;
use secrecy::SecretString;
use serde_json::{Value, json};
use tokio::sync::Semaphore;

/// API key the mock server expects.
pub const TEST_API_KEY: &str = "AIzaSyB3k9Qm7Xw2Lp0Tn8Rv4Hc6Jd1Fg5Es";

/// Model name used in test configs.
pub const TEST_MODEL: &str = "gemini-test";

// ============================================================================
// Mock Gemini server
// ============================================================================

/// How the mock answers `generateContent`.
#[derive(Debug, Clone)]
pub enum MockReply {
    /// One candidate whose single part is this text.
    Text(String),
    /// A candidate with no text, as when output is blocked.
    Blocked,
    /// An error status with a Google-style error body.
    Status(u16, String),
    /// Like `Text`, but each request is recorded and then held until the
    /// test adds a permit to `gate`.
    Gated { gate: Arc<Semaphore>, text: String },
}

impl MockReply {
    /// Reply with a JSON value serialized as the candidate text.
    #[must_use]
    pub fn json(value: &Value) -> Self {
        Self::Text(value.to_string())
    }

    /// Reply with `text` once per permit added to `gate`.
    #[must_use]
    pub fn gated(gate: &Arc<Semaphore>, text: impl Into<String>) -> Self {
        Self::Gated {
            gate: Arc::clone(gate),
            text: text.into(),
        }
    }
}

#[derive(Clone)]
struct MockState {
    reply: MockReply,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

/// A request the mock received.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    /// Last path segment, e.g. `gemini-test:generateContent`.
    pub call: String,
    pub body: Value,
}

/// A running mock of the Gemini `generateContent` endpoint.
#[derive(Clone)]
pub struct MockGemini {
    addr: SocketAddr,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl MockGemini {
    /// Start a mock server that gives every request the same reply.
    ///
    /// # Panics
    ///
    /// Panics if no local port can be bound.
    pub async fn start(reply: MockReply) -> Self {
        let requests = Arc::new(Mutex::new(Vec::new()));
        let state = MockState {
            reply,
            requests: requests.clone(),
        };

        let app = Router::new()
            .route("/v1beta/models/{call}", post(generate_content))
            .with_state(state);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind mock Gemini server");
        let addr = listener.local_addr().expect("mock address");

        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("mock Gemini server");
        });

        Self { addr, requests }
    }

    /// Base URL to put in [`GeminiConfig::api_base`].
    #[must_use]
    pub fn api_base(&self) -> String {
        format!("http://{}/v1beta", self.addr)
    }

    /// Requests received so far.
    ///
    /// # Panics
    ///
    /// Panics if the request log lock is poisoned.
    #[must_use]
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().expect("request log").clone()
    }

    /// Wait until at least `count` requests have arrived and return them.
    ///
    /// # Panics
    ///
    /// Panics if they don't arrive within five seconds.
    pub async fn wait_for_requests(&self, count: usize) -> Vec<RecordedRequest> {
        tokio::time::timeout(Duration::from_secs(5), async {
            loop {
                let requests = self.requests();
                if requests.len() >= count {
                    return requests;
                }
                tokio::time::sleep(Duration::from_millis(10)).await;
            }
        })
        .await
        .expect("timed out waiting for Gemini requests")
    }
}

async fn generate_content(
    State(mock): State<MockState>,
    Path(call): Path<String>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    if headers.get("x-goog-api-key").and_then(|v| v.to_str().ok()) != Some(TEST_API_KEY) {
        return (
            StatusCode::FORBIDDEN,
            Json(json!({"error": {"code": 403, "message": "API key not valid", "status": "PERMISSION_DENIED"}})),
        )
            .into_response();
    }

    mock.requests
        .lock()
        .expect("request log")
        .push(RecordedRequest { call, body });

    match mock.reply {
        MockReply::Text(text) => text_reply(&text),
        MockReply::Gated { gate, text } => {
            gate.acquire().await.expect("gate open").forget();
            text_reply(&text)
        }
        MockReply::Blocked => Json(json!({
            "candidates": [{"finishReason": "SAFETY"}]
        }))
        .into_response(),
        MockReply::Status(code, message) => {
            let status = StatusCode::from_u16(code).expect("valid status");
            (
                status,
                Json(json!({"error": {"code": code, "message": message, "status": "INTERNAL"}})),
            )
                .into_response()
        }
    }
}

fn text_reply(text: &str) -> Response {
    Json(json!({
        "candidates": [{
            "content": {"role": "model", "parts": [{"text": text}]},
            "finishReason": "STOP"
        }],
        "usageMetadata": {"promptTokenCount": 42, "candidatesTokenCount": 7, "totalTokenCount": 49}
    }))
    .into_response()
}

// ============================================================================
// Storefront harness
// ============================================================================

/// Storefront config pointing at a mock Gemini server.
#[must_use]
pub fn test_config(api_base: String) -> StorefrontConfig {
    StorefrontConfig {
        host: [127, 0, 0, 1].into(),
        port: 0,
        base_url: "http://localhost:3000".to_string(),
        data_dir: std::env::temp_dir().join("lumina-integration-unused"),
        gemini: GeminiConfig {
            api_key: SecretString::from(TEST_API_KEY),
            model: TEST_MODEL.to_string(),
            api_base,
        },
        sentry_dsn: None,
        sentry_environment: None,
        sentry_sample_rate: 1.0,
        sentry_traces_sample_rate: 0.0,
    }
}

/// Application state over in-memory storage and a mock model.
///
/// # Panics
///
/// Panics if the catalog can't load or the client can't be built.
pub async fn test_state(mock: &MockGemini, storage: Arc<dyn KeyValueStorage>) -> AppState {
    let catalog = CatalogStore::load(storage).await.expect("load catalog");
    AppState::new(test_config(mock.api_base()), catalog).expect("app state")
}

/// A storefront served on an ephemeral port.
pub struct TestApp {
    pub base_url: String,
    /// Keeps cookies, so the session (cart, conversation) carries across calls.
    pub client: reqwest::Client,
    pub mock: MockGemini,
    pub storage: Arc<MemoryStorage>,
    pub state: AppState,
}

impl TestApp {
    /// Start the storefront with the default catalog and a mock model.
    ///
    /// # Panics
    ///
    /// Panics if any part of the harness fails to start.
    pub async fn spawn(reply: MockReply) -> Self {
        let mock = MockGemini::start(reply).await;
        let storage = Arc::new(MemoryStorage::new());
        let state = test_state(&mock, storage.clone()).await;
        let app = lumina_luxe_storefront::app(state.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind storefront");
        let addr = listener.local_addr().expect("storefront address");
        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("storefront server");
        });

        let client = reqwest::Client::builder()
            .cookie_store(true)
            .build()
            .expect("Failed to create HTTP client");

        Self {
            base_url: format!("http://{addr}"),
            client,
            mock,
            storage,
            state,
        }
    }

    /// Absolute URL for a path.
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// GET a path and return status plus body text.
    ///
    /// # Panics
    ///
    /// Panics if the request fails.
    pub async fn get_text(&self, path: &str) -> (reqwest::StatusCode, String) {
        let resp = self
            .client
            .get(self.url(path))
            .send()
            .await
            .expect("GET request");
        let status = resp.status();
        (status, resp.text().await.expect("body"))
    }
}
