//! Test utilities for compass-core
//!
//! Provides a mock OpenAI-compatible completion server so the real HTTP
//! backend can be exercised end to end in tests and local development.

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use tokio::sync::oneshot;

/// A request received by the mock server
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    /// `Authorization` header, if any
    pub authorization: Option<String>,
    pub body: Value,
}

#[derive(Clone)]
struct MockState {
    reply: Arc<String>,
    failing: bool,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

/// Mock `/v1/chat/completions` server
pub struct MockCompletionServer {
    addr: SocketAddr,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
    shutdown_tx: Option<oneshot::Sender<()>>,
}

impl MockCompletionServer {
    /// Start on an available port with a generic reply
    pub async fn start() -> Self {
        Self::start_with_reply("Mock completion").await
    }

    /// Start a server that answers every completion with `reply`
    pub async fn start_with_reply(reply: &str) -> Self {
        Self::spawn(reply, false).await
    }

    /// Start a server that answers every completion with HTTP 500
    pub async fn start_failing() -> Self {
        Self::spawn("", true).await
    }

    async fn spawn(reply: &str, failing: bool) -> Self {
        let requests = Arc::new(Mutex::new(Vec::new()));
        let state = MockState {
            reply: Arc::new(reply.to_string()),
            failing,
            requests: requests.clone(),
        };

        let app = Router::new()
            .route("/v1/models", get(handle_models))
            .route("/health", get(|| async { "ok" }))
            .route("/v1/chat/completions", post(handle_chat))
            .with_state(state);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let (shutdown_tx, shutdown_rx) = oneshot::channel();

        tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async {
                    shutdown_rx.await.ok();
                })
                .await
                .unwrap();
        });

        Self {
            addr,
            requests,
            shutdown_tx: Some(shutdown_tx),
        }
    }

    /// Base URL for this mock server
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Completion requests received so far
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn stop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

impl Drop for MockCompletionServer {
    fn drop(&mut self) {
        self.stop();
    }
}

async fn handle_models() -> Json<Value> {
    Json(json!({
        "object": "list",
        "data": [{"id": "mock-model", "object": "model"}]
    }))
}

async fn handle_chat(
    State(state): State<MockState>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    let authorization = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    state.requests.lock().unwrap().push(RecordedRequest {
        authorization,
        body: body.clone(),
    });

    if state.failing {
        return (StatusCode::INTERNAL_SERVER_ERROR, "model overloaded").into_response();
    }

    Json(json!({
        "id": "chatcmpl-mock",
        "object": "chat.completion",
        "model": body["model"],
        "choices": [{
            "index": 0,
            "message": {"role": "assistant", "content": state.reply.as_str()},
            "finish_reason": "stop"
        }]
    }))
    .into_response()
}
