#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use axum::{extract::State, http::{HeaderMap, StatusCode}, response::IntoResponse, routing::post, Json, Router};
use gemini_image_gen::{auth::{StaticToken, TokenProvider}, config::Config, router, vertex::VertexClient, AppState};
use serde_json::{json, Value};

/// What the fake model endpoint saw on its last call.
#[derive(Debug, Clone)]
pub struct Recorded {
    pub authorization: Option<String>,
    pub body: Value,
}

#[derive(Clone)]
struct Upstream {
    status: StatusCode,
    reply: String,
    seen: Arc<Mutex<Vec<Recorded>>>,
}

async fn upstream_handler(State(up): State<Upstream>, headers: HeaderMap, Json(body): Json<Value>) -> impl IntoResponse {
    let authorization = headers.get("authorization").and_then(|v| v.to_str().ok()).map(str::to_string);
    up.seen.lock().unwrap().push(Recorded { authorization, body });
    (up.status, [("content-type", "application/json")], up.reply.clone())
}

pub async fn serve(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move { axum::serve(listener, app).await.unwrap() });
    format!("http://{addr}")
}

/// Starts a fake `generateContent` endpoint answering every call with `status` and `reply`.
pub async fn mock_upstream(status: StatusCode, reply: impl Into<String>) -> (String, Arc<Mutex<Vec<Recorded>>>) {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let state = Upstream { status, reply: reply.into(), seen: seen.clone() };
    let app = Router::new()
        .route("/v1/projects/test-project/locations/global/publishers/google/models/:model", post(upstream_handler))
        .with_state(state);
    let base = serve(app).await;
    (format!("{base}/v1"), seen)
}

/// Starts the proxy against `api_base` with the given credentials.
pub async fn proxy_with(api_base: &str, tokens: Arc<dyn TokenProvider>) -> String {
    let mut config = Config::new("test-project");
    config.api_base = api_base.to_string();
    let state = AppState { vertex: Arc::new(VertexClient::new(&config, tokens)) };
    serve(router(state)).await
}

pub async fn proxy(api_base: &str) -> String {
    proxy_with(api_base, Arc::new(StaticToken("test-token".into()))).await
}

pub fn image_response(part: Value) -> String {
    json!({
        "candidates": [{ "content": { "role": "model", "parts": [{ "text": "Here you go" }, part] }, "finishReason": "STOP" }],
        "usageMetadata": { "promptTokenCount": 4 }
    })
    .to_string()
}
