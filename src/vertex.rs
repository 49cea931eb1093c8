use std::sync::Arc;

use reqwest::Client;
use serde_json::Value;
use tracing::{info, error};

use crate::{
    auth::{bearer_token, TokenProvider},
    config::Config,
    error::ProxyError,
    models::UpstreamPayload,
};

// Shortens long base64 `data` strings so response bodies stay readable in logs.
pub(crate) fn truncate_base64_in_json(value: &mut Value) {
    match value {
        Value::Object(map) => {
            for (key, val) in map.iter_mut() {
                match val {
                    Value::String(s) if key == "data" && s.len() > 100 && s.is_ascii() => {
                        *val = Value::String(format!("{}...[truncated {} chars]", &s[..50], s.len() - 50));
                    }
                    _ => truncate_base64_in_json(val),
                }
            }
        }
        Value::Array(arr) => arr.iter_mut().for_each(truncate_base64_in_json),
        _ => {}
    }
}

/// Relays one prompt to the `generateContent` endpoint of the configured publisher model.
pub struct VertexClient {
    client: Client,
    endpoint: String,
    tokens: Arc<dyn TokenProvider>,
}

impl VertexClient {
    pub fn new(config: &Config, tokens: Arc<dyn TokenProvider>) -> Self {
        Self { client: Client::new(), endpoint: config.endpoint(), tokens }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Performs the upstream call and returns the provider's JSON untouched.
    pub async fn generate(&self, prompt: &str) -> Result<Value, ProxyError> {
        let token = bearer_token(self.tokens.as_ref()).await?;

        info!("🔗 Making request to: {}", self.endpoint);
        let response = self.client
            .post(&self.endpoint)
            .bearer_auth(token)
            .json(&UpstreamPayload::for_prompt(prompt))
            .send()
            .await?;

        let status = response.status();
        info!("📥 Response status: {}", status);

        if !status.is_success() {
            let details = response.text().await?;
            error!("❌ Vertex AI Error: {}", details);
            return Err(ProxyError::Upstream {
                status,
                status_text: status.canonical_reason().unwrap_or_default().to_string(),
                details,
            });
        }

        let body: Value = response.json().await?;
        if tracing::enabled!(tracing::Level::DEBUG) {
            let mut preview = body.clone();
            truncate_base64_in_json(&mut preview);
            tracing::debug!("📥 Raw Vertex AI response: {}", preview);
        }
        Ok(body)
    }
}
