use axum::{Json, body::Bytes, extract::State};
use serde_json::Value;
use std::sync::Arc;
use tracing::Instrument;
use uuid::Uuid;

use crate::{error::ProxyError, models::GenerateRequest, vertex::VertexClient};

#[derive(Clone)]
pub struct AppState {
    pub vertex: Arc<VertexClient>,
}

/// `POST /api/generate`: validates the prompt and relays the upstream JSON verbatim.
pub async fn generate_image(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<Value>, ProxyError> {
    let request_id = Uuid::new_v4();
    let span = tracing::info_span!("generate", %request_id);

    async move {
        // The body is parsed whatever its content type says.
        let body: GenerateRequest = serde_json::from_slice(&body).map_err(|e| ProxyError::BadBody(e.to_string()))?;
        let prompt = body.prompt_text().ok_or(ProxyError::MissingPrompt)?;

        tracing::info!("🚀 Generating image for prompt: {}", prompt);
        let result = state.vertex.generate(&prompt).await;
        match &result {
            Ok(_) => tracing::info!("✅ Upstream response relayed"),
            Err(e) => tracing::error!("API Route Error: {}", e),
        }
        result.map(Json)
    }
    .instrument(span)
    .await
}
