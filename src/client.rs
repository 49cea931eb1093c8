//! Client side of `/api/generate`: one request per submission, and the state a front-end renders.

use reqwest::Client;
use serde_json::Value;
use thiserror::Error;
use tracing::{info, error};

use crate::{
    image::{extract_image, DataUrl},
    models::{ErrorBody, GenerateRequest},
};

const FALLBACK_ERROR: &str = "Failed to generate image";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ClientError {
    #[error("{}", with_details(.message, .details))]
    Proxy { message: String, details: Option<String> },
    #[error("No candidates returned")]
    NoCandidates,
    #[error("No content parts returned")]
    NoParts,
    #[error("No image data found in response")]
    NoImagePart,
    #[error("No image data found in response candidate")]
    NoImageData,
    #[error("{0}")]
    Malformed(String),
    #[error("{0}")]
    Request(String),
    #[error("{0}")]
    Io(String),
}

fn with_details(message: &str, details: &Option<String>) -> String {
    match details {
        Some(d) => format!("{message}: {d}"),
        None => message.to_string(),
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(e: reqwest::Error) -> Self { Self::Request(e.to_string()) }
}

impl From<std::io::Error> for ClientError {
    fn from(e: std::io::Error) -> Self { Self::Io(e.to_string()) }
}

/// Talks to a running proxy.
#[derive(Clone)]
pub struct ImageClient {
    client: Client,
    base_url: String,
}

impl ImageClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self { client: Client::new(), base_url: base_url.into().trim_end_matches('/').to_string() }
    }

    pub async fn generate(&self, prompt: &str) -> Result<DataUrl, ClientError> {
        let response = self.client
            .post(format!("{}/api/generate", self.base_url))
            .json(&GenerateRequest::new(prompt))
            .send()
            .await?;

        let ok = response.status().is_success();
        let text = response.text().await?;
        let body: Value = serde_json::from_str(&text).map_err(|e| ClientError::Malformed(e.to_string()))?;

        if !ok {
            let err: ErrorBody = serde_json::from_value(body).unwrap_or_default();
            return Err(ClientError::Proxy {
                message: err.error.filter(|m| !m.is_empty()).unwrap_or_else(|| FALLBACK_ERROR.to_string()),
                details: err.details.filter(|d| !d.is_empty()),
            });
        }
        extract_image(body)
    }
}

/// What a front-end shows: the prompt, a loading flag, and either an image or an error.
#[derive(Debug, Clone, Default)]
pub struct Session {
    pub prompt: String,
    pub is_loading: bool,
    pub generated_image: Option<DataUrl>,
    pub error: Option<String>,
}

impl Session {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self { prompt: prompt.into(), ..Self::default() }
    }

    /// Submits the current prompt. Returns `false` without touching anything when the prompt is blank.
    pub async fn submit(&mut self, client: &ImageClient) -> bool {
        if self.prompt.trim().is_empty() {
            return false;
        }

        self.is_loading = true;
        self.error = None;
        self.generated_image = None;

        match client.generate(&self.prompt).await {
            Ok(image) => {
                info!("🖼️ Received {} image ({} base64 chars)", image.mime_type, image.data.len());
                self.generated_image = Some(image);
            }
            Err(e) => {
                error!("❌ {}", e);
                let message = e.to_string();
                self.error = Some(if message.is_empty() { "An unexpected error occurred".to_string() } else { message });
            }
        }
        self.is_loading = false;
        true
    }
}
