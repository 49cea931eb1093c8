//! Bearer credentials for the Vertex AI endpoint.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

use crate::config::{CredentialSource, CLOUD_PLATFORM_SCOPE};

const METADATA_TOKEN_URL: &str =
    "http://metadata.google.internal/computeMetadata/v1/instance/service-accounts/default/token";

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Failed to generate access token")]
    EmptyToken,
    #[error("failed to run gcloud CLI: {0}")]
    GcloudUnavailable(#[from] std::io::Error),
    #[error("gcloud auth failed: {0}")]
    Gcloud(String),
    #[error("metadata server error: {0}")]
    Metadata(#[from] reqwest::Error),
}

/// Source of short-lived access tokens scoped to the cloud platform.
#[async_trait]
pub trait TokenProvider: Send + Sync {
    /// Returns a token, or `None` when the source answered without one.
    async fn access_token(&self) -> Result<Option<String>, AuthError>;
}

/// Mints a token or fails with [`AuthError::EmptyToken`] when the provider produced nothing usable.
pub async fn bearer_token(provider: &dyn TokenProvider) -> Result<String, AuthError> {
    match provider.access_token().await? {
        Some(token) if !token.trim().is_empty() => Ok(token.trim().to_string()),
        _ => Err(AuthError::EmptyToken),
    }
}

pub fn provider_for(source: &CredentialSource) -> Arc<dyn TokenProvider> {
    match source {
        CredentialSource::Static(token) => Arc::new(StaticToken(token.clone())),
        CredentialSource::Gcloud => Arc::new(GcloudCli),
        CredentialSource::Metadata => Arc::new(MetadataServer::new(METADATA_TOKEN_URL)),
    }
}

pub struct StaticToken(pub String);

#[async_trait]
impl TokenProvider for StaticToken {
    async fn access_token(&self) -> Result<Option<String>, AuthError> {
        Ok(Some(self.0.clone()))
    }
}

/// Runs `gcloud auth print-access-token` for every request.
pub struct GcloudCli;

#[async_trait]
impl TokenProvider for GcloudCli {
    async fn access_token(&self) -> Result<Option<String>, AuthError> {
        let output = tokio::process::Command::new("gcloud")
            .args(["auth", "print-access-token"])
            .output()
            .await?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(AuthError::Gcloud(stderr.trim().to_string()));
        }
        let token = String::from_utf8_lossy(&output.stdout).trim().to_string();
        debug!("gcloud returned a token ({} chars)", token.len());
        Ok(Some(token).filter(|t| !t.is_empty()))
    }
}

pub struct MetadataServer {
    client: Client,
    url: String,
}

#[derive(Debug, Deserialize)]
struct MetadataToken {
    #[serde(default)]
    access_token: Option<String>,
}

impl MetadataServer {
    pub fn new(url: impl Into<String>) -> Self {
        Self { client: Client::new(), url: url.into() }
    }
}

#[async_trait]
impl TokenProvider for MetadataServer {
    async fn access_token(&self) -> Result<Option<String>, AuthError> {
        let token: MetadataToken = self
            .client
            .get(&self.url)
            .query(&[("scopes", CLOUD_PLATFORM_SCOPE)])
            .header("Metadata-Flavor", "Google")
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(token.access_token)
    }
}
