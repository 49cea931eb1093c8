//! Turning a generation response into a displayable data URL, and a data URL into a file.

use std::{fmt, path::{Path, PathBuf}, str::FromStr};

use base64::Engine;
use chrono::{DateTime, Utc};
use serde_json::Value;

use crate::{client::ClientError, models::GenerationResponse};

pub const DEFAULT_MIME_TYPE: &str = "image/jpeg";

/// An image embedded as `data:<mime>;base64,<payload>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataUrl {
    pub mime_type: String,
    pub data: String,
}

impl DataUrl {
    pub fn new(mime_type: impl Into<String>, data: impl Into<String>) -> Self {
        Self { mime_type: mime_type.into(), data: data.into() }
    }

    pub fn decode(&self) -> Result<Vec<u8>, base64::DecodeError> {
        base64::engine::general_purpose::STANDARD.decode(&self.data)
    }

    /// File extension matching the declared mime type; `png` when the type is not recognised.
    pub fn extension(&self) -> &'static str {
        match self.mime_type.to_ascii_lowercase().as_str() {
            "image/jpeg" | "image/jpg" => "jpg",
            "image/webp" => "webp",
            "image/gif" => "gif",
            _ => "png",
        }
    }

    pub fn file_name(&self, at: DateTime<Utc>) -> String {
        format!("gemini-gen-{}.{}", at.timestamp_millis(), self.extension())
    }
}

impl fmt::Display for DataUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "data:{};base64,{}", self.mime_type, self.data)
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("not a base64 data URL")]
pub struct InvalidDataUrl;

impl FromStr for DataUrl {
    type Err = InvalidDataUrl;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let rest = s.strip_prefix("data:").ok_or(InvalidDataUrl)?;
        let (mime_type, data) = rest.split_once(";base64,").ok_or(InvalidDataUrl)?;
        Ok(Self::new(mime_type, data))
    }
}

/// Pulls the first inline image out of `candidates[0].content.parts`.
pub fn extract_image(body: Value) -> Result<DataUrl, ClientError> {
    let parsed: GenerationResponse = serde_json::from_value(body)
        .map_err(|e| ClientError::Malformed(e.to_string()))?;

    let candidate = parsed
        .candidates
        .and_then(|c| c.into_iter().next())
        .ok_or(ClientError::NoCandidates)?;
    let parts = candidate
        .content
        .and_then(|c| c.parts)
        .ok_or(ClientError::NoParts)?;

    let inline = parts
        .into_iter()
        .find_map(|p| p.inline_data)
        .ok_or(ClientError::NoImagePart)?;
    let data = inline.data.filter(|d| !d.is_empty()).ok_or(ClientError::NoImageData)?;
    let mime_type = inline
        .mime_type
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| DEFAULT_MIME_TYPE.to_string());

    Ok(DataUrl { mime_type, data })
}

/// Writes the decoded image into `dir`, named after the current time. No network involved.
pub async fn download(image: &DataUrl, dir: &Path) -> Result<PathBuf, ClientError> {
    let bytes = image.decode().map_err(|e| ClientError::Malformed(e.to_string()))?;
    let path = dir.join(image.file_name(Utc::now()));
    tokio::fs::write(&path, bytes).await?;
    tracing::info!("💾 Saved image to {}", path.display());
    Ok(path)
}
