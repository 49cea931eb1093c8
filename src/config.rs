use thiserror::Error;

pub const DEFAULT_API_BASE: &str = "https://aiplatform.googleapis.com/v1";
pub const LOCATION: &str = "global";
pub const MODEL_ID: &str = "gemini-3-pro-image-preview";
pub const CLOUD_PLATFORM_SCOPE: &str = "https://www.googleapis.com/auth/cloud-platform";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("GOOGLE_CLOUD_PROJECT must be set")]
    MissingProject,
    #[error("unknown credential source '{0}' (expected 'gcloud' or 'metadata')")]
    UnknownCredentialSource(String),
}

/// Where the bearer token for the upstream call comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CredentialSource {
    /// A pre-minted token, e.g. from `gcloud auth print-access-token` in CI.
    Static(String),
    /// Shell out to the gcloud CLI for every request.
    Gcloud,
    /// The GCE/Cloud Run metadata server.
    Metadata,
}

/// Process configuration, read once at startup and passed down explicitly.
#[derive(Debug, Clone)]
pub struct Config {
    pub project_id: String,
    pub location: String,
    pub model: String,
    pub api_base: String,
    pub port: u16,
    pub credentials: CredentialSource,
}

impl Config {
    pub fn new(project_id: impl Into<String>) -> Self {
        Self {
            project_id: project_id.into(),
            location: LOCATION.to_string(),
            model: MODEL_ID.to_string(),
            api_base: DEFAULT_API_BASE.to_string(),
            port: 8080,
            credentials: CredentialSource::Gcloud,
        }
    }

    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from an arbitrary key lookup so it can be exercised without touching
    /// the process environment.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let project_id = lookup("GOOGLE_CLOUD_PROJECT")
            .filter(|p| !p.trim().is_empty())
            .ok_or(ConfigError::MissingProject)?;

        let mut config = Self::new(project_id);
        if let Some(base) = lookup("VERTEX_API_BASE").filter(|b| !b.is_empty()) {
            config.api_base = base.trim_end_matches('/').to_string();
        }
        config.port = lookup("PORT").and_then(|v| v.parse().ok()).unwrap_or(8080);
        config.credentials = match lookup("GOOGLE_ACCESS_TOKEN").filter(|t| !t.is_empty()) {
            Some(token) => CredentialSource::Static(token),
            None => match lookup("GOOGLE_CREDENTIAL_SOURCE").as_deref() {
                None | Some("") | Some("gcloud") => CredentialSource::Gcloud,
                Some("metadata") => CredentialSource::Metadata,
                Some(other) => return Err(ConfigError::UnknownCredentialSource(other.to_string())),
            },
        };
        Ok(config)
    }

    pub fn endpoint(&self) -> String {
        format!(
            "{}/projects/{}/locations/{}/publishers/google/models/{}:generateContent",
            self.api_base, self.project_id, self.location, self.model
        )
    }
}
