use axum::{http::StatusCode, response::{IntoResponse, Response}, Json};
use thiserror::Error;

use crate::{auth::AuthError, models::ErrorBody};

#[derive(Debug, Error)]
pub enum ProxyError {
    #[error("Prompt is required")]
    MissingPrompt,
    #[error("{0}")]
    BadBody(String),
    #[error(transparent)]
    Auth(#[from] AuthError),
    #[error("Vertex AI API Error: {status_text}")]
    Upstream { status: StatusCode, status_text: String, details: String },
    #[error("{0}")]
    Http(#[from] reqwest::Error),
}

impl ProxyError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::MissingPrompt => StatusCode::BAD_REQUEST,
            Self::Upstream { status, .. } => *status,
            Self::BadBody(_) | Self::Auth(_) | Self::Http(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ProxyError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match &self {
            Self::Upstream { details, .. } => ErrorBody { error: Some(self.to_string()), details: Some(details.clone()) },
            _ => ErrorBody { error: Some(self.to_string()), details: None },
        };
        (status, Json(body)).into_response()
    }
}
