//! Prompt-to-image relay for a Vertex AI publisher model, plus the client that drives it.

pub mod auth;
pub mod client;
pub mod config;
pub mod error;
pub mod image;
pub mod models;
pub mod routes;
pub mod vertex;

use axum::{Router, routing::post};
use tower_http::cors::{CorsLayer, Any};

pub use routes::AppState;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/generate", post(routes::generate_image))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any)
        )
        .with_state(state)
}
