//! HTTP API handlers for pgrid-server

pub mod grid;
pub mod health;
pub mod posts;
pub mod terms;

pub use grid::resolve_dynamic_grid;
pub use health::health_routes;
pub use posts::list_posts;
pub use terms::list_terms;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

/// API errors
#[derive(Debug)]
pub enum ApiError {
    Database(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::Database(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };

        let body = Json(json!({
            "error": message,
        }));

        (status, body).into_response()
    }
}
