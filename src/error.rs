//! Common error type and result alias.
//!
//! Variants follow the failure taxonomy of the stylist: `Input` for uploads
//! that cannot be read or encoded, `Service`/`HttpClient` for a single
//! generation call, `Run` for a run where every style failed and `Edit` for a
//! failed refinement.
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),

    #[error("Generation service error: {0}")]
    Service(String),

    #[error("Failed to process the uploaded image: {0}")]
    Input(String),

    #[error("{0}")]
    Run(String),

    #[error("{0}")]
    Edit(String),

    #[error("Invalid image reference: {0}")]
    ImageReference(String),

    #[error("Prompt construction error: {0}")]
    PromptConstruction(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Not found: {0}")]
    NotFound(String),
}

pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Input(_) | AppError::ImageReference(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::HttpClient(_) | AppError::Service(_) | AppError::Run(_) | AppError::Edit(_) => {
                StatusCode::BAD_GATEWAY
            }
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!("Request failed: {}", self);
        }
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}
