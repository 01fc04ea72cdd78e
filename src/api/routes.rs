use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;

use crate::api::handlers;
use crate::stylist::Stylist;

pub struct AppState {
    pub stylist: Arc<Stylist>,
}

/// HTML pages for the browser plus a JSON API mirroring the same operations.
pub fn router(state: Arc<AppState>, max_upload_bytes: usize) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/preview/:id", get(handlers::preview))
        .route("/upload", post(handlers::upload))
        .route("/generate", post(handlers::generate))
        .route("/outfits/:id/editor", post(handlers::open_editor))
        .route("/outfits/:id/editor/cancel", post(handlers::cancel_editor))
        .route("/outfits/:id/edit", post(handlers::edit))
        .route("/outfits/:id/download", get(handlers::download))
        .route("/alert/dismiss", post(handlers::dismiss_alert))
        .route("/api/state", get(handlers::api_state))
        .route("/api/upload", post(handlers::api_upload))
        .route("/api/generate", post(handlers::api_generate))
        .route("/api/outfits/:id/edit", post(handlers::api_edit))
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .layer(CorsLayer::permissive())
        .with_state(state)
}
