//! Axum request handlers.
//!
//! HTML handlers never fail the page: problems become session state and the
//! browser is sent back to `/`. JSON handlers return `AppError` directly.
use axum::extract::{Multipart, Path, State};
use axum::http::header;
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum::{Form, Json};
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;

use crate::api::routes::AppState;
use crate::encoder::{encode_upload, UploadedItem};
use crate::error::{AppError, AppResult};
use crate::stylist::{EditOutcome, SessionView, RUN_FAILED_MESSAGE};
use crate::view::render_page;

#[derive(Debug, Deserialize)]
pub struct EditRequest {
    #[serde(default)]
    pub prompt: String,
}

pub async fn index(State(state): State<Arc<AppState>>) -> Html<String> {
    let view = state.stylist.snapshot().await;
    Html(render_page(&view).into_string())
}

pub async fn preview(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Response, AppError> {
    let file = state.stylist.previews().fetch(&id)
        .await
        .ok_or_else(|| AppError::NotFound(format!("preview {}", id)))?;
    Ok(([(header::CONTENT_TYPE, file.mime_type.clone())], file.bytes.clone()).into_response())
}

pub async fn upload(
    State(state): State<Arc<AppState>>,
    multipart: Multipart,
) -> Redirect {
    match read_upload(&state, multipart).await {
        Ok(item) => state.stylist.upload(item).await,
        Err(e) => state.stylist.record_upload_failure(&e).await,
    }
    Redirect::to("/")
}

/// Install placeholders now, settle the run in the background. Ignored
/// unless the page is offering the start button.
pub async fn generate(State(state): State<Arc<AppState>>) -> Redirect {
    if let Some(ticket) = state.stylist.begin_run_if_idle().await {
        let stylist = state.stylist.clone();
        tokio::spawn(async move {
            let report = stylist.settle_run(ticket).await;
            tracing::debug!(run = report.run, failed = report.failed.len(), "Background run finished");
        });
    }
    Redirect::to("/")
}

pub async fn open_editor(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Redirect {
    state.stylist.open_editor(&id).await;
    Redirect::to("/")
}

pub async fn cancel_editor(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Redirect {
    state.stylist.close_editor(&id).await;
    Redirect::to("/")
}

pub async fn edit(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Form(form): Form<EditRequest>,
) -> Redirect {
    match state.stylist.begin_edit(&id, &form.prompt).await {
        Ok(ticket) => {
            let stylist = state.stylist.clone();
            tokio::spawn(async move {
                // Failures surface through the session alert.
                let _ = stylist.settle_edit(ticket).await;
            });
        }
        Err(outcome) => tracing::debug!(outfit = %id, ?outcome, "Refinement not sent"),
    }
    Redirect::to("/")
}

pub async fn download(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Response, AppError> {
    let file = state.stylist.download(&id).await?;
    let disposition = format!("attachment; filename=\"{}\"", file.file_name);
    Ok((
        [(header::CONTENT_TYPE, file.mime_type), (header::CONTENT_DISPOSITION, disposition)],
        file.bytes,
    ).into_response())
}

pub async fn dismiss_alert(State(state): State<Arc<AppState>>) -> Redirect {
    state.stylist.dismiss_alert().await;
    Redirect::to("/")
}

pub async fn api_state(State(state): State<Arc<AppState>>) -> Json<SessionView> {
    Json(state.stylist.snapshot().await)
}

pub async fn api_upload(
    State(state): State<Arc<AppState>>,
    multipart: Multipart,
) -> Result<Json<SessionView>, AppError> {
    match read_upload(&state, multipart).await {
        Ok(item) => {
            state.stylist.upload(item).await;
            Ok(Json(state.stylist.snapshot().await))
        }
        Err(e) => {
            state.stylist.record_upload_failure(&e).await;
            Err(e)
        }
    }
}

/// Run a full styling cycle and answer once every style has settled.
pub async fn api_generate(State(state): State<Arc<AppState>>) -> Result<Json<Value>, AppError> {
    let report = state.stylist.start_styling()
        .await
        .ok_or_else(|| AppError::Input("upload an item before styling".to_string()))?;
    if report.is_failed() {
        return Err(AppError::Run(RUN_FAILED_MESSAGE.to_string()));
    }
    let view = state.stylist.snapshot().await;
    Ok(Json(json!({ "report": report, "state": view })))
}

pub async fn api_edit(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(payload): Json<EditRequest>,
) -> Result<Json<Value>, AppError> {
    let outcome = state.stylist.edit_outfit(&id, &payload.prompt).await?;
    if outcome == EditOutcome::NotFound {
        return Err(AppError::NotFound(format!("outfit {}", id)));
    }
    let view = state.stylist.snapshot().await;
    Ok(Json(json!({ "outcome": outcome, "state": view })))
}

async fn read_upload(state: &AppState, mut multipart: Multipart) -> AppResult<UploadedItem> {
    while let Some(field) = multipart.next_field()
        .await
        .map_err(|e| AppError::Input(e.to_string()))?
    {
        if field.name() != Some("file") {
            continue;
        }
        let file_name = field.file_name().unwrap_or("upload").to_string();
        let content_type = field.content_type().map(str::to_string);
        let bytes = field.bytes().await.map_err(|e| AppError::Input(e.to_string()))?;
        return encode_upload(state.stylist.previews(), &file_name, content_type.as_deref(), bytes.to_vec()).await;
    }
    Err(AppError::Input("no 'file' field in upload".to_string()))
}
