//! Axum route handlers for session lifecycle and artifact downloads.

use axum::{
    body::Bytes,
    extract::{Path, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::session::{commit, require_session, SessionView};
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct CreateSessionRequest {
    #[serde(default)]
    pub api_key: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateApiKeyRequest {
    pub api_key: Option<String>,
}

/// POST /api/v1/sessions
///
/// The body is optional. When one is sent it must be a valid
/// `CreateSessionRequest`, so a mistyped key is rejected instead of dropped.
pub async fn handle_create_session(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<(StatusCode, Json<SessionView>), AppError> {
    let request = parse_create_request(&body)?;
    let session = state.sessions.create(request.api_key);
    info!("Session {} created", session.id);
    Ok((StatusCode::CREATED, Json(SessionView::from(session.as_ref()))))
}

fn parse_create_request(body: &[u8]) -> Result<CreateSessionRequest, AppError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(CreateSessionRequest::default());
    }
    serde_json::from_slice(body)
        .map_err(|e| AppError::Validation(format!("Invalid session request body: {e}")))
}

/// GET /api/v1/sessions/:id
pub async fn handle_get_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionView>, AppError> {
    let session = require_session(&state.sessions, id)?;
    Ok(Json(SessionView::from(session.as_ref())))
}

/// DELETE /api/v1/sessions/:id
pub async fn handle_delete_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    if !state.sessions.remove(id) {
        return Err(AppError::NotFound(format!("Session {id} not found")));
    }
    info!("Session {id} ended");
    Ok(StatusCode::NO_CONTENT)
}

/// PUT /api/v1/sessions/:id/api-key
///
/// A null or blank key clears the override so the configured key applies again.
pub async fn handle_update_api_key(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateApiKeyRequest>,
) -> Result<Json<SessionView>, AppError> {
    let session = commit(&state.sessions, id, |s| s.with_api_key(request.api_key))?;
    Ok(Json(SessionView::from(session.as_ref())))
}

/// GET /api/v1/sessions/:id/resume.txt
pub async fn handle_download_resume(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let session = require_session(&state.sessions, id)?;
    text_download(
        session.generated_resume.clone(),
        "generated_resume.txt",
        "No resume has been generated for this session yet",
    )
}

/// GET /api/v1/sessions/:id/cover-letter.txt
pub async fn handle_download_cover_letter(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let session = require_session(&state.sessions, id)?;
    text_download(
        session.generated_cover_letter.clone(),
        "generated_cover_letter.txt",
        "No cover letter has been generated for this session yet",
    )
}

/// Serves an artifact verbatim as a plain-text attachment.
fn text_download(
    body: String,
    file_name: &str,
    missing: &str,
) -> Result<impl IntoResponse, AppError> {
    if body.trim().is_empty() {
        return Err(AppError::NotFound(missing.to_string()));
    }
    Ok((
        [
            (
                header::CONTENT_TYPE,
                "text/plain; charset=utf-8".to_string(),
            ),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{file_name}\""),
            ),
        ],
        body,
    ))
}
