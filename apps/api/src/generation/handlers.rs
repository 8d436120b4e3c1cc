//! Axum route handlers for the Generation API.

use axum::{
    extract::{Path, State},
    Json,
};
use uuid::Uuid;

use crate::errors::AppError;
use crate::generation::generator::{
    generate_cover_letter, generate_resume, CoverLetterRequest, ResumeRequest,
};
use crate::session::SessionView;
use crate::state::AppState;

/// POST /api/v1/sessions/:id/resume
pub async fn handle_generate_resume(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<ResumeRequest>,
) -> Result<Json<SessionView>, AppError> {
    let session = generate_resume(&state, id, request).await?;
    Ok(Json(SessionView::from(session.as_ref())))
}

/// POST /api/v1/sessions/:id/cover-letter
///
/// Requires a completed analysis: the letter is written from the profile
/// snapshot stored with it.
pub async fn handle_generate_cover_letter(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<CoverLetterRequest>,
) -> Result<Json<SessionView>, AppError> {
    let session = generate_cover_letter(&state, id, request).await?;
    Ok(Json(SessionView::from(session.as_ref())))
}
