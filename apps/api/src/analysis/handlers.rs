//! Axum route handlers for profile analysis.

use axum::{
    extract::{Path, State},
    Json,
};
use uuid::Uuid;

use crate::analysis::analyzer::{analyze_profile, AnalyzeRequest};
use crate::errors::AppError;
use crate::session::SessionView;
use crate::state::AppState;

/// POST /api/v1/sessions/:id/analyze
///
/// Runs one analysis and returns the updated session. A response the parser
/// could not split still succeeds, with `analysis.degraded` set.
pub async fn handle_analyze(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<AnalyzeRequest>,
) -> Result<Json<SessionView>, AppError> {
    let session = analyze_profile(&state, id, request).await?;
    Ok(Json(SessionView::from(session.as_ref())))
}
