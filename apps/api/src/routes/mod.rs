pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post, put},
    Router,
};

use crate::analysis::handlers as analysis;
use crate::generation::handlers as generation;
use crate::profile::handlers as profile;
use crate::session::handlers as session;
use crate::state::AppState;

/// Upper bound for uploaded resumes.
const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Sessions
        .route("/api/v1/sessions", post(session::handle_create_session))
        .route(
            "/api/v1/sessions/:id",
            get(session::handle_get_session).delete(session::handle_delete_session),
        )
        .route(
            "/api/v1/sessions/:id/api-key",
            put(session::handle_update_api_key),
        )
        // Actions
        .route(
            "/api/v1/sessions/:id/analyze",
            post(analysis::handle_analyze),
        )
        .route(
            "/api/v1/sessions/:id/resume",
            post(generation::handle_generate_resume),
        )
        .route(
            "/api/v1/sessions/:id/cover-letter",
            post(generation::handle_generate_cover_letter),
        )
        // Artifact export
        .route(
            "/api/v1/sessions/:id/resume.txt",
            get(session::handle_download_resume),
        )
        .route(
            "/api/v1/sessions/:id/cover-letter.txt",
            get(session::handle_download_cover_letter),
        )
        // Profile input channels
        .route(
            "/api/v1/profile/pdf",
            post(profile::handle_extract_pdf).layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES)),
        )
        .route("/api/v1/profile/scrape", post(profile::handle_scrape))
        .with_state(state)
}
