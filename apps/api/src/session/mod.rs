// Session state: per-user snapshots and the read-only views served to the UI.

pub mod handlers;
pub mod store;

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::analysis::parser::{ParseSource, Scores};
use crate::errors::AppError;
use crate::session::store::{SessionSnapshot, SessionStore};

/// Latest snapshot for `id`, or a 404.
pub fn require_session(store: &SessionStore, id: Uuid) -> Result<Arc<SessionSnapshot>, AppError> {
    store
        .get(id)
        .ok_or_else(|| AppError::NotFound(format!("Session {id} not found")))
}

/// Publishes a transition. Call only once the action's fallible work is done.
pub fn commit<F>(store: &SessionStore, id: Uuid, transition: F) -> Result<Arc<SessionSnapshot>, AppError>
where
    F: FnOnce(&SessionSnapshot) -> SessionSnapshot,
{
    store
        .update(id, transition)
        .ok_or_else(|| AppError::NotFound(format!("Session {id} not found")))
}

/// What the presentation layer sees of a session. The API key is reduced to
/// a flag and never leaves the server.
#[derive(Debug, Clone, Serialize)]
pub struct SessionView {
    pub session_id: Uuid,
    pub version: u64,
    pub has_api_key: bool,
    pub analysis: AnalysisView,
    pub generated_resume: String,
    pub generated_cover_letter: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct AnalysisView {
    pub completed: bool,
    pub degraded: bool,
    pub source: Option<ParseSource>,
    pub general_section: String,
    pub ats_section: String,
    pub scores: Scores,
    pub profile_snapshot: String,
    pub analyzed_at: Option<DateTime<Utc>>,
}

impl From<&SessionSnapshot> for SessionView {
    fn from(snapshot: &SessionSnapshot) -> Self {
        let analysis = &snapshot.analysis;
        SessionView {
            session_id: snapshot.id,
            version: snapshot.version,
            has_api_key: snapshot.api_key().is_some(),
            analysis: AnalysisView {
                completed: snapshot.has_analysis(),
                degraded: analysis.is_degraded(),
                source: analysis.source,
                general_section: analysis.general_section.clone(),
                ats_section: analysis.ats_section.clone(),
                scores: analysis.scores.clone(),
                profile_snapshot: analysis.profile_snapshot.clone(),
                analyzed_at: analysis.analyzed_at,
            },
            generated_resume: snapshot.generated_resume.clone(),
            generated_cover_letter: snapshot.generated_cover_letter.clone(),
            created_at: snapshot.created_at,
            updated_at: snapshot.updated_at,
        }
    }
}
