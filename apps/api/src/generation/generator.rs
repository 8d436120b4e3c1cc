//! Document generation: resume and cover letter actions.
//!
//! Each action makes one completion call and, only on success, stores the
//! text as that session's artifact. Artifacts never touch the analysis group.

use std::sync::Arc;

use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::generation::prompts::{
    build_cover_letter_prompt, build_resume_prompt, COVER_LETTER_MAX_TOKENS, COVER_LETTER_SYSTEM,
    RESUME_MAX_TOKENS, RESUME_SYSTEM,
};
use crate::llm_client::prompts::DEFAULT_TEMPERATURE;
use crate::llm_client::CompletionRequest;
use crate::profile::input::{compose_resume_input, non_blank, ResumeFields};
use crate::session::store::SessionSnapshot;
use crate::session::{commit, require_session};
use crate::state::AppState;

/// Request body for resume generation.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ResumeRequest {
    #[serde(default)]
    pub fields: ResumeFields,
    #[serde(default)]
    pub job_description: Option<String>,
}

/// Request body for cover letter generation. The profile comes from the
/// session's last analysis.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CoverLetterRequest {
    #[serde(default)]
    pub company_name: String,
    #[serde(default)]
    pub job_posting: String,
}

pub async fn generate_resume(
    state: &AppState,
    session_id: Uuid,
    request: ResumeRequest,
) -> Result<Arc<SessionSnapshot>, AppError> {
    let session = require_session(&state.sessions, session_id)?;

    let resume_input = compose_resume_input(&request.fields).ok_or_else(|| {
        AppError::Validation(
            "Please provide content for at least one section to generate a resume".to_string(),
        )
    })?;
    let prompt = build_resume_prompt(&resume_input, non_blank(request.job_description.as_deref()));

    info!("Generating resume for session {}", session_id);
    let resume = state
        .llm
        .complete(
            CompletionRequest {
                system: RESUME_SYSTEM,
                prompt: &prompt,
                max_tokens: RESUME_MAX_TOKENS,
                temperature: DEFAULT_TEMPERATURE,
            },
            session.api_key(),
        )
        .await
        .map_err(|e| AppError::from_llm("generating resume", e))?;

    commit(&state.sessions, session_id, |s| s.with_resume(resume))
}

pub async fn generate_cover_letter(
    state: &AppState,
    session_id: Uuid,
    request: CoverLetterRequest,
) -> Result<Arc<SessionSnapshot>, AppError> {
    let session = require_session(&state.sessions, session_id)?;

    let profile_text = session.analysis.profile_snapshot.as_str();
    if profile_text.trim().is_empty() {
        return Err(AppError::Validation(
            "Please analyze your profile first; the cover letter reuses that profile".to_string(),
        ));
    }
    let (Some(company_name), Some(job_posting)) = (
        non_blank(Some(request.company_name.as_str())),
        non_blank(Some(request.job_posting.as_str())),
    ) else {
        return Err(AppError::Validation(
            "Please enter both Company Name and Job Posting to generate a cover letter"
                .to_string(),
        ));
    };

    let prompt = build_cover_letter_prompt(profile_text, company_name, job_posting);

    info!("Generating cover letter for session {}", session_id);
    let letter = state
        .llm
        .complete(
            CompletionRequest {
                system: COVER_LETTER_SYSTEM,
                prompt: &prompt,
                max_tokens: COVER_LETTER_MAX_TOKENS,
                temperature: DEFAULT_TEMPERATURE,
            },
            session.api_key(),
        )
        .await
        .map_err(|e| AppError::from_llm("generating cover letter", e))?;

    commit(&state.sessions, session_id, |s| s.with_cover_letter(letter))
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
