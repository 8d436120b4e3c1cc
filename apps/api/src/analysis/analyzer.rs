//! Analyze action: profile in, parsed analysis committed to the session.
//!
//! Flow: compose profile → build prompt → complete → parse → commit.
//! The commit is the last step, so any failure before it leaves the
//! session's analysis group exactly as it was.

use std::sync::Arc;

use serde::Deserialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::analysis::parser::parse_completion;
use crate::analysis::prompts::{
    build_analysis_prompt, build_structured_analysis_prompt, structured_analysis_system,
    ANALYSIS_MAX_TOKENS, ANALYSIS_SYSTEM,
};
use crate::analysis::AnalysisFormat;
use crate::errors::AppError;
use crate::llm_client::prompts::DEFAULT_TEMPERATURE;
use crate::llm_client::CompletionRequest;
use crate::profile::input::{compose_profile, non_blank, ProfileFields};
use crate::session::store::SessionSnapshot;
use crate::session::{commit, require_session};
use crate::state::AppState;

/// Request body for profile analysis.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AnalyzeRequest {
    #[serde(default)]
    pub profile: ProfileFields,
    /// Text previously extracted from an uploaded document.
    #[serde(default)]
    pub document_text: Option<String>,
    #[serde(default)]
    pub job_description: Option<String>,
}

pub async fn analyze_profile(
    state: &AppState,
    session_id: Uuid,
    request: AnalyzeRequest,
) -> Result<Arc<SessionSnapshot>, AppError> {
    let session = require_session(&state.sessions, session_id)?;

    let profile_text = compose_profile(&request.profile, request.document_text.as_deref())
        .ok_or_else(|| {
            AppError::Validation(
                "Enter your profile details or upload a resume before analyzing".to_string(),
            )
        })?;
    let job_description = non_blank(request.job_description.as_deref());

    let format = state.config.analysis_format;
    let (prompt, system) = match format {
        AnalysisFormat::Legacy => (
            build_analysis_prompt(&profile_text, job_description),
            ANALYSIS_SYSTEM.to_string(),
        ),
        AnalysisFormat::Structured => (
            build_structured_analysis_prompt(&profile_text, job_description),
            structured_analysis_system(),
        ),
    };

    info!(
        "Analyzing profile for session {} (format={:?}, job_description={})",
        session_id,
        format,
        job_description.is_some()
    );

    let raw = state
        .llm
        .complete(
            CompletionRequest {
                system: &system,
                prompt: &prompt,
                max_tokens: ANALYSIS_MAX_TOKENS,
                temperature: DEFAULT_TEMPERATURE,
            },
            session.api_key(),
        )
        .await
        .map_err(|e| AppError::from_llm("analyzing profile", e))?;

    let parsed = parse_completion(&raw);
    if parsed.is_degraded() {
        warn!(
            "Analysis for session {} did not follow the requested format; showing raw feedback",
            session_id
        );
    } else if !parsed.scores.missing().is_empty() {
        warn!(
            "Analysis for session {} is missing scores: {:?}",
            session_id,
            parsed.scores.missing()
        );
    }

    commit(&state.sessions, session_id, |s| {
        s.with_analysis(parsed, profile_text)
    })
}
