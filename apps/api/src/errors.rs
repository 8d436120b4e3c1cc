use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::llm_client::LlmError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
///
/// Every failure is converted to a readable message at the action boundary.
/// Handlers only commit session state after the fallible work succeeded, so
/// returning one of these never leaves a half-applied transition behind.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("No OpenAI API key provided. Set OPENAI_API_KEY or supply a key for this session.")]
    MissingCredential,

    #[error("{0}")]
    Upstream(String),

    #[error("Error extracting text from PDF: {0}")]
    Extraction(String),

    #[error("{0}")]
    Scrape(String),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    /// Wraps a completion failure with the action that triggered it.
    pub fn from_llm(action: &str, err: LlmError) -> Self {
        match err {
            LlmError::MissingCredential => AppError::MissingCredential,
            other => AppError::Upstream(format!(
                "Error {action}: {other}. Ensure your API key is correct and you have sufficient credits."
            )),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code) = match &self {
            AppError::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            AppError::Validation(_) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR"),
            AppError::MissingCredential => (StatusCode::UNAUTHORIZED, "MISSING_CREDENTIAL"),
            AppError::Upstream(msg) => {
                tracing::error!("Upstream error: {msg}");
                (StatusCode::BAD_GATEWAY, "UPSTREAM_ERROR")
            }
            AppError::Extraction(msg) => {
                tracing::warn!("PDF extraction failed: {msg}");
                (StatusCode::UNPROCESSABLE_ENTITY, "EXTRACTION_ERROR")
            }
            AppError::Scrape(msg) => {
                tracing::warn!("Profile scrape failed: {msg}");
                (StatusCode::UNPROCESSABLE_ENTITY, "SCRAPE_ERROR")
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR")
            }
        };

        // Internal details stay in the log; everything else is user-facing.
        let message = match &self {
            AppError::Internal(_) => "An internal server error occurred".to_string(),
            other => other.to_string(),
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_credential_maps_to_unauthorized() {
        let response = AppError::MissingCredential.into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn test_upstream_maps_to_bad_gateway() {
        let response = AppError::Upstream("quota exceeded".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn test_extraction_maps_to_unprocessable() {
        let response = AppError::Extraction("not a pdf".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[test]
    fn test_from_llm_keeps_missing_credential_distinct() {
        let err = AppError::from_llm("analyzing profile", LlmError::MissingCredential);
        assert!(matches!(err, AppError::MissingCredential));
    }

    #[test]
    fn test_from_llm_upstream_message_names_action() {
        let err = AppError::from_llm(
            "generating resume",
            LlmError::Api {
                status: 429,
                message: "You exceeded your current quota".to_string(),
            },
        );
        let msg = err.to_string();
        assert!(msg.starts_with("Error generating resume:"));
        assert!(msg.contains("status 429"));
        assert!(msg.contains("exceeded your current quota"));
    }
}
