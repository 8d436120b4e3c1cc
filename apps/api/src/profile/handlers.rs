//! Axum route handlers for the profile input channels.

use axum::{
    extract::{Multipart, State},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::errors::AppError;
use crate::profile::pdf::extract_pdf_text;
use crate::profile::scrape::ScrapeResult;
use crate::state::AppState;

/// Multipart field carrying the PDF.
const FILE_FIELD: &str = "file";

#[derive(Debug, Serialize)]
pub struct PdfExtractResponse {
    pub file_name: Option<String>,
    pub text: String,
    pub char_count: usize,
}

#[derive(Debug, Deserialize)]
pub struct ScrapeRequest {
    pub url: String,
}

/// POST /api/v1/profile/pdf
///
/// Extracts text from an uploaded PDF. The client passes the text back as
/// `document_text` when analyzing; it only applies when the manual fields
/// are blank.
pub async fn handle_extract_pdf(
    mut multipart: Multipart,
) -> Result<Json<PdfExtractResponse>, AppError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Malformed upload: {e}")))?
    {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }

        let file_name = field.file_name().map(str::to_string);
        let data = field
            .bytes()
            .await
            .map_err(|e| AppError::Validation(format!("Failed to read upload: {e}")))?;

        let text = extract_pdf_text(data).await?;
        info!("PDF upload processed ({} chars)", text.chars().count());

        return Ok(Json(PdfExtractResponse {
            file_name,
            char_count: text.chars().count(),
            text,
        }));
    }

    Err(AppError::Validation(format!(
        "Expected a PDF in the multipart field '{FILE_FIELD}'"
    )))
}

/// POST /api/v1/profile/scrape
///
/// Unreliable by nature; failures come back as `SCRAPE_ERROR` with advice.
pub async fn handle_scrape(
    State(state): State<AppState>,
    Json(request): Json<ScrapeRequest>,
) -> Result<Json<ScrapeResult>, AppError> {
    if request.url.trim().is_empty() {
        return Err(AppError::Validation("url cannot be empty".to_string()));
    }

    let result = state.scraper.scrape(&request.url).await?;
    Ok(Json(result))
}
