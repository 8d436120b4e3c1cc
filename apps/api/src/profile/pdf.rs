//! PDF text extraction for uploaded resumes.

use bytes::Bytes;
use tracing::debug;

use crate::errors::AppError;

/// Extracts the text layer of a PDF.
///
/// Runs on the blocking pool: extraction is CPU-bound and the parser may
/// panic on malformed input, which surfaces here as an `Extraction` error.
pub async fn extract_pdf_text(data: Bytes) -> Result<String, AppError> {
    if data.is_empty() {
        return Err(AppError::Extraction("the uploaded file is empty".to_string()));
    }

    let size = data.len();
    let text = tokio::task::spawn_blocking(move || pdf_extract::extract_text_from_mem(&data))
        .await
        .map_err(|e| AppError::Extraction(format!("the PDF could not be read ({e})")))?
        .map_err(|e| AppError::Extraction(e.to_string()))?;

    if text.trim().is_empty() {
        return Err(AppError::Extraction(
            "no text layer found; scanned documents are not supported".to_string(),
        ));
    }

    debug!("Extracted {} chars from a {} byte PDF", text.len(), size);
    Ok(text)
}
