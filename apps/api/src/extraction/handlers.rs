//! Axum route handlers for the Parse API.

use axum::{
    extract::{multipart::MultipartError, Multipart, State},
    http::StatusCode,
    Json,
};
use bytes::Bytes;
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::extraction::DocumentFormat;
use crate::models::resume::ParsedResume;
use crate::state::AppState;

/// Multipart field carrying the document.
pub const UPLOAD_FIELD: &str = "resume";

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug)]
pub struct UploadedDocument {
    pub filename: String,
    pub format: DocumentFormat,
    pub bytes: Bytes,
}

#[derive(Debug, Serialize)]
pub struct ParseResponse {
    pub document_id: Uuid,
    pub parsed_at: DateTime<Utc>,
    pub format: DocumentFormat,
    /// User-facing messages, e.g. a decoding failure that left the record empty.
    pub warnings: Vec<String>,
    pub record: ParsedResume,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/resumes/parse
///
/// Accepts a multipart upload (field `resume`: PDF, DOCX or plain text) and returns
/// the structured record. Undecodable documents still return 200 with sentinel
/// fields and a warning.
pub async fn handle_parse_resume(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<ParseResponse>, AppError> {
    let upload = read_upload(multipart).await?;
    let document_id = Uuid::new_v4();
    info!(
        %document_id,
        filename = %upload.filename,
        format = ?upload.format,
        bytes = upload.bytes.len(),
        "parsing uploaded resume"
    );

    let parser = state.parser.clone();
    let format = upload.format;
    let outcome = tokio::task::spawn_blocking(move || parser.parse_document(&upload.bytes, format))
        .await
        .map_err(|e| AppError::Internal(anyhow::anyhow!("parse task failed: {e}")))?;

    Ok(Json(ParseResponse {
        document_id,
        parsed_at: Utc::now(),
        format,
        warnings: outcome.warnings,
        record: outcome.record,
    }))
}

/// Pulls the `resume` field out of the form; other fields are skipped.
async fn read_upload(mut multipart: Multipart) -> Result<UploadedDocument, AppError> {
    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        if field.name() != Some(UPLOAD_FIELD) {
            continue;
        }

        let filename = field.file_name().unwrap_or_default().trim().to_string();
        if filename.is_empty() {
            return Err(AppError::Validation("No file selected".to_string()));
        }
        let format = field
            .content_type()
            .and_then(DocumentFormat::from_mime)
            .or_else(|| DocumentFormat::from_filename(&filename))
            .ok_or_else(|| {
                AppError::UnsupportedMediaType(format!(
                    "'{filename}' is not a PDF, DOCX or plain-text document"
                ))
            })?;
        let bytes = field.bytes().await.map_err(multipart_error)?;

        return Ok(UploadedDocument {
            filename,
            format,
            bytes,
        });
    }

    Err(AppError::Validation(format!(
        "Missing multipart field '{UPLOAD_FIELD}'"
    )))
}

fn multipart_error(e: MultipartError) -> AppError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge(e.body_text())
    } else {
        AppError::Validation(e.body_text())
    }
}
