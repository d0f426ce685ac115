//! # Artifact Download Handlers
//!
//! This module contains the handlers for the `/download-package` and
//! `/download-docx` endpoints. Both take the session id from an earlier
//! `/generate` call plus the final (possibly user-edited) markdown, and
//! respond with the binary artifact as a file attachment.

use crate::{errors::AppError, state::AppState};
use axum::{
    extract::State,
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use tracing::info;

/// The MIME type registered for `.docx` documents.
const DOCX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document";

/// The request body shared by both download endpoints.
#[derive(Deserialize)]
pub struct DownloadRequest {
    pub session_id: String,
    /// The final document text. Clients send their edited copy, so the
    /// packaged document can differ from what `/generate` returned.
    pub markdown_content: String,
}

/// The handler for the `/download-package` endpoint.
///
/// Packages the markdown and the session's image files into a zip archive.
pub async fn download_package_handler(
    State(app_state): State<AppState>,
    Json(payload): Json<DownloadRequest>,
) -> Result<impl IntoResponse, AppError> {
    info!(
        session_id = %payload.session_id,
        "Received package download request"
    );

    let bytes = app_state
        .sessions
        .package_zip(&payload.session_id, &payload.markdown_content)?;

    Ok(attachment_response(
        "application/zip",
        format!("{}.zip", payload.session_id),
        bytes,
    ))
}

/// The handler for the `/download-docx` endpoint.
///
/// Converts the markdown into a docx document with the configured external
/// converter.
pub async fn download_docx_handler(
    State(app_state): State<AppState>,
    Json(payload): Json<DownloadRequest>,
) -> Result<impl IntoResponse, AppError> {
    info!(
        session_id = %payload.session_id,
        "Received docx download request"
    );

    let bytes = app_state
        .sessions
        .package_docx(&payload.session_id, &payload.markdown_content)
        .await?;

    Ok(attachment_response(
        DOCX_CONTENT_TYPE,
        format!("{}.docx", payload.session_id),
        bytes,
    ))
}

/// Builds a binary download response with the attachment headers set.
fn attachment_response(
    content_type: &'static str,
    filename: String,
    bytes: Vec<u8>,
) -> impl IntoResponse {
    (
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, content_type.to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{filename}\""),
            ),
        ],
        bytes,
    )
}
