use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use ctfrag::{session::PackageError, WriteupError};
use serde_json::json;
use tracing::{error, info};

/// A custom error type for the server application.
///
/// This enum encapsulates different kinds of errors that can occur within the server,
/// allowing them to be converted into appropriate HTTP responses.
pub enum AppError {
    /// Errors originating from the writeup pipeline in `ctfrag`.
    Writeup(WriteupError),
    /// Errors from session packaging and document conversion.
    Package(PackageError),
    /// Generic internal server errors.
    Internal(anyhow::Error),
}

/// Conversion from `WriteupError` to `AppError`.
impl From<WriteupError> for AppError {
    fn from(err: WriteupError) -> Self {
        AppError::Writeup(err)
    }
}

/// Conversion from `PackageError` to `AppError`.
impl From<PackageError> for AppError {
    fn from(err: PackageError) -> Self {
        AppError::Package(err)
    }
}

/// Conversion from `anyhow::Error` to `AppError`.
impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::Internal(err)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Full error detail goes to the log. Rejected prompts and unknown
        // session ids are routine client traffic, everything else is a
        // server-side fault.
        match &self {
            AppError::Writeup(WriteupError::InvalidPrompt(reason)) => {
                info!("Rejected prompt: {reason}")
            }
            AppError::Package(PackageError::SessionNotFound(id)) => {
                info!("Download requested for unknown session '{id}'")
            }
            AppError::Writeup(err) => error!("WriteupError: {err:?}"),
            AppError::Package(err) => error!("PackageError: {err:?}"),
            AppError::Internal(err) => error!("Internal server error: {err:?}"),
        }

        let (status_code, error_message) = match self {
            AppError::Writeup(err) => match err {
                WriteupError::InvalidPrompt(reason) => {
                    (StatusCode::BAD_REQUEST, reason.to_string())
                }
                WriteupError::MissingAiProvider => (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Server is not configured correctly.".to_string(),
                ),
                WriteupError::ReqwestClientBuild(e) => (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    format!("Failed to build HTTP client: {e}"),
                ),
                WriteupError::AiRequest(e) => (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    format!("Request to AI provider failed: {e}"),
                ),
                WriteupError::AiDeserialization(e) => (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    format!("Failed to deserialize AI provider response: {e}"),
                ),
                WriteupError::AiApi(e) => (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    format!("AI provider error: {e}"),
                ),
                WriteupError::VectorRequest(e) => (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    format!("Request to the vector store failed: {e}"),
                ),
                WriteupError::VectorDeserialization(e) => (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    format!("Failed to deserialize vector store response: {e}"),
                ),
                WriteupError::VectorApi(e) => (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    format!("Vector store error: {e}"),
                ),
            },
            AppError::Package(err) => match err {
                PackageError::SessionNotFound(id) => (
                    StatusCode::NOT_FOUND,
                    format!("Session '{id}' was not found."),
                ),
                PackageError::ConverterMissing => (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "The document converter is not installed on the server.".to_string(),
                ),
                PackageError::ConverterFailed(stderr) => (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    format!("Document conversion failed: {stderr}"),
                ),
                PackageError::Zip(e) => (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    format!("Failed to build the session archive: {e}"),
                ),
                PackageError::Io(e) => (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    format!("Session file access failed: {e}"),
                ),
            },
            AppError::Internal(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "An internal server error occurred.".to_string(),
            ),
        };

        let body = Json(json!({
            "error": error_message,
        }));

        (status_code, body).into_response()
    }
}
