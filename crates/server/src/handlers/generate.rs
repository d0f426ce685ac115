//! # Writeup Generation Handler
//!
//! This module contains the handler for the `/generate` endpoint, the core of
//! the service. It runs the full pipeline: validate the prompt, generate the
//! writeup, then materialize the request's placeholder mappings into a fresh
//! session directory.

use crate::{errors::AppError, state::AppState};
use axum::{extract::State, Json};
use ctfrag::{
    resolve::resolve_placeholders,
    session::{PackageError, SessionStore},
    GenerationRequest,
};
use serde::{Deserialize, Serialize};
use tracing::info;

/// The response body for the `/generate` endpoint.
///
/// `session_id` names the directory holding the images materialized for this
/// writeup. Clients echo it back to the download endpoints.
#[derive(Serialize, Deserialize)]
pub struct GenerateResponse {
    pub generated_text: String,
    pub session_id: String,
}

/// The handler for the `/generate` endpoint.
pub async fn generate_handler(
    State(app_state): State<AppState>,
    Json(payload): Json<GenerationRequest>,
) -> Result<Json<GenerateResponse>, AppError> {
    info!(
        category = %payload.category,
        mappings = payload.mappings.len(),
        "Received generation request: '{}'",
        payload.prompt
    );

    let generated = app_state
        .client
        .generate_writeup(&payload.prompt, &payload.category)
        .await?;

    // The session is created only after generation succeeds, so rejected
    // prompts never leave empty directories behind.
    let session_id = SessionStore::new_session_id();
    let session_dir = app_state
        .sessions
        .ensure_session_dir(&session_id)
        .map_err(PackageError::from)?;

    let generated_text =
        resolve_placeholders(&generated, &payload.mappings, &session_dir, &session_id);

    info!(session_id, "Generation complete");
    Ok(Json(GenerateResponse {
        generated_text,
        session_id,
    }))
}
