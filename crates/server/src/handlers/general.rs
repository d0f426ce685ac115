//! # General Route Handlers
//!
//! This module contains the general-purpose Axum handlers for the
//! `ctfrag-server`: the root banner and the health check.

/// The handler for the root (`/`) endpoint.
pub async fn root() -> &'static str {
    "ctfrag server is running."
}

/// The handler for the health check (`/health`) endpoint.
pub async fn health_check() -> &'static str {
    "OK"
}
