//! # API Route Handlers
//!
//! This module organizes all the Axum route handlers for the `ctfrag-server`.
//! The handlers are split into logical sub-modules based on their functionality
//! (e.g., `generate`, `package`).

// Sub-modules for different handler categories.
pub mod general;
pub mod generate;
pub mod package;

// Re-export all handlers from the sub-modules to make them easily accessible
// to the router under a single `handlers::` path.
pub use general::*;
pub use generate::*;
pub use package::*;
