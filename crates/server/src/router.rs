use super::{handlers, state::AppState};
use axum::extract::DefaultBodyLimit;
use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

/// Creates the Axum router with all the application routes.
pub fn create_router(app_state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::root))
        .route("/health", get(handlers::health_check))
        .route(
            "/generate",
            // Mappings carry base64 data URIs, so generation payloads can be
            // much larger than ordinary JSON bodies.
            post(handlers::generate_handler).layer(DefaultBodyLimit::max(10 * 1024 * 1024)),
        )
        .route("/download-package", post(handlers::download_package_handler))
        .route("/download-docx", post(handlers::download_docx_handler))
        .with_state(app_state)
        .layer(TraceLayer::new_for_http())
        // The writeup editor runs in a browser on another origin.
        .layer(CorsLayer::permissive())
}
