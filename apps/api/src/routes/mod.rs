pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use tower_http::catch_panic::CatchPanicLayer;

use crate::errors::panic_response;
use crate::export::handlers as export;
use crate::generation::handlers as generation;
use crate::state::AppState;

/// Form submissions are small; anything larger is refused before parsing.
const MAX_BODY_BYTES: usize = 1024 * 1024;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route("/check_ollama", get(generation::handle_check_ollama))
        .route("/generate_sop", post(generation::handle_generate_sop))
        .route("/download_txt", post(export::handle_download_txt))
        .route("/download_docx", post(export::handle_download_docx))
        .route("/download_pdf", post(export::handle_download_pdf))
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(CatchPanicLayer::custom(panic_response))
        .with_state(state)
}
