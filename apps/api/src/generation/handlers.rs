//! Axum route handlers for the Generation API.

use std::collections::HashMap;

use axum::{extract::State, Json};
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::errors::{AppError, AppForm};
use crate::generation::assembler::SectionResult;
use crate::generation::generator::{probe_model, ModelStatus};
use crate::models::UserData;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct GenerateSopResponse {
    pub success: bool,
    pub sop_content: String,
    /// Seconds, rounded to two decimals.
    pub generation_time: f64,
    pub sections: Vec<SectionResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// GET /check_ollama
///
/// Reports whether the model server is reachable and has the configured model.
pub async fn handle_check_ollama(State(state): State<AppState>) -> Json<ModelStatus> {
    Json(probe_model(state.llm.as_ref(), &state.config.ollama_model).await)
}

/// POST /generate_sop
///
/// Persists the submitted answers, assembles every section and persists the
/// result. Section failures are embedded in `sop_content`; storage failures are
/// logged and do not fail the request.
pub async fn handle_generate_sop(
    State(state): State<AppState>,
    AppForm(fields): AppForm<HashMap<String, String>>,
) -> Result<Json<GenerateSopResponse>, AppError> {
    let request_id = Uuid::new_v4();
    let user: UserData = fields.into_iter().collect();
    info!(
        "[{request_id}] Generating SOP for '{}' ({} fields, {} strategy)",
        user.display_name(),
        user.len(),
        state.assembler.strategy()
    );

    if user.is_empty() {
        warn!("[{request_id}] Empty submission; every field will read as blank");
    }

    if let Err(e) = state.store.save_user_data(&user).await {
        warn!("[{request_id}] Could not save user data: {e:#}");
    }

    let report = state.assembler.assemble(&user).await;

    if let Err(e) = state
        .store
        .save_generated_sop(&user.display_name(), &report.document, &report.sections)
        .await
    {
        warn!("[{request_id}] Could not save generated SOP: {e:#}");
    }

    let success = report.success();
    let error = if success {
        None
    } else {
        Some(
            report
                .first_error()
                .unwrap_or("Every section failed to generate")
                .to_string(),
        )
    };
    let generation_time = (report.duration.as_secs_f64() * 100.0).round() / 100.0;

    info!(
        "[{request_id}] SOP generation finished: success={success}, {} of {} sections failed, {generation_time}s",
        report.failed_sections(),
        report.sections.len()
    );

    Ok(Json(GenerateSopResponse {
        success,
        sop_content: report.document,
        generation_time,
        sections: report.sections,
        error,
    }))
}
