//! Axum route handlers for downloads.

use axum::{
    extract::State,
    http::{header, HeaderName, HeaderValue},
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use tracing::info;

use crate::errors::{AppError, AppForm};
use crate::export::{ExportArtifact, ExportFormat};
use crate::state::AppState;
use crate::storage::{sanitize_name, timestamp};

/// Header set when a PDF request fell back to docx.
pub const PDF_ERROR_HEADER: &str = "x-pdf-error";

#[derive(Debug, Deserialize)]
pub struct ExportForm {
    #[serde(default)]
    pub sop_content: String,
    pub name: Option<String>,
}

impl ExportForm {
    fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or("")
    }
}

/// POST /download_txt
pub async fn handle_download_txt(
    State(state): State<AppState>,
    AppForm(form): AppForm<ExportForm>,
) -> Result<Response, AppError> {
    download(&state, form, ExportFormat::Text).await
}

/// POST /download_docx
pub async fn handle_download_docx(
    State(state): State<AppState>,
    AppForm(form): AppForm<ExportForm>,
) -> Result<Response, AppError> {
    download(&state, form, ExportFormat::Docx).await
}

/// POST /download_pdf
///
/// Falls back to the docx artifact, flagged with `X-PDF-Error`, when the
/// office converter is missing or fails.
pub async fn handle_download_pdf(
    State(state): State<AppState>,
    AppForm(form): AppForm<ExportForm>,
) -> Result<Response, AppError> {
    download(&state, form, ExportFormat::Pdf).await
}

async fn download(
    state: &AppState,
    form: ExportForm,
    format: ExportFormat,
) -> Result<Response, AppError> {
    if form.sop_content.trim().is_empty() {
        return Err(AppError::Validation("sop_content cannot be empty".to_string()));
    }

    let artifact = state
        .exporter
        .export(&form.sop_content, format, form.display_name())
        .await?;
    info!(
        "Exporting SOP as {} ({} bytes, requested {format}, degraded={})",
        artifact.format,
        artifact.bytes.len(),
        artifact.is_degraded()
    );
    attachment(artifact, form.display_name())
}

fn attachment(artifact: ExportArtifact, display_name: &str) -> Result<Response, AppError> {
    let filename = format!(
        "SOP_{}_{}.{}",
        sanitize_name(display_name, "Unnamed"),
        timestamp(),
        artifact.format.extension()
    );
    let disposition = HeaderValue::from_str(&format!("attachment; filename=\"{filename}\""))
        .map_err(|e| AppError::Internal(e.into()))?;

    let mut response = (
        [
            (
                header::CONTENT_TYPE,
                HeaderValue::from_static(artifact.format.content_type()),
            ),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        artifact.bytes,
    )
        .into_response();

    if let Some(marker) = artifact.degraded {
        let value = HeaderValue::from_str(&marker).map_err(|e| AppError::Internal(e.into()))?;
        response
            .headers_mut()
            .insert(HeaderName::from_static(PDF_ERROR_HEADER), value);
    }

    Ok(response)
}
