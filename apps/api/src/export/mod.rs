//! Exporter: turns an assembled SOP string into a downloadable artifact.
//!
//! - Text: UTF-8 passthrough.
//! - Docx: rendered in-process with docx-rs on the blocking pool.
//! - Pdf: docx first, then the office suite converts it. Any conversion fault
//!   degrades to the docx bytes with a marker instead of failing the request.

pub mod converter;
pub mod docx;
pub mod handlers;

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::models::document::normalize_body;
use crate::models::{AssembledDocument, DocumentSection};

pub use converter::OfficeConverter;

/// Marker attached to a PDF request that fell back to docx.
pub const PDF_FALLBACK_MARKER: &str = "PDF conversion failed, providing DOCX instead";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExportFormat {
    Text,
    Docx,
    Pdf,
}

impl ExportFormat {
    pub fn content_type(&self) -> &'static str {
        match self {
            ExportFormat::Text => "text/plain; charset=utf-8",
            ExportFormat::Docx => {
                "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
            }
            ExportFormat::Pdf => "application/pdf",
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Text => "txt",
            ExportFormat::Docx => "docx",
            ExportFormat::Pdf => "pdf",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Failed to build word-processor document: {0}")]
    Docx(String),

    #[error("Document converter unavailable: {0}")]
    ConverterUnavailable(String),

    #[error("PDF conversion failed: {0}")]
    ConversionFailed(String),

    #[error("Conversion timed out after {0} seconds")]
    Timeout(u64),

    #[error("I/O error during export: {0}")]
    Io(#[from] std::io::Error),
}

/// Bytes ready for download plus the format they actually are.
#[derive(Debug, Clone)]
pub struct ExportArtifact {
    pub bytes: Vec<u8>,
    pub format: ExportFormat,
    /// Set when the requested format could not be produced.
    pub degraded: Option<String>,
}

impl ExportArtifact {
    pub fn new(bytes: Vec<u8>, format: ExportFormat) -> Self {
        Self {
            bytes,
            format,
            degraded: None,
        }
    }

    pub fn is_degraded(&self) -> bool {
        self.degraded.is_some()
    }
}

#[derive(Debug, Clone)]
pub struct Exporter {
    converter: OfficeConverter,
}

impl Exporter {
    pub fn new(converter: OfficeConverter) -> Self {
        Self { converter }
    }

    pub async fn export(
        &self,
        content: &str,
        format: ExportFormat,
        display_name: &str,
    ) -> Result<ExportArtifact, ExportError> {
        match format {
            ExportFormat::Text => Ok(ExportArtifact::new(
                content.as_bytes().to_vec(),
                ExportFormat::Text,
            )),
            ExportFormat::Docx => {
                let bytes = self.render_docx(content).await?;
                Ok(ExportArtifact::new(bytes, ExportFormat::Docx))
            }
            ExportFormat::Pdf => {
                let docx = self.render_docx(content).await?;
                match self.converter.docx_to_pdf(&docx, display_name).await {
                    Ok(pdf) => Ok(ExportArtifact::new(pdf, ExportFormat::Pdf)),
                    Err(e) => {
                        warn!("PDF conversion failed, returning DOCX: {e}");
                        Ok(ExportArtifact {
                            bytes: docx,
                            format: ExportFormat::Docx,
                            degraded: Some(PDF_FALLBACK_MARKER.to_string()),
                        })
                    }
                }
            }
        }
    }

    async fn render_docx(&self, content: &str) -> Result<Vec<u8>, ExportError> {
        let document = document_layout(content);
        tokio::task::spawn_blocking(move || docx::render_docx(&document))
            .await
            .map_err(|e| ExportError::Docx(format!("render task failed: {e}")))?
    }
}

/// Parsed sections, or the whole text as one untitled section when no
/// heading/body layout can be recovered.
fn document_layout(content: &str) -> AssembledDocument {
    let document = AssembledDocument::parse(content);
    if !document.is_empty() {
        return document;
    }
    debug!("No section layout found; exporting text as one untitled section");
    AssembledDocument::new(vec![DocumentSection::new("", normalize_body(content))])
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;
    use std::time::Duration;

    use super::*;

    const SOP: &str = "Respected Sir/Ma'am\n\nI, Asha Verma, am writing.\n\n\nConclusion\n\nThank you.";

    fn exporter_without_office() -> Exporter {
        Exporter::new(OfficeConverter::new(
            Vec::new(),
            PathBuf::from("sop-api-test-missing-office-binary"),
            Duration::from_secs(5),
        ))
    }

    #[test]
    fn test_format_metadata() {
        assert_eq!(ExportFormat::Text.extension(), "txt");
        assert_eq!(ExportFormat::Docx.extension(), "docx");
        assert_eq!(ExportFormat::Pdf.content_type(), "application/pdf");
        assert!(ExportFormat::Docx.content_type().contains("wordprocessingml"));
    }

    #[test]
    fn test_unstructured_text_becomes_one_untitled_section() {
        let layout = document_layout("Just a single paragraph.");
        assert_eq!(
            layout.sections,
            vec![DocumentSection::new("", "Just a single paragraph.")]
        );
    }

    #[test]
    fn test_structured_text_keeps_its_sections() {
        let layout = document_layout(SOP);
        assert_eq!(layout.sections.len(), 2);
        assert_eq!(layout.sections[1].title, "Conclusion");
    }

    #[tokio::test]
    async fn test_text_export_is_passthrough() {
        let artifact = exporter_without_office()
            .export(SOP, ExportFormat::Text, "Asha")
            .await
            .unwrap();
        assert_eq!(artifact.bytes, SOP.as_bytes());
        assert_eq!(artifact.format, ExportFormat::Text);
        assert!(!artifact.is_degraded());
    }

    #[tokio::test]
    async fn test_docx_export_is_zip_container() {
        let artifact = exporter_without_office()
            .export(SOP, ExportFormat::Docx, "Asha")
            .await
            .unwrap();
        assert_eq!(artifact.format, ExportFormat::Docx);
        assert_eq!(&artifact.bytes[..2], b"PK");
        assert!(!artifact.is_degraded());
    }

    #[tokio::test]
    async fn test_pdf_without_converter_degrades_to_docx() {
        let exporter = exporter_without_office();

        let docx = exporter.export(SOP, ExportFormat::Docx, "Asha").await.unwrap();
        let pdf = exporter.export(SOP, ExportFormat::Pdf, "Asha").await.unwrap();

        assert_eq!(pdf.format, ExportFormat::Docx);
        assert_eq!(pdf.degraded.as_deref(), Some(PDF_FALLBACK_MARKER));
        assert_eq!(&pdf.bytes[..2], b"PK");
        assert!(!docx.is_degraded());
    }
}
