//! SOP Assembler: runs every registry section through the configured strategy
//! and flattens the results into one document.
//!
//! A failed section never aborts assembly: its body is replaced by a visible
//! error line and the remaining sections are still produced.

use std::time::{Duration, Instant};

use serde::Serialize;
use tracing::{info, warn};

use crate::generation::generator::{GeneratedWriter, ModelStatus};
use crate::generation::registry::{SectionRegistry, SectionSpec};
use crate::generation::prompts::build_prompt;
use crate::generation::{templated, GenerationError, Strategy};
use crate::models::{AssembledDocument, DocumentSection, UserData};

/// Outcome of one section.
#[derive(Debug, Clone, Serialize)]
pub struct SectionResult {
    pub key: String,
    pub title: String,
    pub body: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl SectionResult {
    pub fn succeeded(&self) -> bool {
        self.error.is_none()
    }
}

/// Everything one assembly run produced.
#[derive(Debug, Clone)]
pub struct AssemblyReport {
    pub strategy: Strategy,
    pub document: String,
    pub sections: Vec<SectionResult>,
    pub duration: Duration,
}

impl AssemblyReport {
    /// Templated runs always succeed. Generated runs succeed while at least one
    /// section came back from the model; in-body errors alone are not fatal.
    pub fn success(&self) -> bool {
        match self.strategy {
            Strategy::Templated => true,
            Strategy::Generated => self.sections.iter().any(SectionResult::succeeded),
        }
    }

    pub fn failed_sections(&self) -> usize {
        self.sections.iter().filter(|s| !s.succeeded()).count()
    }

    /// First recorded section error, used as the summary when nothing succeeded.
    pub fn first_error(&self) -> Option<&str> {
        self.sections.iter().find_map(|s| s.error.as_deref())
    }
}

/// Section writer chosen at startup.
#[derive(Clone)]
pub enum SectionWriter {
    Templated,
    Generated(GeneratedWriter),
}

impl SectionWriter {
    pub fn strategy(&self) -> Strategy {
        match self {
            SectionWriter::Templated => Strategy::Templated,
            SectionWriter::Generated(_) => Strategy::Generated,
        }
    }
}

#[derive(Clone)]
pub struct SopAssembler {
    registry: SectionRegistry,
    writer: SectionWriter,
}

impl SopAssembler {
    pub fn new(registry: SectionRegistry, writer: SectionWriter) -> Self {
        Self { registry, writer }
    }

    pub fn registry(&self) -> &SectionRegistry {
        &self.registry
    }

    pub fn strategy(&self) -> Strategy {
        self.writer.strategy()
    }

    pub async fn assemble(&self, user: &UserData) -> AssemblyReport {
        let started = Instant::now();

        // One probe per request; every section reuses it.
        let status = match &self.writer {
            SectionWriter::Generated(writer) => Some(writer.probe().await),
            SectionWriter::Templated => None,
        };

        let mut sections = Vec::with_capacity(self.registry.len());
        for spec in self.registry.iter() {
            let outcome = self.write_section(spec, user, status.as_ref()).await;
            let result = match outcome {
                Ok(body) => SectionResult {
                    key: spec.key.to_string(),
                    title: spec.title.to_string(),
                    body,
                    error: None,
                },
                Err(e) => {
                    warn!("Section '{}' failed: {e}", spec.key);
                    SectionResult {
                        key: spec.key.to_string(),
                        title: spec.title.to_string(),
                        body: format!(
                            "Error generating {}: {}",
                            spec.title,
                            single_line(&e.to_string())
                        ),
                        error: Some(e.to_string()),
                    }
                }
            };
            sections.push(result);
        }

        let document = AssembledDocument::new(
            sections
                .iter()
                .map(|s| DocumentSection::new(s.title.clone(), s.body.clone()))
                .collect(),
        )
        .render();

        let report = AssemblyReport {
            strategy: self.strategy(),
            document,
            sections,
            duration: started.elapsed(),
        };

        info!(
            "Assembled SOP with {} strategy: {} sections, {} failed, {:.2}s",
            report.strategy,
            report.sections.len(),
            report.failed_sections(),
            report.duration.as_secs_f64()
        );

        report
    }

    async fn write_section(
        &self,
        spec: &SectionSpec,
        user: &UserData,
        status: Option<&ModelStatus>,
    ) -> Result<String, GenerationError> {
        match (&self.writer, status) {
            (SectionWriter::Generated(writer), Some(status)) => {
                let prompt = build_prompt(&self.registry, spec.key, user)?;
                writer.write_section(spec, &prompt, status).await
            }
            (SectionWriter::Generated(_), None) => Err(GenerationError::ServiceUnavailable),
            (SectionWriter::Templated, _) => templated::render_section(spec.key, user),
        }
    }
}

/// Error text embedded in a body must not carry blank lines into the layout.
fn single_line(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::generation::generator::tests::{StubGenerator, LONG_REPLY};

    fn applicant() -> UserData {
        [
            ("name", "Asha Verma"),
            ("course", "MSc Data Science"),
            ("country", "Canada"),
            ("bachelors_degree", "B.Tech"),
            ("bachelors_college", "IIT Delhi"),
            ("test_type", "IELTS"),
            ("overall", "7.5"),
        ]
        .into_iter()
        .collect()
    }

    fn generated(stub: Arc<StubGenerator>, include_relevance: bool) -> SopAssembler {
        SopAssembler::new(
            SectionRegistry::new(include_relevance),
            SectionWriter::Generated(GeneratedWriter::new(stub, "llama3.1:8b", 0.7)),
        )
    }

    #[tokio::test]
    async fn test_templated_assembly_covers_registry_in_order() {
        let assembler = SopAssembler::new(SectionRegistry::new(true), SectionWriter::Templated);
        let report = assembler.assemble(&applicant()).await;

        assert!(report.success());
        assert_eq!(report.failed_sections(), 0);
        let keys: Vec<&str> = report.sections.iter().map(|s| s.key.as_str()).collect();
        assert_eq!(keys, assembler.registry().keys());
        assert!(report.document.starts_with("Respected Sir/Ma'am\n\nI, Asha Verma,"));
    }

    #[tokio::test]
    async fn test_templated_document_round_trips() {
        let assembler = SopAssembler::new(SectionRegistry::new(true), SectionWriter::Templated);
        let report = assembler.assemble(&applicant()).await;

        let parsed = AssembledDocument::parse(&report.document);
        assert_eq!(parsed.sections.len(), report.sections.len());
        for (parsed, original) in parsed.sections.iter().zip(&report.sections) {
            assert_eq!(parsed.title, original.title);
            assert_eq!(parsed.body, original.body);
        }
    }

    #[tokio::test]
    async fn test_unreachable_server_fails_every_section_fast() {
        let stub = Arc::new(StubGenerator::offline());
        let report = generated(stub.clone(), false).assemble(&applicant()).await;

        assert!(!report.success());
        assert_eq!(report.failed_sections(), report.sections.len());
        assert_eq!(stub.generate_calls(), 0);
        assert_eq!(stub.list_calls(), 1, "probe runs once per request");
        assert!(report
            .document
            .contains("Error generating Conclusion: Ollama service is not running."));
        assert!(report.first_error().unwrap().contains("not running"));
    }

    #[tokio::test]
    async fn test_generated_assembly_succeeds() {
        let stub = Arc::new(StubGenerator::serving(&["llama3.1:8b"], LONG_REPLY));
        let report = generated(stub.clone(), false).assemble(&applicant()).await;

        assert!(report.success());
        assert_eq!(report.sections.len(), 8);
        assert_eq!(stub.generate_calls(), 8);
        assert_eq!(stub.list_calls(), 1);
        assert!(report.sections.iter().all(|s| s.body == LONG_REPLY));
    }

    #[tokio::test]
    async fn test_short_replies_are_embedded_but_assembly_continues() {
        let stub = Arc::new(StubGenerator::serving(&["llama3.1:8b"], "Nope."));
        let report = generated(stub.clone(), true).assemble(&applicant()).await;

        assert_eq!(stub.generate_calls(), 9);
        assert!(!report.success());
        assert!(report
            .document
            .contains("Error generating Academic Background: Generated content for academic_background is too short"));
    }

    #[tokio::test]
    async fn test_multi_line_error_page_stays_inside_its_section() {
        let mut stub = StubGenerator::serving(&["llama3.1:8b"], LONG_REPLY);
        stub.generate_error =
            Some("<html>\n\n\n<h1>Bad Gateway</h1>\n\n\n</html>".to_string());
        let report = generated(Arc::new(stub), false).assemble(&applicant()).await;

        let parsed = AssembledDocument::parse(&report.document);
        assert_eq!(parsed.sections.len(), report.sections.len());
        assert_eq!(parsed.sections[0].title, "Respected Sir/Ma'am");
        assert_eq!(
            parsed.sections[0].body,
            "Error generating Respected Sir/Ma'am: Model server returned status 500: \
             <html> <h1>Bad Gateway</h1> </html>"
        );
        assert!(report.sections[0].error.as_deref().unwrap().contains("\n\n\n"));
    }

    #[test]
    fn test_success_with_partial_failure() {
        let ok = SectionResult {
            key: "a".into(),
            title: "A".into(),
            body: "fine".into(),
            error: None,
        };
        let failed = SectionResult {
            key: "b".into(),
            title: "B".into(),
            body: "Error generating B: boom".into(),
            error: Some("boom".into()),
        };
        let report = AssemblyReport {
            strategy: Strategy::Generated,
            document: String::new(),
            sections: vec![ok, failed],
            duration: Duration::from_millis(5),
        };
        assert!(report.success());
        assert_eq!(report.failed_sections(), 1);
        assert_eq!(report.first_error(), Some("boom"));
    }
}
