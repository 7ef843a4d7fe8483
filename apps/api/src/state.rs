use std::sync::Arc;

use crate::config::Config;
use crate::export::Exporter;
use crate::generation::assembler::SopAssembler;
use crate::llm_client::TextGenerator;
use crate::storage::SopStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Model server client. Swapped for a stub in tests.
    pub llm: Arc<dyn TextGenerator>,
    pub assembler: Arc<SopAssembler>,
    pub store: SopStore,
    pub exporter: Exporter,
}
