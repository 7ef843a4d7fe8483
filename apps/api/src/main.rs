mod config;
mod errors;
mod export;
mod generation;
mod llm_client;
mod models;
mod routes;
mod state;
mod storage;

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::export::{Exporter, OfficeConverter};
use crate::generation::assembler::{SectionWriter, SopAssembler};
use crate::generation::generator::GeneratedWriter;
use crate::generation::registry::SectionRegistry;
use crate::generation::Strategy;
use crate::llm_client::{OllamaClient, TextGenerator};
use crate::routes::build_router;
use crate::state::AppState;
use crate::storage::SopStore;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "{}={},tower_http=info",
                env!("CARGO_PKG_NAME").replace('-', "_"),
                &config.rust_log
            ))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting SOP API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize model server client
    let ollama = OllamaClient::new(
        config.ollama_base_url.clone(),
        Duration::from_secs(config.ollama_timeout_secs),
    )?;
    info!(
        "Ollama client initialized ({}, model: {})",
        ollama.base_url(),
        config.ollama_model
    );
    let llm: Arc<dyn TextGenerator> = Arc::new(ollama);

    // Section registry + writer for the configured strategy
    let writer = match config.strategy {
        Strategy::Templated => SectionWriter::Templated,
        Strategy::Generated => SectionWriter::Generated(GeneratedWriter::new(
            llm.clone(),
            config.ollama_model.clone(),
            config.ollama_temperature,
        )),
    };
    let assembler = Arc::new(SopAssembler::new(
        SectionRegistry::new(config.program_relevance_enabled()),
        writer,
    ));
    info!(
        "SOP strategy: {} ({} sections: {})",
        assembler.strategy(),
        assembler.registry().len(),
        assembler.registry().keys().join(", ")
    );

    let store = SopStore::open(&config.data_dir).await?;

    let converter = OfficeConverter::from_config(
        config.soffice_path.clone(),
        Duration::from_secs(config.pdf_conversion_timeout_secs),
    );
    info!("PDF converter: {}", converter.resolve().display());
    let exporter = Exporter::new(converter);

    // Build app state
    let state = AppState {
        config: config.clone(),
        llm,
        assembler,
        store,
        exporter,
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
