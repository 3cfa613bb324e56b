mod analysis;
mod config;
mod errors;
mod llm_client;
mod parsing;
mod routes;
mod state;
mod ui;

#[cfg(test)]
mod test_support;

use anyhow::{Context, Result};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::llm_client::LlmClient;
use crate::parsing::llama_parse::LlamaParseClient;
use crate::parsing::pdf_text::PdfTextExtractor;
use crate::parsing::DocumentParser;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "{}={},tower_http=info",
                env!("CARGO_PKG_NAME"),
                &config.rust_log
            ))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Resume Screener v{}", env!("CARGO_PKG_VERSION"));

    // Initialize LLM client; without it there is nothing to screen with
    let llm = LlmClient::new(config.gemini_api_key.clone(), &config.gemini_api_base)
        .context("Gemini initialization failed")?;
    info!("LLM client initialized (model: {})", llm_client::MODEL);

    // Initialize hosted parser; failures here only disable it
    let parser = build_hosted_parser(&config);

    let state = AppState {
        llm,
        parser,
        fallback_parser: Arc::new(PdfTextExtractor),
        config: config.clone(),
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on http://{addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Builds the LlamaParse client when an API key is configured.
fn build_hosted_parser(config: &Config) -> Option<Arc<dyn DocumentParser>> {
    let Some(api_key) = config.llama_cloud_api_key.clone() else {
        warn!("LLAMA_CLOUD_API_KEY not set; resumes will be parsed locally with pdf-extract");
        return None;
    };

    match LlamaParseClient::new(
        api_key,
        &config.llama_cloud_base_url,
        Duration::from_secs(config.llama_parse_timeout_secs),
    ) {
        Ok(client) => {
            info!("LlamaParse client initialized ({})", config.llama_cloud_base_url);
            Some(Arc::new(client))
        }
        Err(e) => {
            error!("LlamaParse initialization failed: {e}");
            None
        }
    }
}
