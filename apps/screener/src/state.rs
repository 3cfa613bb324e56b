use std::sync::Arc;

use crate::config::Config;
use crate::llm_client::LlmClient;
use crate::parsing::DocumentParser;

/// Shared application state injected into all route handlers via Axum extractors.
/// Holds only immutable config and HTTP clients; nothing is persisted between requests.
#[derive(Clone)]
pub struct AppState {
    pub llm: LlmClient,
    /// Hosted parser (LlamaParse). `None` when no API key is configured or it failed to initialize.
    pub parser: Option<Arc<dyn DocumentParser>>,
    /// Local extraction used when the hosted parser is absent or fails.
    pub fallback_parser: Arc<dyn DocumentParser>,
    pub config: Config,
}
