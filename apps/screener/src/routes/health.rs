use axum::{extract::State, Json};
use serde_json::{json, Value};

use crate::state::AppState;

/// GET /health
/// Returns a simple status object with service version and the active parser chain.
pub async fn health_handler(State(state): State<AppState>) -> Json<Value> {
    let mut parsers: Vec<&str> = state.parser.iter().map(|p| p.name()).collect();
    parsers.push(state.fallback_parser.name());

    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "service": "resume-screener",
        "model": crate::llm_client::MODEL,
        "parsers": parsers,
    }))
}
