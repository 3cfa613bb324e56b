//! Resume text extraction.
//!
//! A hosted parser (LlamaParse) is tried first when configured; the local
//! `pdf-extract` backend is the fallback. `AppState` holds both as
//! `Arc<dyn DocumentParser>` so tests can swap either side.

use std::path::Path;

use async_trait::async_trait;
use thiserror::Error;
use tracing::{info, warn};

pub mod llama_parse;
pub mod pdf_text;
pub mod upload;

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("parse job {job_id} ended with status {status}")]
    JobFailed { job_id: String, status: String },

    #[error("parse job {job_id} did not finish within {secs}s")]
    Timeout { job_id: String, secs: u64 },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("PDF extraction failed: {0}")]
    Pdf(String),

    #[error("no text could be extracted from the document")]
    EmptyText,
}

/// A backend that turns a document on disk into plain text (or markdown).
#[async_trait]
pub trait DocumentParser: Send + Sync {
    /// Stable identifier reported in `ScreeningReport::parser_backend`.
    fn name(&self) -> &'static str;

    async fn parse(&self, path: &Path) -> Result<String, ParseError>;
}

/// Extracted resume text plus how it was obtained.
#[derive(Debug, Clone)]
pub struct ParsedResume {
    pub text: String,
    pub backend: &'static str,
    pub warnings: Vec<String>,
}

/// Runs `primary` (if any) and falls back to `fallback` on failure or blank output.
///
/// A primary failure is not fatal: it becomes a warning on the result.
pub async fn extract_resume_text(
    path: &Path,
    primary: Option<&dyn DocumentParser>,
    fallback: &dyn DocumentParser,
) -> Result<ParsedResume, ParseError> {
    let mut warnings = Vec::new();

    if let Some(primary) = primary {
        match primary.parse(path).await {
            Ok(text) if !text.trim().is_empty() => {
                info!(backend = primary.name(), chars = text.len(), "Resume parsed");
                return Ok(ParsedResume {
                    text,
                    backend: primary.name(),
                    warnings,
                });
            }
            Ok(_) => {
                warn!(backend = primary.name(), "Primary parser returned no text");
                warnings.push(format!(
                    "{} returned no text. Using local PDF fallback.",
                    display_name(primary.name())
                ));
            }
            Err(e) => {
                warn!(backend = primary.name(), "Primary parser failed: {e}");
                warnings.push(format!(
                    "{} failed: {e}. Using local PDF fallback.",
                    display_name(primary.name())
                ));
            }
        }
    }

    let text = fallback.parse(path).await?;
    if text.trim().is_empty() {
        return Err(ParseError::EmptyText);
    }

    info!(backend = fallback.name(), chars = text.len(), "Resume parsed");
    Ok(ParsedResume {
        text,
        backend: fallback.name(),
        warnings,
    })
}

fn display_name(backend: &str) -> &str {
    match backend {
        llama_parse::BACKEND_NAME => "LlamaParse",
        pdf_text::BACKEND_NAME => "PDF extraction",
        other => other,
    }
}
