//! Screening pipeline shared by the JSON API and the HTML UI:
//! temp file → text extraction → model analysis → report.

use chrono::Utc;
use tracing::{info, info_span, warn, Instrument};
use uuid::Uuid;

use crate::analysis::analyzer::analyze_resume;
use crate::analysis::models::ScreeningReport;
use crate::errors::AppError;
use crate::parsing::extract_resume_text;
use crate::parsing::upload::{write_temp_pdf, ResumeUpload};
use crate::state::AppState;

pub async fn run_screening(
    state: &AppState,
    upload: ResumeUpload,
) -> Result<ScreeningReport, AppError> {
    let request_id = Uuid::new_v4();
    let span = info_span!("screening", %request_id);

    async move {
        info!(
            file = %upload.file_name,
            bytes = upload.bytes.len(),
            "Screening started"
        );

        // Dropping the handle deletes the file, including on every early return below.
        let temp_file = write_temp_pdf(&upload.bytes)?;
        let parsed = extract_resume_text(
            temp_file.path(),
            state.parser.as_deref(),
            state.fallback_parser.as_ref(),
        )
        .await
        .map_err(|e| AppError::Parse(e.to_string()))?;

        if let Err(e) = temp_file.close() {
            warn!("Failed to remove temp file: {e}");
        }

        let (analysis, normalization) =
            analyze_resume(&parsed.text, &upload.jd_text, &state.llm).await?;

        Ok(ScreeningReport {
            request_id,
            analyzed_at: Utc::now(),
            parser_backend: parsed.backend.to_string(),
            resume_chars: parsed.text.chars().count(),
            normalization,
            warnings: parsed.warnings,
            analysis,
        })
    }
    .instrument(span)
    .await
}
