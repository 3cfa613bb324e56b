//! One prompt-and-response round trip to the model.

use tracing::info;

use crate::analysis::models::{AnalysisResult, Normalization};
use crate::analysis::normalize::parse_model_response;
use crate::analysis::prompts::{build_analysis_prompt, ANALYSIS_SYSTEM};
use crate::errors::AppError;
use crate::llm_client::LlmClient;

/// Asks the model to compare a resume with a JD and normalizes its reply.
pub async fn analyze_resume(
    resume_text: &str,
    jd_text: &str,
    llm: &LlmClient,
) -> Result<(AnalysisResult, Normalization), AppError> {
    let prompt = build_analysis_prompt(resume_text, jd_text);
    let reply = llm
        .call_text(&prompt, ANALYSIS_SYSTEM)
        .await
        .map_err(|e| AppError::Llm(e.to_string()))?;

    let (result, normalization) = parse_model_response(&reply);
    info!(
        match_score = result.match_score,
        normalization = ?normalization,
        "Analysis complete"
    );
    Ok((result, normalization))
}
