//! Axum route handlers for the JSON screening API.

use axum::extract::multipart::{Multipart, MultipartRejection};
use axum::{extract::State, Json};

use crate::analysis::models::ScreeningReport;
use crate::analysis::pipeline::run_screening;
use crate::errors::AppError;
use crate::parsing::upload::{accept_multipart, read_screening_form};
use crate::state::AppState;

/// POST /api/v1/analyze
///
/// Multipart form with a `resume` PDF and a `jd_text` field.
/// Returns the full screening report as JSON.
pub async fn handle_analyze(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<ScreeningReport>, AppError> {
    let upload = read_screening_form(accept_multipart(multipart)?).await?;
    let report = run_screening(&state, upload).await?;
    Ok(Json(report))
}
