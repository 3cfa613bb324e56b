//! Browser UI: the upload form and the rendered report.

pub mod render;

use axum::extract::multipart::{Multipart, MultipartRejection};
use axum::{extract::State, http::StatusCode, response::Html};
use tracing::warn;

use crate::analysis::pipeline::run_screening;
use crate::errors::AppError;
use crate::parsing::upload::{accept_multipart, read_screening_form};
use crate::state::AppState;
use render::PageView;

/// GET /
pub async fn handle_index() -> Html<String> {
    Html(render::page(&PageView::default()))
}

/// POST /analyze
///
/// Runs the screening pipeline for the submitted form. Failures never escape
/// as raw error pages; they are rendered inline above the form.
pub async fn handle_analyze_form(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> (StatusCode, Html<String>) {
    let mut view = PageView::default();

    let outcome = async {
        let upload = read_screening_form(accept_multipart(multipart)?).await?;
        view.jd_text = upload.jd_text.clone();
        run_screening(&state, upload).await
    }
    .await;

    match outcome {
        Ok(report) => {
            view.report = Some(report);
            (StatusCode::OK, Html(render::page(&view)))
        }
        Err(e) => {
            let status = e.status_code();
            (status, Html(render::page(&with_error(view, &e))))
        }
    }
}

fn with_error(mut view: PageView, error: &AppError) -> PageView {
    match error {
        AppError::Internal(e) => warn!("Screening failed: {e:?}"),
        other => warn!("Screening failed: {other}"),
    }
    view.error = Some(error.user_message());
    view
}

