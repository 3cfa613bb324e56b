//! Screening form intake: multipart decoding, PDF validation and the temp file.

use std::io::Write;

use axum::extract::multipart::{Multipart, MultipartError, MultipartRejection};
use axum::http::StatusCode;
use bytes::Bytes;
use tempfile::NamedTempFile;
use tracing::debug;

use crate::errors::AppError;

pub const RESUME_FIELD: &str = "resume";
pub const JD_FIELD: &str = "jd_text";
const PDF_MAGIC: &[u8] = b"%PDF-";

/// One submitted screening form.
#[derive(Debug, Clone)]
pub struct ResumeUpload {
    pub file_name: String,
    pub bytes: Bytes,
    pub jd_text: String,
}

/// Maps the extractor rejection (wrong content type, missing boundary) to a validation error.
pub fn accept_multipart(
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Multipart, AppError> {
    multipart.map_err(|e| {
        AppError::Validation(format!(
            "Expected a multipart/form-data upload: {}",
            e.body_text()
        ))
    })
}

fn field_error(e: MultipartError) -> AppError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge("The uploaded file is too large".to_string())
    } else {
        AppError::Validation(format!("Invalid form data: {}", e.body_text()))
    }
}

/// Reads the `resume` file and `jd_text` fields and validates both.
pub async fn read_screening_form(mut multipart: Multipart) -> Result<ResumeUpload, AppError> {
    let mut file: Option<(String, Option<String>, Bytes)> = None;
    let mut jd_text = String::new();

    while let Some(field) = multipart.next_field().await.map_err(field_error)? {
        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some(RESUME_FIELD) => {
                let file_name = field.file_name().unwrap_or_default().to_string();
                let content_type = field.content_type().map(str::to_string);
                let data = field.bytes().await.map_err(field_error)?;
                // Browsers send an empty part when no file was chosen.
                if !(file_name.is_empty() && data.is_empty()) {
                    file = Some((file_name, content_type, data));
                }
            }
            Some(JD_FIELD) => {
                jd_text = field.text().await.map_err(field_error)?;
            }
            other => debug!("Ignoring unexpected form field {other:?}"),
        }
    }

    let (file_name, content_type, bytes) = file.ok_or_else(|| {
        AppError::Validation("Please upload a resume (PDF)".to_string())
    })?;
    validate_pdf(&file_name, content_type.as_deref(), &bytes)?;

    if jd_text.trim().is_empty() {
        return Err(AppError::Validation(
            "Please paste a job description".to_string(),
        ));
    }

    Ok(ResumeUpload {
        file_name: if file_name.is_empty() {
            "resume.pdf".to_string()
        } else {
            file_name
        },
        bytes,
        jd_text,
    })
}

/// Accepts a `.pdf` name or `application/pdf` type, and requires the PDF magic bytes.
pub fn validate_pdf(
    file_name: &str,
    content_type: Option<&str>,
    bytes: &[u8],
) -> Result<(), AppError> {
    if bytes.is_empty() {
        return Err(AppError::Validation("The uploaded file is empty".to_string()));
    }

    let named_pdf = file_name.to_ascii_lowercase().ends_with(".pdf");
    let typed_pdf = content_type.is_some_and(|ct| ct.eq_ignore_ascii_case("application/pdf"));
    if !(named_pdf || typed_pdf) || !bytes.starts_with(PDF_MAGIC) {
        return Err(AppError::UnsupportedMedia(
            "Only PDF resumes are supported".to_string(),
        ));
    }
    Ok(())
}

/// Writes the upload to a temp file that is deleted when the handle drops.
pub fn write_temp_pdf(bytes: &[u8]) -> Result<NamedTempFile, AppError> {
    let mut file = tempfile::Builder::new()
        .prefix("resume_")
        .suffix(".pdf")
        .tempfile()
        .map_err(|e| AppError::Internal(anyhow::anyhow!("creating temp file: {e}")))?;
    file.write_all(bytes)
        .and_then(|_| file.flush())
        .map_err(|e| AppError::Internal(anyhow::anyhow!("writing temp file: {e}")))?;
    debug!("Resume written to {}", file.path().display());
    Ok(file)
}
