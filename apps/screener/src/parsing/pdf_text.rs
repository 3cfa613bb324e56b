use std::path::Path;

use async_trait::async_trait;
use tracing::debug;

use super::{DocumentParser, ParseError};

pub const BACKEND_NAME: &str = "pdf_extract";

/// Local text extraction via `pdf-extract`. Runs on the blocking pool.
pub struct PdfTextExtractor;

#[async_trait]
impl DocumentParser for PdfTextExtractor {
    fn name(&self) -> &'static str {
        BACKEND_NAME
    }

    async fn parse(&self, path: &Path) -> Result<String, ParseError> {
        let path = path.to_path_buf();
        debug!("Extracting text locally from {}", path.display());

        // pdf-extract can panic on malformed input; the join error turns that into a ParseError.
        let text = tokio::task::spawn_blocking(move || pdf_extract::extract_text(&path))
            .await
            .map_err(|e| ParseError::Pdf(format!("extraction task aborted: {e}")))?
            .map_err(|e| ParseError::Pdf(e.to_string()))?;

        if text.trim().is_empty() {
            return Err(ParseError::EmptyText);
        }
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[tokio::test]
    async fn test_missing_file_is_an_error() {
        let result = PdfTextExtractor
            .parse(Path::new("/nonexistent/definitely/missing.pdf"))
            .await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_non_pdf_bytes_are_an_error() {
        let mut file = tempfile::Builder::new().suffix(".pdf").tempfile().unwrap();
        file.write_all(b"this is not a pdf at all").unwrap();

        let result = PdfTextExtractor.parse(file.path()).await;
        assert!(result.is_err());
    }

    #[test]
    fn test_backend_name() {
        assert_eq!(PdfTextExtractor.name(), "pdf_extract");
    }
}
