pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::analysis::handlers;
use crate::state::AppState;
use crate::ui;

/// Headroom on top of the file limit for the JD text and multipart framing.
const FORM_OVERHEAD_BYTES: usize = 256 * 1024;

pub fn build_router(state: AppState) -> Router {
    let body_limit = state.config.max_upload_bytes.saturating_add(FORM_OVERHEAD_BYTES);

    Router::new()
        .route("/health", get(health::health_handler))
        // Browser UI
        .route("/", get(ui::handle_index))
        .route("/analyze", post(ui::handle_analyze_form))
        // JSON API
        .route("/api/v1/analyze", post(handlers::handle_analyze))
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parsing::{llama_parse, pdf_text};
    use crate::test_support::{
        gemini_reply, mock_gemini, multipart_body, test_state, StubParser, FAKE_PDF,
    };
    use axum::{
        body::Body,
        http::{Request, StatusCode},
        response::Response,
    };
    use serde_json::Value;
    use std::sync::Arc;
    use tower::ServiceExt;

    const BOUNDARY: &str = "route-test-boundary";
    const REPLY: &str = r#"{"match_score": 75, "matching_skills": ["Python", "ML"],
        "missing_skills": ["AWS"], "experience": 2, "suggestions": ["Add AWS certification"],
        "summary": "Strong technical skills but lacks cloud experience"}"#;

    fn form_request(uri: &str, parts: &[(&str, Option<&str>, &str, &[u8])]) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(
                "content-type",
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(multipart_body(BOUNDARY, parts)))
            .unwrap()
    }

    fn valid_form(uri: &str) -> Request<Body> {
        form_request(
            uri,
            &[
                ("resume", Some("jane.pdf"), "application/pdf", FAKE_PDF),
                ("jd_text", None, "text/plain", b"Data scientist, Python, AWS"),
            ],
        )
    }

    async fn body_text(response: Response) -> String {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    async fn router_with_reply(reply: &str) -> Router {
        let base = mock_gemini(gemini_reply(reply)).await;
        let fallback = Arc::new(StubParser::ok(pdf_text::BACKEND_NAME, "Jane Doe\nPython, ML"));
        build_router(test_state(&base, None, fallback))
    }

    #[tokio::test]
    async fn test_health() {
        let primary = Arc::new(StubParser::ok(llama_parse::BACKEND_NAME, "x"));
        let fallback = Arc::new(StubParser::ok(pdf_text::BACKEND_NAME, "x"));
        let app = build_router(test_state("http://127.0.0.1:9", Some(primary), fallback));

        let response = app
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body: Value = serde_json::from_str(&body_text(response).await).unwrap();
        assert_eq!(body["status"], "ok");
        assert_eq!(body["parsers"][0], "llama_parse");
        assert_eq!(body["parsers"][1], "pdf_extract");
    }

    #[tokio::test]
    async fn test_index_serves_form() {
        let app = router_with_reply(REPLY).await;

        let response = app
            .oneshot(Request::get("/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let html = body_text(response).await;
        assert!(html.contains("<form method=\"post\" action=\"/analyze\""));
    }

    #[tokio::test]
    async fn test_api_analyze_returns_report() {
        let app = router_with_reply(REPLY).await;

        let response = app.oneshot(valid_form("/api/v1/analyze")).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body: Value = serde_json::from_str(&body_text(response).await).unwrap();
        assert_eq!(body["parser_backend"], "pdf_extract");
        assert_eq!(body["normalization"], "strict_json");
        assert_eq!(body["analysis"]["match_score"], 75);
        assert_eq!(body["analysis"]["missing_skills"][0], "AWS");
        assert!(body["request_id"].as_str().is_some());
    }

    #[tokio::test]
    async fn test_api_analyze_rejects_non_multipart() {
        let app = router_with_reply(REPLY).await;

        let response = app
            .oneshot(
                Request::post("/api/v1/analyze")
                    .header("content-type", "application/json")
                    .body(Body::from("{}"))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body: Value = serde_json::from_str(&body_text(response).await).unwrap();
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_api_analyze_rejects_non_pdf() {
        let app = router_with_reply(REPLY).await;

        let response = app
            .oneshot(form_request(
                "/api/v1/analyze",
                &[
                    ("resume", Some("notes.txt"), "text/plain", b"hello"),
                    ("jd_text", None, "text/plain", b"Rust"),
                ],
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
    }

    #[tokio::test]
    async fn test_api_analyze_rejects_oversized_upload() {
        let app = router_with_reply(REPLY).await;
        let mut big = FAKE_PDF.to_vec();
        big.resize(3 * 1024 * 1024, b' ');

        let response = app
            .oneshot(form_request(
                "/api/v1/analyze",
                &[
                    ("resume", Some("big.pdf"), "application/pdf", &big[..]),
                    ("jd_text", None, "text/plain", b"Rust"),
                ],
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    }

    #[tokio::test]
    async fn test_ui_analyze_renders_results() {
        let app = router_with_reply(REPLY).await;

        let response = app.oneshot(valid_form("/analyze")).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let html = body_text(response).await;
        assert!(html.contains("Analysis Results"));
        assert!(html.contains("75%"));
        assert!(html.contains("- AWS"));
        assert!(html.contains("Strong technical skills but lacks cloud experience"));
        assert!(html.contains("Data scientist, Python, AWS</textarea>"));
    }

    #[tokio::test]
    async fn test_ui_analyze_shows_inline_error_for_missing_jd() {
        let app = router_with_reply(REPLY).await;

        let response = app
            .oneshot(form_request(
                "/analyze",
                &[("resume", Some("jane.pdf"), "application/pdf", FAKE_PDF)],
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let html = body_text(response).await;
        assert!(html.contains("alert error"));
        assert!(html.contains("Please paste a job description"));
        assert!(!html.contains("Analysis Results"));
    }

    #[tokio::test]
    async fn test_ui_analyze_uses_regex_fallback_for_malformed_reply() {
        let app = router_with_reply(
            "Result: \"match_score\": 42, \"missing_skills\": [\"Go\", \"gRPC\"], \"summary\": \"Partial\"",
        )
        .await;

        let response = app.oneshot(valid_form("/analyze")).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let html = body_text(response).await;
        assert!(html.contains("42%"));
        assert!(html.contains("- gRPC"));
        assert!(html.contains("Partial"));
    }
}
