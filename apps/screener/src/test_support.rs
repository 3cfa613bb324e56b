//! Helpers shared by the unit tests: in-process mock servers and fixtures.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::Router;

use crate::config::Config;
use crate::llm_client::LlmClient;
use crate::parsing::{DocumentParser, ParseError};
use crate::state::AppState;

/// Serves `router` on an ephemeral localhost port and returns its base URL.
pub async fn spawn_mock_server(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{addr}")
}

/// Smallest byte string that passes the PDF magic-number check.
pub const FAKE_PDF: &[u8] = b"%PDF-1.4\n%\xe2\xe3\xcf\xd3\n1 0 obj\n<<>>\nendobj\ntrailer\n<<>>\n%%EOF\n";

/// Builds a `multipart/form-data` body by hand. Each part is
/// `(field name, optional file name, content type, bytes)`.
pub fn multipart_body(
    boundary: &str,
    parts: &[(&str, Option<&str>, &str, &[u8])],
) -> Vec<u8> {
    let mut body = Vec::new();
    for (name, file_name, content_type, data) in parts {
        body.extend_from_slice(format!("--{boundary}\r\n").as_bytes());
        match file_name {
            Some(file_name) => body.extend_from_slice(
                format!(
                    "Content-Disposition: form-data; name=\"{name}\"; filename=\"{file_name}\"\r\n"
                )
                .as_bytes(),
            ),
            None => body.extend_from_slice(
                format!("Content-Disposition: form-data; name=\"{name}\"\r\n").as_bytes(),
            ),
        }
        body.extend_from_slice(format!("Content-Type: {content_type}\r\n\r\n").as_bytes());
        body.extend_from_slice(data);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{boundary}--\r\n").as_bytes());
    body
}

/// Gemini `generateContent` body whose single candidate says `text`.
pub fn gemini_reply(text: &str) -> serde_json::Value {
    serde_json::json!({
        "candidates": [{"content": {"parts": [{"text": text}], "role": "model"}, "finishReason": "STOP"}],
        "usageMetadata": {"promptTokenCount": 100, "candidatesTokenCount": 20}
    })
}

/// Mock Gemini endpoint that answers every call with `reply`.
pub async fn mock_gemini(reply: serde_json::Value) -> String {
    let router = Router::new().route(
        "/v1beta/models/:call",
        axum::routing::post(move || {
            let reply = reply.clone();
            async move { axum::Json(reply) }
        }),
    );
    spawn_mock_server(router).await
}

/// Parser double that returns a fixed result and records what it was asked to parse.
pub struct StubParser {
    name: &'static str,
    result: Result<String, String>,
    calls: AtomicU32,
    last_path: Mutex<Option<PathBuf>>,
}

impl StubParser {
    pub fn ok(name: &'static str, text: &str) -> Self {
        Self::new(name, Ok(text.to_string()))
    }

    pub fn failing(name: &'static str, message: &str) -> Self {
        Self::new(name, Err(message.to_string()))
    }

    fn new(name: &'static str, result: Result<String, String>) -> Self {
        Self {
            name,
            result,
            calls: AtomicU32::new(0),
            last_path: Mutex::new(None),
        }
    }

    pub fn calls(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_path(&self) -> Option<PathBuf> {
        self.last_path.lock().unwrap().clone()
    }
}

#[async_trait]
impl DocumentParser for StubParser {
    fn name(&self) -> &'static str {
        self.name
    }

    async fn parse(&self, path: &Path) -> Result<String, ParseError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        assert!(path.exists() || path == Path::new("resume.pdf"));
        *self.last_path.lock().unwrap() = Some(path.to_path_buf());
        self.result.clone().map_err(ParseError::Pdf)
    }
}

/// App state wired to a mock Gemini base URL and the given parsers.
pub fn test_state(
    gemini_base: &str,
    parser: Option<Arc<dyn DocumentParser>>,
    fallback_parser: Arc<dyn DocumentParser>,
) -> AppState {
    let config = Config {
        gemini_api_key: "test-key".to_string(),
        gemini_api_base: gemini_base.to_string(),
        llama_cloud_api_key: None,
        llama_cloud_base_url: crate::config::DEFAULT_LLAMA_CLOUD_BASE_URL.to_string(),
        llama_parse_timeout_secs: 5,
        max_upload_bytes: 1024 * 1024,
        port: 0,
        rust_log: "debug".to_string(),
    };
    AppState {
        llm: LlmClient::new(config.gemini_api_key.clone(), gemini_base).unwrap(),
        parser,
        fallback_parser,
        config,
    }
}
