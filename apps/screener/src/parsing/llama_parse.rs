//! LlamaParse (LlamaCloud) client: upload, poll, fetch markdown.

use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{multipart, Client};
use serde::Deserialize;
use tokio::time::Instant;
use tracing::{debug, info};

use super::{DocumentParser, ParseError};

pub const BACKEND_NAME: &str = "llama_parse";
const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(1);

#[derive(Debug, Deserialize)]
struct JobStatus {
    id: String,
    status: String,
}

#[derive(Debug, Deserialize)]
struct MarkdownResult {
    #[serde(default)]
    markdown: String,
}

#[derive(Debug, Deserialize)]
struct LlamaError {
    detail: serde_json::Value,
}

#[derive(Clone)]
pub struct LlamaParseClient {
    client: Client,
    api_key: String,
    base_url: String,
    timeout: Duration,
    poll_interval: Duration,
}

impl LlamaParseClient {
    pub fn new(api_key: String, base_url: &str, timeout: Duration) -> Result<Self, ParseError> {
        Ok(Self {
            client: Client::builder()
                .timeout(Duration::from_secs(60))
                .build()?,
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout,
            poll_interval: DEFAULT_POLL_INTERVAL,
        })
    }

    #[cfg(test)]
    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }

    async fn upload(&self, path: &Path) -> Result<String, ParseError> {
        let bytes = tokio::fs::read(path).await?;
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("resume.pdf")
            .to_string();

        let part = multipart::Part::bytes(bytes)
            .file_name(file_name)
            .mime_str("application/pdf")?;
        let form = multipart::Form::new().part("file", part);

        let response = self
            .client
            .post(format!("{}/api/parsing/upload", self.base_url))
            .bearer_auth(&self.api_key)
            .multipart(form)
            .send()
            .await?;

        let job: JobStatus = read_json(response).await?;
        debug!(job_id = %job.id, status = %job.status, "LlamaParse job created");
        Ok(job.id)
    }

    async fn wait_for_job(&self, job_id: &str) -> Result<(), ParseError> {
        let deadline = Instant::now() + self.timeout;

        loop {
            let response = self
                .client
                .get(format!("{}/api/parsing/job/{job_id}", self.base_url))
                .bearer_auth(&self.api_key)
                .send()
                .await?;
            let job: JobStatus = read_json(response).await?;

            match job.status.as_str() {
                "SUCCESS" | "PARTIAL_SUCCESS" => return Ok(()),
                "PENDING" => {}
                other => {
                    return Err(ParseError::JobFailed {
                        job_id: job_id.to_string(),
                        status: other.to_string(),
                    })
                }
            }

            if Instant::now() + self.poll_interval > deadline {
                return Err(ParseError::Timeout {
                    job_id: job_id.to_string(),
                    secs: self.timeout.as_secs(),
                });
            }
            tokio::time::sleep(self.poll_interval).await;
        }
    }

    async fn fetch_markdown(&self, job_id: &str) -> Result<String, ParseError> {
        let response = self
            .client
            .get(format!(
                "{}/api/parsing/job/{job_id}/result/markdown",
                self.base_url
            ))
            .bearer_auth(&self.api_key)
            .send()
            .await?;
        let result: MarkdownResult = read_json(response).await?;
        if result.markdown.trim().is_empty() {
            return Err(ParseError::EmptyText);
        }
        Ok(result.markdown)
    }
}

#[async_trait]
impl DocumentParser for LlamaParseClient {
    fn name(&self) -> &'static str {
        BACKEND_NAME
    }

    async fn parse(&self, path: &Path) -> Result<String, ParseError> {
        let job_id = self.upload(path).await?;
        self.wait_for_job(&job_id).await?;
        let markdown = self.fetch_markdown(&job_id).await?;
        info!(job_id = %job_id, chars = markdown.len(), "LlamaParse job finished");
        Ok(markdown)
    }
}

/// Decodes a 2xx JSON body, or turns an error response into `ParseError::Api`.
async fn read_json<T: serde::de::DeserializeOwned>(
    response: reqwest::Response,
) -> Result<T, ParseError> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<LlamaError>(&body)
            .map(|e| match e.detail {
                serde_json::Value::String(s) => s,
                other => other.to_string(),
            })
            .unwrap_or(body);
        return Err(ParseError::Api {
            status: status.as_u16(),
            message,
        });
    }
    Ok(response.json().await?)
}
