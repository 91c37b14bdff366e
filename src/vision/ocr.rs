//! OCR scan service clients
//!
//! The scan itself happens in an external service. This module only ships the
//! base64 payload there and hands the parsed response back.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Serialize;
use thiserror::Error;
use tokio::runtime::Runtime;
use tracing::{debug, info};

use super::ScanResponse;

/// Failure of a scan call. The display text is shown to the user as-is.
#[derive(Debug, Error)]
pub enum ScanError {
    #[error("{0}")]
    Request(String),
    #[error("{message}")]
    Rejected { status: u16, message: String },
    #[error("Invalid scan response: {0}")]
    InvalidResponse(String),
    #[error("Could not load scan fixture {path:?}: {reason}")]
    Fixture { path: PathBuf, reason: String },
}

/// Opaque remote procedure that classifies an image
pub trait Scanner: Send + Sync {
    /// Scan base64-encoded image bytes (no data-URL prefix)
    fn scan(&self, base64: &str) -> Result<ScanResponse, ScanError>;

    /// Short name used in logs
    fn name(&self) -> &str;
}

#[derive(Serialize)]
struct ScanRequest<'a> {
    base64: &'a str,
}

/// Scanner backed by an HTTP endpoint
pub struct HttpScanner {
    endpoint: String,
    client: reqwest::Client,
    runtime: Runtime,
}

impl HttpScanner {
    /// Create a scanner posting to `endpoint`
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self, ScanError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ScanError::Request(format!("Failed to create HTTP client: {}", e)))?;

        let runtime = Runtime::new()
            .map_err(|e| ScanError::Request(format!("Failed to create tokio runtime: {}", e)))?;

        Ok(Self {
            endpoint: endpoint.into(),
            client,
            runtime,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    async fn scan_async(&self, base64: &str) -> Result<ScanResponse, ScanError> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(&ScanRequest { base64 })
            .send()
            .await
            .map_err(|e| ScanError::Request(format!("Scan request failed: {}", e)))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ScanError::Request(format!("Failed to read scan response: {}", e)))?;

        if !status.is_success() {
            let message = error_message_from_body(&body)
                .unwrap_or_else(|| format!("Scan failed with status {}", status));
            return Err(ScanError::Rejected {
                status: status.as_u16(),
                message,
            });
        }

        serde_json::from_str(&body).map_err(|e| ScanError::InvalidResponse(e.to_string()))
    }
}

impl Scanner for HttpScanner {
    fn scan(&self, base64: &str) -> Result<ScanResponse, ScanError> {
        debug!("Posting {} base64 bytes to {}", base64.len(), self.endpoint);
        let response = self.runtime.block_on(self.scan_async(base64))?;
        debug!("{} answered with {} detections", self.endpoint, response.probabilities.len());
        Ok(response)
    }

    fn name(&self) -> &str {
        "http"
    }
}

/// Pull a human-readable message out of an error body.
///
/// Accepts `{"message": ..}`, `[{"message": ..}, ..]` or plain text.
fn error_message_from_body(body: &str) -> Option<String> {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return None;
    }

    match serde_json::from_str::<serde_json::Value>(trimmed) {
        Ok(serde_json::Value::Object(map)) => map
            .get("message")
            .and_then(|m| m.as_str())
            .map(str::to_string),
        Ok(serde_json::Value::Array(items)) => {
            let messages: Vec<&str> = items
                .iter()
                .filter_map(|item| item.get("message").and_then(|m| m.as_str()))
                .collect();
            if messages.is_empty() {
                None
            } else {
                Some(messages.join(", "))
            }
        }
        Ok(_) => None,
        Err(_) => Some(trimmed.to_string()),
    }
}

/// Scanner that replays a saved response, for offline use
pub struct FixtureScanner {
    response: ScanResponse,
}

impl FixtureScanner {
    pub fn new(response: ScanResponse) -> Self {
        Self { response }
    }

    /// Load a saved `{"probabilities": [...]}` document
    pub fn from_path(path: &Path) -> Result<Self, ScanError> {
        let fixture_error = |reason: String| ScanError::Fixture {
            path: path.to_path_buf(),
            reason,
        };

        let content = std::fs::read_to_string(path).map_err(|e| fixture_error(e.to_string()))?;
        let response: ScanResponse =
            serde_json::from_str(&content).map_err(|e| fixture_error(e.to_string()))?;

        info!(
            "Loaded scan fixture {:?} with {} detections",
            path,
            response.probabilities.len()
        );
        Ok(Self::new(response))
    }
}

impl Scanner for FixtureScanner {
    fn scan(&self, _base64: &str) -> Result<ScanResponse, ScanError> {
        Ok(self.response.clone())
    }

    fn name(&self) -> &str {
        "fixture"
    }
}
