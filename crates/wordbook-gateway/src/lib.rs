use std::path::PathBuf;
use std::sync::Arc;

use wordbook_io::{Download, DownloadSink};

pub mod direct;
pub mod relay;
pub mod request;

pub use direct::DirectGateway;
pub use relay::{RelayGateway, RelayRequest, run_relay};
pub use request::{ChatMessage, CompletionRequest, ResponseFormat};

/// Content returned when the response has no `choices[0].message.content`
pub const EMPTY_COMPLETION: &str = "{}";

/// Boundary issuing the one external completion request
#[async_trait::async_trait]
pub trait CompletionGateway: Send + Sync {
    /// Send `request` and return the assistant message content
    async fn complete(
        &self,
        request: &CompletionRequest,
        credential: &str,
    ) -> Result<String, GatewayError>;

    /// Backend name for logs
    fn name(&self) -> &'static str;
}

/// Save-as capability, local or relayed
#[async_trait::async_trait]
pub trait Downloader: Send + Sync {
    async fn download(&self, download: Download) -> Result<PathBuf, GatewayError>;
}

/// Calls the host download sink in-process
pub struct LocalDownloader {
    sink: Arc<dyn DownloadSink>,
}

impl LocalDownloader {
    pub fn new(sink: Arc<dyn DownloadSink>) -> Self {
        Self { sink }
    }
}

#[async_trait::async_trait]
impl Downloader for LocalDownloader {
    async fn download(&self, download: Download) -> Result<PathBuf, GatewayError> {
        let sink = self.sink.clone();
        tokio::task::spawn_blocking(move || sink.save(&download))
            .await
            .map_err(|e| GatewayError::Download(e.to_string()))?
            .map_err(|e| GatewayError::Download(e.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GatewayError {
    #[error("Add your OpenAI API key before translating")]
    MissingCredential,

    #[error("HTTP {status}: {status_text}")]
    Http { status: u16, status_text: String },

    #[error("Network error: {0}")]
    Network(String),

    #[error("Timeout")]
    Timeout,

    #[error("Invalid response body: {0}")]
    Decode(String),

    #[error("Download failed: {0}")]
    Download(String),

    #[error("Relay is not running")]
    RelayClosed,
}

/// Absent, blank and template placeholder keys all count as missing
pub fn check_credential(credential: &str) -> Result<&str, GatewayError> {
    let credential = credential.trim();
    if credential.is_empty() || credential.contains("REPLACE") {
        return Err(GatewayError::MissingCredential);
    }
    Ok(credential)
}

/// Pull `choices[0].message.content` out of a completion response body
pub fn completion_content(body: &serde_json::Value) -> String {
    body.pointer("/choices/0/message/content")
        .and_then(|c| c.as_str())
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .unwrap_or(EMPTY_COMPLETION)
        .to_string()
}
