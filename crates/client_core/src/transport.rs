//! Transport adapter for the four backend operations.
//!
//! Every failure mode (connect error, non-2xx status, malformed body) is
//! normalized into the single [`TransportError`] shape so the session
//! controller never distinguishes failure causes at this layer.

use async_trait::async_trait;
use reqwest::Client;
use shared::{
    error::ErrorBody,
    protocol::{
        ChatRefineRequest, LikeSowRequest, LikeSowResponse, SowDocumentResponse, CHAT_PATH,
        GENERATE_SOW_PATH, LIKE_SOW_PATH, RENDERED_SOW_PATH,
    },
};
use thiserror::Error;
use tracing::debug;
use url::Url;

use crate::form::SowForm;

/// Uniform failure shape for all backend operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct TransportError {
    pub message: String,
}

impl TransportError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        Self::new(err.to_string())
    }
}

/// The four backend operations the session controller depends on.
///
/// `refine` returns a full replacement document, not a diff; callers must
/// treat the response as authoritative. Preconditions (non-empty objectives,
/// single in-flight request) are enforced by the caller, not re-validated
/// here.
#[async_trait]
pub trait SowBackend: Send + Sync {
    async fn generate(&self, form: &SowForm) -> Result<SowDocumentResponse, TransportError>;

    async fn refine(
        &self,
        message: &str,
        current_content: &str,
    ) -> Result<SowDocumentResponse, TransportError>;

    async fn like(&self, content: &str) -> Result<(), TransportError>;

    /// Retrieves the backend's most recently rendered artifact from its
    /// fixed, non-parameterized location. This may lag the content displayed
    /// client-side when a newer generate/refine is in flight or failed.
    async fn fetch_rendered_document(&self) -> Result<Vec<u8>, TransportError>;
}

/// Null backend used before a real one is wired up.
pub struct MissingSowBackend;

#[async_trait]
impl SowBackend for MissingSowBackend {
    async fn generate(&self, _form: &SowForm) -> Result<SowDocumentResponse, TransportError> {
        Err(TransportError::new("SOW backend unavailable"))
    }

    async fn refine(
        &self,
        _message: &str,
        _current_content: &str,
    ) -> Result<SowDocumentResponse, TransportError> {
        Err(TransportError::new("SOW backend unavailable"))
    }

    async fn like(&self, _content: &str) -> Result<(), TransportError> {
        Err(TransportError::new("SOW backend unavailable"))
    }

    async fn fetch_rendered_document(&self) -> Result<Vec<u8>, TransportError> {
        Err(TransportError::new("SOW backend unavailable"))
    }
}

/// HTTP implementation of [`SowBackend`] against the generation service.
pub struct HttpSowBackend {
    http: Client,
    server_url: String,
}

impl HttpSowBackend {
    pub fn new(server_url: impl Into<String>) -> Result<Self, TransportError> {
        let server_url = server_url.into();
        let parsed = Url::parse(&server_url)
            .map_err(|err| TransportError::new(format!("invalid server url '{server_url}': {err}")))?;
        match parsed.scheme() {
            "http" | "https" => {}
            other => {
                return Err(TransportError::new(format!(
                    "unsupported server url scheme '{other}'; expected http or https"
                )))
            }
        }
        Ok(Self {
            http: Client::new(),
            server_url: server_url.trim_end_matches('/').to_string(),
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{path}", self.server_url)
    }
}

/// Maps a non-2xx response to a `TransportError`, preferring the backend's
/// own `{"status": "error", "message": ...}` body over the status line.
async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, TransportError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ErrorBody>(&body)
        .map(|body| body.message)
        .unwrap_or_else(|_| format!("backend returned {status}"));
    Err(TransportError::new(message))
}

#[async_trait]
impl SowBackend for HttpSowBackend {
    async fn generate(&self, form: &SowForm) -> Result<SowDocumentResponse, TransportError> {
        debug!("transport: posting generate request");
        let response = self
            .http
            .post(self.endpoint(GENERATE_SOW_PATH))
            .json(form)
            .send()
            .await?;
        let document: SowDocumentResponse = check_status(response).await?.json().await?;
        Ok(document)
    }

    async fn refine(
        &self,
        message: &str,
        current_content: &str,
    ) -> Result<SowDocumentResponse, TransportError> {
        debug!("transport: posting chat-refine request");
        let response = self
            .http
            .post(self.endpoint(CHAT_PATH))
            .json(&ChatRefineRequest {
                message: message.to_string(),
                context: current_content.to_string(),
            })
            .send()
            .await?;
        let document: SowDocumentResponse = check_status(response).await?.json().await?;
        Ok(document)
    }

    async fn like(&self, content: &str) -> Result<(), TransportError> {
        debug!("transport: posting like request");
        let response = self
            .http
            .post(self.endpoint(LIKE_SOW_PATH))
            .json(&LikeSowRequest {
                content: content.to_string(),
            })
            .send()
            .await?;
        let _ack: LikeSowResponse = check_status(response).await?.json().await?;
        Ok(())
    }

    async fn fetch_rendered_document(&self) -> Result<Vec<u8>, TransportError> {
        debug!("transport: fetching rendered document");
        let response = self.http.get(self.endpoint(RENDERED_SOW_PATH)).send().await?;
        let bytes = check_status(response).await?.bytes().await?;
        Ok(bytes.to_vec())
    }
}

#[cfg(test)]
#[path = "tests/transport_tests.rs"]
mod tests;
