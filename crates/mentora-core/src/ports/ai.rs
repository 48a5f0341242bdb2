//! AI completion provider port.

use async_trait::async_trait;
use thiserror::Error;

/// A single completion request. Handlers perform at most one per request
/// and never retry; a failure surfaces to the client as a structured error.
#[derive(Debug, Clone)]
pub struct AiRequest {
    pub system: Option<String>,
    pub prompt: String,
    pub max_tokens: Option<u32>,
}

/// Generated content returned by the provider.
#[derive(Debug, Clone)]
pub struct AiResponse {
    pub content: String,
}

/// AI provider failure modes. All of these map to a client-visible
/// error response, never a crash.
#[derive(Debug, Error)]
pub enum AiError {
    #[error("AI provider timed out")]
    Timeout,

    #[error("AI provider quota exceeded")]
    QuotaExceeded,

    #[error("AI provider returned a malformed response: {0}")]
    Malformed(String),

    #[error("AI provider request failed: {0}")]
    Http(String),
}

/// External completion/generation service.
#[async_trait]
pub trait AiProvider: Send + Sync {
    async fn complete(&self, request: AiRequest) -> Result<AiResponse, AiError>;
}
