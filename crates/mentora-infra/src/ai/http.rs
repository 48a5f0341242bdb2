//! HTTP AI provider - OpenAI-compatible chat completions client.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};

use mentora_core::ports::{AiError, AiProvider, AiRequest, AiResponse};

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// Configuration for the outbound AI provider client.
#[derive(Debug, Clone)]
pub struct AiConfig {
    pub api_key: String,
    pub base_url: String,
    pub model: String,
    /// Whole-request timeout. Every outbound call is bounded by this.
    pub timeout: Duration,
}

impl AiConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            model: "gpt-4o-mini".to_string(),
            timeout: Duration::from_secs(60),
        }
    }
}

/// Chat-completions client over `reqwest`.
///
/// One call per gateway request, no internal retries. Retry policy, if any,
/// belongs to the provider side of the contract.
pub struct HttpAiProvider {
    client: reqwest::Client,
    config: AiConfig,
}

impl HttpAiProvider {
    pub fn new(config: AiConfig) -> Result<Self, AiError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| AiError::Http(e.to_string()))?;
        Ok(Self { client, config })
    }

    fn chat_url(&self) -> String {
        format!(
            "{}/chat/completions",
            self.config.base_url.trim_end_matches('/')
        )
    }
}

#[derive(Serialize)]
struct ChatRequestBody<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponseBody {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

/// Pull the first non-empty completion out of a parsed response body.
fn extract_content(body: ChatResponseBody) -> Result<String, AiError> {
    body.choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .filter(|content| !content.trim().is_empty())
        .ok_or_else(|| AiError::Malformed("no completion choices".to_string()))
}

#[async_trait]
impl AiProvider for HttpAiProvider {
    async fn complete(&self, request: AiRequest) -> Result<AiResponse, AiError> {
        let mut messages = Vec::with_capacity(2);
        if let Some(system) = request.system.as_deref() {
            messages.push(ChatMessage {
                role: "system",
                content: system,
            });
        }
        messages.push(ChatMessage {
            role: "user",
            content: &request.prompt,
        });

        let body = ChatRequestBody {
            model: &self.config.model,
            messages,
            max_tokens: request.max_tokens,
        };

        let response = self
            .client
            .post(self.chat_url())
            .bearer_auth(&self.config.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    AiError::Timeout
                } else {
                    AiError::Http(e.to_string())
                }
            })?;

        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(AiError::QuotaExceeded);
        }
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            tracing::warn!(%status, %detail, "AI provider returned an error status");
            return Err(AiError::Http(format!("unexpected status {status}")));
        }

        let parsed: ChatResponseBody = response
            .json()
            .await
            .map_err(|e| AiError::Malformed(e.to_string()))?;

        let content = extract_content(parsed)?;
        Ok(AiResponse { content })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_first_choice_content() {
        let body: ChatResponseBody = serde_json::from_str(
            r#"{"choices":[{"message":{"role":"assistant","content":"hello"}}]}"#,
        )
        .unwrap();
        assert_eq!(extract_content(body).unwrap(), "hello");
    }

    #[test]
    fn empty_choices_is_malformed() {
        let body: ChatResponseBody = serde_json::from_str(r#"{"choices":[]}"#).unwrap();
        assert!(matches!(extract_content(body), Err(AiError::Malformed(_))));
    }

    #[test]
    fn blank_content_is_malformed() {
        let body: ChatResponseBody =
            serde_json::from_str(r#"{"choices":[{"message":{"content":"  "}}]}"#).unwrap();
        assert!(matches!(extract_content(body), Err(AiError::Malformed(_))));
    }

    #[test]
    fn chat_url_tolerates_trailing_slash() {
        let mut config = AiConfig::new("k");
        config.base_url = "https://example.test/v1/".to_string();
        let provider = HttpAiProvider::new(config).unwrap();
        assert_eq!(provider.chat_url(), "https://example.test/v1/chat/completions");
    }
}
