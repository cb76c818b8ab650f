use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur when asking a language model to interpret a query
#[derive(Debug, Error)]
pub enum ModelError {
    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("API returned error: {0}")]
    ApiError(String),

    #[error("Unauthorized: invalid API key")]
    Unauthorized,

    #[error("Model returned an empty completion")]
    EmptyResponse,

    #[error("Invalid response format: {0}")]
    InvalidResponse(String),

    #[error("Model output rejected: {0}")]
    SchemaViolation(String),

    #[error("Model call timed out after {0:?}")]
    Timeout(Duration),
}

impl From<serde_json::Error> for ModelError {
    fn from(error: serde_json::Error) -> Self {
        ModelError::InvalidResponse(error.to_string())
    }
}

/// A text-completion capability: an instruction plus a user message in,
/// one completion out
#[async_trait]
pub trait ModelClient: Send + Sync {
    async fn complete(&self, instruction: &str, prompt: &str) -> Result<String, ModelError>;
}

/// Client for OpenAI-compatible `/chat/completions` endpoints
///
/// Requests JSON-object output at temperature 0 so completions are as
/// repeatable as the provider allows.
pub struct ChatCompletionClient {
    base_url: String,
    api_key: String,
    model: String,
    client: Client,
}

impl ChatCompletionClient {
    pub const MAX_TOKENS: u32 = 512;

    /// Create a new chat-completion client
    pub fn new(
        base_url: String,
        api_key: String,
        model: String,
        timeout: Duration,
    ) -> Result<Self, ModelError> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            base_url,
            api_key,
            model,
            client,
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

#[async_trait]
impl ModelClient for ChatCompletionClient {
    async fn complete(&self, instruction: &str, prompt: &str) -> Result<String, ModelError> {
        let url = format!("{}/chat/completions", self.base_url.trim_end_matches('/'));

        let body = json!({
            "model": self.model,
            "messages": [
                { "role": "system", "content": instruction },
                { "role": "user", "content": prompt },
            ],
            "response_format": { "type": "json_object" },
            "temperature": 0.0,
            "max_tokens": Self::MAX_TOKENS,
        });

        tracing::debug!("Requesting completion from: {}", url);

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if status == reqwest::StatusCode::UNAUTHORIZED {
            return Err(ModelError::Unauthorized);
        }
        if !status.is_success() {
            return Err(ModelError::ApiError(format!(
                "Completion request failed: {}",
                status
            )));
        }

        let json: Value = response.json().await?;

        let content = json
            .pointer("/choices/0/message/content")
            .and_then(Value::as_str)
            .ok_or_else(|| ModelError::InvalidResponse("Missing choices[0].message.content".into()))?;

        if content.trim().is_empty() {
            return Err(ModelError::EmptyResponse);
        }

        Ok(content.to_string())
    }
}
