use async_trait::async_trait;
use log::{debug, error};
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::app_config::ProviderConfig;
use crate::errors::ProviderError;
use crate::providers::TextCompletion;

/// System message sent with every extraction prompt
pub const SYSTEM_PROMPT: &str = "You are an expert translator of materials science literature. \
     Identify technical terms precisely and answer with JSON only.";

/// Client for OpenAI-compatible chat completion endpoints
#[derive(Debug, Clone)]
pub struct OpenAICompatible {
    /// HTTP client for API requests
    client: Client,
    /// Fully resolved chat completions URL
    endpoint: String,
    /// API key for bearer authentication
    api_key: String,
    /// Model name
    model: String,
    /// Temperature for generation
    temperature: f32,
}

/// Chat message format
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChatMessage {
    /// Role of the message sender (system, user, assistant)
    pub role: String,
    /// Content of the message
    pub content: String,
}

impl ChatMessage {
    fn new(role: &str, content: impl Into<String>) -> Self {
        Self {
            role: role.to_string(),
            content: content.into(),
        }
    }
}

/// Chat completion request
#[derive(Debug, Serialize)]
pub struct ChatCompletionRequest {
    /// The model to use
    model: String,
    /// The messages for the conversation
    messages: Vec<ChatMessage>,
    /// Temperature for generation
    temperature: f32,
}

/// Chat completion response
#[derive(Debug, Deserialize)]
pub struct ChatCompletionResponse {
    /// Generated alternatives
    #[serde(default)]
    pub choices: Vec<ChatChoice>,
}

/// One generated alternative
#[derive(Debug, Deserialize)]
pub struct ChatChoice {
    /// Generated message
    pub message: ChatMessage,
}

/// Join base URL, API version and the chat completions path
pub fn chat_completions_url(base_url: &str, api_version: &str) -> String {
    let base = base_url.trim_end_matches('/');
    let version = api_version.trim_matches('/');
    if version.is_empty() {
        format!("{}/chat/completions", base)
    } else {
        format!("{}/{}/chat/completions", base, version)
    }
}

/// Map a non-success HTTP status to a provider error
pub fn status_error(status: StatusCode, body: String) -> ProviderError {
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => ProviderError::AuthenticationError(body),
        StatusCode::TOO_MANY_REQUESTS => ProviderError::RateLimitExceeded(body),
        _ => ProviderError::ApiError {
            status_code: status.as_u16(),
            message: body,
        },
    }
}

impl OpenAICompatible {
    /// Create a new client
    pub fn new(
        base_url: &str,
        api_version: &str,
        api_key: impl Into<String>,
        model: impl Into<String>,
        temperature: f32,
        timeout: Duration,
    ) -> Self {
        Self {
            client: Client::builder().timeout(timeout).build().unwrap_or_default(),
            endpoint: chat_completions_url(base_url, api_version),
            api_key: api_key.into(),
            model: model.into(),
            temperature,
        }
    }

    /// Create a client from the provider section of the configuration
    pub fn from_config(config: &ProviderConfig) -> Self {
        Self::new(
            &config.base_url,
            &config.api_version,
            config.api_key.clone(),
            config.model.clone(),
            config.temperature,
            Duration::from_secs(config.timeout_secs),
        )
    }

    /// Replace the HTTP client, e.g. to change proxy or TLS settings
    pub fn with_http_client(mut self, client: Client) -> Self {
        self.client = client;
        self
    }

    /// Resolved endpoint URL
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn build_request(&self, prompt: &str) -> ChatCompletionRequest {
        ChatCompletionRequest {
            model: self.model.clone(),
            messages: vec![ChatMessage::new("system", SYSTEM_PROMPT), ChatMessage::new("user", prompt)],
            temperature: self.temperature,
        }
    }

    /// Extract text from a chat completion response
    pub fn extract_text(response: &ChatCompletionResponse) -> Result<String, ProviderError> {
        response
            .choices
            .first()
            .map(|choice| choice.message.content.clone())
            .ok_or_else(|| ProviderError::ParseError("Response contains no choices".to_string()))
    }
}

#[async_trait]
impl TextCompletion for OpenAICompatible {
    async fn complete(&self, prompt: &str) -> Result<String, ProviderError> {
        debug!("Sending chat completion request to {} ({})", self.endpoint, self.model);

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&self.build_request(prompt))
            .send()
            .await
            .map_err(|e| ProviderError::ConnectionError(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to get error response text".to_string());
            error!("Chat completion API error ({}): {}", status, error_text);
            return Err(status_error(status, error_text));
        }

        let body = response
            .json::<ChatCompletionResponse>()
            .await
            .map_err(|e| ProviderError::ParseError(e.to_string()))?;

        Self::extract_text(&body)
    }

    fn name(&self) -> &str {
        "openai-compatible"
    }
}
