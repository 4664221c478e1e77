//! `InferenceClient` for OpenAI-compatible `chat/completions` endpoints.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{debug, warn};

use warden_contracts::error::{CollaboratorError, WardenError, WardenResult};
use warden_core::traits::{CollaboratorResult, InferenceClient};

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Connection settings for [`OpenAiCompatClient`].
#[derive(Debug)]
pub struct OpenAiSettings {
    pub base_url: String,
    pub model: String,
    pub api_key: Option<SecretString>,
    pub timeout: Duration,
}

impl Default for OpenAiSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            api_key: None,
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl OpenAiSettings {
    /// Read the API key from the environment variable `var`, if set.
    pub fn with_api_key_from_env(mut self, var: &str) -> Self {
        self.api_key = std::env::var(var)
            .ok()
            .filter(|key| !key.trim().is_empty())
            .map(SecretString::from);
        self
    }
}

/// Calls `{base_url}/chat/completions` with `response_format = json_object`
/// and parses the first choice's message content as JSON.
pub struct OpenAiCompatClient {
    client: Client,
    settings: OpenAiSettings,
}

impl OpenAiCompatClient {
    pub fn new(settings: OpenAiSettings) -> WardenResult<Self> {
        let client = Client::builder()
            .timeout(settings.timeout)
            .build()
            .map_err(|e| WardenError::ConfigError {
                reason: format!("failed to build HTTP client: {e}"),
            })?;
        Ok(Self { client, settings })
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.settings.base_url.trim_end_matches('/'))
    }
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Deserialize)]
struct ChatMessage {
    #[serde(default)]
    content: Option<String>,
}

#[async_trait]
impl InferenceClient for OpenAiCompatClient {
    async fn complete_json(
        &self,
        system_instruction: &str,
        user_prompt: &str,
    ) -> CollaboratorResult<Value> {
        let body = json!({
            "model": self.settings.model,
            "response_format": { "type": "json_object" },
            "messages": [
                { "role": "system", "content": system_instruction },
                { "role": "user", "content": user_prompt }
            ]
        });

        let mut request = self.client.post(self.endpoint()).json(&body);
        if let Some(key) = &self.settings.api_key {
            request = request.bearer_auth(key.expose_secret());
        }

        debug!(model = %self.settings.model, endpoint = %self.endpoint(), "requesting completion");

        let response = request.send().await.map_err(|e| CollaboratorError::Network {
            reason: e.to_string(),
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(status = status.as_u16(), "inference endpoint returned an error status");
            return Err(CollaboratorError::Http {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: ChatResponse = response.json().await.map_err(|e| CollaboratorError::Decode {
            reason: e.to_string(),
        })?;

        let content = parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .unwrap_or_default();

        Ok(parse_content(&content))
    }
}

/// Parse message content as JSON, tolerating a markdown code fence.
///
/// Content that still does not parse becomes `Value::Null`, which the
/// normalizer turns into the invalid-plan fallback.
pub fn parse_content(content: &str) -> Value {
    let trimmed = content.trim();
    if let Ok(value) = serde_json::from_str(trimmed) {
        return value;
    }
    if let Some(inner) = strip_markdown_code_fence(trimmed) {
        if let Ok(value) = serde_json::from_str(inner.trim()) {
            return value;
        }
    }
    warn!(length = content.len(), "inference content is not JSON");
    Value::Null
}

fn strip_markdown_code_fence(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if !trimmed.starts_with("```") {
        return None;
    }

    let mut lines = trimmed.lines();
    lines.next()?;

    let mut body = lines.collect::<Vec<_>>();
    if body.last().map(|line| line.trim()) != Some("```") {
        return None;
    }
    body.pop();
    Some(body.join("\n"))
}
