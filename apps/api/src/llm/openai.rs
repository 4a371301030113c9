//! OpenAI-compatible model adapter

use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};
use tracing::instrument;

use super::errors::{LlmError, LlmResult};
use super::messages::{ChatMessage, GenerationSettings};
use super::ModelAdapter;
use crate::config::LlmConfig;

/// Adapter for the `/completions` and `/chat/completions` endpoints
pub struct OpenAiAdapter {
    http_client: Client,
    base_url: String,
    api_key: Option<String>,
}

impl OpenAiAdapter {
    /// Create a new adapter with its own HTTP client
    pub fn new(config: &LlmConfig) -> LlmResult<Self> {
        let http_client = Client::builder().timeout(config.timeout).build()?;

        Ok(Self {
            http_client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
        })
    }

    async fn post(&self, path: &str, body: &Value) -> LlmResult<Value> {
        let api_key = self.api_key.as_deref().ok_or(LlmError::MissingCredential)?;
        let url = format!("{}{}", self.base_url, path);

        let response = self
            .http_client
            .post(&url)
            .bearer_auth(api_key)
            .json(body)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(LlmError::Provider { status, body });
        }

        response
            .json()
            .await
            .map_err(|e| LlmError::MalformedResponse(e.to_string()))
    }
}

#[async_trait]
impl ModelAdapter for OpenAiAdapter {
    #[instrument(skip(self, prompt), fields(model = %settings.model), level = "debug")]
    async fn complete(&self, prompt: &str, settings: &GenerationSettings) -> LlmResult<String> {
        let body = completion_body(prompt, settings);
        let response = self.post("/completions", &body).await?;
        parse_completion(&response)
    }

    #[instrument(skip(self, messages), fields(model = %settings.model), level = "debug")]
    async fn chat(
        &self,
        messages: &[ChatMessage],
        settings: &GenerationSettings,
    ) -> LlmResult<String> {
        let body = chat_body(messages, settings);
        let response = self.post("/chat/completions", &body).await?;
        parse_chat(&response)
    }
}

fn completion_body(prompt: &str, settings: &GenerationSettings) -> Value {
    json!({
        "model": settings.model,
        "prompt": prompt,
        "temperature": settings.temperature,
        "max_tokens": settings.max_tokens,
    })
}

fn chat_body(messages: &[ChatMessage], settings: &GenerationSettings) -> Value {
    json!({
        "model": settings.model,
        "messages": messages,
        "temperature": settings.temperature,
        "max_tokens": settings.max_tokens,
    })
}

fn parse_completion(response: &Value) -> LlmResult<String> {
    response["choices"][0]["text"]
        .as_str()
        .map(|text| text.trim().to_string())
        .ok_or_else(|| LlmError::MalformedResponse("missing choices[0].text".to_string()))
}

fn parse_chat(response: &Value) -> LlmResult<String> {
    response["choices"][0]["message"]["content"]
        .as_str()
        .map(|text| text.trim().to_string())
        .ok_or_else(|| {
            LlmError::MalformedResponse("missing choices[0].message.content".to_string())
        })
}
