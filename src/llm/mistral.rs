//! Mistral chat-completions client.

use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use reqwest::Client;
use serde_json::{json, Value};
use std::time::Duration;
use tracing::debug;

use crate::config::Config;
use crate::error::{ChatError, Result};
use crate::models::{Attachment, ChatTurn};

use super::{ChatModel, Completion, SYSTEM_PROMPT};

/// Client for an OpenAI-compatible `/chat/completions` endpoint.
///
/// No request timeout is set on the HTTP client itself; the deadline belongs
/// to the retry wrapper, which drops the in-flight request when it elapses.
pub struct MistralClient {
    client: Client,
    api_url: String,
    api_key: String,
    model: String,
    temperature: f32,
    max_tokens: u32,
}

impl std::fmt::Debug for MistralClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MistralClient")
            .field("api_url", &self.api_url)
            .field("api_key", &"[REDACTED]")
            .field("model", &self.model)
            .finish()
    }
}

impl MistralClient {
    pub fn new(api_url: &str, api_key: &str, model: &str) -> Result<Self> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| ChatError::Internal(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            api_url: api_url.to_string(),
            api_key: api_key.to_string(),
            model: model.to_string(),
            temperature: 0.7,
            max_tokens: 1000,
        })
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Ok(Self::new(
            &config.mistral_api_url,
            &config.mistral_api_key,
            &config.mistral_model,
        )?
        .with_sampling(config.temperature, config.max_tokens))
    }

    pub fn with_sampling(mut self, temperature: f32, max_tokens: u32) -> Self {
        self.temperature = temperature;
        self.max_tokens = max_tokens;
        self
    }

    /// Request body: system instruction first, then the conversation.
    pub fn build_body(&self, turns: &[ChatTurn]) -> Value {
        let mut messages = Vec::with_capacity(turns.len() + 1);
        messages.push(json!({ "role": "system", "content": SYSTEM_PROMPT }));
        messages.extend(
            turns
                .iter()
                .map(|t| json!({ "role": t.role.as_str(), "content": turn_content(t) })),
        );

        json!({
            "model": self.model,
            "messages": messages,
            "temperature": self.temperature,
            "max_tokens": self.max_tokens,
        })
    }

    /// Extracts `choices[0].message.content` and `usage.total_tokens`.
    pub fn parse_completion(body: &Value, model: &str) -> Result<Completion> {
        let content = body["choices"][0]["message"]["content"]
            .as_str()
            .ok_or_else(|| ChatError::Upstream {
                status: 200,
                message: "response carries no choices[0].message.content".to_string(),
            })?;

        Ok(Completion {
            content: content.to_string(),
            total_tokens: body["usage"]["total_tokens"].as_u64(),
            model: body["model"].as_str().unwrap_or(model).to_string(),
        })
    }

    /// Best human-readable message from an error body.
    fn error_message(body: &str) -> String {
        serde_json::from_str::<Value>(body)
            .ok()
            .and_then(|v| {
                v["message"]
                    .as_str()
                    .or_else(|| v["error"]["message"].as_str())
                    .or_else(|| v["detail"].as_str())
                    .map(String::from)
            })
            .unwrap_or_else(|| body.trim().to_string())
    }
}

/// Plain text, or content parts when the turn carries images or PDFs.
fn turn_content(turn: &ChatTurn) -> Value {
    let files: Vec<&Attachment> = turn
        .attachments
        .iter()
        .filter(|a| a.is_forwardable())
        .collect();
    if files.is_empty() {
        return json!(turn.content);
    }

    let mut parts = vec![json!({ "type": "text", "text": turn.content })];
    for file in files {
        let url = format!("data:{};base64,{}", file.mime_type, STANDARD.encode(&file.data));
        if file.is_pdf() {
            parts.push(json!({ "type": "document_url", "document_url": url }));
        } else {
            parts.push(json!({ "type": "image_url", "image_url": url }));
        }
        parts.push(json!({
            "type": "text",
            "text": format!("Analyse ce document/image: {}", file.name),
        }));
    }
    Value::Array(parts)
}

#[async_trait]
impl ChatModel for MistralClient {
    async fn complete(&self, turns: &[ChatTurn]) -> Result<Completion> {
        let body = self.build_body(turns);
        debug!("Mistral request to model {} with {} turns", self.model, turns.len());

        let response = self
            .client
            .post(&self.api_url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(ChatError::Upstream {
                status: status.as_u16(),
                message: Self::error_message(&text),
            });
        }

        let json: Value = response.json().await.map_err(|e| ChatError::Upstream {
            status: status.as_u16(),
            message: format!("failed to parse response: {}", e),
        })?;

        Self::parse_completion(&json, &self.model)
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}
