use parley_types::{ChatMessage, MessageRole, ProviderId};
use reqwest::header::{HeaderName, HeaderValue};
use serde_json::Value;

use super::{keyed_headers, text_at};
use crate::config::ANTHROPIC_API_BASE;
use crate::error::ProviderError;
use crate::traits::{ProviderAdapter, ProviderRequest};

pub const DEFAULT_MODEL: &str = "claude-3-haiku-20240307";
pub const API_VERSION: &str = "2023-06-01";

/// Anthropic messages API. System turns go to the top-level `system` field.
pub struct AnthropicAdapter {
    base_url: String,
    model: String,
    max_tokens: u32,
}

impl AnthropicAdapter {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            model: DEFAULT_MODEL.to_string(),
            max_tokens: 1024,
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }
}

impl Default for AnthropicAdapter {
    fn default() -> Self {
        Self::new(ANTHROPIC_API_BASE)
    }
}

impl ProviderAdapter for AnthropicAdapter {
    fn provider(&self) -> ProviderId {
        ProviderId::Anthropic
    }

    fn display_name(&self) -> &str {
        "Claude"
    }

    fn build_request(
        &self,
        transcript: &[ChatMessage],
        credential: &str,
    ) -> Result<ProviderRequest, ProviderError> {
        let (system, turns): (Vec<&ChatMessage>, Vec<&ChatMessage>) = transcript
            .iter()
            .partition(|msg| msg.role == MessageRole::System);

        let messages: Vec<Value> = turns
            .iter()
            .map(|msg| {
                serde_json::json!({
                    "role": msg.role.as_str(),
                    "content": msg.content,
                })
            })
            .collect();

        let mut body = serde_json::json!({
            "model": self.model,
            "messages": messages,
            "max_tokens": self.max_tokens,
            "temperature": 0.7,
        });
        if !system.is_empty() {
            let prompt = system
                .iter()
                .map(|msg| msg.content.as_str())
                .collect::<Vec<_>>()
                .join("\n\n");
            body["system"] = Value::String(prompt);
        }

        let mut headers = keyed_headers(ProviderId::Anthropic, "x-api-key", credential)?;
        headers.insert(
            HeaderName::from_static("anthropic-version"),
            HeaderValue::from_static(API_VERSION),
        );

        Ok(ProviderRequest::new(format!("{}/v1/messages", self.base_url), body)
            .with_headers(headers))
    }

    fn parse_response(&self, body: Value) -> Result<String, ProviderError> {
        text_at(&body, "/content/0/text", ProviderId::Anthropic)
    }
}
