use parley_types::{ChatMessage, ProviderId};
use serde_json::Value;

use super::{bearer_headers, flat_messages, text_at};
use crate::config::PERPLEXITY_API_BASE;
use crate::error::ProviderError;
use crate::traits::{ProviderAdapter, ProviderRequest};

pub const DEFAULT_MODEL: &str = "llama-3.1-sonar-small-128k-online";

/// Perplexity speaks the chat-completions dialect with its own defaults
pub struct PerplexityAdapter {
    base_url: String,
    model: String,
}

impl PerplexityAdapter {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            model: DEFAULT_MODEL.to_string(),
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }
}

impl Default for PerplexityAdapter {
    fn default() -> Self {
        Self::new(PERPLEXITY_API_BASE)
    }
}

impl ProviderAdapter for PerplexityAdapter {
    fn provider(&self) -> ProviderId {
        ProviderId::Perplexity
    }

    fn display_name(&self) -> &str {
        "Perplexity"
    }

    fn build_request(
        &self,
        transcript: &[ChatMessage],
        credential: &str,
    ) -> Result<ProviderRequest, ProviderError> {
        let body = serde_json::json!({
            "model": self.model,
            "messages": flat_messages(transcript),
            "temperature": 0.2,
            "max_tokens": 1000,
        });

        Ok(
            ProviderRequest::new(format!("{}/chat/completions", self.base_url), body)
                .with_headers(bearer_headers(ProviderId::Perplexity, credential)?),
        )
    }

    fn parse_response(&self, body: Value) -> Result<String, ProviderError> {
        text_at(&body, "/choices/0/message/content", ProviderId::Perplexity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_defaults() {
        let request = PerplexityAdapter::new("http://localhost:1234")
            .build_request(&[ChatMessage::user("news?")], "pplx-key")
            .unwrap();

        assert_eq!(request.url, "http://localhost:1234/chat/completions");
        assert_eq!(request.body["temperature"], 0.2);
        assert_eq!(request.body["max_tokens"], 1000);
        assert_eq!(request.body["messages"][0]["content"], "news?");
    }
}
