use parley_types::{ChatMessage, ProviderId};
use serde_json::Value;

use super::{bearer_headers, flat_messages, text_at};
use crate::config::OPENAI_API_BASE;
use crate::error::ProviderError;
use crate::traits::{ProviderAdapter, ProviderRequest};

pub const DEFAULT_MODEL: &str = "gpt-4o-mini";

/// OpenAI chat completions
pub struct OpenAIAdapter {
    base_url: String,
    model: String,
}

impl OpenAIAdapter {
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

impl Default for OpenAIAdapter {
    fn default() -> Self {
        Self::new(OPENAI_API_BASE)
    }
}

impl ProviderAdapter for OpenAIAdapter {
    fn provider(&self) -> ProviderId {
        ProviderId::OpenAI
    }

    fn display_name(&self) -> &str {
        "ChatGPT"
    }

    fn build_request(
        &self,
        transcript: &[ChatMessage],
        credential: &str,
    ) -> Result<ProviderRequest, ProviderError> {
        let body = serde_json::json!({
            "model": self.model,
            "messages": flat_messages(transcript),
            "temperature": 0.7,
        });

        Ok(
            ProviderRequest::new(format!("{}/v1/chat/completions", self.base_url), body)
                .with_headers(bearer_headers(ProviderId::OpenAI, credential)?),
        )
    }

    fn parse_response(&self, body: Value) -> Result<String, ProviderError> {
        text_at(&body, "/choices/0/message/content", ProviderId::OpenAI)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::header::AUTHORIZATION;

    #[test]
    fn test_request_shape() {
        let transcript = vec![
            ChatMessage::system("Be brief"),
            ChatMessage::user("Hi"),
            ChatMessage::assistant("Hello!"),
            ChatMessage::user("How are you?"),
        ];
        let request = OpenAIAdapter::default()
            .build_request(&transcript, "sk-test")
            .unwrap();

        assert_eq!(request.url, "https://api.openai.com/v1/chat/completions");
        assert_eq!(request.headers[AUTHORIZATION], "Bearer sk-test");
        assert_eq!(request.body["model"], DEFAULT_MODEL);
        assert_eq!(request.body["messages"].as_array().unwrap().len(), 4);
        assert_eq!(request.body["messages"][0]["role"], "system");
        assert_eq!(request.body["messages"][2]["role"], "assistant");
        assert_eq!(request.body["messages"][3]["content"], "How are you?");
    }

    #[test]
    fn test_parse_response() {
        let body = serde_json::json!({
            "id": "chatcmpl-1",
            "choices": [{"index": 0, "message": {"role": "assistant", "content": "Fine, thanks"}}]
        });
        let text = OpenAIAdapter::default().parse_response(body).unwrap();
        assert_eq!(text, "Fine, thanks");
    }

    #[test]
    fn test_parse_response_without_choices() {
        let body = serde_json::json!({"choices": []});
        let err = OpenAIAdapter::default().parse_response(body).unwrap_err();
        assert!(matches!(err, ProviderError::EmptyResponse { .. }));
    }
}
