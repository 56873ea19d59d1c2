use parley_types::{ChatMessage, MessageRole, ProviderId};
use serde_json::Value;

use super::{bearer_headers, text_at};
use crate::config::COHERE_API_BASE;
use crate::error::ProviderError;
use crate::traits::{ProviderAdapter, ProviderRequest};

pub const DEFAULT_MODEL: &str = "command-r-plus";

/// Cohere v1 chat
///
/// Unlike the flat chat-completions shape, Cohere splits the transcript into
/// `chat_history` (every turn but the last) and `message` (the current turn).
pub struct CohereAdapter {
    base_url: String,
    model: String,
}

impl CohereAdapter {
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

    fn role(role: MessageRole) -> &'static str {
        match role {
            MessageRole::User => "USER",
            MessageRole::Assistant => "CHATBOT",
            MessageRole::System => "SYSTEM",
        }
    }
}

impl Default for CohereAdapter {
    fn default() -> Self {
        Self::new(COHERE_API_BASE)
    }
}

impl ProviderAdapter for CohereAdapter {
    fn provider(&self) -> ProviderId {
        ProviderId::Cohere
    }

    fn display_name(&self) -> &str {
        "Cohere"
    }

    fn build_request(
        &self,
        transcript: &[ChatMessage],
        credential: &str,
    ) -> Result<ProviderRequest, ProviderError> {
        let (current, history) = match transcript.split_last() {
            Some((last, rest)) => (last.content.as_str(), rest),
            None => ("", transcript),
        };

        let chat_history: Vec<Value> = history
            .iter()
            .map(|msg| {
                serde_json::json!({
                    "role": Self::role(msg.role),
                    "message": msg.content,
                })
            })
            .collect();

        let body = serde_json::json!({
            "model": self.model,
            "chat_history": chat_history,
            "message": current,
            "temperature": 0.7,
        });

        Ok(ProviderRequest::new(format!("{}/v1/chat", self.base_url), body)
            .with_headers(bearer_headers(ProviderId::Cohere, credential)?))
    }

    fn parse_response(&self, body: Value) -> Result<String, ProviderError> {
        text_at(&body, "/text", ProviderId::Cohere)
    }
}
