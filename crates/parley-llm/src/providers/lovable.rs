use parley_types::{ChatMessage, ProviderId};
use serde_json::Value;

use super::{bearer_headers, flat_messages, json_headers, text_at};
use crate::error::ProviderError;
use crate::traits::{ProviderAdapter, ProviderRequest};

/// Internal assistant. Answers locally unless an OpenAI-compatible internal
/// endpoint is configured.
#[derive(Default)]
pub struct LovableAdapter {
    endpoint: Option<String>,
}

impl LovableAdapter {
    pub fn new(endpoint: Option<String>) -> Self {
        Self { endpoint }
    }
}

impl ProviderAdapter for LovableAdapter {
    fn provider(&self) -> ProviderId {
        ProviderId::Lovable
    }

    fn display_name(&self) -> &str {
        "Lovable"
    }

    fn simulated(&self) -> bool {
        self.endpoint.is_none()
    }

    /// The internal service may run without auth
    fn requires_credential(&self) -> bool {
        false
    }

    fn build_request(
        &self,
        transcript: &[ChatMessage],
        credential: &str,
    ) -> Result<ProviderRequest, ProviderError> {
        let endpoint = self
            .endpoint
            .as_ref()
            .ok_or(ProviderError::UnsupportedProvider(ProviderId::Lovable))?;

        let body = serde_json::json!({
            "messages": flat_messages(transcript),
        });
        let headers = if credential.is_empty() {
            json_headers()
        } else {
            bearer_headers(ProviderId::Lovable, credential)?
        };
        Ok(ProviderRequest::new(format!("{}/chat/completions", endpoint), body).with_headers(headers))
    }

    fn parse_response(&self, body: Value) -> Result<String, ProviderError> {
        text_at(&body, "/choices/0/message/content", ProviderId::Lovable)
    }
}
