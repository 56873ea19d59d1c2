use parley_types::{ChatMessage, MessageRole, ProviderId};
use serde_json::Value;

use super::{json_headers, text_at};
use crate::config::GEMINI_API_BASE;
use crate::error::ProviderError;
use crate::traits::{ProviderAdapter, ProviderRequest};

pub const DEFAULT_MODEL: &str = "gemini-1.5-pro-latest";

/// Google Gemini `generateContent`
///
/// Gemini has no assistant role: assistant turns are sent as `model`, and
/// system turns are folded into `systemInstruction`. The key travels in the
/// query string rather than a header.
pub struct GeminiAdapter {
    base_url: String,
    model: String,
}

impl GeminiAdapter {
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

    fn contents(transcript: &[ChatMessage]) -> (Vec<Value>, Vec<Value>) {
        let mut contents = Vec::new();
        let mut system_parts = Vec::new();

        for msg in transcript {
            let role = match msg.role {
                MessageRole::User => "user",
                MessageRole::Assistant => "model",
                MessageRole::System => {
                    system_parts.push(serde_json::json!({ "text": msg.content }));
                    continue;
                }
            };
            contents.push(serde_json::json!({
                "role": role,
                "parts": [{ "text": msg.content }],
            }));
        }

        (contents, system_parts)
    }
}

impl Default for GeminiAdapter {
    fn default() -> Self {
        Self::new(GEMINI_API_BASE)
    }
}

impl ProviderAdapter for GeminiAdapter {
    fn provider(&self) -> ProviderId {
        ProviderId::Gemini
    }

    fn display_name(&self) -> &str {
        "Gemini"
    }

    fn build_request(
        &self,
        transcript: &[ChatMessage],
        credential: &str,
    ) -> Result<ProviderRequest, ProviderError> {
        let (contents, system_parts) = Self::contents(transcript);

        let mut body = serde_json::json!({
            "contents": contents,
            "generationConfig": {
                "temperature": 0.7,
                "topK": 40,
                "topP": 0.95,
                "maxOutputTokens": 1024,
            },
        });
        if !system_parts.is_empty() {
            body["systemInstruction"] = serde_json::json!({ "parts": system_parts });
        }

        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.model
        );
        Ok(ProviderRequest::new(url, body)
            .with_headers(json_headers())
            .with_query("key", credential))
    }

    fn parse_response(&self, body: Value) -> Result<String, ProviderError> {
        text_at(&body, "/candidates/0/content/parts/0/text", ProviderId::Gemini)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_assistant_becomes_model() {
        let transcript = vec![
            ChatMessage::user("Hi"),
            ChatMessage::assistant("Hello"),
            ChatMessage::user("Describe this chart"),
        ];
        let request = GeminiAdapter::default()
            .build_request(&transcript, "g-key")
            .unwrap();

        let contents = request.body["contents"].as_array().unwrap();
        assert_eq!(contents.len(), 3);
        assert_eq!(contents[1]["role"], "model");
        assert_eq!(contents[2]["parts"][0]["text"], "Describe this chart");
        assert_eq!(request.body["generationConfig"]["topK"], 40);
        assert!(request.body.get("systemInstruction").is_none());
        assert_eq!(request.query, vec![("key".to_string(), "g-key".to_string())]);
        assert!(request
            .url
            .ends_with("/v1beta/models/gemini-1.5-pro-latest:generateContent"));
    }

    #[test]
    fn test_system_turns_become_instruction() {
        let transcript = vec![ChatMessage::system("Answer in French"), ChatMessage::user("Hi")];
        let request = GeminiAdapter::default()
            .build_request(&transcript, "g-key")
            .unwrap();

        assert_eq!(request.body["contents"].as_array().unwrap().len(), 1);
        assert_eq!(
            request.body["systemInstruction"]["parts"][0]["text"],
            "Answer in French"
        );
    }

    #[test]
    fn test_parse_response() {
        let body = serde_json::json!({
            "candidates": [{"content": {"role": "model", "parts": [{"text": "Bonjour"}]}}]
        });
        assert_eq!(GeminiAdapter::default().parse_response(body).unwrap(), "Bonjour");
    }
}
