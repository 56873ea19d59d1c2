// Per-provider wire translation. Adapters are pure: no I/O happens here.

mod anthropic;
mod cohere;
mod gemini;
mod lovable;
mod openai;
mod perplexity;

pub use anthropic::AnthropicAdapter;
pub use cohere::CohereAdapter;
pub use gemini::GeminiAdapter;
pub use lovable::LovableAdapter;
pub use openai::OpenAIAdapter;
pub use perplexity::PerplexityAdapter;

use parley_types::{ChatMessage, ProviderId};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use serde_json::Value;

use crate::error::ProviderError;

fn json_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    headers
}

fn secret_header(provider: ProviderId, value: &str) -> Result<HeaderValue, ProviderError> {
    let mut value = HeaderValue::from_str(value).map_err(|_| ProviderError::InvalidCredential {
        provider,
        reason: "credential contains characters not allowed in a header".to_string(),
    })?;
    value.set_sensitive(true);
    Ok(value)
}

fn bearer_headers(provider: ProviderId, credential: &str) -> Result<HeaderMap, ProviderError> {
    let mut headers = json_headers();
    headers.insert(
        AUTHORIZATION,
        secret_header(provider, &format!("Bearer {}", credential))?,
    );
    Ok(headers)
}

fn keyed_headers(
    provider: ProviderId,
    name: &'static str,
    credential: &str,
) -> Result<HeaderMap, ProviderError> {
    let mut headers = json_headers();
    headers.insert(HeaderName::from_static(name), secret_header(provider, credential)?);
    Ok(headers)
}

/// `[{role, content}]`, the chat-completions shape shared by OpenAI-compatible APIs
fn flat_messages(transcript: &[ChatMessage]) -> Vec<Value> {
    transcript
        .iter()
        .map(|msg| {
            serde_json::json!({
                "role": msg.role.as_str(),
                "content": msg.content,
            })
        })
        .collect()
}

/// Reply text at a JSON pointer; missing or blank text is an empty response
fn text_at(body: &Value, pointer: &str, provider: ProviderId) -> Result<String, ProviderError> {
    body.pointer(pointer)
        .and_then(Value::as_str)
        .filter(|text| !text.trim().is_empty())
        .map(str::to_string)
        .ok_or(ProviderError::EmptyResponse { provider })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_at_rejects_blank() {
        let body = serde_json::json!({"text": "  "});
        assert!(matches!(
            text_at(&body, "/text", ProviderId::Cohere),
            Err(ProviderError::EmptyResponse { provider: ProviderId::Cohere })
        ));
    }

    #[test]
    fn test_secret_header_rejects_newlines() {
        let result = bearer_headers(ProviderId::OpenAI, "sk-abc\ninjected");
        assert!(matches!(result, Err(ProviderError::InvalidCredential { .. })));
    }

    #[test]
    fn test_bearer_header_is_sensitive() {
        let headers = bearer_headers(ProviderId::OpenAI, "sk-abc").unwrap();
        let auth = headers.get(AUTHORIZATION).unwrap();
        assert!(auth.is_sensitive());
        assert_eq!(auth.to_str().unwrap(), "Bearer sk-abc");
    }
}
