use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const OPENAI_API_BASE: &str = "https://api.openai.com";
pub const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com";
pub const ANTHROPIC_API_BASE: &str = "https://api.anthropic.com";
pub const PERPLEXITY_API_BASE: &str = "https://api.perplexity.ai";
pub const COHERE_API_BASE: &str = "https://api.cohere.ai";

/// Base URLs per provider. Overridable so tests and proxies can redirect traffic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderEndpoints {
    pub openai: String,
    pub gemini: String,
    pub anthropic: String,
    pub perplexity: String,
    pub cohere: String,
    /// OpenAI-compatible internal service for Lovable; simulated when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lovable: Option<String>,
}

impl Default for ProviderEndpoints {
    fn default() -> Self {
        Self {
            openai: OPENAI_API_BASE.to_string(),
            gemini: GEMINI_API_BASE.to_string(),
            anthropic: ANTHROPIC_API_BASE.to_string(),
            perplexity: PERPLEXITY_API_BASE.to_string(),
            cohere: COHERE_API_BASE.to_string(),
            lovable: None,
        }
    }
}

impl ProviderEndpoints {
    /// Point every provider at the same base URL
    pub fn all(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        Self {
            openai: base_url.clone(),
            gemini: base_url.clone(),
            anthropic: base_url.clone(),
            perplexity: base_url.clone(),
            cohere: base_url,
            lovable: None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct DispatchConfig {
    /// Artificial wait before a simulated reply
    pub simulated_delay: Duration,
    pub request_timeout: Duration,
    pub endpoints: ProviderEndpoints,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            simulated_delay: Duration::from_millis(1000),
            request_timeout: Duration::from_secs(120),
            endpoints: ProviderEndpoints::default(),
        }
    }
}

impl DispatchConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_simulated_delay(mut self, delay: Duration) -> Self {
        self.simulated_delay = delay;
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    pub fn with_endpoints(mut self, endpoints: ProviderEndpoints) -> Self {
        self.endpoints = endpoints;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = DispatchConfig::default();
        assert_eq!(config.simulated_delay, Duration::from_millis(1000));
        assert_eq!(config.endpoints.openai, OPENAI_API_BASE);
        assert!(config.endpoints.lovable.is_none());
    }

    #[test]
    fn test_partial_endpoints_deserialize() {
        let endpoints: ProviderEndpoints =
            serde_json::from_str(r#"{"cohere": "http://localhost:9000"}"#).unwrap();
        assert_eq!(endpoints.cohere, "http://localhost:9000");
        assert_eq!(endpoints.gemini, GEMINI_API_BASE);
    }
}
