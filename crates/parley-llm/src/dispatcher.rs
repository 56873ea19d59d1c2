use async_trait::async_trait;
use parley_types::{ChatMessage, ProviderId};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use crate::config::DispatchConfig;
use crate::error::ProviderError;
use crate::providers::{
    AnthropicAdapter, CohereAdapter, GeminiAdapter, LovableAdapter, OpenAIAdapter,
    PerplexityAdapter,
};
use crate::simulated::simulated_response;
use crate::traits::{ChatDispatch, ProviderAdapter};

/// Routes a turn to the adapter registered for its provider
///
/// Owns the only HTTP client in the crate. Turns without a credential, or
/// aimed at an internal provider, get a simulated reply instead of a network call.
pub struct Dispatcher {
    http_client: reqwest::Client,
    adapters: HashMap<ProviderId, Arc<dyn ProviderAdapter>>,
    simulated_delay: Duration,
}

impl Dispatcher {
    /// Dispatcher with every built-in provider registered
    pub fn new(config: DispatchConfig) -> Result<Self, ProviderError> {
        let endpoints = config.endpoints.clone();
        let mut dispatcher = Self::empty(config)?;

        dispatcher.register(Arc::new(OpenAIAdapter::new(endpoints.openai)));
        dispatcher.register(Arc::new(GeminiAdapter::new(endpoints.gemini)));
        dispatcher.register(Arc::new(AnthropicAdapter::new(endpoints.anthropic)));
        dispatcher.register(Arc::new(PerplexityAdapter::new(endpoints.perplexity)));
        dispatcher.register(Arc::new(CohereAdapter::new(endpoints.cohere)));
        dispatcher.register(Arc::new(LovableAdapter::new(endpoints.lovable)));

        Ok(dispatcher)
    }

    /// Dispatcher with no adapters
    pub fn empty(config: DispatchConfig) -> Result<Self, ProviderError> {
        let http_client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(ProviderError::Client)?;

        Ok(Self {
            http_client,
            adapters: HashMap::new(),
            simulated_delay: config.simulated_delay,
        })
    }

    /// Add or replace the adapter for its provider
    pub fn register(&mut self, adapter: Arc<dyn ProviderAdapter>) {
        self.adapters.insert(adapter.provider(), adapter);
    }

    pub fn providers(&self) -> Vec<ProviderId> {
        let mut providers: Vec<ProviderId> = self.adapters.keys().copied().collect();
        providers.sort();
        providers
    }

    async fn simulate(&self, adapter: &dyn ProviderAdapter) -> String {
        tracing::warn!(
            provider = %adapter.provider(),
            "No credential available, returning simulated response"
        );
        if !self.simulated_delay.is_zero() {
            tokio::time::sleep(self.simulated_delay).await;
        }
        simulated_response(adapter.display_name())
    }

    async fn call(
        &self,
        adapter: &dyn ProviderAdapter,
        transcript: &[ChatMessage],
        credential: &str,
    ) -> Result<String, ProviderError> {
        let provider = adapter.provider();
        let request = adapter.build_request(transcript, credential)?;

        tracing::debug!(
            provider = %provider,
            url = %request.url,
            turns = transcript.len(),
            "Calling provider"
        );

        let mut builder = self
            .http_client
            .post(&request.url)
            .headers(request.headers)
            .json(&request.body);
        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }

        let response = builder
            .send()
            .await
            .map_err(|source| ProviderError::Request { provider, source })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            let message = upstream_error_message(&error_text)
                .unwrap_or_else(|| fallback_error_message(adapter.display_name(), &error_text));
            tracing::error!(
                provider = %provider,
                status = status.as_u16(),
                error = %message,
                "Provider API error"
            );
            return Err(ProviderError::Api {
                provider,
                status: status.as_u16(),
                message,
            });
        }

        let body: Value = response
            .json()
            .await
            .map_err(|source| ProviderError::Request { provider, source })?;

        adapter.parse_response(body)
    }
}

#[async_trait]
impl ChatDispatch for Dispatcher {
    async fn dispatch(
        &self,
        provider: ProviderId,
        transcript: &[ChatMessage],
        credential: Option<&str>,
    ) -> Result<String, ProviderError> {
        let adapter = self
            .adapters
            .get(&provider)
            .cloned()
            .ok_or(ProviderError::UnsupportedProvider(provider))?;

        if adapter.simulated() {
            return Ok(self.simulate(adapter.as_ref()).await);
        }

        match credential.map(str::trim).filter(|c| !c.is_empty()) {
            Some(credential) => self.call(adapter.as_ref(), transcript, credential).await,
            None if !adapter.requires_credential() => {
                self.call(adapter.as_ref(), transcript, "").await
            }
            None => Ok(self.simulate(adapter.as_ref()).await),
        }
    }

    fn supports(&self, provider: ProviderId) -> bool {
        self.adapters.contains_key(&provider)
    }
}

/// Provider-reported error text from an error body, if it carries one
///
/// Accepts `{"error": {"message": ..}}`, `{"error": ".."}` and `{"message": ..}`.
fn upstream_error_message(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    value
        .pointer("/error/message")
        .or_else(|| value.get("error").filter(|e| e.is_string()))
        .or_else(|| value.get("message"))
        .and_then(Value::as_str)
        .filter(|m| !m.trim().is_empty())
        .map(str::to_string)
}

fn fallback_error_message(display_name: &str, body: &str) -> String {
    if body.trim().is_empty() {
        format!("{} API error", display_name)
    } else {
        body.trim().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upstream_error_message_shapes() {
        assert_eq!(
            upstream_error_message(r#"{"error": {"message": "Invalid key"}}"#).as_deref(),
            Some("Invalid key")
        );
        assert_eq!(
            upstream_error_message(r#"{"error": "quota exceeded"}"#).as_deref(),
            Some("quota exceeded")
        );
        assert_eq!(
            upstream_error_message(r#"{"message": "invalid api token"}"#).as_deref(),
            Some("invalid api token")
        );
        assert_eq!(upstream_error_message("<html>bad gateway</html>"), None);
    }

    #[test]
    fn test_fallback_error_message() {
        assert_eq!(fallback_error_message("Cohere", ""), "Cohere API error");
        assert_eq!(fallback_error_message("Cohere", "oops "), "oops");
    }

    #[test]
    fn test_new_registers_every_provider() {
        let dispatcher = Dispatcher::new(DispatchConfig::default()).unwrap();
        for provider in ProviderId::ALL {
            assert!(dispatcher.supports(provider));
        }
        assert_eq!(dispatcher.providers().len(), ProviderId::ALL.len());
    }
}
