use async_trait::async_trait;
use parley_types::{ChatMessage, ProviderId};
use reqwest::header::HeaderMap;
use serde_json::Value;

use crate::error::ProviderError;

/// A fully translated outbound call, ready to be sent with POST
#[derive(Debug, Clone)]
pub struct ProviderRequest {
    pub url: String,
    pub headers: HeaderMap,
    pub query: Vec<(String, String)>,
    pub body: Value,
}

impl ProviderRequest {
    pub fn new(url: impl Into<String>, body: Value) -> Self {
        Self {
            url: url.into(),
            headers: HeaderMap::new(),
            query: Vec::new(),
            body,
        }
    }

    pub fn with_headers(mut self, headers: HeaderMap) -> Self {
        self.headers = headers;
        self
    }

    pub fn with_query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }
}

/// Translation pair for one provider's wire format
///
/// Adapters never perform I/O; the [`crate::Dispatcher`] owns the HTTP client.
pub trait ProviderAdapter: Send + Sync {
    fn provider(&self) -> ProviderId;

    /// Human readable name used in simulated replies and logs
    fn display_name(&self) -> &str;

    /// Internal providers answer locally and never call out
    fn simulated(&self) -> bool {
        false
    }

    /// Without a credential the turn is simulated unless this is false
    fn requires_credential(&self) -> bool {
        true
    }

    /// Transcript -> provider request
    fn build_request(
        &self,
        transcript: &[ChatMessage],
        credential: &str,
    ) -> Result<ProviderRequest, ProviderError>;

    /// Provider response body -> plain reply text
    fn parse_response(&self, body: Value) -> Result<String, ProviderError>;
}

/// Provider-agnostic entry point used by the HTTP layer
#[async_trait]
pub trait ChatDispatch: Send + Sync {
    /// Run one turn against `provider`. Without a credential the reply is simulated.
    async fn dispatch(
        &self,
        provider: ProviderId,
        transcript: &[ChatMessage],
        credential: Option<&str>,
    ) -> Result<String, ProviderError>;

    fn supports(&self, provider: ProviderId) -> bool;
}
