use parley_types::ProviderId;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("Unsupported provider: {0}")]
    UnsupportedProvider(ProviderId),

    #[error("Invalid credential for {provider}: {reason}")]
    InvalidCredential { provider: ProviderId, reason: String },

    #[error("{provider} request failed: {source}")]
    Request {
        provider: ProviderId,
        #[source]
        source: reqwest::Error,
    },

    /// Upstream answered with a non-success status
    #[error("{provider} API error ({status}): {message}")]
    Api {
        provider: ProviderId,
        status: u16,
        message: String,
    },

    #[error("{provider} returned no reply text")]
    EmptyResponse { provider: ProviderId },

    #[error("Failed to create HTTP client: {0}")]
    Client(#[source] reqwest::Error),
}

impl ProviderError {
    pub fn provider(&self) -> Option<ProviderId> {
        match self {
            Self::UnsupportedProvider(p) => Some(*p),
            Self::InvalidCredential { provider, .. }
            | Self::Request { provider, .. }
            | Self::Api { provider, .. }
            | Self::EmptyResponse { provider } => Some(*provider),
            Self::Client(_) => None,
        }
    }

    /// Message suitable for showing to the user
    pub fn upstream_message(&self) -> String {
        match self {
            Self::Api { message, .. } => message.clone(),
            other => other.to_string(),
        }
    }
}
