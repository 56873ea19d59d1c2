pub mod config;
pub mod dispatcher;
pub mod error;
pub mod providers;
pub mod simulated;
pub mod traits;

pub use config::{DispatchConfig, ProviderEndpoints};
pub use dispatcher::Dispatcher;
pub use error::ProviderError;
pub use providers::{
    AnthropicAdapter, CohereAdapter, GeminiAdapter, LovableAdapter, OpenAIAdapter,
    PerplexityAdapter,
};
pub use simulated::{simulated_response, SIMULATED_MARKER};
pub use traits::{ChatDispatch, ProviderAdapter, ProviderRequest};

pub use parley_types::{ChatMessage, MessageRole, ProviderId};
