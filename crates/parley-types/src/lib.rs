//! Shared types for Parley: provider identifiers, transcript messages and the
//! static model registry used by the model picker.

pub mod message;
pub mod provider;
pub mod registry;

pub use message::{ChatMessage, MessageRole};
pub use provider::{ProviderId, UnknownProvider};
pub use registry::{available_models, filter_by_capability, filter_models, find_model, AIModel};
