use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Closed set of providers Parley can route a turn to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderId {
    OpenAI,
    Gemini,
    Anthropic,
    Perplexity,
    Cohere,
    /// Internal assistant, simulated unless an endpoint is configured
    Lovable,
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("Unknown provider: {0}")]
pub struct UnknownProvider(pub String);

impl ProviderId {
    pub const ALL: [ProviderId; 6] = [
        ProviderId::OpenAI,
        ProviderId::Gemini,
        ProviderId::Anthropic,
        ProviderId::Perplexity,
        ProviderId::Cohere,
        ProviderId::Lovable,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::OpenAI => "openai",
            Self::Gemini => "gemini",
            Self::Anthropic => "anthropic",
            Self::Perplexity => "perplexity",
            Self::Cohere => "cohere",
            Self::Lovable => "lovable",
        }
    }
}

impl fmt::Display for ProviderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProviderId {
    type Err = UnknownProvider;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "openai" => Ok(Self::OpenAI),
            "gemini" | "google" => Ok(Self::Gemini),
            "anthropic" | "claude" => Ok(Self::Anthropic),
            "perplexity" => Ok(Self::Perplexity),
            "cohere" => Ok(Self::Cohere),
            "lovable" => Ok(Self::Lovable),
            _ => Err(UnknownProvider(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!("OpenAI".parse::<ProviderId>().unwrap(), ProviderId::OpenAI);
        assert_eq!(" cohere ".parse::<ProviderId>().unwrap(), ProviderId::Cohere);
        assert_eq!("claude".parse::<ProviderId>().unwrap(), ProviderId::Anthropic);
    }

    #[test]
    fn test_parse_unknown() {
        let err = "mistral".parse::<ProviderId>().unwrap_err();
        assert_eq!(err.to_string(), "Unknown provider: mistral");
    }

    #[test]
    fn test_display_matches_serde() {
        for provider in ProviderId::ALL {
            let json = serde_json::to_value(provider).unwrap();
            assert_eq!(json, provider.to_string());
            assert_eq!(provider.as_str().parse::<ProviderId>().unwrap(), provider);
        }
    }
}
