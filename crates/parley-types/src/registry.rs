use serde::Serialize;

use crate::provider::ProviderId;

/// A selectable chat model, defined at compile time
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AIModel {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub avatar: &'static str,
    pub capabilities: &'static [&'static str],
    /// Display name of the vendor
    pub provider: &'static str,
    pub provider_id: ProviderId,
}

impl AIModel {
    fn matches(&self, needle: &str) -> bool {
        self.name.to_lowercase().contains(needle)
            || self.description.to_lowercase().contains(needle)
            || self.has_capability(needle)
    }

    /// `needle` must already be lowercase
    fn has_capability(&self, needle: &str) -> bool {
        self.capabilities
            .iter()
            .any(|cap| cap.to_lowercase().contains(needle))
    }
}

static MODELS: &[AIModel] = &[
    AIModel {
        id: "gpt",
        name: "ChatGPT",
        description: "OpenAI's general purpose conversational model",
        avatar: "https://upload.wikimedia.org/wikipedia/commons/thumb/0/04/ChatGPT_logo.svg/1024px-ChatGPT_logo.svg.png",
        capabilities: &["General knowledge", "Programming", "Creative writing", "Summaries"],
        provider: "OpenAI",
        provider_id: ProviderId::OpenAI,
    },
    AIModel {
        id: "gemini",
        name: "Gemini",
        description: "Google's multimodal model with vision and text capabilities",
        avatar: "https://storage.googleapis.com/gweb-uniblog-publish-prod/images/gemini-logo.max-1200x1200.png",
        capabilities: &["Computer vision", "Data analysis", "Multimedia processing"],
        provider: "Google",
        provider_id: ProviderId::Gemini,
    },
    AIModel {
        id: "claude",
        name: "Claude",
        description: "Anthropic's assistant tuned for careful reasoning and long documents",
        avatar: "https://placehold.co/80x80?text=C",
        capabilities: &["Long documents", "Reasoning", "Writing", "Programming"],
        provider: "Anthropic",
        provider_id: ProviderId::Anthropic,
    },
    AIModel {
        id: "perplexity",
        name: "Perplexity",
        description: "Answer engine backed by live web search",
        avatar: "https://placehold.co/80x80?text=P",
        capabilities: &["Web search", "Current events", "Citations"],
        provider: "Perplexity",
        provider_id: ProviderId::Perplexity,
    },
    AIModel {
        id: "cohere",
        name: "Command R+",
        description: "Cohere's retrieval-oriented enterprise model",
        avatar: "https://placehold.co/80x80?text=R",
        capabilities: &["Retrieval", "Summaries", "Multilingual"],
        provider: "Cohere",
        provider_id: ProviderId::Cohere,
    },
    AIModel {
        id: "lovable",
        name: "Lovable",
        description: "Assistant specialised in web development and UI/UX",
        avatar: "https://placehold.co/80x80?text=L",
        capabilities: &["Web development", "UI/UX design", "React programming", "Prototyping"],
        provider: "Lovable",
        provider_id: ProviderId::Lovable,
    },
];

pub fn available_models() -> &'static [AIModel] {
    MODELS
}

pub fn find_model(id: &str) -> Option<&'static AIModel> {
    MODELS.iter().find(|m| m.id == id)
}

/// Model picker search: name, description or any capability.
/// A blank term returns the whole catalog.
pub fn filter_models(term: &str) -> Vec<&'static AIModel> {
    let needle = term.trim().to_lowercase();
    if needle.is_empty() {
        return MODELS.iter().collect();
    }
    MODELS.iter().filter(|m| m.matches(&needle)).collect()
}

/// Models whose capability list contains a case-insensitive match for `term`
pub fn filter_by_capability(term: &str) -> Vec<&'static AIModel> {
    let needle = term.trim().to_lowercase();
    MODELS.iter().filter(|m| m.has_capability(&needle)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_ids_are_unique() {
        let ids: HashSet<_> = MODELS.iter().map(|m| m.id).collect();
        assert_eq!(ids.len(), MODELS.len());
    }

    #[test]
    fn test_every_provider_has_a_model() {
        for provider in ProviderId::ALL {
            assert!(
                MODELS.iter().any(|m| m.provider_id == provider),
                "no model for {}",
                provider
            );
        }
    }

    #[test]
    fn test_blank_term_returns_everything() {
        assert_eq!(filter_models("   ").len(), MODELS.len());
    }

    #[test]
    fn test_find_model() {
        assert_eq!(find_model("claude").map(|m| m.provider_id), Some(ProviderId::Anthropic));
        assert!(find_model("unknown").is_none());
    }
}
