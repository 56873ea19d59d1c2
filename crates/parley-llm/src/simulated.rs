/// Every canned reply contains this phrase
pub const SIMULATED_MARKER: &str = "simulated response";

/// Placeholder reply used when a turn cannot (or must not) reach a real provider
pub fn simulated_response(model_name: &str) -> String {
    format!(
        "This is a {} from {}. In production this would be a real reply from the \
         model's API. Please provide a valid API key to get real responses.",
        SIMULATED_MARKER, model_name
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names_the_model() {
        let text = simulated_response("Gemini");
        assert!(text.contains("Gemini"));
        assert!(text.contains(SIMULATED_MARKER));
    }
}
