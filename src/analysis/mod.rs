pub mod gemini;

use async_trait::async_trait;

use crate::models::WebhookEvent;

/// Shown when the provider answers without any text.
pub const EMPTY_ANALYSIS: &str = "No analysis could be generated.";

#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisError {
    pub message: String,
}

impl std::fmt::Display for AnalysisError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for AnalysisError {}

impl From<String> for AnalysisError {
    fn from(s: String) -> Self {
        AnalysisError { message: s }
    }
}

impl From<&str> for AnalysisError {
    fn from(s: &str) -> Self {
        AnalysisError {
            message: s.to_string(),
        }
    }
}

/// A text-generation backend asked to explain a failed delivery.
#[async_trait]
pub trait FailureAnalyzer: Send + Sync {
    fn name(&self) -> &str;
    async fn analyze(&self, prompt: &str) -> Result<String, AnalysisError>;
}

/// Prompt describing a failed event: type, status, error, payload and attempt history.
pub fn build_prompt(event: &WebhookEvent) -> String {
    let payload = serde_json::to_string(&event.payload).unwrap_or_default();
    let attempts = serde_json::to_string(&event.delivery_attempts).unwrap_or_default();

    format!(
        "Analyze this failed webhook event.\n\
         Type: {}\n\
         Status: {}\n\
         Error: {}\n\
         Payload: {}\n\
         Attempts: {}\n\
         \n\
         Provide a clear reason for failure and 3 actionable steps to fix it.",
        event.event_type,
        event.status,
        event.error.as_deref().unwrap_or("N/A"),
        payload,
        attempts,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockGenerator;
    use chrono::Utc;

    #[test]
    fn prompt_embeds_event_details() {
        let mut generator = MockGenerator::seeded(13, Utc::now());
        let webhook = generator.generate_webhook(1);
        let event = generator.generate_event(&webhook, 1, true);

        let prompt = build_prompt(&event);
        assert!(prompt.starts_with("Analyze this failed webhook event."));
        assert!(prompt.contains(&format!("Type: {}", event.event_type)));
        assert!(prompt.contains("Status: Failed"));
        assert!(prompt.contains(&format!("Error: {}", event.error.clone().unwrap())));
        assert!(prompt.contains(&serde_json::to_string(&event.payload).unwrap()));
        assert!(prompt.contains(&serde_json::to_string(&event.delivery_attempts).unwrap()));
        assert!(prompt.ends_with("3 actionable steps to fix it."));
    }

    #[test]
    fn prompt_without_error_says_na() {
        let mut generator = MockGenerator::seeded(13, Utc::now());
        let webhook = generator.generate_webhook(1);
        let mut event = generator.generate_event(&webhook, 1, true);
        event.error = None;
        assert!(build_prompt(&event).contains("Error: N/A\n"));
    }
}
