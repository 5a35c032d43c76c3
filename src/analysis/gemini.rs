use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::{AnalysisError, FailureAnalyzer};
use crate::config::AiConfig;

/// Google Generative Language `generateContent` client.
pub struct GeminiAnalyzer {
    client: reqwest::Client,
    api_key: Option<String>,
    model: String,
    base_url: String,
}

#[derive(Serialize)]
struct GenerateContentRequest<'a> {
    contents: Vec<Content<'a>>,
}

#[derive(Serialize)]
struct Content<'a> {
    parts: Vec<Part<'a>>,
}

#[derive(Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

#[derive(Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: String,
}

impl GenerateContentResponse {
    /// Text of the first candidate, parts concatenated.
    fn text(&self) -> String {
        self.candidates
            .first()
            .and_then(|c| c.content.as_ref())
            .map(|c| {
                c.parts
                    .iter()
                    .filter_map(|p| p.text.as_deref())
                    .collect::<String>()
            })
            .unwrap_or_default()
    }
}

impl GeminiAnalyzer {
    pub fn new(config: &AiConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key: config.api_key.clone(),
            model: config.model.clone(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
        }
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.model
        )
    }
}

#[async_trait]
impl FailureAnalyzer for GeminiAnalyzer {
    fn name(&self) -> &str {
        &self.model
    }

    async fn analyze(&self, prompt: &str) -> Result<String, AnalysisError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| AnalysisError::from("AI API key is not configured"))?;

        let request = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![Part { text: prompt }],
            }],
        };

        let resp = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| AnalysisError::from(format!("AI request failed: {e}")))?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ErrorEnvelope>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);
            return Err(AnalysisError::from(format!(
                "AI request failed with status {}: {message}",
                status.as_u16()
            )));
        }

        let body: GenerateContentResponse = resp
            .json()
            .await
            .map_err(|e| AnalysisError::from(format!("Invalid AI response: {e}")))?;

        Ok(body.text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn response_text_joins_parts_of_first_candidate() {
        let body: GenerateContentResponse = serde_json::from_str(
            r#"{"candidates":[{"content":{"parts":[{"text":"Line one\n"},{"text":"Line two"}]}},
                {"content":{"parts":[{"text":"ignored"}]}}]}"#,
        )
        .unwrap();
        assert_eq!(body.text(), "Line one\nLine two");
    }

    #[test]
    fn response_without_candidates_is_empty() {
        let body: GenerateContentResponse = serde_json::from_str("{}").unwrap();
        assert_eq!(body.text(), "");
    }

    #[test]
    fn endpoint_uses_model_and_trimmed_base() {
        let analyzer = GeminiAnalyzer::new(&AiConfig {
            api_key: None,
            model: "gemini-3-flash-preview".to_string(),
            base_url: "http://127.0.0.1:9999/".to_string(),
        });
        assert_eq!(
            analyzer.endpoint(),
            "http://127.0.0.1:9999/v1beta/models/gemini-3-flash-preview:generateContent"
        );
    }

    #[tokio::test]
    async fn missing_key_fails_without_a_request() {
        let analyzer = GeminiAnalyzer::new(&AiConfig {
            api_key: None,
            model: "m".to_string(),
            base_url: "http://127.0.0.1:1".to_string(),
        });
        let err = analyzer.analyze("prompt").await.unwrap_err();
        assert_eq!(err.message, "AI API key is not configured");
    }
}
