use crate::domain::ports::LlmService;
use crate::error::AppError;
use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};
use tracing::{error, info, instrument};
use std::time::Duration;

const MAX_TOKENS: u32 = 150;
const TEMPERATURE: f64 = 0.7;

/// Client for an OpenAI-style text completion endpoint.
///
/// One request per call; failures surface as `AppError::Upstream` and are not
/// retried.
pub struct CompletionService {
    client: Client,
    api_url: String,
    model: String,
    api_key: Option<String>,
}

impl CompletionService {
    pub fn new(api_url: String, model: String, api_key: Option<String>) -> Self {
        Self {
            client: Client::builder()
                .timeout(Duration::from_secs(30))
                .build()
                .unwrap_or_else(|_| Client::new()),
            api_url,
            model,
            api_key,
        }
    }

    fn extract_text(body: &Value) -> Result<String, AppError> {
        let text = body.get("choices")
            .and_then(|c| c.as_array())
            .and_then(|choices| choices.first())
            .and_then(|first| first.get("text"))
            .and_then(|t| t.as_str());

        match text {
            Some(text) => Ok(text.trim().to_string()),
            None => {
                error!("Unexpected completion response structure: {:?}", body);
                Err(AppError::Upstream("completion response missing text".to_string()))
            }
        }
    }
}

#[async_trait]
impl LlmService for CompletionService {
    #[instrument(skip(self, prompt), fields(prompt_len = prompt.len(), model = %self.model))]
    async fn complete(&self, prompt: &str) -> Result<String, AppError> {
        let api_key = self.api_key.as_deref()
            .ok_or_else(|| AppError::Upstream("completion service API key is not configured".to_string()))?;

        let payload = json!({
            "model": self.model,
            "prompt": prompt,
            "max_tokens": MAX_TOKENS,
            "temperature": TEMPERATURE,
            "n": 1,
        });

        info!("Sending completion request...");
        let response = self.client.post(&self.api_url)
            .bearer_auth(api_key)
            .json(&payload)
            .send()
            .await
            .map_err(|e| AppError::Upstream(format!("completion network error: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(AppError::Upstream(format!("completion service returned {}: {}", status, text)));
        }

        let body: Value = response.json().await
            .map_err(|e| AppError::Upstream(format!("invalid completion response JSON: {}", e)))?;

        let answer = Self::extract_text(&body)?;
        info!("Received completion.");
        Ok(answer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_text_trims_first_choice() {
        let body = json!({ "choices": [{ "text": "\n\nWear goggles.  " }, { "text": "ignored" }] });
        assert_eq!(CompletionService::extract_text(&body).unwrap(), "Wear goggles.");
    }

    #[test]
    fn test_extract_text_rejects_missing_choices() {
        let body = json!({ "error": { "message": "quota" } });
        assert!(matches!(CompletionService::extract_text(&body), Err(AppError::Upstream(_))));
    }

    #[tokio::test]
    async fn test_missing_api_key_is_upstream_error() {
        let service = CompletionService::new("http://127.0.0.1:9/v1/completions".into(), "m".into(), None);
        assert!(matches!(service.complete("hi").await, Err(AppError::Upstream(_))));
    }
}
