use crate::domain::ports::CaptchaVerifier;
use crate::error::AppError;
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::{instrument, warn};

const SITEVERIFY_URL: &str = "https://www.google.com/recaptcha/api/siteverify";
pub const MIN_SCORE: f64 = 0.5;

pub struct RecaptchaService {
    client: Client,
    secret_key: Option<String>,
}

#[derive(Deserialize)]
struct SiteverifyResponse {
    success: bool,
    #[serde(default)]
    score: f64,
    #[serde(default, rename = "error-codes")]
    error_codes: Vec<String>,
}

impl RecaptchaService {
    pub fn new(secret_key: Option<String>) -> Self {
        Self { client: Client::new(), secret_key }
    }
}

#[async_trait]
impl CaptchaVerifier for RecaptchaService {
    #[instrument(skip_all)]
    async fn verify(&self, token: &str) -> Result<bool, AppError> {
        let secret = self.secret_key.as_deref()
            .ok_or_else(|| AppError::Upstream("reCAPTCHA secret key is not configured".to_string()))?;

        let result: SiteverifyResponse = self.client.post(SITEVERIFY_URL)
            .form(&[("secret", secret), ("response", token)])
            .send()
            .await
            .map_err(|e| AppError::Upstream(format!("reCAPTCHA network error: {}", e)))?
            .json()
            .await
            .map_err(|e| AppError::Upstream(format!("invalid reCAPTCHA response: {}", e)))?;

        if !result.success {
            warn!(error_codes = ?result.error_codes, "reCAPTCHA rejected token");
        }
        Ok(result.success && result.score >= MIN_SCORE)
    }
}
