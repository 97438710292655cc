use std::env;
use crate::domain::services::inventory_filter::LOW_STOCK_THRESHOLD;

#[derive(Clone)]
pub struct Config {
    pub database_url: String,
    pub port: u16,
    pub log_dir: String,
    pub jwt_secret_key: String, // Private key (PEM)
    pub jwt_public_key: String, // Public key (PEM)
    pub auth_issuer: String,
    pub auth_cookie_secure: bool,
    pub low_stock_threshold: i32,
    pub llm_api_url: String,
    pub llm_model: String,
    pub llm_api_key: Option<String>,
    pub mail_service_url: String,
    pub mail_service_token: String,
    pub recaptcha_secret_key: Option<String>,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            database_url: env::var("DATABASE_URL").expect("DATABASE_URL must be set"),
            port: env::var("PORT").unwrap_or_else(|_| "3000".to_string()).parse().expect("PORT must be a number"),
            log_dir: env::var("LOG_DIR").unwrap_or_else(|_| "./logs".to_string()),
            jwt_secret_key: env::var("JWT_SECRET_KEY").expect("JWT_SECRET_KEY must be set (Ed25519 Private Key)"),
            jwt_public_key: env::var("JWT_PUBLIC_KEY").expect("JWT_PUBLIC_KEY must be set (Ed25519 Public Key)"),
            auth_issuer: env::var("AUTH_ISSUER").unwrap_or_else(|_| "https://api.labtrack.local".to_string()),
            auth_cookie_secure: env::var("AUTH_COOKIE_SECURE").map(|v| v != "false" && v != "0").unwrap_or(true),
            low_stock_threshold: env::var("LOW_STOCK_THRESHOLD")
                .map(|v| v.parse().expect("LOW_STOCK_THRESHOLD must be an integer"))
                .unwrap_or(LOW_STOCK_THRESHOLD),
            llm_api_url: env::var("LLM_API_URL").unwrap_or_else(|_| "https://api.openai.com/v1/completions".to_string()),
            llm_model: env::var("LLM_MODEL").unwrap_or_else(|_| "gpt-3.5-turbo-instruct".to_string()),
            llm_api_key: env::var("LLM_API_KEY").ok().filter(|k| !k.is_empty()),
            mail_service_url: env::var("MAIL_SERVICE_URL").unwrap_or_else(|_| "http://localhost:8000/api/v1/send".to_string()),
            mail_service_token: env::var("MAIL_SERVICE_TOKEN").unwrap_or_default(),
            recaptcha_secret_key: env::var("RECAPTCHA_SECRET_KEY").ok().filter(|k| !k.is_empty()),
        }
    }
}
