#![allow(dead_code)]

use labtrack_backend::{
    api::router::create_router,
    state::AppState,
    config::Config,
    domain::models::user::{Role, User},
    domain::ports::{CaptchaVerifier, EmailService, LlmService},
    domain::services::auth_service::hash_password,
    infra::factory::{run_sqlite_migrations, sqlite_state, ExternalServices},
    error::AppError,
};
use sqlx::{sqlite::{SqliteConnectOptions, SqlitePoolOptions}, Pool, Sqlite};
use std::sync::{Arc, Mutex};
use uuid::Uuid;
use axum::{
    body::Body,
    http::{Request, StatusCode, header},
    Router,
};
use std::str::FromStr;
use async_trait::async_trait;
use tower::ServiceExt;
use serde_json::Value;

pub const TEST_PASSWORD: &str = "correct-horse-battery";

#[derive(Clone, Debug)]
pub struct SentEmail {
    pub recipient: String,
    pub subject: String,
    pub body: String,
}

#[derive(Default)]
pub struct MockEmailService {
    pub sent: Mutex<Vec<SentEmail>>,
}

impl MockEmailService {
    pub fn sent(&self) -> Vec<SentEmail> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl EmailService for MockEmailService {
    async fn send(&self, recipient: &str, subject: &str, body: &str) -> Result<(), AppError> {
        self.sent.lock().unwrap().push(SentEmail {
            recipient: recipient.to_string(),
            subject: subject.to_string(),
            body: body.to_string(),
        });
        Ok(())
    }
}

pub struct MockLlmService {
    answer: Option<String>,
    pub prompts: Mutex<Vec<String>>,
}

impl MockLlmService {
    pub fn answering(answer: &str) -> Self {
        Self { answer: Some(answer.to_string()), prompts: Mutex::new(Vec::new()) }
    }

    pub fn failing() -> Self {
        Self { answer: None, prompts: Mutex::new(Vec::new()) }
    }
}

#[async_trait]
impl LlmService for MockLlmService {
    async fn complete(&self, prompt: &str) -> Result<String, AppError> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        self.answer.clone()
            .ok_or_else(|| AppError::Upstream("mock completion service is down".to_string()))
    }
}

pub struct MockCaptcha {
    pub accepts: bool,
}

#[async_trait]
impl CaptchaVerifier for MockCaptcha {
    async fn verify(&self, _token: &str) -> Result<bool, AppError> {
        Ok(self.accepts)
    }
}

pub struct TestApp {
    pub router: Router,
    pub pool: Pool<Sqlite>,
    pub db_filename: String,
    pub state: Arc<AppState>,
    pub emails: Arc<MockEmailService>,
    pub llm: Arc<MockLlmService>,
}

impl TestApp {
    pub async fn new() -> Self {
        Self::build(MockLlmService::answering("Store acetone in the flammables cabinet."), true).await
    }

    pub async fn with_failing_llm() -> Self {
        Self::build(MockLlmService::failing(), true).await
    }

    pub async fn with_rejecting_captcha() -> Self {
        Self::build(MockLlmService::answering("unused"), false).await
    }

    async fn build(llm: MockLlmService, captcha_accepts: bool) -> Self {
        let db_filename = format!("test_{}.db", Uuid::new_v4());
        let db_url = format!("sqlite://{}?mode=rwc", db_filename);

        let connection_options = SqliteConnectOptions::from_str(&db_url)
            .unwrap()
            .create_if_missing(true)
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .connect_with(connection_options)
            .await
            .expect("Failed to connect to test db");

        run_sqlite_migrations(&pool).await;

        let priv_key_pem = include_str!("../tests/keys/test_private.pem");
        let pub_key_pem = include_str!("../tests/keys/test_public.pem");

        let config = Config {
            database_url: db_url.clone(),
            port: 0,
            log_dir: "./logs".to_string(),
            jwt_secret_key: priv_key_pem.to_string(),
            jwt_public_key: pub_key_pem.to_string(),
            auth_issuer: "test-issuer".to_string(),
            auth_cookie_secure: false,
            low_stock_threshold: 5,
            llm_api_url: "http://localhost/v1/completions".to_string(),
            llm_model: "test-model".to_string(),
            llm_api_key: None,
            mail_service_url: "http://localhost".to_string(),
            mail_service_token: "token".to_string(),
            recaptcha_secret_key: None,
        };

        let emails = Arc::new(MockEmailService::default());
        let llm = Arc::new(llm);
        let services = ExternalServices {
            email: emails.clone(),
            llm: llm.clone(),
            captcha: Arc::new(MockCaptcha { accepts: captcha_accepts }),
        };

        let state = Arc::new(sqlite_state(pool.clone(), &config, services));
        let router = create_router(state.clone());

        Self {
            router,
            pool,
            db_filename,
            state,
            emails,
            llm,
        }
    }

    /// Inserts an active user with `TEST_PASSWORD`.
    pub async fn create_user(&self, username: &str, role: Role) -> User {
        let hash = hash_password(TEST_PASSWORD).unwrap();
        let user = User::new(username.to_string(), format!("{}@school.test", username), hash, role);
        self.state.user_repo.create(&user).await.unwrap()
    }

    /// Creates a user with `role` and returns it with a fresh access token.
    pub async fn user_with_token(&self, username: &str, role: Role) -> (User, String) {
        let user = self.create_user(username, role).await;
        let token = self.login(username, TEST_PASSWORD).await;
        (user, token)
    }

    pub async fn login(&self, username: &str, password: &str) -> String {
        let (status, body) = self.request(
            "POST",
            "/api/login/",
            None,
            Some(serde_json::json!({ "username": username, "password": password })),
        ).await;

        if status != StatusCode::OK {
            panic!("Login failed in test helper: status {} body {}", status, body);
        }

        body["access"].as_str().expect("No access token in body").to_string()
    }

    /// Sends a request with an optional bearer token and JSON body.
    pub async fn request(&self, method: &str, uri: &str, token: Option<&str>, body: Option<Value>) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }

        let req = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        self.send(req).await
    }

    pub async fn send(&self, req: Request<Body>) -> (StatusCode, Value) {
        let response = self.router.clone().oneshot(req).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();

        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes)
                .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
        };

        (status, body)
    }

    pub async fn audit_count(&self) -> i64 {
        self.state.audit_repo.count().await.unwrap()
    }
}

impl Drop for TestApp {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.db_filename);
        let _ = std::fs::remove_file(format!("{}-wal", self.db_filename));
        let _ = std::fs::remove_file(format!("{}-shm", self.db_filename));
    }
}
