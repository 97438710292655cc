use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use sqlx::{postgres::{PgPoolOptions, PgConnectOptions}, sqlite::{SqlitePoolOptions, SqliteJournalMode, SqliteConnectOptions}};
use sqlx::{PgPool, SqlitePool, ConnectOptions};
use tracing::info;
use tracing::log::LevelFilter;

use crate::config::Config;
use crate::state::AppState;
use crate::domain::ports::{CaptchaVerifier, EmailService, LlmService};
use crate::domain::services::{
    auth_service::AuthService, inventory_service::InventoryService,
    verification_service::VerificationService,
};
use crate::infra::ai::completion_service::CompletionService;
use crate::infra::captcha::recaptcha_service::RecaptchaService;
use crate::infra::email::http_email_service::HttpEmailService;
use crate::infra::repositories::{
    postgres_audit_repo::PostgresAuditRepo, postgres_auth_repo::PostgresAuthRepo,
    postgres_chemical_repo::PostgresChemicalRepo, postgres_equipment_repo::PostgresEquipmentRepo,
    postgres_user_repo::PostgresUserRepo, postgres_verification_repo::PostgresVerificationRepo,
    sqlite_audit_repo::SqliteAuditRepo, sqlite_auth_repo::SqliteAuthRepo,
    sqlite_chemical_repo::SqliteChemicalRepo, sqlite_equipment_repo::SqliteEquipmentRepo,
    sqlite_user_repo::SqliteUserRepo, sqlite_verification_repo::SqliteVerificationRepo,
};

/// Outbound collaborators, swapped for mocks in tests.
#[derive(Clone)]
pub struct ExternalServices {
    pub email: Arc<dyn EmailService>,
    pub llm: Arc<dyn LlmService>,
    pub captcha: Arc<dyn CaptchaVerifier>,
}

impl ExternalServices {
    pub fn from_config(config: &Config) -> Self {
        Self {
            email: Arc::new(HttpEmailService::new(
                config.mail_service_url.clone(),
                config.mail_service_token.clone(),
            )),
            llm: Arc::new(CompletionService::new(
                config.llm_api_url.clone(),
                config.llm_model.clone(),
                config.llm_api_key.clone(),
            )),
            captcha: Arc::new(RecaptchaService::new(config.recaptcha_secret_key.clone())),
        }
    }
}

pub async fn bootstrap_state(config: &Config) -> AppState {
    let database_url = &config.database_url;
    let services = ExternalServices::from_config(config);

    if database_url.starts_with("postgres://") || database_url.starts_with("postgresql://") {
        info!("Initializing PostgreSQL connection...");

        let mut opts: PgConnectOptions = database_url.parse().expect("Invalid Postgres URL");
        opts = opts.log_statements(LevelFilter::Debug)
            .log_slow_statements(LevelFilter::Warn, Duration::from_millis(500));

        let pool = PgPoolOptions::new()
            .max_connections(10)
            .connect_with(opts)
            .await
            .expect("Failed to connect to Postgres");

        run_postgres_migrations(&pool).await;
        postgres_state(pool, config, services)
    } else {
        info!("Initializing SQLite connection with WAL Mode...");

        let opts = SqliteConnectOptions::from_str(database_url)
            .expect("Invalid SQLite connection string")
            .create_if_missing(true)
            .foreign_keys(true)
            .journal_mode(SqliteJournalMode::Wal)
            .busy_timeout(Duration::from_secs(5))
            .log_statements(LevelFilter::Debug)
            .log_slow_statements(LevelFilter::Warn, Duration::from_millis(500));

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(opts)
            .await
            .expect("Failed to connect to SQLite");

        run_sqlite_migrations(&pool).await;
        sqlite_state(pool, config, services)
    }
}

pub fn postgres_state(pool: PgPool, config: &Config, services: ExternalServices) -> AppState {
    let auth_service = AuthService::new(Arc::new(PostgresAuthRepo::new(pool.clone())), config.clone())
        .expect("Failed to initialize auth service");

    AppState {
        config: config.clone(),
        user_repo: Arc::new(PostgresUserRepo::new(pool.clone())),
        audit_repo: Arc::new(PostgresAuditRepo::new(pool.clone())),
        auth_service: Arc::new(auth_service),
        inventory: Arc::new(InventoryService::new(
            Arc::new(PostgresChemicalRepo::new(pool.clone())),
            Arc::new(PostgresEquipmentRepo::new(pool.clone())),
            config.low_stock_threshold,
        )),
        verification: Arc::new(VerificationService::new(
            Arc::new(PostgresVerificationRepo::new(pool)),
            services.email,
        )),
        llm_service: services.llm,
        captcha: services.captcha,
    }
}

pub fn sqlite_state(pool: SqlitePool, config: &Config, services: ExternalServices) -> AppState {
    let auth_service = AuthService::new(Arc::new(SqliteAuthRepo::new(pool.clone())), config.clone())
        .expect("Failed to initialize auth service");

    AppState {
        config: config.clone(),
        user_repo: Arc::new(SqliteUserRepo::new(pool.clone())),
        audit_repo: Arc::new(SqliteAuditRepo::new(pool.clone())),
        auth_service: Arc::new(auth_service),
        inventory: Arc::new(InventoryService::new(
            Arc::new(SqliteChemicalRepo::new(pool.clone())),
            Arc::new(SqliteEquipmentRepo::new(pool.clone())),
            config.low_stock_threshold,
        )),
        verification: Arc::new(VerificationService::new(
            Arc::new(SqliteVerificationRepo::new(pool)),
            services.email,
        )),
        llm_service: services.llm,
        captcha: services.captcha,
    }
}

async fn run_postgres_migrations(pool: &PgPool) {
    sqlx::migrate!("./migrations/postgres")
        .run(pool)
        .await
        .expect("Failed to run Postgres migrations");
}

pub async fn run_sqlite_migrations(pool: &SqlitePool) {
    sqlx::migrate!("./migrations/sqlite")
        .run(pool)
        .await
        .expect("Failed to run SQLite migrations");
}
