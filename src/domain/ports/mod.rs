use crate::domain::models::{
    audit::AuditLog, auth::RefreshTokenRecord, chemical::Chemical, equipment::Equipment,
    user::User, verification::VerificationCode,
};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn create(&self, user: &User) -> Result<User, AppError>;
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, AppError>;
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<User>, AppError>;
}

#[async_trait]
pub trait AuthRepository: Send + Sync {
    async fn create_refresh_token(&self, record: &RefreshTokenRecord) -> Result<(), AppError>;
    async fn find_refresh_token(&self, token_hash: &str) -> Result<Option<RefreshTokenRecord>, AppError>;
    /// Returns whether a row was actually removed.
    async fn delete_refresh_token(&self, token_hash: &str) -> Result<bool, AppError>;
    async fn delete_refresh_family(&self, family_id: Uuid) -> Result<(), AppError>;
}

/// Chemical persistence. Every mutation takes the audit entry describing it
/// and commits both in one transaction.
#[async_trait]
pub trait ChemicalRepository: Send + Sync {
    async fn create(&self, chemical: &Chemical, audit: &AuditLog) -> Result<Chemical, AppError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<Chemical>, AppError>;
    async fn list(&self) -> Result<Vec<Chemical>, AppError>;
    async fn update(&self, chemical: &Chemical, audit: &AuditLog) -> Result<Chemical, AppError>;
    async fn delete(&self, id: &str, audit: &AuditLog) -> Result<(), AppError>;
}

#[async_trait]
pub trait EquipmentRepository: Send + Sync {
    async fn create(&self, equipment: &Equipment, audit: &AuditLog) -> Result<Equipment, AppError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<Equipment>, AppError>;
    async fn list(&self) -> Result<Vec<Equipment>, AppError>;
    async fn update(&self, equipment: &Equipment, audit: &AuditLog) -> Result<Equipment, AppError>;
    async fn delete(&self, id: &str, audit: &AuditLog) -> Result<(), AppError>;
}

/// Read side of the audit trail, for reporting tools. Writes happen only
/// through the inventory repositories.
#[async_trait]
pub trait AuditRepository: Send + Sync {
    async fn list_for_object(&self, model_name: &str, object_id: &str) -> Result<Vec<AuditLog>, AppError>;
    async fn count(&self) -> Result<i64, AppError>;
}

#[async_trait]
pub trait VerificationRepository: Send + Sync {
    /// Stores `code` for its email, replacing any pending code and resetting its attempt count.
    async fn upsert(&self, code: &VerificationCode) -> Result<(), AppError>;
    /// Deletes the pending code only if it matches `code_hash` and is still valid at `now`.
    /// Returns whether a code was consumed.
    async fn consume(&self, email: &str, code_hash: &str, now: DateTime<Utc>) -> Result<bool, AppError>;
    /// Counts a failed attempt, then drops the code once it reached `max_attempts` or expired.
    async fn record_failure(&self, email: &str, max_attempts: i32, now: DateTime<Utc>) -> Result<(), AppError>;
}

#[async_trait]
pub trait LlmService: Send + Sync {
    async fn complete(&self, prompt: &str) -> Result<String, AppError>;
}

#[async_trait]
pub trait EmailService: Send + Sync {
    async fn send(&self, recipient: &str, subject: &str, body: &str) -> Result<(), AppError>;
}

#[async_trait]
pub trait CaptchaVerifier: Send + Sync {
    /// Returns whether the token is accepted by the provider.
    async fn verify(&self, token: &str) -> Result<bool, AppError>;
}
