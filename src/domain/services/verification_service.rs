use std::sync::Arc;
use chrono::{Duration, Utc};
use rand::Rng;
use tracing::{info, warn};

use crate::domain::{
    models::verification::VerificationCode,
    ports::{EmailService, VerificationRepository},
    services::auth_service::sha256_hex,
};
use crate::error::AppError;

pub const CODE_TTL_MINUTES: i64 = 10;
/// Wrong guesses allowed before a pending code is discarded.
pub const MAX_ATTEMPTS: i32 = 5;

/// One-time email verification codes.
pub struct VerificationService {
    repo: Arc<dyn VerificationRepository>,
    email_service: Arc<dyn EmailService>,
}

impl VerificationService {
    pub fn new(repo: Arc<dyn VerificationRepository>, email_service: Arc<dyn EmailService>) -> Self {
        Self { repo, email_service }
    }

    /// Issues a fresh six digit code, replacing any pending one for `email`.
    pub async fn send_code(&self, email: &str) -> Result<(), AppError> {
        let email = email.trim().to_lowercase();
        let code = format!("{}", rand::thread_rng().gen_range(100_000..=999_999));
        let now = Utc::now();

        self.repo.upsert(&VerificationCode {
            email: email.clone(),
            code_hash: sha256_hex(&code),
            expires_at: now + Duration::minutes(CODE_TTL_MINUTES),
            created_at: now,
            attempts: 0,
        }).await?;

        self.email_service.send(
            &email,
            "Your LabTrack Verification Code",
            &format!("Your verification code is: {}", code),
        ).await?;

        info!("Verification code sent");
        Ok(())
    }

    /// Consumes the pending code for `email` when `code` matches and has not expired.
    /// A mismatch counts against the code, which is discarded after `MAX_ATTEMPTS`.
    pub async fn verify_code(&self, email: &str, code: &str) -> Result<(), AppError> {
        let email = email.trim().to_lowercase();
        let now = Utc::now();

        if self.repo.consume(&email, &sha256_hex(code.trim()), now).await? {
            return Ok(());
        }

        warn!("Verification code rejected");
        self.repo.record_failure(&email, MAX_ATTEMPTS, now).await?;
        Err(AppError::Validation("Invalid or expired code".into()))
    }
}
