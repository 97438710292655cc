use chrono::{DateTime, Utc};

/// A pending email verification code. Only the hash of the code is stored.
#[derive(Debug, Clone)]
pub struct VerificationCode {
    pub email: String,
    pub code_hash: String,
    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    /// Failed verification attempts against this code.
    pub attempts: i32,
}
