use crate::domain::{models::verification::VerificationCode, ports::VerificationRepository};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;

pub struct SqliteVerificationRepo { pool: SqlitePool }
impl SqliteVerificationRepo { pub fn new(pool: SqlitePool) -> Self { Self { pool } } }

#[async_trait]
impl VerificationRepository for SqliteVerificationRepo {
    async fn upsert(&self, code: &VerificationCode) -> Result<(), AppError> {
        sqlx::query(
            "INSERT INTO verification_codes (email, code_hash, expires_at, created_at, attempts) VALUES (?, ?, ?, ?, ?)
             ON CONFLICT (email) DO UPDATE SET code_hash = excluded.code_hash, expires_at = excluded.expires_at,
             created_at = excluded.created_at, attempts = excluded.attempts"
        )
            .bind(&code.email)
            .bind(&code.code_hash)
            .bind(code.expires_at)
            .bind(code.created_at)
            .bind(code.attempts)
            .execute(&self.pool).await.map_err(AppError::Database)?;
        Ok(())
    }

    async fn consume(&self, email: &str, code_hash: &str, now: DateTime<Utc>) -> Result<bool, AppError> {
        let result = sqlx::query(
            "DELETE FROM verification_codes WHERE email = ? AND code_hash = ? AND expires_at > ?"
        )
            .bind(email)
            .bind(code_hash)
            .bind(now)
            .execute(&self.pool).await.map_err(AppError::Database)?;
        Ok(result.rows_affected() > 0)
    }

    async fn record_failure(&self, email: &str, max_attempts: i32, now: DateTime<Utc>) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;
        sqlx::query("UPDATE verification_codes SET attempts = attempts + 1 WHERE email = ?")
            .bind(email)
            .execute(&mut *tx).await.map_err(AppError::Database)?;
        sqlx::query("DELETE FROM verification_codes WHERE email = ? AND (attempts >= ? OR expires_at <= ?)")
            .bind(email)
            .bind(max_attempts)
            .bind(now)
            .execute(&mut *tx).await.map_err(AppError::Database)?;
        tx.commit().await.map_err(AppError::Database)?;
        Ok(())
    }
}
