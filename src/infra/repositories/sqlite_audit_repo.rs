use crate::domain::{models::audit::AuditLog, ports::AuditRepository};
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::{SqliteConnection, SqlitePool};

/// Appends `entry` on the caller's connection, normally an open transaction.
pub(crate) async fn insert_audit_entry(conn: &mut SqliteConnection, entry: &AuditLog) -> Result<(), AppError> {
    sqlx::query(
        "INSERT INTO audit_logs (id, user_id, action, model_name, object_id, changes, timestamp) VALUES (?, ?, ?, ?, ?, ?, ?)"
    )
        .bind(&entry.id)
        .bind(&entry.user_id)
        .bind(entry.action.as_str())
        .bind(&entry.model_name)
        .bind(&entry.object_id)
        .bind(&entry.changes)
        .bind(entry.timestamp)
        .execute(&mut *conn)
        .await
        .map_err(AppError::Database)?;
    Ok(())
}

pub struct SqliteAuditRepo {
    pool: SqlitePool,
}

impl SqliteAuditRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AuditRepository for SqliteAuditRepo {
    async fn list_for_object(&self, model_name: &str, object_id: &str) -> Result<Vec<AuditLog>, AppError> {
        sqlx::query_as::<_, AuditLog>(
            "SELECT * FROM audit_logs WHERE model_name = ? AND object_id = ? ORDER BY timestamp ASC"
        )
            .bind(model_name)
            .bind(object_id)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn count(&self) -> Result<i64, AppError> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM audit_logs")
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)
    }
}
