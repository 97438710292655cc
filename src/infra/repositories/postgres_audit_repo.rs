use crate::domain::{models::audit::AuditLog, ports::AuditRepository};
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::{PgConnection, PgPool};

/// Appends `entry` on the caller's connection, normally an open transaction.
pub(crate) async fn insert_audit_entry(conn: &mut PgConnection, entry: &AuditLog) -> Result<(), AppError> {
    sqlx::query(
        "INSERT INTO audit_logs (id, user_id, action, model_name, object_id, changes, timestamp) VALUES ($1, $2, $3, $4, $5, $6, $7)"
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

pub struct PostgresAuditRepo {
    pool: PgPool,
}

impl PostgresAuditRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AuditRepository for PostgresAuditRepo {
    async fn list_for_object(&self, model_name: &str, object_id: &str) -> Result<Vec<AuditLog>, AppError> {
        sqlx::query_as::<_, AuditLog>(
            "SELECT * FROM audit_logs WHERE model_name = $1 AND object_id = $2 ORDER BY timestamp ASC"
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
