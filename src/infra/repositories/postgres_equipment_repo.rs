use crate::domain::{models::{audit::AuditLog, equipment::Equipment}, ports::EquipmentRepository};
use crate::error::AppError;
use crate::infra::repositories::postgres_audit_repo::insert_audit_entry;
use async_trait::async_trait;
use sqlx::PgPool;

pub struct PostgresEquipmentRepo {
    pool: PgPool,
}

impl PostgresEquipmentRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl EquipmentRepository for PostgresEquipmentRepo {
    async fn create(&self, equipment: &Equipment, audit: &AuditLog) -> Result<Equipment, AppError> {
        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;

        let created = sqlx::query_as::<_, Equipment>(
            "INSERT INTO equipment (id, name, condition, quantity, last_maintenance_date, notes, added_by, created_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
             RETURNING *"
        )
            .bind(&equipment.id).bind(&equipment.name).bind(equipment.condition.as_str()).bind(equipment.quantity)
            .bind(equipment.last_maintenance_date).bind(&equipment.notes).bind(&equipment.added_by).bind(equipment.created_at)
            .fetch_one(&mut *tx).await.map_err(AppError::Database)?;

        insert_audit_entry(&mut tx, audit).await?;
        tx.commit().await.map_err(AppError::Database)?;
        Ok(created)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Equipment>, AppError> {
        sqlx::query_as::<_, Equipment>("SELECT * FROM equipment WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool).await.map_err(AppError::Database)
    }

    async fn list(&self) -> Result<Vec<Equipment>, AppError> {
        sqlx::query_as::<_, Equipment>("SELECT * FROM equipment ORDER BY name ASC, created_at ASC")
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn update(&self, equipment: &Equipment, audit: &AuditLog) -> Result<Equipment, AppError> {
        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;

        let updated = sqlx::query_as::<_, Equipment>(
            "UPDATE equipment SET name=$1, condition=$2, quantity=$3, last_maintenance_date=$4, notes=$5
             WHERE id=$6
             RETURNING *"
        )
            .bind(&equipment.name).bind(equipment.condition.as_str()).bind(equipment.quantity)
            .bind(equipment.last_maintenance_date).bind(&equipment.notes)
            .bind(&equipment.id)
            .fetch_optional(&mut *tx).await.map_err(AppError::Database)?
            .ok_or(AppError::NotFound("Equipment not found".into()))?;

        insert_audit_entry(&mut tx, audit).await?;
        tx.commit().await.map_err(AppError::Database)?;
        Ok(updated)
    }

    async fn delete(&self, id: &str, audit: &AuditLog) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;

        let result = sqlx::query("DELETE FROM equipment WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(AppError::Database)?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Equipment not found".into()));
        }

        insert_audit_entry(&mut tx, audit).await?;
        tx.commit().await.map_err(AppError::Database)?;
        Ok(())
    }
}
