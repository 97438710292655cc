use crate::domain::{models::{audit::AuditLog, chemical::Chemical}, ports::ChemicalRepository};
use crate::error::AppError;
use crate::infra::repositories::sqlite_audit_repo::insert_audit_entry;
use async_trait::async_trait;
use sqlx::SqlitePool;

pub struct SqliteChemicalRepo {
    pool: SqlitePool,
}

impl SqliteChemicalRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ChemicalRepository for SqliteChemicalRepo {
    async fn create(&self, chemical: &Chemical, audit: &AuditLog) -> Result<Chemical, AppError> {
        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;

        let created = sqlx::query_as::<_, Chemical>(
            "INSERT INTO chemicals (id, name, form, concentration, volume, quantity, storage_location, expiry_date, msds_file, danger_classification, added_by, created_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
             RETURNING *"
        )
            .bind(&chemical.id).bind(&chemical.name).bind(chemical.form.as_str()).bind(&chemical.concentration)
            .bind(chemical.volume).bind(chemical.quantity).bind(&chemical.storage_location).bind(chemical.expiry_date)
            .bind(&chemical.msds_file).bind(chemical.danger_classification.as_str()).bind(&chemical.added_by).bind(chemical.created_at)
            .fetch_one(&mut *tx).await.map_err(AppError::Database)?;

        insert_audit_entry(&mut tx, audit).await?;
        tx.commit().await.map_err(AppError::Database)?;
        Ok(created)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Chemical>, AppError> {
        sqlx::query_as::<_, Chemical>("SELECT * FROM chemicals WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool).await.map_err(AppError::Database)
    }

    async fn list(&self) -> Result<Vec<Chemical>, AppError> {
        sqlx::query_as::<_, Chemical>("SELECT * FROM chemicals ORDER BY name ASC, created_at ASC")
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn update(&self, chemical: &Chemical, audit: &AuditLog) -> Result<Chemical, AppError> {
        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;

        let updated = sqlx::query_as::<_, Chemical>(
            "UPDATE chemicals SET name=?, form=?, concentration=?, volume=?, quantity=?, storage_location=?, expiry_date=?, msds_file=?, danger_classification=?
             WHERE id=?
             RETURNING *"
        )
            .bind(&chemical.name).bind(chemical.form.as_str()).bind(&chemical.concentration).bind(chemical.volume)
            .bind(chemical.quantity).bind(&chemical.storage_location).bind(chemical.expiry_date).bind(&chemical.msds_file)
            .bind(chemical.danger_classification.as_str())
            .bind(&chemical.id)
            .fetch_optional(&mut *tx).await.map_err(AppError::Database)?
            .ok_or(AppError::NotFound("Chemical not found".into()))?;

        insert_audit_entry(&mut tx, audit).await?;
        tx.commit().await.map_err(AppError::Database)?;
        Ok(updated)
    }

    async fn delete(&self, id: &str, audit: &AuditLog) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;

        let result = sqlx::query("DELETE FROM chemicals WHERE id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(AppError::Database)?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Chemical not found".into()));
        }

        insert_audit_entry(&mut tx, audit).await?;
        tx.commit().await.map_err(AppError::Database)?;
        Ok(())
    }
}
