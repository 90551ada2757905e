use crate::domain::{models::capacity::CapacityOverride, ports::CapacityOverrideRepository};
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::SqlitePool;
use chrono::NaiveDate;

pub struct SqliteCapacityOverrideRepo {
    pool: SqlitePool,
}

impl SqliteCapacityOverrideRepo {
    pub fn new(pool: SqlitePool) -> Self { Self { pool } }
}

#[async_trait]
impl CapacityOverrideRepository for SqliteCapacityOverrideRepo {
    async fn upsert(&self, entity: &CapacityOverride) -> Result<CapacityOverride, AppError> {
        sqlx::query_as::<_, CapacityOverride>(
            r#"INSERT INTO capacity_overrides (id, date, service_type_id, max_capacity, reason, created_at)
               VALUES (?, ?, ?, ?, ?, ?)
               ON CONFLICT(date, COALESCE(service_type_id, '')) DO UPDATE SET
               max_capacity=excluded.max_capacity,
               reason=excluded.reason
               RETURNING *"#
        )
            .bind(&entity.id)
            .bind(entity.date)
            .bind(&entity.service_type_id)
            .bind(entity.max_capacity)
            .bind(&entity.reason)
            .bind(entity.created_at)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn list_for_service(
        &self,
        service_type_id: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<CapacityOverride>, AppError> {
        sqlx::query_as::<_, CapacityOverride>(
            "SELECT * FROM capacity_overrides
             WHERE date >= ? AND date <= ? AND (service_type_id = ? OR service_type_id IS NULL)"
        )
            .bind(start)
            .bind(end)
            .bind(service_type_id)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn list_by_range(&self, start: NaiveDate, end: NaiveDate) -> Result<Vec<CapacityOverride>, AppError> {
        sqlx::query_as::<_, CapacityOverride>(
            "SELECT * FROM capacity_overrides WHERE date >= ? AND date <= ? ORDER BY date"
        )
            .bind(start)
            .bind(end)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn delete(&self, id: &str) -> Result<(), AppError> {
        let res = sqlx::query("DELETE FROM capacity_overrides WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(AppError::Database)?;

        if res.rows_affected() == 0 {
            return Err(AppError::NotFound("Override not found".into()));
        }
        Ok(())
    }
}
