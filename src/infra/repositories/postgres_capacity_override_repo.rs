use crate::domain::{models::capacity::CapacityOverride, ports::CapacityOverrideRepository};
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::PgPool;
use chrono::NaiveDate;

pub struct PostgresCapacityOverrideRepo {
    pool: PgPool,
}

impl PostgresCapacityOverrideRepo {
    pub fn new(pool: PgPool) -> Self { Self { pool } }
}

#[async_trait]
impl CapacityOverrideRepository for PostgresCapacityOverrideRepo {
    async fn upsert(&self, entity: &CapacityOverride) -> Result<CapacityOverride, AppError> {
        sqlx::query_as::<_, CapacityOverride>(
            r#"INSERT INTO capacity_overrides (id, date, service_type_id, max_capacity, reason, created_at)
               VALUES ($1, $2, $3, $4, $5, $6)
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
             WHERE date >= $1 AND date <= $2 AND (service_type_id = $3 OR service_type_id IS NULL)"
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
            "SELECT * FROM capacity_overrides WHERE date >= $1 AND date <= $2 ORDER BY date"
        )
            .bind(start)
            .bind(end)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn delete(&self, id: &str) -> Result<(), AppError> {
        let res = sqlx::query("DELETE FROM capacity_overrides WHERE id = $1")
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
