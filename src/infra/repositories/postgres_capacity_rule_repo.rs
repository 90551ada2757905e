use crate::domain::{models::capacity::CapacityRule, ports::CapacityRuleRepository};
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::PgPool;

pub struct PostgresCapacityRuleRepo {
    pool: PgPool,
}

impl PostgresCapacityRuleRepo {
    pub fn new(pool: PgPool) -> Self { Self { pool } }
}

#[async_trait]
impl CapacityRuleRepository for PostgresCapacityRuleRepo {
    async fn create(&self, rule: &CapacityRule) -> Result<CapacityRule, AppError> {
        sqlx::query_as::<_, CapacityRule>(
            "INSERT INTO capacity_rules (id, service_type_id, day_of_week, max_capacity, start_time, end_time, created_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING *"
        )
            .bind(&rule.id).bind(&rule.service_type_id).bind(rule.day_of_week)
            .bind(rule.max_capacity).bind(rule.start_time).bind(rule.end_time).bind(rule.created_at)
            .fetch_one(&self.pool).await.map_err(AppError::Database)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<CapacityRule>, AppError> {
        sqlx::query_as::<_, CapacityRule>("SELECT * FROM capacity_rules WHERE id = $1")
            .bind(id).fetch_optional(&self.pool).await.map_err(AppError::Database)
    }

    async fn list_by_service(&self, service_type_id: &str) -> Result<Vec<CapacityRule>, AppError> {
        sqlx::query_as::<_, CapacityRule>(
            "SELECT * FROM capacity_rules WHERE service_type_id = $1 ORDER BY day_of_week NULLS LAST, start_time"
        )
            .bind(service_type_id).fetch_all(&self.pool).await.map_err(AppError::Database)
    }

    async fn update(&self, rule: &CapacityRule) -> Result<CapacityRule, AppError> {
        sqlx::query_as::<_, CapacityRule>(
            "UPDATE capacity_rules SET max_capacity=$1, start_time=$2, end_time=$3
             WHERE id=$4
             RETURNING *"
        )
            .bind(rule.max_capacity).bind(rule.start_time).bind(rule.end_time).bind(&rule.id)
            .fetch_one(&self.pool).await.map_err(AppError::Database)
    }

    async fn delete(&self, id: &str) -> Result<(), AppError> {
        let res = sqlx::query("DELETE FROM capacity_rules WHERE id = $1")
            .bind(id).execute(&self.pool).await.map_err(AppError::Database)?;

        if res.rows_affected() == 0 {
            return Err(AppError::NotFound("Capacity rule not found".into()));
        }
        Ok(())
    }
}
