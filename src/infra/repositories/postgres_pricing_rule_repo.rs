use crate::domain::{
    models::pricing::{PricingRule, PricingRuleRow},
    ports::PricingRuleRepository,
};
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::PgPool;

pub struct PostgresPricingRuleRepo {
    pool: PgPool,
}

impl PostgresPricingRuleRepo {
    pub fn new(pool: PgPool) -> Self { Self { pool } }
}

fn decode_rows(rows: Vec<PricingRuleRow>) -> Result<Vec<PricingRule>, AppError> {
    rows.into_iter().map(PricingRule::try_from).collect()
}

#[async_trait]
impl PricingRuleRepository for PostgresPricingRuleRepo {
    async fn create(&self, rule: &PricingRule) -> Result<PricingRule, AppError> {
        sqlx::query_as::<_, PricingRuleRow>(
            "INSERT INTO pricing_rules (id, service_type_id, kind, value, day_of_week, min_animals, membership_plan_id, active, priority, created_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
             RETURNING *"
        )
            .bind(&rule.id).bind(&rule.service_type_id)
            .bind(rule.adjustment.kind()).bind(rule.adjustment.value())
            .bind(rule.day_of_week).bind(rule.min_animals).bind(&rule.membership_plan_id)
            .bind(rule.active).bind(rule.priority).bind(rule.created_at)
            .fetch_one(&self.pool).await.map_err(AppError::Database)?
            .try_into()
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<PricingRule>, AppError> {
        sqlx::query_as::<_, PricingRuleRow>("SELECT * FROM pricing_rules WHERE id = $1")
            .bind(id).fetch_optional(&self.pool).await.map_err(AppError::Database)?
            .map(PricingRule::try_from).transpose()
    }

    async fn list_by_service(&self, service_type_id: &str) -> Result<Vec<PricingRule>, AppError> {
        let rows = sqlx::query_as::<_, PricingRuleRow>(
            "SELECT * FROM pricing_rules WHERE service_type_id = $1 ORDER BY priority DESC, created_at"
        )
            .bind(service_type_id).fetch_all(&self.pool).await.map_err(AppError::Database)?;
        decode_rows(rows)
    }

    async fn list_active_by_service(&self, service_type_id: &str) -> Result<Vec<PricingRule>, AppError> {
        let rows = sqlx::query_as::<_, PricingRuleRow>(
            "SELECT * FROM pricing_rules WHERE service_type_id = $1 AND active = TRUE ORDER BY priority DESC, created_at"
        )
            .bind(service_type_id).fetch_all(&self.pool).await.map_err(AppError::Database)?;
        decode_rows(rows)
    }

    async fn update(&self, rule: &PricingRule) -> Result<PricingRule, AppError> {
        sqlx::query_as::<_, PricingRuleRow>(
            "UPDATE pricing_rules SET kind=$1, value=$2, active=$3, priority=$4
             WHERE id=$5
             RETURNING *"
        )
            .bind(rule.adjustment.kind()).bind(rule.adjustment.value())
            .bind(rule.active).bind(rule.priority).bind(&rule.id)
            .fetch_one(&self.pool).await.map_err(AppError::Database)?
            .try_into()
    }

    async fn delete(&self, id: &str) -> Result<(), AppError> {
        let res = sqlx::query("DELETE FROM pricing_rules WHERE id = $1")
            .bind(id).execute(&self.pool).await.map_err(AppError::Database)?;

        if res.rows_affected() == 0 {
            return Err(AppError::NotFound("Pricing rule not found".into()));
        }
        Ok(())
    }
}
