use crate::domain::{models::service_type::ServiceType, ports::ServiceTypeRepository};
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::PgPool;

pub struct PostgresServiceTypeRepo {
    pool: PgPool,
}

impl PostgresServiceTypeRepo {
    pub fn new(pool: PgPool) -> Self { Self { pool } }
}

#[async_trait]
impl ServiceTypeRepository for PostgresServiceTypeRepo {
    async fn create(&self, service_type: &ServiceType) -> Result<ServiceType, AppError> {
        sqlx::query_as::<_, ServiceType>(
            "INSERT INTO service_types (id, name, description, base_price_cents, duration_min, active, sort_order, created_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
             RETURNING *"
        )
            .bind(&service_type.id).bind(&service_type.name).bind(&service_type.description)
            .bind(service_type.base_price_cents).bind(service_type.duration_min)
            .bind(service_type.active).bind(service_type.sort_order).bind(service_type.created_at)
            .fetch_one(&self.pool).await.map_err(AppError::Database)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<ServiceType>, AppError> {
        sqlx::query_as::<_, ServiceType>("SELECT * FROM service_types WHERE id = $1")
            .bind(id).fetch_optional(&self.pool).await.map_err(AppError::Database)
    }

    async fn list(&self, include_inactive: bool) -> Result<Vec<ServiceType>, AppError> {
        let sql = if include_inactive {
            "SELECT * FROM service_types ORDER BY sort_order, name"
        } else {
            "SELECT * FROM service_types WHERE active = TRUE ORDER BY sort_order, name"
        };
        sqlx::query_as::<_, ServiceType>(sql).fetch_all(&self.pool).await.map_err(AppError::Database)
    }

    async fn update(&self, service_type: &ServiceType) -> Result<ServiceType, AppError> {
        sqlx::query_as::<_, ServiceType>(
            "UPDATE service_types SET name=$1, description=$2, base_price_cents=$3, duration_min=$4, active=$5, sort_order=$6
             WHERE id=$7
             RETURNING *"
        )
            .bind(&service_type.name).bind(&service_type.description).bind(service_type.base_price_cents)
            .bind(service_type.duration_min).bind(service_type.active).bind(service_type.sort_order)
            .bind(&service_type.id)
            .fetch_one(&self.pool).await.map_err(AppError::Database)
    }
}
