use crate::domain::{models::service_type::ServiceType, ports::ServiceTypeRepository};
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::SqlitePool;

pub struct SqliteServiceTypeRepo {
    pool: SqlitePool,
}

impl SqliteServiceTypeRepo {
    pub fn new(pool: SqlitePool) -> Self { Self { pool } }
}

#[async_trait]
impl ServiceTypeRepository for SqliteServiceTypeRepo {
    async fn create(&self, service_type: &ServiceType) -> Result<ServiceType, AppError> {
        sqlx::query_as::<_, ServiceType>(
            "INSERT INTO service_types (id, name, description, base_price_cents, duration_min, active, sort_order, created_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?)
             RETURNING *"
        )
            .bind(&service_type.id).bind(&service_type.name).bind(&service_type.description)
            .bind(service_type.base_price_cents).bind(service_type.duration_min)
            .bind(service_type.active).bind(service_type.sort_order).bind(service_type.created_at)
            .fetch_one(&self.pool).await.map_err(AppError::Database)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<ServiceType>, AppError> {
        sqlx::query_as::<_, ServiceType>("SELECT * FROM service_types WHERE id = ?")
            .bind(id).fetch_optional(&self.pool).await.map_err(AppError::Database)
    }

    async fn list(&self, include_inactive: bool) -> Result<Vec<ServiceType>, AppError> {
        let sql = if include_inactive {
            "SELECT * FROM service_types ORDER BY sort_order, name"
        } else {
            "SELECT * FROM service_types WHERE active = 1 ORDER BY sort_order, name"
        };
        sqlx::query_as::<_, ServiceType>(sql).fetch_all(&self.pool).await.map_err(AppError::Database)
    }

    async fn update(&self, service_type: &ServiceType) -> Result<ServiceType, AppError> {
        sqlx::query_as::<_, ServiceType>(
            "UPDATE service_types SET name=?, description=?, base_price_cents=?, duration_min=?, active=?, sort_order=?
             WHERE id=?
             RETURNING *"
        )
            .bind(&service_type.name).bind(&service_type.description).bind(service_type.base_price_cents)
            .bind(service_type.duration_min).bind(service_type.active).bind(service_type.sort_order)
            .bind(&service_type.id)
            .fetch_one(&self.pool).await.map_err(AppError::Database)
    }
}
