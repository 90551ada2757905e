use crate::domain::{models::animal::Animal, ports::AnimalRepository};
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::SqlitePool;

pub struct SqliteAnimalRepo {
    pool: SqlitePool,
}

impl SqliteAnimalRepo {
    pub fn new(pool: SqlitePool) -> Self { Self { pool } }
}

#[async_trait]
impl AnimalRepository for SqliteAnimalRepo {
    async fn create(&self, animal: &Animal) -> Result<Animal, AppError> {
        sqlx::query_as::<_, Animal>(
            "INSERT INTO animals (id, customer_id, name, species, breed, notes, created_at)
             VALUES (?, ?, ?, ?, ?, ?, ?)
             RETURNING *"
        )
            .bind(&animal.id).bind(&animal.customer_id).bind(&animal.name)
            .bind(&animal.species).bind(&animal.breed).bind(&animal.notes).bind(animal.created_at)
            .fetch_one(&self.pool).await.map_err(AppError::Database)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Animal>, AppError> {
        sqlx::query_as::<_, Animal>("SELECT * FROM animals WHERE id = ?")
            .bind(id).fetch_optional(&self.pool).await.map_err(AppError::Database)
    }

    async fn list_by_customer(&self, customer_id: &str) -> Result<Vec<Animal>, AppError> {
        sqlx::query_as::<_, Animal>("SELECT * FROM animals WHERE customer_id = ? ORDER BY name")
            .bind(customer_id).fetch_all(&self.pool).await.map_err(AppError::Database)
    }
}
