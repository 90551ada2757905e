use serde::{Deserialize, Serialize};
use uuid::Uuid;
use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Customer-owned pet. Ownership is the basis for every booking permission
/// check on the customer side.
#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct Animal {
    pub id: String,
    pub customer_id: String,
    pub name: String,
    pub species: String,
    pub breed: Option<String>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Animal {
    pub fn new(
        customer_id: String,
        name: String,
        species: String,
        breed: Option<String>,
        notes: Option<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            customer_id,
            name,
            species,
            breed,
            notes,
            created_at: Utc::now(),
        }
    }
}
