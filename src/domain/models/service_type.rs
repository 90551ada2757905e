use serde::{Deserialize, Serialize};
use uuid::Uuid;
use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// A bookable offering (daycare, boarding, grooming) with its own capacity
/// and pricing rules. Prices are integer cents.
#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct ServiceType {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub base_price_cents: i64,
    pub duration_min: Option<i32>,
    pub active: bool,
    pub sort_order: i32,
    pub created_at: DateTime<Utc>,
}

impl ServiceType {
    pub fn new(
        name: String,
        description: Option<String>,
        base_price_cents: i64,
        duration_min: Option<i32>,
        sort_order: i32,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name,
            description,
            base_price_cents,
            duration_min,
            active: true,
            sort_order,
            created_at: Utc::now(),
        }
    }
}
