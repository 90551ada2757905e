use chrono::NaiveDate;
use serde::Deserialize;

#[derive(Deserialize)]
pub struct CreateServiceTypeRequest {
    pub name: String,
    pub description: Option<String>,
    pub base_price_cents: i64,
    pub duration_min: Option<i32>,
    pub sort_order: Option<i32>,
}

#[derive(Deserialize)]
pub struct UpdateServiceTypeRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub base_price_cents: Option<i64>,
    pub duration_min: Option<i32>,
    pub active: Option<bool>,
    pub sort_order: Option<i32>,
}

#[derive(Deserialize)]
pub struct CreateCapacityRuleRequest {
    pub service_type_id: String,
    pub day_of_week: Option<i32>,
    pub max_capacity: i32,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
}

#[derive(Deserialize)]
pub struct UpdateCapacityRuleRequest {
    pub max_capacity: Option<i32>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
}

#[derive(Deserialize)]
pub struct UpsertOverrideRequest {
    pub date: NaiveDate,
    pub service_type_id: Option<String>,
    pub closed: bool,
    pub max_capacity: Option<i32>,
    pub reason: Option<String>,
}

#[derive(Deserialize)]
pub struct CreatePricingRuleRequest {
    pub service_type_id: String,
    pub kind: String,
    pub value: i64,
    pub day_of_week: Option<i32>,
    pub min_animals: Option<i32>,
    pub membership_plan_id: Option<String>,
    pub priority: Option<i32>,
}

#[derive(Deserialize)]
pub struct UpdatePricingRuleRequest {
    pub value: Option<i64>,
    pub priority: Option<i32>,
    pub active: Option<bool>,
}

#[derive(Deserialize)]
pub struct CreateAnimalRequest {
    pub name: String,
    pub species: Option<String>,
    pub breed: Option<String>,
    pub notes: Option<String>,
}

#[derive(Deserialize)]
pub struct CreateBookingRequest {
    pub service_type_id: String,
    pub animal_ids: Vec<String>,
    pub date: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub start_time: Option<String>,
    pub notes: Option<String>,
}

#[derive(Deserialize, Default)]
pub struct CancelBookingRequest {
    #[serde(default)]
    pub reason: Option<String>,
}

#[derive(Deserialize)]
pub struct ToolCallRequest {
    pub tool: String,
    #[serde(default)]
    pub arguments: serde_json::Value,
}
