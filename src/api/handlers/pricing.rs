use axum::{extract::{Path, Query, State}, response::IntoResponse, Json};
use crate::state::AppState;
use crate::api::extractors::auth::StaffUser;
use crate::api::dtos::requests::{CreatePricingRuleRequest, UpdatePricingRuleRequest};
use crate::domain::models::pricing::{Adjustment, PricingRule};
use crate::error::AppError;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::info;

pub async fn create_rule(
    State(state): State<Arc<AppState>>,
    _user: StaffUser,
    Json(payload): Json<CreatePricingRuleRequest>,
) -> Result<impl IntoResponse, AppError> {
    let service = state.service_type_repo.find_by_id(&payload.service_type_id).await?
        .ok_or(AppError::NotFound("Service type not found".into()))?;

    if let Some(dow) = payload.day_of_week
        && !(0..=6).contains(&dow)
    {
        return Err(AppError::Validation("day_of_week must be between 0 (Sunday) and 6".into()));
    }
    if let Some(min) = payload.min_animals
        && min < 1
    {
        return Err(AppError::Validation("min_animals must be at least 1".into()));
    }

    let adjustment = Adjustment::from_parts(&payload.kind, payload.value)?;

    let rule = PricingRule::new(
        service.id,
        adjustment,
        payload.day_of_week,
        payload.min_animals,
        payload.membership_plan_id,
        payload.priority.unwrap_or(0),
    );

    let created = state.pricing_rule_repo.create(&rule).await?;
    info!("Pricing rule created: {} ({})", created.id, created.adjustment.kind());
    Ok(Json(created))
}

pub async fn list_rules(
    State(state): State<Arc<AppState>>,
    _user: StaffUser,
    Query(params): Query<HashMap<String, String>>,
) -> Result<impl IntoResponse, AppError> {
    let service_type_id = params.get("service_type")
        .ok_or(AppError::Validation("service_type required".into()))?;

    let rules = state.pricing_rule_repo.list_by_service(service_type_id).await?;
    Ok(Json(rules))
}

pub async fn update_rule(
    State(state): State<Arc<AppState>>,
    _user: StaffUser,
    Path(rule_id): Path<String>,
    Json(payload): Json<UpdatePricingRuleRequest>,
) -> Result<impl IntoResponse, AppError> {
    let mut rule = state.pricing_rule_repo.find_by_id(&rule_id).await?
        .ok_or(AppError::NotFound("Pricing rule not found".into()))?;

    if let Some(value) = payload.value {
        rule.adjustment = Adjustment::from_parts(rule.adjustment.kind(), value)?;
    }
    if let Some(priority) = payload.priority { rule.priority = priority; }
    if let Some(active) = payload.active { rule.active = active; }

    let updated = state.pricing_rule_repo.update(&rule).await?;
    info!("Pricing rule updated: {}", updated.id);
    Ok(Json(updated))
}

pub async fn delete_rule(
    State(state): State<Arc<AppState>>,
    _user: StaffUser,
    Path(rule_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    state.pricing_rule_repo.delete(&rule_id).await?;
    info!("Pricing rule deleted: {}", rule_id);
    Ok(Json(serde_json::json!({"status": "deleted"})))
}
