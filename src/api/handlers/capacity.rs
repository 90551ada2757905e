use axum::{extract::{Path, Query, State}, response::IntoResponse, Json};
use crate::state::AppState;
use crate::api::extractors::auth::StaffUser;
use crate::api::dtos::requests::{CreateCapacityRuleRequest, UpdateCapacityRuleRequest, UpsertOverrideRequest};
use crate::domain::models::capacity::{CapacityOverride, CapacityRule};
use crate::error::AppError;
use std::collections::HashMap;
use std::sync::Arc;
use chrono::{NaiveDate, NaiveTime};
use tracing::info;

fn parse_time(value: Option<&str>) -> Result<Option<NaiveTime>, AppError> {
    value
        .map(|t| NaiveTime::parse_from_str(t, "%H:%M")
            .map_err(|_| AppError::Validation("Invalid time format (HH:MM)".into())))
        .transpose()
}

fn validate_day_of_week(day_of_week: Option<i32>) -> Result<(), AppError> {
    if let Some(dow) = day_of_week
        && !(0..=6).contains(&dow)
    {
        return Err(AppError::Validation("day_of_week must be between 0 (Sunday) and 6".into()));
    }
    Ok(())
}

pub async fn create_rule(
    State(state): State<Arc<AppState>>,
    _user: StaffUser,
    Json(payload): Json<CreateCapacityRuleRequest>,
) -> Result<impl IntoResponse, AppError> {
    let service = state.service_type_repo.find_by_id(&payload.service_type_id).await?
        .ok_or(AppError::NotFound("Service type not found".into()))?;

    validate_day_of_week(payload.day_of_week)?;
    if payload.max_capacity < 0 {
        return Err(AppError::Validation("max_capacity must not be negative".into()));
    }

    let start_time = parse_time(payload.start_time.as_deref())?;
    let end_time = parse_time(payload.end_time.as_deref())?;
    if start_time.is_some() != end_time.is_some() {
        return Err(AppError::Validation("start_time and end_time must be set together".into()));
    }
    if let (Some(s), Some(e)) = (start_time, end_time)
        && e <= s
    {
        return Err(AppError::Validation("end_time must be after start_time".into()));
    }

    // At most one rule may govern a given (day, slot) combination.
    let existing = state.capacity_rule_repo.list_by_service(&service.id).await?;
    let clashes = existing.iter().any(|r| {
        r.day_of_week == payload.day_of_week
            && match ((r.start_time, r.end_time), (start_time, end_time)) {
                ((Some(rs), Some(re)), (Some(s), Some(e))) => s < re && rs < e,
                _ => true,
            }
    });
    if clashes {
        return Err(AppError::Validation("A rule already covers this day and time slot".into()));
    }

    let rule = CapacityRule::new(
        service.id,
        payload.day_of_week,
        payload.max_capacity,
        start_time,
        end_time,
    );

    let created = state.capacity_rule_repo.create(&rule).await?;
    info!("Capacity rule created: {} for service {}", created.id, created.service_type_id);
    Ok(Json(created))
}

pub async fn list_rules(
    State(state): State<Arc<AppState>>,
    _user: StaffUser,
    Query(params): Query<HashMap<String, String>>,
) -> Result<impl IntoResponse, AppError> {
    let service_type_id = params.get("service_type")
        .ok_or(AppError::Validation("service_type required".into()))?;

    let rules = state.capacity_rule_repo.list_by_service(service_type_id).await?;
    Ok(Json(rules))
}

pub async fn update_rule(
    State(state): State<Arc<AppState>>,
    _user: StaffUser,
    Path(rule_id): Path<String>,
    Json(payload): Json<UpdateCapacityRuleRequest>,
) -> Result<impl IntoResponse, AppError> {
    let mut rule = state.capacity_rule_repo.find_by_id(&rule_id).await?
        .ok_or(AppError::NotFound("Capacity rule not found".into()))?;

    if let Some(cap) = payload.max_capacity {
        if cap < 0 {
            return Err(AppError::Validation("max_capacity must not be negative".into()));
        }
        rule.max_capacity = cap;
    }
    if let Some(t) = parse_time(payload.start_time.as_deref())? { rule.start_time = Some(t); }
    if let Some(t) = parse_time(payload.end_time.as_deref())? { rule.end_time = Some(t); }

    let updated = state.capacity_rule_repo.update(&rule).await?;
    info!("Capacity rule updated: {}", updated.id);
    Ok(Json(updated))
}

pub async fn delete_rule(
    State(state): State<Arc<AppState>>,
    _user: StaffUser,
    Path(rule_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    state.capacity_rule_repo.delete(&rule_id).await?;
    info!("Capacity rule deleted: {}", rule_id);
    Ok(Json(serde_json::json!({"status": "deleted"})))
}

pub async fn upsert_override(
    State(state): State<Arc<AppState>>,
    _user: StaffUser,
    Json(payload): Json<UpsertOverrideRequest>,
) -> Result<impl IntoResponse, AppError> {
    if let Some(service_type_id) = &payload.service_type_id {
        state.service_type_repo.find_by_id(service_type_id).await?
            .ok_or(AppError::NotFound("Service type not found".into()))?;
    }

    let max_capacity = if payload.closed {
        None
    } else {
        match payload.max_capacity {
            Some(cap) if cap >= 0 => Some(cap),
            Some(_) => return Err(AppError::Validation("max_capacity must not be negative".into())),
            None => return Err(AppError::Validation("max_capacity required unless closed".into())),
        }
    };

    let entity = CapacityOverride::new(
        payload.date,
        payload.service_type_id,
        max_capacity,
        payload.reason,
    );

    let saved = state.capacity_override_repo.upsert(&entity).await?;
    info!("Capacity override upserted for {}", saved.date);
    Ok(Json(saved))
}

pub async fn list_overrides(
    State(state): State<Arc<AppState>>,
    _user: StaffUser,
    Query(params): Query<HashMap<String, String>>,
) -> Result<impl IntoResponse, AppError> {
    let start_str = params.get("start").ok_or(AppError::Validation("start required".into()))?;
    let end_str = params.get("end").ok_or(AppError::Validation("end required".into()))?;

    let start = NaiveDate::parse_from_str(start_str, "%Y-%m-%d")
        .map_err(|_| AppError::Validation("Invalid start".into()))?;
    let end = NaiveDate::parse_from_str(end_str, "%Y-%m-%d")
        .map_err(|_| AppError::Validation("Invalid end".into()))?;

    let overrides = state.capacity_override_repo.list_by_range(start, end).await?;
    Ok(Json(overrides))
}

pub async fn delete_override(
    State(state): State<Arc<AppState>>,
    _user: StaffUser,
    Path(override_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    state.capacity_override_repo.delete(&override_id).await?;
    info!("Capacity override deleted: {}", override_id);
    Ok(Json(serde_json::json!({"status": "deleted"})))
}
