use axum::{extract::{Path, State}, response::IntoResponse, Json};
use crate::state::AppState;
use crate::api::extractors::auth::StaffUser;
use crate::api::dtos::requests::{CreateServiceTypeRequest, UpdateServiceTypeRequest};
use crate::domain::models::service_type::ServiceType;
use crate::error::AppError;
use std::sync::Arc;
use tracing::info;

/// Public services-and-pricing listing for customers and the concierge.
pub async fn list_services(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, AppError> {
    let services = state.service_type_repo.list(false).await?;
    Ok(Json(services))
}

pub async fn list_all_services(
    State(state): State<Arc<AppState>>,
    _user: StaffUser,
) -> Result<impl IntoResponse, AppError> {
    let services = state.service_type_repo.list(true).await?;
    Ok(Json(services))
}

pub async fn create_service_type(
    State(state): State<Arc<AppState>>,
    _user: StaffUser,
    Json(payload): Json<CreateServiceTypeRequest>,
) -> Result<impl IntoResponse, AppError> {
    if payload.base_price_cents < 0 {
        return Err(AppError::Validation("Base price must not be negative".into()));
    }

    let service_type = ServiceType::new(
        payload.name,
        payload.description,
        payload.base_price_cents,
        payload.duration_min,
        payload.sort_order.unwrap_or(0),
    );

    let created = state.service_type_repo.create(&service_type).await?;
    info!("Service type created: {} ({})", created.name, created.id);
    Ok(Json(created))
}

pub async fn update_service_type(
    State(state): State<Arc<AppState>>,
    _user: StaffUser,
    Path(service_type_id): Path<String>,
    Json(payload): Json<UpdateServiceTypeRequest>,
) -> Result<impl IntoResponse, AppError> {
    let mut service_type = state.service_type_repo.find_by_id(&service_type_id).await?
        .ok_or(AppError::NotFound("Service type not found".into()))?;

    if let Some(name) = payload.name { service_type.name = name; }
    if let Some(description) = payload.description { service_type.description = Some(description); }
    if let Some(price) = payload.base_price_cents {
        if price < 0 {
            return Err(AppError::Validation("Base price must not be negative".into()));
        }
        service_type.base_price_cents = price;
    }
    if let Some(duration) = payload.duration_min { service_type.duration_min = Some(duration); }
    if let Some(active) = payload.active { service_type.active = active; }
    if let Some(sort_order) = payload.sort_order { service_type.sort_order = sort_order; }

    let updated = state.service_type_repo.update(&service_type).await?;
    info!("Service type updated: {}", updated.id);
    Ok(Json(updated))
}
