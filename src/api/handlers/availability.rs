use axum::{extract::{Query, State}, response::IntoResponse, Json};
use crate::state::AppState;
use crate::error::AppError;
use std::collections::HashMap;
use std::sync::Arc;
use chrono::NaiveDate;

pub async fn get_availability(
    State(state): State<Arc<AppState>>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<impl IntoResponse, AppError> {
    let service_type_id = params.get("service_type")
        .ok_or(AppError::Validation("service_type required".into()))?;
    let start_str = params.get("start").ok_or(AppError::Validation("start required".into()))?;
    let end_str = params.get("end").ok_or(AppError::Validation("end required".into()))?;

    let start = NaiveDate::parse_from_str(start_str, "%Y-%m-%d")
        .map_err(|_| AppError::Validation("Invalid start date".into()))?;
    let end = NaiveDate::parse_from_str(end_str, "%Y-%m-%d")
        .map_err(|_| AppError::Validation("Invalid end date".into()))?;

    let days = state.booking_service.check_availability(service_type_id, start, end).await?;
    Ok(Json(days))
}
