use axum::{extract::{Path, Query, State}, response::IntoResponse, Json};
use crate::state::AppState;
use crate::api::extractors::auth::{CustomerUser, StaffUser};
use crate::api::dtos::{requests::CreateBookingRequest, responses::BookingResponse};
use crate::domain::services::booking_service::CreateBooking;
use crate::error::AppError;
use std::collections::HashMap;
use std::sync::Arc;
use chrono::{NaiveDate, NaiveTime};

pub async fn create_booking(
    State(state): State<Arc<AppState>>,
    user: CustomerUser,
    Json(payload): Json<CreateBookingRequest>,
) -> Result<impl IntoResponse, AppError> {
    let (start_date, end_date) = parse_booking_span(&payload)?;

    let start_time = payload.start_time.as_deref()
        .map(|t| NaiveTime::parse_from_str(t, "%H:%M")
            .map_err(|_| AppError::Validation("Invalid start time (HH:MM)".into())))
        .transpose()?;

    let (booking, animal_ids) = state.booking_service.create_booking(CreateBooking {
        customer_id: user.customer_id,
        service_type_id: payload.service_type_id,
        animal_ids: payload.animal_ids,
        start_date,
        end_date,
        start_time,
        notes: payload.notes,
    }).await?;

    Ok(Json(BookingResponse { booking, animal_ids }))
}

// Callers send either `date` alone (single day) or both range bounds.
fn parse_booking_span(payload: &CreateBookingRequest) -> Result<(NaiveDate, NaiveDate), AppError> {
    let parse = |s: &str| NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map_err(|_| AppError::Validation("Invalid date format".into()));

    match (payload.date.as_deref(), payload.start_date.as_deref(), payload.end_date.as_deref()) {
        (Some(d), None, None) => {
            let d = parse(d)?;
            Ok((d, d))
        }
        (None, Some(s), Some(e)) => Ok((parse(s)?, parse(e)?)),
        _ => Err(AppError::Validation("Provide either date, or start_date and end_date".into())),
    }
}

pub async fn list_bookings(
    State(state): State<Arc<AppState>>,
    _user: StaffUser,
    Query(params): Query<HashMap<String, String>>,
) -> Result<impl IntoResponse, AppError> {
    let date = params.get("date")
        .map(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d")
            .map_err(|_| AppError::Validation("Invalid date".into())))
        .transpose()?;

    let bookings = state.booking_repo.list(date).await?;
    Ok(Json(bookings))
}

pub async fn get_booking(
    State(state): State<Arc<AppState>>,
    _user: StaffUser,
    Path(booking_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let booking = state.booking_service.get(&booking_id).await?;
    let animal_ids = state.booking_repo.animal_ids(&booking.id).await?;
    Ok(Json(BookingResponse { booking, animal_ids }))
}

pub async fn my_bookings(
    State(state): State<Arc<AppState>>,
    user: CustomerUser,
) -> Result<impl IntoResponse, AppError> {
    let bookings = state.booking_repo.list_by_customer(&user.customer_id).await?;
    Ok(Json(bookings))
}
