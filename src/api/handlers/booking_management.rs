use axum::{extract::{Path, State}, response::IntoResponse, Json};
use crate::state::AppState;
use crate::api::extractors::auth::{CustomerUser, StaffUser};
use crate::api::dtos::requests::CancelBookingRequest;
use crate::error::AppError;
use std::sync::Arc;
use tracing::info;

pub async fn confirm_booking(
    State(state): State<Arc<AppState>>,
    _user: StaffUser,
    Path(booking_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let booking = state.booking_service.confirm(&booking_id).await?;
    info!("Booking confirmed: {}", booking.id);
    Ok(Json(booking))
}

pub async fn cancel_booking(
    State(state): State<Arc<AppState>>,
    user: CustomerUser,
    Path(booking_id): Path<String>,
    payload: Option<Json<CancelBookingRequest>>,
) -> Result<impl IntoResponse, AppError> {
    let reason = payload.and_then(|Json(p)| p.reason);
    let booking = state.booking_service.cancel(&booking_id, &user.customer_id, reason).await?;
    info!("Booking cancelled: {}", booking.id);
    Ok(Json(booking))
}

pub async fn check_in_booking(
    State(state): State<Arc<AppState>>,
    user: StaffUser,
    Path(booking_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let booking = state.booking_service.check_in(&booking_id, &user.staff_id).await?;
    info!("Booking checked in: {} by {}", booking.id, user.staff_id);
    Ok(Json(booking))
}

pub async fn check_out_booking(
    State(state): State<Arc<AppState>>,
    user: StaffUser,
    Path(booking_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let booking = state.booking_service.check_out(&booking_id, &user.staff_id).await?;
    info!("Booking checked out: {} by {}", booking.id, user.staff_id);
    Ok(Json(booking))
}

pub async fn no_show_booking(
    State(state): State<Arc<AppState>>,
    _user: StaffUser,
    Path(booking_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let booking = state.booking_service.mark_no_show(&booking_id).await?;
    info!("Booking marked no-show: {}", booking.id);
    Ok(Json(booking))
}
