use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::NaiveDate;
use serde_json::{json, Value};
use thiserror::Error;
use tracing::error;

use crate::domain::models::booking::BookingStatus;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("Resource not found: {0}")]
    NotFound(String),
    #[error("Service is not bookable: {0}")]
    InactiveService(String),
    #[error("Not owned by caller: {0}")]
    Ownership(String),
    #[error("Invalid input: {0}")]
    Validation(String),
    #[error("No capacity left on the requested dates")]
    Capacity { unavailable_dates: Vec<NaiveDate> },
    #[error("Animal already booked for an overlapping date range")]
    DuplicateBooking {
        animal_ids: Vec<String>,
        start: NaiveDate,
        end: NaiveDate,
    },
    #[error("Booking is {current}, cannot move to {attempted}")]
    InvalidState {
        current: BookingStatus,
        attempted: BookingStatus,
    },
    #[error("Unauthorized")]
    Unauthorized,
    #[error("Forbidden: {0}")]
    Forbidden(String),
    #[error("Internal server error")]
    Internal,
}

impl AppError {
    pub fn code(&self) -> &'static str {
        match self {
            AppError::Database(_) => "database",
            AppError::NotFound(_) => "not_found",
            AppError::InactiveService(_) => "inactive_service",
            AppError::Ownership(_) => "ownership",
            AppError::Validation(_) => "validation",
            AppError::Capacity { .. } => "capacity",
            AppError::DuplicateBooking { .. } => "duplicate_booking",
            AppError::InvalidState { .. } => "invalid_state",
            AppError::Unauthorized => "unauthorized",
            AppError::Forbidden(_) => "forbidden",
            AppError::Internal => "internal",
        }
    }

    /// Structured body shared by HTTP responses and the AI tool envelope:
    /// callers must be able to explain a refusal without re-deriving it.
    pub fn to_body(&self) -> Value {
        let mut body = json!({
            "code": self.code(),
            "error": self.public_message(),
        });
        match self {
            AppError::Capacity { unavailable_dates } => {
                body["unavailable_dates"] = json!(unavailable_dates);
            }
            AppError::DuplicateBooking { animal_ids, start, end } => {
                body["animal_ids"] = json!(animal_ids);
                body["start"] = json!(start);
                body["end"] = json!(end);
            }
            AppError::InvalidState { current, attempted } => {
                body["current"] = json!(current);
                body["attempted"] = json!(attempted);
            }
            _ => {}
        }
        body
    }

    fn public_message(&self) -> String {
        match self {
            AppError::Database(_) | AppError::Internal => "Internal server error".to_string(),
            other => other.to_string(),
        }
    }

    fn status(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::InactiveService(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Ownership(_) | AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Capacity { .. }
            | AppError::DuplicateBooking { .. }
            | AppError::InvalidState { .. } => StatusCode::CONFLICT,
            AppError::Unauthorized => StatusCode::UNAUTHORIZED,
            AppError::Database(_) | AppError::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if let AppError::Database(e) = &self {
            if let Some(db_err) = e.as_database_error() {
                let code = db_err.code().unwrap_or_default();

                // 2067 = SQLite Unique Constraint
                // 23505 = PostgreSQL Unique Violation
                if code == "2067" || code == "23505" {
                    return (
                        StatusCode::CONFLICT,
                        Json(json!({ "code": "conflict", "error": "Resource already exists (duplicate entry)" })),
                    )
                        .into_response();
                }
            }
            error!("Database error: {:?}", e);
        }

        (self.status(), Json(self.to_body())).into_response()
    }
}
