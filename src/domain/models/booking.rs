use serde::{Deserialize, Serialize};
use uuid::Uuid;
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use sqlx::FromRow;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(rename_all = "snake_case")]
pub enum BookingStatus {
    Pending,
    Confirmed,
    CheckedIn,
    CheckedOut,
    Cancelled,
    NoShow,
}

impl BookingStatus {
    /// Statuses that still consume capacity.
    pub fn is_active(self) -> bool {
        matches!(self, Self::Pending | Self::Confirmed | Self::CheckedIn)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Confirmed => "confirmed",
            Self::CheckedIn => "checked_in",
            Self::CheckedOut => "checked_out",
            Self::Cancelled => "cancelled",
            Self::NoShow => "no_show",
        }
    }
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A reservation for one or more animals. Single-day bookings carry only
/// `date`; multi-day bookings additionally set `start_date`/`end_date` with
/// `date = start_date`. Participating animals live in the booking_animals
/// join table.
#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct Booking {
    pub id: String,
    pub customer_id: String,
    pub service_type_id: String,
    pub date: NaiveDate,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub start_time: Option<NaiveTime>,
    pub status: BookingStatus,
    pub total_price_cents: i64,
    pub cancellation_reason: Option<String>,
    pub checked_in_by: Option<String>,
    pub checked_in_at: Option<DateTime<Utc>>,
    pub checked_out_by: Option<String>,
    pub checked_out_at: Option<DateTime<Utc>>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

pub struct NewBookingParams {
    pub customer_id: String,
    pub service_type_id: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub start_time: Option<NaiveTime>,
    pub total_price_cents: i64,
    pub notes: Option<String>,
}

impl Booking {
    pub fn new(params: NewBookingParams) -> Self {
        let multi_day = params.end_date > params.start_date;

        Self {
            id: Uuid::new_v4().to_string(),
            customer_id: params.customer_id,
            service_type_id: params.service_type_id,
            date: params.start_date,
            start_date: multi_day.then_some(params.start_date),
            end_date: multi_day.then_some(params.end_date),
            start_time: params.start_time,
            status: BookingStatus::Pending,
            total_price_cents: params.total_price_cents,
            cancellation_reason: None,
            checked_in_by: None,
            checked_in_at: None,
            checked_out_by: None,
            checked_out_at: None,
            notes: params.notes,
            created_at: Utc::now(),
        }
    }

    /// Inclusive calendar span the booking occupies.
    pub fn span(&self) -> (NaiveDate, NaiveDate) {
        match (self.start_date, self.end_date) {
            (Some(start), Some(end)) => (start, end),
            _ => (self.date, self.date),
        }
    }
}

/// Compressed ledger row used by the availability resolver: the date span an
/// active booking covers plus how many animals it brings.
#[derive(Debug, FromRow, Clone)]
pub struct BookingSpan {
    pub span_start: NaiveDate,
    pub span_end: NaiveDate,
    pub animal_count: i64,
}
