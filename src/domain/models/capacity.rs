use serde::{Deserialize, Serialize};
use chrono::{DateTime, Datelike, NaiveDate, NaiveTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// 0 = Sunday .. 6 = Saturday.
pub fn weekday_index(date: NaiveDate) -> i32 {
    date.weekday().num_days_from_sunday() as i32
}

/// Configured ceiling on concurrent bookings for a service. `day_of_week`
/// None means the rule is the all-days default; a start/end time pair marks
/// a slot-based service (grooming).
#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct CapacityRule {
    pub id: String,
    pub service_type_id: String,
    pub day_of_week: Option<i32>,
    pub max_capacity: i32,
    pub start_time: Option<NaiveTime>,
    pub end_time: Option<NaiveTime>,
    pub created_at: DateTime<Utc>,
}

impl CapacityRule {
    pub fn new(
        service_type_id: String,
        day_of_week: Option<i32>,
        max_capacity: i32,
        start_time: Option<NaiveTime>,
        end_time: Option<NaiveTime>,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            service_type_id,
            day_of_week,
            max_capacity,
            start_time,
            end_time,
            created_at: Utc::now(),
        }
    }

    pub fn matches_day(&self, date: NaiveDate) -> bool {
        self.day_of_week.is_none_or(|dow| dow == weekday_index(date))
    }
}

/// Date-specific exception. `service_type_id` None applies facility-wide;
/// `max_capacity` None closes the day outright.
#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct CapacityOverride {
    pub id: String,
    pub date: NaiveDate,
    pub service_type_id: Option<String>,
    pub max_capacity: Option<i32>,
    pub reason: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl CapacityOverride {
    pub fn new(
        date: NaiveDate,
        service_type_id: Option<String>,
        max_capacity: Option<i32>,
        reason: Option<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            date,
            service_type_id,
            max_capacity,
            reason,
            created_at: Utc::now(),
        }
    }
}

/// Per-day verdict returned by the availability resolver. `spots_remaining`
/// is the effective number of animals still bookable, i.e. the per-service
/// remainder further limited by the facility-wide daily cap.
#[derive(Debug, Serialize, Clone)]
pub struct DayAvailability {
    pub date: NaiveDate,
    pub available: bool,
    pub spots_remaining: i64,
    pub total_capacity: i64,
}
