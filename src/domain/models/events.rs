use serde::Serialize;
use chrono::NaiveDate;

/// Ledger change notifications. The audit-log writer and the customer
/// notification sender subscribe out of process; nothing in this service
/// sends messages itself.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DomainEvent {
    BookingCreated {
        booking_id: String,
        customer_id: String,
        service_type_id: String,
        start_date: NaiveDate,
        end_date: NaiveDate,
        animal_count: i64,
        total_price_cents: i64,
    },
    BookingConfirmed {
        booking_id: String,
    },
    BookingCancelled {
        booking_id: String,
        reason: Option<String>,
    },
    BookingCheckedIn {
        booking_id: String,
        staff_id: String,
    },
    BookingCheckedOut {
        booking_id: String,
        staff_id: String,
    },
    BookingNoShow {
        booking_id: String,
    },
}
