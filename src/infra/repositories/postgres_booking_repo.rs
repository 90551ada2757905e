use crate::domain::{
    models::booking::{Booking, BookingSpan},
    models::capacity::DayAvailability,
    ports::BookingRepository,
};
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::PgPool;
use chrono::NaiveDate;

// The facility-wide cap spans every service type, so all booking creates
// serialize on one transaction-scoped advisory lock.
const BOOKING_LEDGER_LOCK_KEY: i64 = 0x70617773;

pub struct PostgresBookingRepo {
    pool: PgPool,
}

impl PostgresBookingRepo {
    pub fn new(pool: PgPool) -> Self { Self { pool } }
}

#[async_trait]
impl BookingRepository for PostgresBookingRepo {
    async fn create_checked(
        &self,
        booking: &Booking,
        animal_ids: &[String],
        day_limits: &[DayAvailability],
        facility_cap: i64,
    ) -> Result<Booking, AppError> {
        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;

        sqlx::query("SELECT pg_advisory_xact_lock($1)")
            .bind(BOOKING_LEDGER_LOCK_KEY)
            .execute(&mut *tx).await.map_err(AppError::Database)?;

        let (span_start, span_end) = booking.span();

        let held: Vec<String> = sqlx::query_scalar(
            "SELECT DISTINCT ba.animal_id FROM bookings b
             JOIN booking_animals ba ON ba.booking_id = b.id
             WHERE b.service_type_id = $1 AND b.status IN ('pending', 'confirmed', 'checked_in')
               AND COALESCE(b.start_date, b.date) <= $2 AND COALESCE(b.end_date, b.date) >= $3"
        )
            .bind(&booking.service_type_id).bind(span_end).bind(span_start)
            .fetch_all(&mut *tx).await.map_err(AppError::Database)?;

        let conflicting: Vec<String> = animal_ids.iter().filter(|a| held.contains(*a)).cloned().collect();
        if !conflicting.is_empty() {
            return Err(AppError::DuplicateBooking {
                animal_ids: conflicting,
                start: span_start,
                end: span_end,
            });
        }

        let added = animal_ids.len() as i64;
        let mut full_dates = Vec::new();
        for day in day_limits {
            let booked: i64 = sqlx::query_scalar(
                "SELECT COUNT(ba.animal_id) FROM bookings b
                 JOIN booking_animals ba ON ba.booking_id = b.id
                 WHERE b.service_type_id = $1 AND b.status IN ('pending', 'confirmed', 'checked_in')
                   AND COALESCE(b.start_date, b.date) <= $2 AND COALESCE(b.end_date, b.date) >= $3"
            )
                .bind(&booking.service_type_id).bind(day.date).bind(day.date)
                .fetch_one(&mut *tx).await.map_err(AppError::Database)?;

            let facility_booked: i64 = sqlx::query_scalar(
                "SELECT COUNT(ba.animal_id) FROM bookings b
                 JOIN booking_animals ba ON ba.booking_id = b.id
                 WHERE b.status IN ('pending', 'confirmed', 'checked_in')
                   AND COALESCE(b.start_date, b.date) <= $1 AND COALESCE(b.end_date, b.date) >= $2"
            )
                .bind(day.date).bind(day.date)
                .fetch_one(&mut *tx).await.map_err(AppError::Database)?;

            if booked + added > day.total_capacity || facility_booked + added > facility_cap {
                full_dates.push(day.date);
            }
        }
        if !full_dates.is_empty() {
            return Err(AppError::Capacity { unavailable_dates: full_dates });
        }

        let created = sqlx::query_as::<_, Booking>(
            "INSERT INTO bookings (id, customer_id, service_type_id, date, start_date, end_date, start_time, status, total_price_cents, cancellation_reason, checked_in_by, checked_in_at, checked_out_by, checked_out_at, notes, created_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16)
             RETURNING *"
        )
            .bind(&booking.id).bind(&booking.customer_id).bind(&booking.service_type_id)
            .bind(booking.date).bind(booking.start_date).bind(booking.end_date).bind(booking.start_time)
            .bind(booking.status).bind(booking.total_price_cents).bind(&booking.cancellation_reason)
            .bind(&booking.checked_in_by).bind(booking.checked_in_at)
            .bind(&booking.checked_out_by).bind(booking.checked_out_at)
            .bind(&booking.notes).bind(booking.created_at)
            .fetch_one(&mut *tx).await.map_err(AppError::Database)?;

        for animal_id in animal_ids {
            sqlx::query("INSERT INTO booking_animals (booking_id, animal_id) VALUES ($1, $2)")
                .bind(&created.id).bind(animal_id)
                .execute(&mut *tx).await.map_err(AppError::Database)?;
        }

        tx.commit().await.map_err(AppError::Database)?;
        Ok(created)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Booking>, AppError> {
        sqlx::query_as::<_, Booking>("SELECT * FROM bookings WHERE id = $1")
            .bind(id).fetch_optional(&self.pool).await.map_err(AppError::Database)
    }

    async fn update(&self, booking: &Booking) -> Result<Booking, AppError> {
        sqlx::query_as::<_, Booking>(
            "UPDATE bookings SET status=$1, cancellation_reason=$2, checked_in_by=$3, checked_in_at=$4, checked_out_by=$5, checked_out_at=$6, notes=$7
             WHERE id=$8
             RETURNING *"
        )
            .bind(booking.status).bind(&booking.cancellation_reason)
            .bind(&booking.checked_in_by).bind(booking.checked_in_at)
            .bind(&booking.checked_out_by).bind(booking.checked_out_at)
            .bind(&booking.notes).bind(&booking.id)
            .fetch_one(&self.pool).await.map_err(AppError::Database)
    }

    async fn list(&self, date: Option<NaiveDate>) -> Result<Vec<Booking>, AppError> {
        match date {
            Some(d) => sqlx::query_as::<_, Booking>(
                "SELECT * FROM bookings
                 WHERE COALESCE(start_date, date) <= $1 AND COALESCE(end_date, date) >= $2
                 ORDER BY date, created_at"
            )
                .bind(d).bind(d)
                .fetch_all(&self.pool).await.map_err(AppError::Database),
            None => sqlx::query_as::<_, Booking>("SELECT * FROM bookings ORDER BY date DESC, created_at DESC")
                .fetch_all(&self.pool).await.map_err(AppError::Database),
        }
    }

    async fn list_by_customer(&self, customer_id: &str) -> Result<Vec<Booking>, AppError> {
        sqlx::query_as::<_, Booking>(
            "SELECT * FROM bookings WHERE customer_id = $1 ORDER BY date DESC, created_at DESC"
        )
            .bind(customer_id).fetch_all(&self.pool).await.map_err(AppError::Database)
    }

    async fn animal_ids(&self, booking_id: &str) -> Result<Vec<String>, AppError> {
        sqlx::query_scalar("SELECT animal_id FROM booking_animals WHERE booking_id = $1 ORDER BY animal_id")
            .bind(booking_id).fetch_all(&self.pool).await.map_err(AppError::Database)
    }

    async fn active_spans(
        &self,
        service_type_id: Option<&str>,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<BookingSpan>, AppError> {
        match service_type_id {
            Some(service) => sqlx::query_as::<_, BookingSpan>(
                "SELECT COALESCE(b.start_date, b.date) AS span_start, COALESCE(b.end_date, b.date) AS span_end, COUNT(ba.animal_id) AS animal_count
                 FROM bookings b
                 JOIN booking_animals ba ON ba.booking_id = b.id
                 WHERE b.service_type_id = $1 AND b.status IN ('pending', 'confirmed', 'checked_in')
                   AND COALESCE(b.start_date, b.date) <= $2 AND COALESCE(b.end_date, b.date) >= $3
                 GROUP BY b.id"
            )
                .bind(service).bind(end).bind(start)
                .fetch_all(&self.pool).await.map_err(AppError::Database),
            None => sqlx::query_as::<_, BookingSpan>(
                "SELECT COALESCE(b.start_date, b.date) AS span_start, COALESCE(b.end_date, b.date) AS span_end, COUNT(ba.animal_id) AS animal_count
                 FROM bookings b
                 JOIN booking_animals ba ON ba.booking_id = b.id
                 WHERE b.status IN ('pending', 'confirmed', 'checked_in')
                   AND COALESCE(b.start_date, b.date) <= $1 AND COALESCE(b.end_date, b.date) >= $2
                 GROUP BY b.id"
            )
                .bind(end).bind(start)
                .fetch_all(&self.pool).await.map_err(AppError::Database),
        }
    }

    async fn active_animal_ids_overlapping(
        &self,
        service_type_id: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<String>, AppError> {
        sqlx::query_scalar(
            "SELECT DISTINCT ba.animal_id FROM bookings b
             JOIN booking_animals ba ON ba.booking_id = b.id
             WHERE b.service_type_id = $1 AND b.status IN ('pending', 'confirmed', 'checked_in')
               AND COALESCE(b.start_date, b.date) <= $2 AND COALESCE(b.end_date, b.date) >= $3"
        )
            .bind(service_type_id).bind(end).bind(start)
            .fetch_all(&self.pool).await.map_err(AppError::Database)
    }
}
