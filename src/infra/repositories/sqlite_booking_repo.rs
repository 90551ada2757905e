use crate::domain::{
    models::booking::{Booking, BookingSpan},
    models::capacity::DayAvailability,
    ports::BookingRepository,
};
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::SqlitePool;
use chrono::NaiveDate;

pub struct SqliteBookingRepo {
    pool: SqlitePool,
}

impl SqliteBookingRepo {
    pub fn new(pool: SqlitePool) -> Self { Self { pool } }
}

#[async_trait]
impl BookingRepository for SqliteBookingRepo {
    async fn create_checked(
        &self,
        booking: &Booking,
        animal_ids: &[String],
        day_limits: &[DayAvailability],
        facility_cap: i64,
    ) -> Result<Booking, AppError> {
        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;

        // Touch the service row first so this transaction holds the SQLite
        // write lock before any counting happens; concurrent creates queue
        // here instead of racing the counts below.
        sqlx::query("UPDATE service_types SET active = active WHERE id = ?")
            .bind(&booking.service_type_id)
            .execute(&mut *tx).await.map_err(AppError::Database)?;

        let (span_start, span_end) = booking.span();

        let held: Vec<String> = sqlx::query_scalar(
            "SELECT DISTINCT ba.animal_id FROM bookings b
             JOIN booking_animals ba ON ba.booking_id = b.id
             WHERE b.service_type_id = ? AND b.status IN ('pending', 'confirmed', 'checked_in')
               AND COALESCE(b.start_date, b.date) <= ? AND COALESCE(b.end_date, b.date) >= ?"
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
                 WHERE b.service_type_id = ? AND b.status IN ('pending', 'confirmed', 'checked_in')
                   AND COALESCE(b.start_date, b.date) <= ? AND COALESCE(b.end_date, b.date) >= ?"
            )
                .bind(&booking.service_type_id).bind(day.date).bind(day.date)
                .fetch_one(&mut *tx).await.map_err(AppError::Database)?;

            let facility_booked: i64 = sqlx::query_scalar(
                "SELECT COUNT(ba.animal_id) FROM bookings b
                 JOIN booking_animals ba ON ba.booking_id = b.id
                 WHERE b.status IN ('pending', 'confirmed', 'checked_in')
                   AND COALESCE(b.start_date, b.date) <= ? AND COALESCE(b.end_date, b.date) >= ?"
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
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
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
            sqlx::query("INSERT INTO booking_animals (booking_id, animal_id) VALUES (?, ?)")
                .bind(&created.id).bind(animal_id)
                .execute(&mut *tx).await.map_err(AppError::Database)?;
        }

        tx.commit().await.map_err(AppError::Database)?;
        Ok(created)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Booking>, AppError> {
        sqlx::query_as::<_, Booking>("SELECT * FROM bookings WHERE id = ?")
            .bind(id).fetch_optional(&self.pool).await.map_err(AppError::Database)
    }

    async fn update(&self, booking: &Booking) -> Result<Booking, AppError> {
        sqlx::query_as::<_, Booking>(
            "UPDATE bookings SET status=?, cancellation_reason=?, checked_in_by=?, checked_in_at=?, checked_out_by=?, checked_out_at=?, notes=?
             WHERE id=?
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
                 WHERE COALESCE(start_date, date) <= ? AND COALESCE(end_date, date) >= ?
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
            "SELECT * FROM bookings WHERE customer_id = ? ORDER BY date DESC, created_at DESC"
        )
            .bind(customer_id).fetch_all(&self.pool).await.map_err(AppError::Database)
    }

    async fn animal_ids(&self, booking_id: &str) -> Result<Vec<String>, AppError> {
        sqlx::query_scalar("SELECT animal_id FROM booking_animals WHERE booking_id = ? ORDER BY animal_id")
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
                 WHERE b.service_type_id = ? AND b.status IN ('pending', 'confirmed', 'checked_in')
                   AND COALESCE(b.start_date, b.date) <= ? AND COALESCE(b.end_date, b.date) >= ?
                 GROUP BY b.id"
            )
                .bind(service).bind(end).bind(start)
                .fetch_all(&self.pool).await.map_err(AppError::Database),
            None => sqlx::query_as::<_, BookingSpan>(
                "SELECT COALESCE(b.start_date, b.date) AS span_start, COALESCE(b.end_date, b.date) AS span_end, COUNT(ba.animal_id) AS animal_count
                 FROM bookings b
                 JOIN booking_animals ba ON ba.booking_id = b.id
                 WHERE b.status IN ('pending', 'confirmed', 'checked_in')
                   AND COALESCE(b.start_date, b.date) <= ? AND COALESCE(b.end_date, b.date) >= ?
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
             WHERE b.service_type_id = ? AND b.status IN ('pending', 'confirmed', 'checked_in')
               AND COALESCE(b.start_date, b.date) <= ? AND COALESCE(b.end_date, b.date) >= ?"
        )
            .bind(service_type_id).bind(end).bind(start)
            .fetch_all(&self.pool).await.map_err(AppError::Database)
    }
}
