use std::sync::Arc;
use chrono::{NaiveDate, NaiveTime, Utc};
use tracing::info;

use crate::config::Config;
use crate::domain::models::booking::{Booking, BookingStatus, NewBookingParams};
use crate::domain::models::capacity::{weekday_index, CapacityRule, DayAvailability};
use crate::domain::models::events::DomainEvent;
use crate::domain::ports::{
    AnimalRepository, BookingRepository, CapacityOverrideRepository, CapacityRuleRepository,
    EventPublisher, PricingRuleRepository, ServiceTypeRepository,
};
use crate::domain::services::availability::{resolve_range, AvailabilityInputs};
use crate::domain::services::pricing;
use crate::error::AppError;

/// Longest inclusive span accepted for bookings and availability queries.
pub const MAX_RANGE_DAYS: i64 = 30;

pub struct CreateBooking {
    pub customer_id: String,
    pub service_type_id: String,
    pub animal_ids: Vec<String>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub start_time: Option<NaiveTime>,
    pub notes: Option<String>,
}

/// Orchestrates the booking lifecycle over the repository ports. The
/// availability check it performs before insert is advisory; the repository's
/// `create_checked` repeats capacity and duplicate validation under a write
/// lock, which is the authoritative check.
pub struct BookingService {
    service_type_repo: Arc<dyn ServiceTypeRepository>,
    capacity_rule_repo: Arc<dyn CapacityRuleRepository>,
    capacity_override_repo: Arc<dyn CapacityOverrideRepository>,
    pricing_rule_repo: Arc<dyn PricingRuleRepository>,
    animal_repo: Arc<dyn AnimalRepository>,
    booking_repo: Arc<dyn BookingRepository>,
    events: Arc<dyn EventPublisher>,
    facility_daily_cap: i64,
}

impl BookingService {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        service_type_repo: Arc<dyn ServiceTypeRepository>,
        capacity_rule_repo: Arc<dyn CapacityRuleRepository>,
        capacity_override_repo: Arc<dyn CapacityOverrideRepository>,
        pricing_rule_repo: Arc<dyn PricingRuleRepository>,
        animal_repo: Arc<dyn AnimalRepository>,
        booking_repo: Arc<dyn BookingRepository>,
        events: Arc<dyn EventPublisher>,
        config: &Config,
    ) -> Self {
        Self {
            service_type_repo,
            capacity_rule_repo,
            capacity_override_repo,
            pricing_rule_repo,
            animal_repo,
            booking_repo,
            events,
            facility_daily_cap: config.facility_daily_cap,
        }
    }

    pub async fn check_availability(
        &self,
        service_type_id: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<DayAvailability>, AppError> {
        validate_range(start, end)?;
        let service = self
            .service_type_repo
            .find_by_id(service_type_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Service type not found".into()))?;

        self.resolve_days(&service.id, start, end).await
    }

    async fn resolve_days(
        &self,
        service_type_id: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<DayAvailability>, AppError> {
        let rules = self.capacity_rule_repo.list_by_service(service_type_id).await?;
        let overrides = self
            .capacity_override_repo
            .list_for_service(service_type_id, start, end)
            .await?;
        let service_spans = self
            .booking_repo
            .active_spans(Some(service_type_id), start, end)
            .await?;
        let facility_spans = self.booking_repo.active_spans(None, start, end).await?;

        Ok(resolve_range(
            service_type_id,
            start,
            end,
            &AvailabilityInputs {
                rules: &rules,
                overrides: &overrides,
                service_spans: &service_spans,
                facility_spans: &facility_spans,
                facility_cap: self.facility_daily_cap,
            },
        ))
    }

    pub async fn create_booking(&self, req: CreateBooking) -> Result<(Booking, Vec<String>), AppError> {
        let service = self
            .service_type_repo
            .find_by_id(&req.service_type_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Service type not found".into()))?;
        if !service.active {
            return Err(AppError::InactiveService(service.name.clone()));
        }

        if req.animal_ids.is_empty() {
            return Err(AppError::Validation("At least one animal is required".into()));
        }
        let mut animal_ids = req.animal_ids.clone();
        animal_ids.sort();
        animal_ids.dedup();

        for animal_id in &animal_ids {
            let animal = self
                .animal_repo
                .find_by_id(animal_id)
                .await?
                .ok_or_else(|| AppError::NotFound(format!("Animal {animal_id} not found")))?;
            if animal.customer_id != req.customer_id {
                return Err(AppError::Ownership(format!(
                    "Animal {} does not belong to the caller",
                    animal.id
                )));
            }
        }

        validate_range(req.start_date, req.end_date)?;
        if req.start_date < Utc::now().date_naive() {
            return Err(AppError::Validation("Cannot book in the past".into()));
        }

        let rules = self.capacity_rule_repo.list_by_service(&service.id).await?;
        validate_slot(&rules, req.start_date, req.start_time)?;

        let days = self.resolve_days(&service.id, req.start_date, req.end_date).await?;
        let needed = animal_ids.len() as i64;
        let unavailable: Vec<NaiveDate> = days
            .iter()
            .filter(|d| d.spots_remaining < needed)
            .map(|d| d.date)
            .collect();
        if !unavailable.is_empty() {
            return Err(AppError::Capacity { unavailable_dates: unavailable });
        }

        let held = self
            .booking_repo
            .active_animal_ids_overlapping(&service.id, req.start_date, req.end_date)
            .await?;
        let conflicting: Vec<String> = animal_ids
            .iter()
            .filter(|a| held.contains(*a))
            .cloned()
            .collect();
        if !conflicting.is_empty() {
            return Err(AppError::DuplicateBooking {
                animal_ids: conflicting,
                start: req.start_date,
                end: req.end_date,
            });
        }

        let pricing_rules = self.pricing_rule_repo.list_active_by_service(&service.id).await?;
        let total = pricing::price_for_stay(
            service.base_price_cents,
            needed,
            req.start_date,
            req.end_date,
            &pricing_rules,
        );

        let booking = Booking::new(NewBookingParams {
            customer_id: req.customer_id,
            service_type_id: service.id.clone(),
            start_date: req.start_date,
            end_date: req.end_date,
            start_time: req.start_time,
            total_price_cents: total,
            notes: req.notes,
        });

        let created = self
            .booking_repo
            .create_checked(&booking, &animal_ids, &days, self.facility_daily_cap)
            .await?;

        info!(
            "Booking created: {} ({}, {} animals, {} cents)",
            created.id, service.name, needed, created.total_price_cents
        );

        let (span_start, span_end) = created.span();
        self.events
            .publish(&DomainEvent::BookingCreated {
                booking_id: created.id.clone(),
                customer_id: created.customer_id.clone(),
                service_type_id: created.service_type_id.clone(),
                start_date: span_start,
                end_date: span_end,
                animal_count: needed,
                total_price_cents: created.total_price_cents,
            })
            .await;

        Ok((created, animal_ids))
    }

    pub async fn confirm(&self, booking_id: &str) -> Result<Booking, AppError> {
        let booking = self.get(booking_id).await?;
        let updated = self
            .transition(booking, BookingStatus::Confirmed, &[BookingStatus::Pending], |_| {})
            .await?;

        self.events
            .publish(&DomainEvent::BookingConfirmed { booking_id: updated.id.clone() })
            .await;
        Ok(updated)
    }

    pub async fn cancel(
        &self,
        booking_id: &str,
        customer_id: &str,
        reason: Option<String>,
    ) -> Result<Booking, AppError> {
        let booking = self.get(booking_id).await?;
        // Not-found instead of forbidden so booking ids cannot be probed.
        if booking.customer_id != customer_id {
            return Err(AppError::NotFound("Booking not found".into()));
        }

        let event_reason = reason.clone();
        let updated = self
            .transition(
                booking,
                BookingStatus::Cancelled,
                &[BookingStatus::Pending, BookingStatus::Confirmed],
                move |b| b.cancellation_reason = reason,
            )
            .await?;

        self.events
            .publish(&DomainEvent::BookingCancelled {
                booking_id: updated.id.clone(),
                reason: event_reason,
            })
            .await;
        Ok(updated)
    }

    pub async fn check_in(&self, booking_id: &str, staff_id: &str) -> Result<Booking, AppError> {
        let booking = self.get(booking_id).await?;
        let now = Utc::now();
        let actor = staff_id.to_string();
        let updated = self
            .transition(booking, BookingStatus::CheckedIn, &[BookingStatus::Confirmed], move |b| {
                b.checked_in_by = Some(actor);
                b.checked_in_at = Some(now);
            })
            .await?;

        self.events
            .publish(&DomainEvent::BookingCheckedIn {
                booking_id: updated.id.clone(),
                staff_id: staff_id.to_string(),
            })
            .await;
        Ok(updated)
    }

    pub async fn check_out(&self, booking_id: &str, staff_id: &str) -> Result<Booking, AppError> {
        let booking = self.get(booking_id).await?;
        let now = Utc::now();
        let actor = staff_id.to_string();
        let updated = self
            .transition(booking, BookingStatus::CheckedOut, &[BookingStatus::CheckedIn], move |b| {
                b.checked_out_by = Some(actor);
                b.checked_out_at = Some(now);
            })
            .await?;

        self.events
            .publish(&DomainEvent::BookingCheckedOut {
                booking_id: updated.id.clone(),
                staff_id: staff_id.to_string(),
            })
            .await;
        Ok(updated)
    }

    pub async fn mark_no_show(&self, booking_id: &str) -> Result<Booking, AppError> {
        let booking = self.get(booking_id).await?;
        let updated = self
            .transition(
                booking,
                BookingStatus::NoShow,
                &[BookingStatus::Pending, BookingStatus::Confirmed],
                |_| {},
            )
            .await?;

        self.events
            .publish(&DomainEvent::BookingNoShow { booking_id: updated.id.clone() })
            .await;
        Ok(updated)
    }

    pub async fn get(&self, booking_id: &str) -> Result<Booking, AppError> {
        self.booking_repo
            .find_by_id(booking_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Booking not found".into()))
    }

    async fn transition(
        &self,
        mut booking: Booking,
        to: BookingStatus,
        allowed_from: &[BookingStatus],
        apply: impl FnOnce(&mut Booking),
    ) -> Result<Booking, AppError> {
        if !allowed_from.contains(&booking.status) {
            return Err(AppError::InvalidState { current: booking.status, attempted: to });
        }
        booking.status = to;
        apply(&mut booking);
        self.booking_repo.update(&booking).await
    }
}

pub fn validate_range(start: NaiveDate, end: NaiveDate) -> Result<(), AppError> {
    if end < start {
        return Err(AppError::Validation("End date must not be before start date".into()));
    }
    let days = (end - start).num_days() + 1;
    if days > MAX_RANGE_DAYS {
        return Err(AppError::Validation(format!(
            "Date range is limited to {MAX_RANGE_DAYS} days"
        )));
    }
    Ok(())
}

// Slot-based services (the matching rule carries a time window) require a
// start time inside that window; day-capacity services ignore start_time.
fn validate_slot(
    rules: &[CapacityRule],
    date: NaiveDate,
    start_time: Option<NaiveTime>,
) -> Result<(), AppError> {
    let selected = rules
        .iter()
        .find(|r| r.day_of_week == Some(weekday_index(date)))
        .or_else(|| rules.iter().find(|r| r.day_of_week.is_none()));

    if let Some(rule) = selected
        && let (Some(win_start), Some(win_end)) = (rule.start_time, rule.end_time)
    {
        match start_time {
            None => {
                return Err(AppError::Validation("This service requires a start time".into()));
            }
            Some(t) if t < win_start || t > win_end => {
                return Err(AppError::Validation(format!(
                    "Start time must be between {win_start} and {win_end}"
                )));
            }
            _ => {}
        }
    }
    Ok(())
}
