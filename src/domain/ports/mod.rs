use crate::domain::models::{
    animal::Animal,
    booking::{Booking, BookingSpan},
    capacity::{CapacityOverride, CapacityRule, DayAvailability},
    events::DomainEvent,
    pricing::PricingRule,
    service_type::ServiceType,
};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::NaiveDate;

#[async_trait]
pub trait ServiceTypeRepository: Send + Sync {
    async fn create(&self, service_type: &ServiceType) -> Result<ServiceType, AppError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<ServiceType>, AppError>;
    async fn list(&self, include_inactive: bool) -> Result<Vec<ServiceType>, AppError>;
    async fn update(&self, service_type: &ServiceType) -> Result<ServiceType, AppError>;
}

#[async_trait]
pub trait CapacityRuleRepository: Send + Sync {
    async fn create(&self, rule: &CapacityRule) -> Result<CapacityRule, AppError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<CapacityRule>, AppError>;
    async fn list_by_service(&self, service_type_id: &str) -> Result<Vec<CapacityRule>, AppError>;
    async fn update(&self, rule: &CapacityRule) -> Result<CapacityRule, AppError>;
    async fn delete(&self, id: &str) -> Result<(), AppError>;
}

#[async_trait]
pub trait CapacityOverrideRepository: Send + Sync {
    async fn upsert(&self, entity: &CapacityOverride) -> Result<CapacityOverride, AppError>;
    /// Overrides affecting one service in a date range: its own rows plus the
    /// facility-wide (NULL service) rows.
    async fn list_for_service(
        &self,
        service_type_id: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<CapacityOverride>, AppError>;
    async fn list_by_range(&self, start: NaiveDate, end: NaiveDate) -> Result<Vec<CapacityOverride>, AppError>;
    async fn delete(&self, id: &str) -> Result<(), AppError>;
}

#[async_trait]
pub trait PricingRuleRepository: Send + Sync {
    async fn create(&self, rule: &PricingRule) -> Result<PricingRule, AppError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<PricingRule>, AppError>;
    async fn list_by_service(&self, service_type_id: &str) -> Result<Vec<PricingRule>, AppError>;
    async fn list_active_by_service(&self, service_type_id: &str) -> Result<Vec<PricingRule>, AppError>;
    async fn update(&self, rule: &PricingRule) -> Result<PricingRule, AppError>;
    async fn delete(&self, id: &str) -> Result<(), AppError>;
}

#[async_trait]
pub trait AnimalRepository: Send + Sync {
    async fn create(&self, animal: &Animal) -> Result<Animal, AppError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<Animal>, AppError>;
    async fn list_by_customer(&self, customer_id: &str) -> Result<Vec<Animal>, AppError>;
}

#[async_trait]
pub trait BookingRepository: Send + Sync {
    /// Inserts the booking and its animal links after re-validating duplicates
    /// and per-day capacity inside one transaction that serializes concurrent
    /// writers. `day_limits` carries the resolved per-service capacity for
    /// every day of the span.
    async fn create_checked(
        &self,
        booking: &Booking,
        animal_ids: &[String],
        day_limits: &[DayAvailability],
        facility_cap: i64,
    ) -> Result<Booking, AppError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<Booking>, AppError>;
    async fn update(&self, booking: &Booking) -> Result<Booking, AppError>;
    async fn list(&self, date: Option<NaiveDate>) -> Result<Vec<Booking>, AppError>;
    async fn list_by_customer(&self, customer_id: &str) -> Result<Vec<Booking>, AppError>;
    async fn animal_ids(&self, booking_id: &str) -> Result<Vec<String>, AppError>;
    /// Active (capacity-consuming) booking spans overlapping the range, with
    /// animal counts; `service_type_id` None means facility-wide.
    async fn active_spans(
        &self,
        service_type_id: Option<&str>,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<BookingSpan>, AppError>;
    /// Animal ids held by active bookings of this service overlapping the range.
    async fn active_animal_ids_overlapping(
        &self,
        service_type_id: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<String>, AppError>;
}

#[async_trait]
pub trait EventPublisher: Send + Sync {
    async fn publish(&self, event: &DomainEvent);
}
