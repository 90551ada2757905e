use std::sync::Arc;
use crate::domain::ports::{
    AnimalRepository, BookingRepository, CapacityOverrideRepository, CapacityRuleRepository,
    EventPublisher, PricingRuleRepository, ServiceTypeRepository,
};
use crate::domain::services::booking_service::BookingService;
use crate::config::Config;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub service_type_repo: Arc<dyn ServiceTypeRepository>,
    pub capacity_rule_repo: Arc<dyn CapacityRuleRepository>,
    pub capacity_override_repo: Arc<dyn CapacityOverrideRepository>,
    pub pricing_rule_repo: Arc<dyn PricingRuleRepository>,
    pub animal_repo: Arc<dyn AnimalRepository>,
    pub booking_repo: Arc<dyn BookingRepository>,
    pub events: Arc<dyn EventPublisher>,
    pub booking_service: Arc<BookingService>,
}
