pub mod postgres_animal_repo;
pub mod postgres_booking_repo;
pub mod postgres_capacity_override_repo;
pub mod postgres_capacity_rule_repo;
pub mod postgres_pricing_rule_repo;
pub mod postgres_service_type_repo;
pub mod sqlite_animal_repo;
pub mod sqlite_booking_repo;
pub mod sqlite_capacity_override_repo;
pub mod sqlite_capacity_rule_repo;
pub mod sqlite_pricing_rule_repo;
pub mod sqlite_service_type_repo;
