use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use sqlx::{postgres::{PgPoolOptions, PgConnectOptions}, sqlite::{SqlitePoolOptions, SqliteJournalMode, SqliteConnectOptions}};
use sqlx::{PgPool, SqlitePool, ConnectOptions};
use tracing::info;
use tracing::log::LevelFilter;

use crate::config::Config;
use crate::state::AppState;
use crate::domain::services::booking_service::BookingService;
use crate::infra::events::TracingEventPublisher;
use crate::infra::repositories::{
    postgres_animal_repo::PostgresAnimalRepo, postgres_booking_repo::PostgresBookingRepo,
    postgres_capacity_override_repo::PostgresCapacityOverrideRepo,
    postgres_capacity_rule_repo::PostgresCapacityRuleRepo,
    postgres_pricing_rule_repo::PostgresPricingRuleRepo,
    postgres_service_type_repo::PostgresServiceTypeRepo,
    sqlite_animal_repo::SqliteAnimalRepo, sqlite_booking_repo::SqliteBookingRepo,
    sqlite_capacity_override_repo::SqliteCapacityOverrideRepo,
    sqlite_capacity_rule_repo::SqliteCapacityRuleRepo,
    sqlite_pricing_rule_repo::SqlitePricingRuleRepo,
    sqlite_service_type_repo::SqliteServiceTypeRepo,
};

pub async fn bootstrap_state(config: &Config) -> AppState {
    let database_url = &config.database_url;
    let events = Arc::new(TracingEventPublisher);

    if database_url.starts_with("postgres://") || database_url.starts_with("postgresql://") {
        info!("Initializing PostgreSQL connection...");

        let mut opts: PgConnectOptions = database_url.parse().expect("Invalid Postgres URL");
        opts = opts.log_statements(LevelFilter::Debug)
            .log_slow_statements(LevelFilter::Warn, Duration::from_millis(500));

        let pool = PgPoolOptions::new()
            .max_connections(10)
            .connect_with(opts)
            .await
            .expect("Failed to connect to Postgres");

        run_postgres_migrations(&pool).await;

        let service_type_repo = Arc::new(PostgresServiceTypeRepo::new(pool.clone()));
        let capacity_rule_repo = Arc::new(PostgresCapacityRuleRepo::new(pool.clone()));
        let capacity_override_repo = Arc::new(PostgresCapacityOverrideRepo::new(pool.clone()));
        let pricing_rule_repo = Arc::new(PostgresPricingRuleRepo::new(pool.clone()));
        let animal_repo = Arc::new(PostgresAnimalRepo::new(pool.clone()));
        let booking_repo = Arc::new(PostgresBookingRepo::new(pool.clone()));

        let booking_service = Arc::new(BookingService::new(
            service_type_repo.clone(),
            capacity_rule_repo.clone(),
            capacity_override_repo.clone(),
            pricing_rule_repo.clone(),
            animal_repo.clone(),
            booking_repo.clone(),
            events.clone(),
            config,
        ));

        AppState {
            config: config.clone(),
            service_type_repo,
            capacity_rule_repo,
            capacity_override_repo,
            pricing_rule_repo,
            animal_repo,
            booking_repo,
            events,
            booking_service,
        }
    } else {
        info!("Initializing SQLite connection with WAL Mode...");

        let opts = SqliteConnectOptions::from_str(database_url)
            .expect("Invalid SQLite connection string")
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .busy_timeout(Duration::from_secs(5))
            .log_statements(LevelFilter::Debug)
            .log_slow_statements(LevelFilter::Warn, Duration::from_millis(500));

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(opts)
            .await
            .expect("Failed to connect to SQLite");

        run_sqlite_migrations(&pool).await;

        let service_type_repo = Arc::new(SqliteServiceTypeRepo::new(pool.clone()));
        let capacity_rule_repo = Arc::new(SqliteCapacityRuleRepo::new(pool.clone()));
        let capacity_override_repo = Arc::new(SqliteCapacityOverrideRepo::new(pool.clone()));
        let pricing_rule_repo = Arc::new(SqlitePricingRuleRepo::new(pool.clone()));
        let animal_repo = Arc::new(SqliteAnimalRepo::new(pool.clone()));
        let booking_repo = Arc::new(SqliteBookingRepo::new(pool.clone()));

        let booking_service = Arc::new(BookingService::new(
            service_type_repo.clone(),
            capacity_rule_repo.clone(),
            capacity_override_repo.clone(),
            pricing_rule_repo.clone(),
            animal_repo.clone(),
            booking_repo.clone(),
            events.clone(),
            config,
        ));

        AppState {
            config: config.clone(),
            service_type_repo,
            capacity_rule_repo,
            capacity_override_repo,
            pricing_rule_repo,
            animal_repo,
            booking_repo,
            events,
            booking_service,
        }
    }
}

async fn run_postgres_migrations(pool: &PgPool) {
    sqlx::migrate!("./migrations/postgres")
        .run(pool)
        .await
        .expect("Failed to run Postgres migrations");
}

async fn run_sqlite_migrations(pool: &SqlitePool) {
    sqlx::migrate!("./migrations/sqlite")
        .run(pool)
        .await
        .expect("Failed to run SQLite migrations");
}
