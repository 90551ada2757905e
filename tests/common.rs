#![allow(dead_code)]

use pawhub_backend::{
    api::router::create_router,
    config::Config,
    domain::models::auth::Claims,
    domain::services::booking_service::BookingService,
    infra::events::TracingEventPublisher,
    infra::repositories::{
        sqlite_animal_repo::SqliteAnimalRepo,
        sqlite_booking_repo::SqliteBookingRepo,
        sqlite_capacity_override_repo::SqliteCapacityOverrideRepo,
        sqlite_capacity_rule_repo::SqliteCapacityRuleRepo,
        sqlite_pricing_rule_repo::SqlitePricingRuleRepo,
        sqlite_service_type_repo::SqliteServiceTypeRepo,
    },
    state::AppState,
};
use axum::{
    body::Body,
    http::{header, Request},
    response::Response,
    Router,
};
use chrono::{Datelike, Duration, NaiveDate, Utc};
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use serde_json::{json, Value};
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::{Pool, Sqlite};
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration as StdDuration;
use tower::ServiceExt;
use uuid::Uuid;

pub struct AuthTokens {
    pub access_token: String,
    pub csrf_token: String,
}

pub struct TestApp {
    pub router: Router,
    pub pool: Pool<Sqlite>,
    pub db_filename: String,
    pub state: Arc<AppState>,
}

impl TestApp {
    pub async fn new() -> Self {
        Self::with_facility_cap(60).await
    }

    pub async fn with_facility_cap(facility_daily_cap: i64) -> Self {
        let db_filename = format!("test_{}.db", Uuid::new_v4());
        let db_url = format!("sqlite://{}?mode=rwc", db_filename);

        let connection_options = SqliteConnectOptions::from_str(&db_url)
            .unwrap()
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .busy_timeout(StdDuration::from_secs(5));

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(connection_options)
            .await
            .expect("Failed to connect to test db");

        sqlx::migrate!("./migrations/sqlite")
            .run(&pool)
            .await
            .expect("Failed to migrate test db");

        let pub_key_pem = include_str!("keys/test_public.pem");

        let config = Config {
            database_url: db_url.clone(),
            port: 0,
            jwt_public_key: pub_key_pem.to_string(),
            auth_issuer: "test-issuer".to_string(),
            facility_daily_cap,
        };

        let service_type_repo = Arc::new(SqliteServiceTypeRepo::new(pool.clone()));
        let capacity_rule_repo = Arc::new(SqliteCapacityRuleRepo::new(pool.clone()));
        let capacity_override_repo = Arc::new(SqliteCapacityOverrideRepo::new(pool.clone()));
        let pricing_rule_repo = Arc::new(SqlitePricingRuleRepo::new(pool.clone()));
        let animal_repo = Arc::new(SqliteAnimalRepo::new(pool.clone()));
        let booking_repo = Arc::new(SqliteBookingRepo::new(pool.clone()));
        let events = Arc::new(TracingEventPublisher);

        let booking_service = Arc::new(BookingService::new(
            service_type_repo.clone(),
            capacity_rule_repo.clone(),
            capacity_override_repo.clone(),
            pricing_rule_repo.clone(),
            animal_repo.clone(),
            booking_repo.clone(),
            events.clone(),
            &config,
        ));

        let state = Arc::new(AppState {
            config,
            service_type_repo,
            capacity_rule_repo,
            capacity_override_repo,
            pricing_rule_repo,
            animal_repo,
            booking_repo,
            events,
            booking_service,
        });

        let router = create_router(state.clone());

        Self {
            router,
            pool,
            db_filename,
            state,
        }
    }
}

impl Drop for TestApp {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.db_filename);
        let _ = std::fs::remove_file(format!("{}-wal", self.db_filename));
        let _ = std::fs::remove_file(format!("{}-shm", self.db_filename));
    }
}

/// Signs a token the way the external identity service would.
pub fn mint_token(role: &str, sub: &str) -> AuthTokens {
    let priv_key_pem = include_str!("keys/test_private.pem");
    let encoding_key = EncodingKey::from_ed_pem(priv_key_pem.as_bytes()).unwrap();

    let csrf_token = format!("csrf-{}", Uuid::new_v4());
    let now = Utc::now();

    let claims = Claims {
        iss: "test-issuer".to_string(),
        sub: sub.to_string(),
        aud: "pawhub-clients".to_string(),
        exp: (now + Duration::minutes(15)).timestamp() as usize,
        iat: now.timestamp() as usize,
        role: role.to_string(),
        csrf_token: csrf_token.clone(),
    };

    let access_token = encode(&Header::new(Algorithm::EdDSA), &claims, &encoding_key).unwrap();

    AuthTokens { access_token, csrf_token }
}

pub fn staff_auth() -> AuthTokens {
    mint_token("staff", "staff-1")
}

pub fn customer_auth(customer_id: &str) -> AuthTokens {
    mint_token("customer", customer_id)
}

pub async fn request(
    app: &TestApp,
    method: &str,
    uri: &str,
    auth: Option<&AuthTokens>,
    body: Option<Value>,
) -> Response {
    let mut builder = Request::builder().method(method).uri(uri);

    if let Some(auth) = auth {
        builder = builder
            .header(header::COOKIE, format!("access_token={}", auth.access_token))
            .header("X-CSRF-Token", &auth.csrf_token);
    }

    let request = match body {
        Some(value) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(value.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    app.router.clone().oneshot(request).await.unwrap()
}

pub async fn parse_body(response: Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

pub async fn seed_service(app: &TestApp, name: &str, base_price_cents: i64) -> String {
    let auth = staff_auth();
    let res = request(
        app,
        "POST",
        "/api/v1/admin/service-types",
        Some(&auth),
        Some(json!({ "name": name, "base_price_cents": base_price_cents })),
    )
    .await;
    assert!(res.status().is_success(), "seed_service failed: {}", res.status());
    parse_body(res).await["id"].as_str().unwrap().to_string()
}

pub async fn seed_rule(app: &TestApp, service_type_id: &str, day_of_week: Option<i32>, max_capacity: i32) {
    let auth = staff_auth();
    let res = request(
        app,
        "POST",
        "/api/v1/admin/capacity-rules",
        Some(&auth),
        Some(json!({
            "service_type_id": service_type_id,
            "day_of_week": day_of_week,
            "max_capacity": max_capacity,
        })),
    )
    .await;
    assert!(res.status().is_success(), "seed_rule failed: {}", res.status());
}

pub async fn seed_animal(app: &TestApp, customer: &AuthTokens, name: &str) -> String {
    let res = request(
        app,
        "POST",
        "/api/v1/animals",
        Some(customer),
        Some(json!({ "name": name })),
    )
    .await;
    assert!(res.status().is_success(), "seed_animal failed: {}", res.status());
    parse_body(res).await["id"].as_str().unwrap().to_string()
}

pub async fn book_single_day(
    app: &TestApp,
    customer: &AuthTokens,
    service_type_id: &str,
    animal_ids: &[String],
    date: NaiveDate,
) -> Response {
    request(
        app,
        "POST",
        "/api/v1/bookings",
        Some(customer),
        Some(json!({
            "service_type_id": service_type_id,
            "animal_ids": animal_ids,
            "date": date.format("%Y-%m-%d").to_string(),
        })),
    )
    .await
}

pub async fn book_range(
    app: &TestApp,
    customer: &AuthTokens,
    service_type_id: &str,
    animal_ids: &[String],
    start: NaiveDate,
    end: NaiveDate,
) -> Response {
    request(
        app,
        "POST",
        "/api/v1/bookings",
        Some(customer),
        Some(json!({
            "service_type_id": service_type_id,
            "animal_ids": animal_ids,
            "start_date": start.format("%Y-%m-%d").to_string(),
            "end_date": end.format("%Y-%m-%d").to_string(),
        })),
    )
    .await
}

pub async fn get_availability(app: &TestApp, service_type_id: &str, start: NaiveDate, end: NaiveDate) -> Value {
    let res = request(
        app,
        "GET",
        &format!(
            "/api/v1/availability?service_type={}&start={}&end={}",
            service_type_id,
            start.format("%Y-%m-%d"),
            end.format("%Y-%m-%d")
        ),
        None,
        None,
    )
    .await;
    assert!(res.status().is_success(), "availability failed: {}", res.status());
    parse_body(res).await
}

pub fn future_date(days_ahead: i64) -> NaiveDate {
    Utc::now().date_naive() + Duration::days(days_ahead)
}

/// Next date at least two days out that falls on the given weekday
/// (0 = Sunday .. 6 = Saturday). Two days of slack keeps tests clear of
/// midnight rollovers.
pub fn next_weekday(day_of_week: i32) -> NaiveDate {
    let mut date = future_date(2);
    while date.weekday().num_days_from_sunday() as i32 != day_of_week {
        date += Duration::days(1);
    }
    date
}
