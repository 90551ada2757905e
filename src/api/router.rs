use axum::{
    body::Body,
    extract::Request,
    routing::{get, post, put, delete},
    Router,
};
use std::sync::Arc;
use std::time::Duration;
use crate::state::AppState;
use crate::api::handlers::{ai, animal, availability, booking, booking_management, capacity, health, pricing, service_type};
use tower_http::{
    trace::TraceLayer,
    classify::ServerErrorsFailureClass,
};
use tower_cookies::CookieManagerLayer;
use tracing::{info_span, Span, error, info};
use uuid::Uuid;

pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health::health_check))

        // Public catalogue & availability
        .route("/api/v1/services", get(service_type::list_services))
        .route("/api/v1/availability", get(availability::get_availability))

        // Customer animal registry
        .route("/api/v1/animals", get(animal::list_animals).post(animal::create_animal))

        // Bookings
        .route("/api/v1/bookings", post(booking::create_booking).get(booking::list_bookings))
        .route("/api/v1/my/bookings", get(booking::my_bookings))
        .route("/api/v1/bookings/{booking_id}", get(booking::get_booking))
        .route("/api/v1/bookings/{booking_id}/confirm", post(booking_management::confirm_booking))
        .route("/api/v1/bookings/{booking_id}/cancel", post(booking_management::cancel_booking))
        .route("/api/v1/bookings/{booking_id}/check-in", post(booking_management::check_in_booking))
        .route("/api/v1/bookings/{booking_id}/check-out", post(booking_management::check_out_booking))
        .route("/api/v1/bookings/{booking_id}/no-show", post(booking_management::no_show_booking))

        // Staff configuration
        .route("/api/v1/admin/service-types", get(service_type::list_all_services).post(service_type::create_service_type))
        .route("/api/v1/admin/service-types/{service_type_id}", put(service_type::update_service_type))
        .route("/api/v1/admin/capacity-rules", get(capacity::list_rules).post(capacity::create_rule))
        .route("/api/v1/admin/capacity-rules/{rule_id}", put(capacity::update_rule).delete(capacity::delete_rule))
        .route("/api/v1/admin/overrides", get(capacity::list_overrides).post(capacity::upsert_override))
        .route("/api/v1/admin/overrides/{override_id}", delete(capacity::delete_override))
        .route("/api/v1/admin/pricing-rules", get(pricing::list_rules).post(pricing::create_rule))
        .route("/api/v1/admin/pricing-rules/{rule_id}", put(pricing::update_rule).delete(pricing::delete_rule))

        // AI concierge tool execution
        .route("/api/v1/ai/tools", post(ai::execute_tool))

        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &Request<Body>| {
                    let request_id = Uuid::new_v4().to_string();
                    info_span!(
                        "http_request",
                        request_id = %request_id,
                        method = ?request.method(),
                        uri = ?request.uri(),
                        version = ?request.version(),
                        customer_id = tracing::field::Empty,
                        staff_id = tracing::field::Empty,
                    )
                })
                .on_request(|request: &Request<Body>, _span: &Span| {
                    info!("started processing request: {} {}", request.method(), request.uri().path());
                })
                .on_response(|response: &axum::http::Response<Body>, latency: Duration, _span: &Span| {
                    info!(
                        status = response.status().as_u16(),
                        latency_ms = latency.as_millis(),
                        "finished processing request"
                    );
                })
                .on_failure(|error: ServerErrorsFailureClass, _latency: Duration, _span: &Span| {
                    error!("request failed: {:?}", error);
                })
        )
        .layer(CookieManagerLayer::new())
        .with_state(state)
}
