mod common;

use axum::http::StatusCode;
use common::*;
use serde_json::{json, Value};

async fn seed_booking(app: &TestApp, customer: &AuthTokens) -> (String, String) {
    let service = seed_service(app, "Daycare", 4500).await;
    seed_rule(app, &service, None, 10).await;
    let animal = seed_animal(app, customer, "Rex").await;

    let res = book_single_day(app, customer, &service, &[animal], future_date(3)).await;
    assert_eq!(res.status(), StatusCode::OK);
    let body = parse_body(res).await;
    (body["id"].as_str().unwrap().to_string(), service)
}

async fn transition(app: &TestApp, auth: &AuthTokens, booking_id: &str, action: &str) -> (StatusCode, Value) {
    let res = request(
        app,
        "POST",
        &format!("/api/v1/bookings/{booking_id}/{action}"),
        Some(auth),
        Some(json!({})),
    )
    .await;
    let status = res.status();
    (status, parse_body(res).await)
}

#[tokio::test]
async fn test_full_lifecycle() {
    let app = TestApp::new().await;
    let customer = customer_auth("cust-1");
    let staff = staff_auth();
    let (booking_id, _) = seed_booking(&app, &customer).await;

    let (status, body) = transition(&app, &staff, &booking_id, "confirm").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], json!("confirmed"));

    let (status, body) = transition(&app, &staff, &booking_id, "check-in").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], json!("checked_in"));
    assert_eq!(body["checked_in_by"], json!("staff-1"));
    assert!(body["checked_in_at"].is_string());

    let (status, body) = transition(&app, &staff, &booking_id, "check-out").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], json!("checked_out"));
    assert_eq!(body["checked_out_by"], json!("staff-1"));
    assert!(body["checked_out_at"].is_string());
}

#[tokio::test]
async fn test_new_bookings_start_pending() {
    let app = TestApp::new().await;
    let customer = customer_auth("cust-1");
    let service = seed_service(&app, "Daycare", 4500).await;
    seed_rule(&app, &service, None, 10).await;
    let animal = seed_animal(&app, &customer, "Rex").await;

    let res = book_single_day(&app, &customer, &service, &[animal], future_date(3)).await;
    let body = parse_body(res).await;

    assert_eq!(body["status"], json!("pending"));
}

#[tokio::test]
async fn test_check_out_from_pending_fails() {
    let app = TestApp::new().await;
    let customer = customer_auth("cust-1");
    let staff = staff_auth();
    let (booking_id, _) = seed_booking(&app, &customer).await;

    let (status, body) = transition(&app, &staff, &booking_id, "check-out").await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], json!("invalid_state"));
    assert_eq!(body["current"], json!("pending"));
    assert_eq!(body["attempted"], json!("checked_out"));
}

#[tokio::test]
async fn test_cancel_after_check_out_fails() {
    let app = TestApp::new().await;
    let customer = customer_auth("cust-1");
    let staff = staff_auth();
    let (booking_id, _) = seed_booking(&app, &customer).await;

    transition(&app, &staff, &booking_id, "confirm").await;
    transition(&app, &staff, &booking_id, "check-in").await;
    transition(&app, &staff, &booking_id, "check-out").await;

    let (status, body) = transition(&app, &customer, &booking_id, "cancel").await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], json!("invalid_state"));
    assert_eq!(body["current"], json!("checked_out"));
}

#[tokio::test]
async fn test_confirm_twice_fails() {
    let app = TestApp::new().await;
    let customer = customer_auth("cust-1");
    let staff = staff_auth();
    let (booking_id, _) = seed_booking(&app, &customer).await;

    let (status, _) = transition(&app, &staff, &booking_id, "confirm").await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = transition(&app, &staff, &booking_id, "confirm").await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["current"], json!("confirmed"));
}

#[tokio::test]
async fn test_check_in_requires_confirmation() {
    let app = TestApp::new().await;
    let customer = customer_auth("cust-1");
    let staff = staff_auth();
    let (booking_id, _) = seed_booking(&app, &customer).await;

    let (status, body) = transition(&app, &staff, &booking_id, "check-in").await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["current"], json!("pending"));
    assert_eq!(body["attempted"], json!("checked_in"));
}

#[tokio::test]
async fn test_no_show_only_before_check_in() {
    let app = TestApp::new().await;
    let customer = customer_auth("cust-1");
    let staff = staff_auth();
    let (booking_id, _) = seed_booking(&app, &customer).await;

    transition(&app, &staff, &booking_id, "confirm").await;

    let (status, body) = transition(&app, &staff, &booking_id, "no-show").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], json!("no_show"));

    // Terminal: nothing leaves no_show.
    let (status, _) = transition(&app, &staff, &booking_id, "confirm").await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_cancel_records_reason() {
    let app = TestApp::new().await;
    let customer = customer_auth("cust-1");
    let (booking_id, _) = seed_booking(&app, &customer).await;

    let res = request(
        &app,
        "POST",
        &format!("/api/v1/bookings/{booking_id}/cancel"),
        Some(&customer),
        Some(json!({ "reason": "Vacation plans changed" })),
    )
    .await;
    assert_eq!(res.status(), StatusCode::OK);
    let body = parse_body(res).await;

    assert_eq!(body["status"], json!("cancelled"));
    assert_eq!(body["cancellation_reason"], json!("Vacation plans changed"));
}

#[tokio::test]
async fn test_cancel_foreign_booking_reports_not_found() {
    let app = TestApp::new().await;
    let owner = customer_auth("cust-owner");
    let stranger = customer_auth("cust-stranger");
    let (booking_id, _) = seed_booking(&app, &owner).await;

    let (status, body) = transition(&app, &stranger, &booking_id, "cancel").await;

    // Existence is not leaked to non-owners.
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], json!("not_found"));
}

#[tokio::test]
async fn test_cancelled_booking_frees_capacity() {
    let app = TestApp::new().await;
    let customer = customer_auth("cust-1");
    let service = seed_service(&app, "Daycare", 4500).await;
    seed_rule(&app, &service, None, 1).await;
    let animal = seed_animal(&app, &customer, "Rex").await;
    let date = future_date(3);

    let res = book_single_day(&app, &customer, &service, std::slice::from_ref(&animal), date).await;
    let booking_id = parse_body(res).await["id"].as_str().unwrap().to_string();

    let other = customer_auth("cust-2");
    let other_animal = seed_animal(&app, &other, "Milo").await;
    let res = book_single_day(&app, &other, &service, std::slice::from_ref(&other_animal), date).await;
    assert_eq!(res.status(), StatusCode::CONFLICT);

    transition(&app, &customer, &booking_id, "cancel").await;

    let res = book_single_day(&app, &other, &service, std::slice::from_ref(&other_animal), date).await;
    assert_eq!(res.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_lifecycle_actions_enforce_roles() {
    let app = TestApp::new().await;
    let customer = customer_auth("cust-1");
    let staff = staff_auth();
    let (booking_id, _) = seed_booking(&app, &customer).await;

    // Customers cannot confirm or check in.
    let res = request(
        &app,
        "POST",
        &format!("/api/v1/bookings/{booking_id}/confirm"),
        Some(&customer),
        Some(json!({})),
    )
    .await;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);

    // Staff cannot cancel on the customer's behalf through this endpoint.
    let res = request(
        &app,
        "POST",
        &format!("/api/v1/bookings/{booking_id}/cancel"),
        Some(&staff),
        Some(json!({})),
    )
    .await;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);
}
