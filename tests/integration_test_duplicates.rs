mod common;

use axum::http::StatusCode;
use chrono::Duration;
use common::*;
use serde_json::json;

#[tokio::test]
async fn test_same_animal_same_day_rejected() {
    let app = TestApp::new().await;
    let service = seed_service(&app, "Daycare", 4500).await;
    seed_rule(&app, &service, None, 10).await;

    let customer = customer_auth("cust-1");
    let animal = seed_animal(&app, &customer, "Rex").await;
    let date = future_date(3);

    let res = book_single_day(&app, &customer, &service, std::slice::from_ref(&animal), date).await;
    assert_eq!(res.status(), StatusCode::OK);

    let res = book_single_day(&app, &customer, &service, std::slice::from_ref(&animal), date).await;
    assert_eq!(res.status(), StatusCode::CONFLICT);
    let body = parse_body(res).await;

    assert_eq!(body["code"], json!("duplicate_booking"));
    assert_eq!(body["animal_ids"], json!([animal]));
}

#[tokio::test]
async fn test_partially_overlapping_ranges_rejected() {
    let app = TestApp::new().await;
    let service = seed_service(&app, "Boarding", 9000).await;
    seed_rule(&app, &service, None, 10).await;

    let customer = customer_auth("cust-1");
    let animal = seed_animal(&app, &customer, "Rex").await;

    let start = future_date(3);
    let res = book_range(&app, &customer, &service, std::slice::from_ref(&animal), start, start + Duration::days(3)).await;
    assert_eq!(res.status(), StatusCode::OK);

    // Shares only the last two days of the first stay.
    let res = book_range(
        &app,
        &customer,
        &service,
        std::slice::from_ref(&animal),
        start + Duration::days(2),
        start + Duration::days(5),
    )
    .await;

    assert_eq!(res.status(), StatusCode::CONFLICT);
    assert_eq!(parse_body(res).await["code"], json!("duplicate_booking"));
}

#[tokio::test]
async fn test_adjacent_ranges_allowed() {
    let app = TestApp::new().await;
    let service = seed_service(&app, "Boarding", 9000).await;
    seed_rule(&app, &service, None, 10).await;

    let customer = customer_auth("cust-1");
    let animal = seed_animal(&app, &customer, "Rex").await;

    let start = future_date(3);
    let res = book_range(&app, &customer, &service, std::slice::from_ref(&animal), start, start + Duration::days(2)).await;
    assert_eq!(res.status(), StatusCode::OK);

    // Picks up the day after the first stay ends.
    let res = book_range(
        &app,
        &customer,
        &service,
        std::slice::from_ref(&animal),
        start + Duration::days(3),
        start + Duration::days(4),
    )
    .await;
    assert_eq!(res.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_same_animal_different_service_allowed() {
    let app = TestApp::new().await;
    let daycare = seed_service(&app, "Daycare", 4500).await;
    let grooming = seed_service(&app, "Grooming", 6000).await;
    seed_rule(&app, &daycare, None, 10).await;
    seed_rule(&app, &grooming, None, 10).await;

    let customer = customer_auth("cust-1");
    let animal = seed_animal(&app, &customer, "Rex").await;
    let date = future_date(3);

    let res = book_single_day(&app, &customer, &daycare, std::slice::from_ref(&animal), date).await;
    assert_eq!(res.status(), StatusCode::OK);

    let res = book_single_day(&app, &customer, &grooming, std::slice::from_ref(&animal), date).await;
    assert_eq!(res.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_shared_animal_in_group_booking_rejected() {
    let app = TestApp::new().await;
    let service = seed_service(&app, "Daycare", 4500).await;
    seed_rule(&app, &service, None, 10).await;

    let customer = customer_auth("cust-1");
    let rex = seed_animal(&app, &customer, "Rex").await;
    let bella = seed_animal(&app, &customer, "Bella").await;
    let date = future_date(3);

    let res = book_single_day(&app, &customer, &service, std::slice::from_ref(&rex), date).await;
    assert_eq!(res.status(), StatusCode::OK);

    // Bella is free, but Rex already has a spot that day.
    let res = book_single_day(&app, &customer, &service, &[rex.clone(), bella], date).await;
    assert_eq!(res.status(), StatusCode::CONFLICT);
    let body = parse_body(res).await;

    assert_eq!(body["animal_ids"], json!([rex]));
}

#[tokio::test]
async fn test_cancelled_booking_does_not_block() {
    let app = TestApp::new().await;
    let service = seed_service(&app, "Daycare", 4500).await;
    seed_rule(&app, &service, None, 10).await;

    let customer = customer_auth("cust-1");
    let animal = seed_animal(&app, &customer, "Rex").await;
    let date = future_date(3);

    let res = book_single_day(&app, &customer, &service, std::slice::from_ref(&animal), date).await;
    let booking_id = parse_body(res).await["id"].as_str().unwrap().to_string();

    let res = request(
        &app,
        "POST",
        &format!("/api/v1/bookings/{booking_id}/cancel"),
        Some(&customer),
        Some(json!({})),
    )
    .await;
    assert_eq!(res.status(), StatusCode::OK);

    let res = book_single_day(&app, &customer, &service, std::slice::from_ref(&animal), date).await;
    assert_eq!(res.status(), StatusCode::OK);
}
