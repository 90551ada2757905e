mod common;

use axum::http::StatusCode;
use chrono::Duration;
use common::*;
use serde_json::{json, Value};

async fn call_tool(app: &TestApp, tool: &str, arguments: Value) -> Value {
    let auth = staff_auth();
    let res = request(app, "POST", "/api/v1/ai/tools", Some(&auth), Some(json!({
        "tool": tool,
        "arguments": arguments,
    }))).await;
    // Tool failures are structured payloads, never transport errors.
    assert_eq!(res.status(), StatusCode::OK);
    parse_body(res).await
}

#[tokio::test]
async fn test_service_listing_hides_inactive() {
    let app = TestApp::new().await;
    let daycare = seed_service(&app, "Daycare", 4500).await;
    let retired = seed_service(&app, "Pony Rides", 12000).await;

    let auth = staff_auth();
    let res = request(
        &app,
        "PUT",
        &format!("/api/v1/admin/service-types/{retired}"),
        Some(&auth),
        Some(json!({ "active": false })),
    )
    .await;
    assert_eq!(res.status(), StatusCode::OK);

    let res = request(&app, "GET", "/api/v1/services", None, None).await;
    let services = parse_body(res).await;
    let services = services.as_array().unwrap().to_vec();

    assert_eq!(services.len(), 1);
    assert_eq!(services[0]["id"], json!(daycare));
    assert_eq!(services[0]["base_price_cents"], json!(4500));

    // Staff listing still shows the retired offering.
    let res = request(&app, "GET", "/api/v1/admin/service-types", Some(&auth), None).await;
    assert_eq!(parse_body(res).await.as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_tool_get_service_types_and_pricing() {
    let app = TestApp::new().await;
    let service = seed_service(&app, "Daycare", 4500).await;

    let auth = staff_auth();
    let res = request(&app, "POST", "/api/v1/admin/pricing-rules", Some(&auth), Some(json!({
        "service_type_id": service,
        "kind": "percentage_discount",
        "value": 10,
    }))).await;
    assert!(res.status().is_success());

    let body = call_tool(&app, "get_service_types_and_pricing", json!({})).await;

    assert_eq!(body["ok"], json!(true));
    let entry = &body["result"].as_array().unwrap()[0];
    assert_eq!(entry["service"]["id"], json!(service));
    assert_eq!(entry["pricing_rules"][0]["kind"], json!("percentage_discount"));
    assert_eq!(entry["pricing_rules"][0]["value"], json!(10));
}

#[tokio::test]
async fn test_tool_check_availability() {
    let app = TestApp::new().await;
    let service = seed_service(&app, "Daycare", 4500).await;
    seed_rule(&app, &service, None, 5).await;

    let date = future_date(3);
    let body = call_tool(&app, "check_availability", json!({
        "service_type_id": service,
        "start": date.format("%Y-%m-%d").to_string(),
        "end": (date + Duration::days(1)).format("%Y-%m-%d").to_string(),
    })).await;

    assert_eq!(body["ok"], json!(true));
    let days = body["result"].as_array().unwrap();
    assert_eq!(days.len(), 2);
    assert_eq!(days[0]["spots_remaining"], json!(5));
}

#[tokio::test]
async fn test_tool_create_and_cancel_booking() {
    let app = TestApp::new().await;
    let service = seed_service(&app, "Daycare", 4500).await;
    seed_rule(&app, &service, None, 5).await;

    let customer = customer_auth("cust-1");
    let animal = seed_animal(&app, &customer, "Rex").await;
    let date = future_date(3).format("%Y-%m-%d").to_string();

    let body = call_tool(&app, "create_booking", json!({
        "customer_id": "cust-1",
        "service_type_id": service,
        "animal_ids": [animal],
        "start_date": date,
    })).await;

    assert_eq!(body["ok"], json!(true));
    assert_eq!(body["result"]["status"], json!("pending"));
    assert_eq!(body["result"]["total_price_cents"], json!(4500));
    let booking_id = body["result"]["id"].as_str().unwrap().to_string();

    let body = call_tool(&app, "cancel_booking", json!({
        "booking_id": booking_id,
        "customer_id": "cust-1",
        "reason": "Owner asked via SMS",
    })).await;

    assert_eq!(body["ok"], json!(true));
    assert_eq!(body["result"]["status"], json!("cancelled"));
    assert_eq!(body["result"]["cancellation_reason"], json!("Owner asked via SMS"));
}

#[tokio::test]
async fn test_tool_errors_are_structured() {
    let app = TestApp::new().await;
    let service = seed_service(&app, "Daycare", 4500).await;
    seed_rule(&app, &service, None, 5).await;

    let customer = customer_auth("cust-1");
    let animal = seed_animal(&app, &customer, "Rex").await;
    let date = future_date(3).format("%Y-%m-%d").to_string();

    let args = json!({
        "customer_id": "cust-1",
        "service_type_id": service,
        "animal_ids": [animal],
        "start_date": date,
    });
    let body = call_tool(&app, "create_booking", args.clone()).await;
    assert_eq!(body["ok"], json!(true));

    // Second attempt collides; the concierge gets the conflicting animals back.
    let body = call_tool(&app, "create_booking", args).await;

    assert_eq!(body["ok"], json!(false));
    assert_eq!(body["error"]["code"], json!("duplicate_booking"));
    assert_eq!(body["error"]["animal_ids"], json!([animal]));
}

#[tokio::test]
async fn test_tool_unknown_name_is_validation_error() {
    let app = TestApp::new().await;

    let body = call_tool(&app, "teleport_dog", json!({})).await;

    assert_eq!(body["ok"], json!(false));
    assert_eq!(body["error"]["code"], json!("validation"));
}

#[tokio::test]
async fn test_tools_require_staff_role() {
    let app = TestApp::new().await;
    let customer = customer_auth("cust-1");

    let res = request(&app, "POST", "/api/v1/ai/tools", Some(&customer), Some(json!({
        "tool": "get_service_types_and_pricing",
        "arguments": {},
    }))).await;

    assert_eq!(res.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_customer_sees_only_own_bookings() {
    let app = TestApp::new().await;
    let service = seed_service(&app, "Daycare", 4500).await;
    seed_rule(&app, &service, None, 10).await;

    let alice = customer_auth("cust-alice");
    let bob = customer_auth("cust-bob");
    let alice_pet = seed_animal(&app, &alice, "Rex").await;
    let bob_pet = seed_animal(&app, &bob, "Milo").await;

    book_single_day(&app, &alice, &service, &[alice_pet], future_date(3)).await;
    book_single_day(&app, &bob, &service, &[bob_pet], future_date(3)).await;

    let res = request(&app, "GET", "/api/v1/my/bookings", Some(&alice), None).await;
    let bookings = parse_body(res).await;
    let bookings = bookings.as_array().unwrap().to_vec();

    assert_eq!(bookings.len(), 1);
    assert_eq!(bookings[0]["customer_id"], json!("cust-alice"));
}

#[tokio::test]
async fn test_staff_listing_filters_by_date() {
    let app = TestApp::new().await;
    let service = seed_service(&app, "Boarding", 9000).await;
    seed_rule(&app, &service, None, 10).await;

    let customer = customer_auth("cust-1");
    let animal = seed_animal(&app, &customer, "Rex").await;

    let start = future_date(3);
    book_range(&app, &customer, &service, &[animal], start, start + Duration::days(2)).await;

    let staff = staff_auth();

    // A multi-day stay shows up when filtering by its middle day.
    let res = request(
        &app,
        "GET",
        &format!("/api/v1/bookings?date={}", (start + Duration::days(1)).format("%Y-%m-%d")),
        Some(&staff),
        None,
    )
    .await;
    assert_eq!(parse_body(res).await.as_array().unwrap().len(), 1);

    let res = request(
        &app,
        "GET",
        &format!("/api/v1/bookings?date={}", (start + Duration::days(5)).format("%Y-%m-%d")),
        Some(&staff),
        None,
    )
    .await;
    assert_eq!(parse_body(res).await.as_array().unwrap().len(), 0);
}
