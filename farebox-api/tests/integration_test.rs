use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use axum::Router;
use chrono::NaiveDate;
use serde_json::{json, Value};
use tower::util::ServiceExt;
use uuid::Uuid;

use farebox_api::{app, AppState};
use farebox_core::fleet::{Route, TransportKind, Vehicle};
use farebox_core::schedule::ScheduleKey;
use farebox_store::app_config::BookingRules;
use farebox_store::{seed, MemoryStore};

fn rules() -> BookingRules {
    BookingRules {
        pending_expiry_seconds: 900,
        sweep_interval_seconds: 60,
        reference_prefix: "BT".to_string(),
    }
}

/// App over the sample fleet plus one 4-seat "2-2" minibus used by the
/// end-to-end scenario. Returns the minibus schedule key for 2026-09-01.
async fn test_app() -> (Router, ScheduleKey) {
    let store = Arc::new(MemoryStore::new());
    seed::seed_sample_fleet(&store).await;

    let vehicle = Vehicle {
        id: Uuid::new_v4(),
        operator: "Mekong Express".to_string(),
        vehicle_type: "Minibus".to_string(),
        layout_pattern: "2-2".to_string(),
        total_seats: 4,
        amenities: vec!["AC".to_string()],
    };
    let route = Route {
        id: Uuid::new_v4(),
        origin: "Phnom Penh".to_string(),
        destination: "Kep".to_string(),
        distance_km: 170,
        duration: "3h 30m".to_string(),
        transport: TransportKind::Bus,
        base_price_cents: 1500,
        vehicle_id: vehicle.id,
    };
    let key = ScheduleKey::new(route.id, NaiveDate::from_ymd_opt(2026, 9, 1).unwrap());
    store.insert_vehicle(vehicle).await;
    store.insert_route(route).await;

    (app(AppState::build(store, &rules())), key)
}

async fn get(app: &Router, uri: &str) -> (StatusCode, Value) {
    let response = app
        .clone()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

async fn post_json(app: &Router, uri: &str, payload: Value) -> (StatusCode, Value) {
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(payload.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

fn seat_state<'a>(seat_map: &'a Value, seat_id: &str) -> &'a str {
    seat_map["seats"]
        .as_array()
        .unwrap()
        .iter()
        .find(|s| s["id"] == seat_id)
        .unwrap_or_else(|| panic!("seat {seat_id} missing from seat map"))["state"]
        .as_str()
        .unwrap()
}

#[tokio::test]
async fn test_health_check() {
    let (app, _) = test_app().await;
    let (status, body) = get(&app, "/api/").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Farebox API is running!");
}

#[tokio::test]
async fn test_booking_and_payment_flow() {
    let (app, key) = test_app().await;
    let seats_uri = format!("/api/seats/{key}");

    // Full minibus, nothing sold yet.
    let (status, seat_map) = get(&app, &seats_uri).await;
    assert_eq!(status, StatusCode::OK);
    let ids: Vec<&str> = seat_map["seats"]
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["id"].as_str().unwrap())
        .collect();
    assert_eq!(ids, vec!["1A", "1B", "1C", "1D"]);
    assert!(seat_map["seats"]
        .as_array()
        .unwrap()
        .iter()
        .all(|s| s["state"] == "available"));

    // First customer takes 1A.
    let (status, booking) = post_json(
        &app,
        "/api/bookings",
        json!({
            "user_id": "user-1",
            "schedule_key": key.to_string(),
            "seats": ["1A"],
            "passengers": [{ "first_name": "Sok", "last_name": "Chan", "phone": null }],
        }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(booking["status"], "pending");
    assert_eq!(booking["total_cents"], 1500);
    assert!(booking["reference"].as_str().unwrap().starts_with("BT"));
    let booking_id = booking["id"].as_str().unwrap().to_string();

    // The hold is visible immediately.
    let (_, seat_map) = get(&app, &seats_uri).await;
    assert_eq!(seat_state(&seat_map, "1A"), "held");

    // Second customer loses the race for 1A and learns exactly why.
    let (status, conflict) = post_json(
        &app,
        "/api/bookings",
        json!({
            "user_id": "user-2",
            "schedule_key": key.to_string(),
            "seats": ["1A"],
            "passengers": [{ "first_name": "Dara", "last_name": "Pich", "phone": null }],
        }),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(conflict["conflicting_seats"], json!(["1A"]));

    // Payment flips the hold to booked.
    let (status, payment) = post_json(
        &app,
        "/api/payments/process",
        json!({ "booking_id": booking_id, "method": "card" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(payment["status"], "success");
    assert_eq!(payment["booking_status"], "paid");
    assert!(payment["transaction_id"].as_str().unwrap().starts_with("TXN"));

    let (_, seat_map) = get(&app, &seats_uri).await;
    assert_eq!(seat_state(&seat_map, "1A"), "booked");
    assert_eq!(seat_state(&seat_map, "1B"), "available");
    assert_eq!(seat_state(&seat_map, "1C"), "available");
    assert_eq!(seat_state(&seat_map, "1D"), "available");

    // Paying twice is rejected and does not double-charge.
    let (status, body) = post_json(
        &app,
        "/api/payments/process",
        json!({ "booking_id": booking_id, "method": "card" }),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert!(body["error"].as_str().unwrap().contains("not pending"));

    // Revenue shows up on the admin dashboard.
    let (status, stats) = get(&app, "/api/admin/stats").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(stats["total_bookings"], 1);
    assert_eq!(stats["paid_bookings"], 1);
    assert_eq!(stats["total_revenue_cents"], 1500);

    // And the booking shows up under its owner.
    let (status, bookings) = get(&app, "/api/bookings?user_id=user-1").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(bookings.as_array().unwrap().len(), 1);
    assert_eq!(bookings[0]["status"], "paid");
}

#[tokio::test]
async fn test_declined_payment_reports_failure() {
    let (app, key) = test_app().await;

    let (_, booking) = post_json(
        &app,
        "/api/bookings",
        json!({
            "user_id": "user-1",
            "schedule_key": key.to_string(),
            "seats": ["1B"],
            "passengers": [{ "first_name": "Sok", "last_name": "Chan", "phone": null }],
        }),
    )
    .await;

    let (status, payment) = post_json(
        &app,
        "/api/payments/process",
        json!({
            "booking_id": booking["id"],
            "method": "card",
            "details": { "fail": true },
        }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(payment["status"], "failed");
    // The decline does not release the seat; only expiry does.
    assert_eq!(payment["booking_status"], "pending");
}

#[tokio::test]
async fn test_cancel_frees_the_seat_but_never_a_paid_booking() {
    let (app, key) = test_app().await;
    let seats_uri = format!("/api/seats/{key}");

    let (_, booking) = post_json(
        &app,
        "/api/bookings",
        json!({
            "user_id": "user-1",
            "schedule_key": key.to_string(),
            "seats": ["1A"],
            "passengers": [{ "first_name": "Sok", "last_name": "Chan", "phone": null }],
        }),
    )
    .await;
    let booking_id = booking["id"].as_str().unwrap().to_string();

    let (status, cancelled) = post_json(
        &app,
        &format!("/api/bookings/{booking_id}/cancel"),
        json!({}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(cancelled["status"], "cancelled");

    // The seat is immediately back on sale.
    let (_, seat_map) = get(&app, &seats_uri).await;
    assert_eq!(seat_state(&seat_map, "1A"), "available");

    // A cancelled booking cannot be cancelled twice or paid.
    let (status, _) = post_json(
        &app,
        &format!("/api/bookings/{booking_id}/cancel"),
        json!({}),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    let (status, _) = post_json(
        &app,
        "/api/payments/process",
        json!({ "booking_id": booking_id, "method": "card" }),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);

    // A paid booking refuses cancellation.
    let (_, booking) = post_json(
        &app,
        "/api/bookings",
        json!({
            "user_id": "user-2",
            "schedule_key": key.to_string(),
            "seats": ["1B"],
            "passengers": [{ "first_name": "Dara", "last_name": "Pich", "phone": null }],
        }),
    )
    .await;
    let booking_id = booking["id"].as_str().unwrap().to_string();
    post_json(
        &app,
        "/api/payments/process",
        json!({ "booking_id": booking_id, "method": "card" }),
    )
    .await;

    let (status, body) = post_json(
        &app,
        &format!("/api/bookings/{booking_id}/cancel"),
        json!({}),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert!(body["error"].as_str().unwrap().contains("cannot be cancelled"));
}

#[tokio::test]
async fn test_search_annotates_availability() {
    let (app, _) = test_app().await;

    let (status, results) = post_json(
        &app,
        "/api/search",
        json!({
            "origin": "phnom",
            "destination": "siem",
            "date": "2026-09-01",
        }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let results = results.as_array().unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0]["origin"], "Phnom Penh");
    assert_eq!(results[0]["destination"], "Siem Reap");
    assert_eq!(results[0]["available_seats"], 44);
    assert_eq!(results[0]["total_seats"], 44);

    // Ferry filter finds only the Koh Rong crossing.
    let (_, results) = post_json(
        &app,
        "/api/search",
        json!({
            "origin": "",
            "destination": "",
            "date": "2026-09-01",
            "transport_type": "ferry",
        }),
    )
    .await;
    let results = results.as_array().unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0]["destination"], "Koh Rong");
}

#[tokio::test]
async fn test_request_validation_and_lookups() {
    let (app, key) = test_app().await;

    // Malformed schedule key.
    let (status, _) = get(&app, "/api/seats/not-a-key").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // Empty seat set never reaches the store.
    let (status, body) = post_json(
        &app,
        "/api/bookings",
        json!({
            "user_id": "user-1",
            "schedule_key": key.to_string(),
            "seats": [],
            "passengers": [],
        }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("at least one seat"));

    // Seat id outside the layout.
    let (status, _) = post_json(
        &app,
        "/api/bookings",
        json!({
            "user_id": "user-1",
            "schedule_key": key.to_string(),
            "seats": ["9Z"],
            "passengers": [{ "first_name": "Sok", "last_name": "Chan", "phone": null }],
        }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // Unknown booking.
    let (status, _) = get(&app, &format!("/api/bookings/{}", Uuid::new_v4())).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // Unknown route in an otherwise valid key.
    let orphan = ScheduleKey::new(
        Uuid::new_v4(),
        NaiveDate::from_ymd_opt(2026, 9, 1).unwrap(),
    );
    let (status, _) = get(&app, &format!("/api/seats/{orphan}")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
