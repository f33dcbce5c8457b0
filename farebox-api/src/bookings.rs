use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use farebox_core::booking::{Booking, Passenger};
use farebox_core::fleet::TransportKind;
use farebox_core::schedule::ScheduleKey;
use farebox_core::store::FleetStore;

use crate::error::ApiError;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/bookings", get(list_bookings).post(create_booking))
        .route("/api/bookings/{booking_id}", get(get_booking))
        .route("/api/bookings/{booking_id}/cancel", post(cancel_booking))
}

#[derive(Debug, Deserialize)]
struct CreateBookingRequest {
    user_id: String,
    schedule_key: String,
    seats: Vec<String>,
    passengers: Vec<Passenger>,
}

/// Reserve seats. Returns 201 with the pending booking, or 409 listing
/// the seats that are already taken.
async fn create_booking(
    State(state): State<AppState>,
    Json(request): Json<CreateBookingRequest>,
) -> Result<(StatusCode, Json<Booking>), ApiError> {
    let key: ScheduleKey = request.schedule_key.parse()?;
    let booking = state
        .ledger
        .create_booking(&request.user_id, key, request.seats, request.passengers)
        .await?;
    Ok((StatusCode::CREATED, Json(booking)))
}

#[derive(Debug, Deserialize)]
struct ListBookingsQuery {
    user_id: String,
}

async fn list_bookings(
    State(state): State<AppState>,
    Query(query): Query<ListBookingsQuery>,
) -> Result<Json<Vec<Booking>>, ApiError> {
    Ok(Json(state.ledger.bookings_for_user(&query.user_id).await?))
}

/// Cancel a pending booking, releasing its seats. Paid bookings are
/// refused with 409; refunds are out of scope here.
async fn cancel_booking(
    State(state): State<AppState>,
    Path(booking_id): Path<Uuid>,
) -> Result<Json<Booking>, ApiError> {
    Ok(Json(state.ledger.cancel_booking(booking_id).await?))
}

#[derive(Debug, Serialize)]
struct BookingRouteInfo {
    origin: String,
    destination: String,
    duration: String,
    transport: TransportKind,
}

#[derive(Debug, Serialize)]
struct BookingDetail {
    #[serde(flatten)]
    booking: Booking,
    /// Absent if the route was removed after the booking was made.
    route: Option<BookingRouteInfo>,
}

async fn get_booking(
    State(state): State<AppState>,
    Path(booking_id): Path<Uuid>,
) -> Result<Json<BookingDetail>, ApiError> {
    let booking = state
        .ledger
        .booking(booking_id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("booking not found: {booking_id}")))?;

    let route = state
        .fleet
        .route(booking.schedule.route_id)
        .await?
        .map(|route| BookingRouteInfo {
            origin: route.origin,
            destination: route.destination,
            duration: route.duration,
            transport: route.transport,
        });

    Ok(Json(BookingDetail { booking, route }))
}
