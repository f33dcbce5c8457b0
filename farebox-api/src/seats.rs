use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use serde::Serialize;

use farebox_catalog::availability::SeatAvailability;
use farebox_core::schedule::ScheduleKey;
use farebox_ledger::ScheduleSnapshot;

use crate::error::ApiError;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/api/seats/{schedule_key}", get(get_seat_map))
}

#[derive(Debug, Serialize)]
struct RouteInfo {
    origin: String,
    destination: String,
    duration: String,
    base_price_cents: i32,
}

#[derive(Debug, Serialize)]
struct VehicleInfo {
    operator: String,
    vehicle_type: String,
    total_seats: i32,
    amenities: Vec<String>,
}

#[derive(Debug, Serialize)]
struct SeatMapResponse {
    schedule_key: String,
    route: RouteInfo,
    vehicle: VehicleInfo,
    seats: Vec<SeatAvailability>,
}

impl From<ScheduleSnapshot> for SeatMapResponse {
    fn from(snapshot: ScheduleSnapshot) -> Self {
        Self {
            schedule_key: snapshot.schedule.to_string(),
            route: RouteInfo {
                origin: snapshot.route.origin,
                destination: snapshot.route.destination,
                duration: snapshot.route.duration,
                base_price_cents: snapshot.route.base_price_cents,
            },
            vehicle: VehicleInfo {
                operator: snapshot.vehicle.operator,
                vehicle_type: snapshot.vehicle.vehicle_type,
                total_seats: snapshot.vehicle.total_seats,
                amenities: snapshot.vehicle.amenities,
            },
            seats: snapshot.seats,
        }
    }
}

/// Seat map with live availability for one departure.
async fn get_seat_map(
    State(state): State<AppState>,
    Path(raw_key): Path<String>,
) -> Result<Json<SeatMapResponse>, ApiError> {
    let key: ScheduleKey = raw_key.parse()?;
    let snapshot = state.ledger.snapshot(&key).await?;
    Ok(Json(snapshot.into()))
}
