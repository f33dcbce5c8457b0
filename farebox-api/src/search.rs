use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use farebox_catalog::availability::SeatState;
use farebox_core::fleet::{Route, TransportKind};
use farebox_core::schedule::ScheduleKey;
use farebox_core::store::FleetStore;
use farebox_ledger::LedgerError;

use crate::error::ApiError;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/search", post(search_routes))
        .route("/api/routes", get(list_routes))
}

#[derive(Debug, Deserialize)]
struct SearchRequest {
    origin: String,
    destination: String,
    /// Service date, ISO 8601 (YYYY-MM-DD).
    date: String,
    transport_type: Option<TransportKind>,
}

#[derive(Debug, Serialize)]
struct SearchResult {
    schedule_key: String,
    origin: String,
    destination: String,
    duration: String,
    transport: TransportKind,
    base_price_cents: i32,
    operator: String,
    vehicle_type: String,
    amenities: Vec<String>,
    available_seats: usize,
    total_seats: i32,
}

/// Match routes by origin/destination substring and annotate each hit
/// with live seat availability for the requested date.
async fn search_routes(
    State(state): State<AppState>,
    Json(request): Json<SearchRequest>,
) -> Result<Json<Vec<SearchResult>>, ApiError> {
    let date = NaiveDate::parse_from_str(&request.date, "%Y-%m-%d")
        .map_err(|err| ApiError::Validation(format!("invalid travel date: {err}")))?;

    let origin = request.origin.to_lowercase();
    let destination = request.destination.to_lowercase();

    let mut results = Vec::new();
    for route in state.fleet.routes().await? {
        if !route.origin.to_lowercase().contains(&origin)
            || !route.destination.to_lowercase().contains(&destination)
        {
            continue;
        }
        if let Some(kind) = request.transport_type {
            if route.transport != kind {
                continue;
            }
        }

        let key = ScheduleKey::new(route.id, date);
        let snapshot = match state.ledger.snapshot(&key).await {
            Ok(snapshot) => snapshot,
            // A route whose vehicle vanished mid-search is skipped, not fatal.
            Err(LedgerError::VehicleNotFound(_)) => continue,
            Err(err) => return Err(err.into()),
        };

        let available = snapshot
            .seats
            .iter()
            .filter(|s| s.state == SeatState::Available)
            .count();

        results.push(SearchResult {
            schedule_key: key.to_string(),
            origin: snapshot.route.origin,
            destination: snapshot.route.destination,
            duration: snapshot.route.duration,
            transport: snapshot.route.transport,
            base_price_cents: snapshot.route.base_price_cents,
            operator: snapshot.vehicle.operator,
            vehicle_type: snapshot.vehicle.vehicle_type,
            amenities: snapshot.vehicle.amenities,
            available_seats: available,
            total_seats: snapshot.vehicle.total_seats,
        });
    }

    Ok(Json(results))
}

async fn list_routes(State(state): State<AppState>) -> Result<Json<Vec<Route>>, ApiError> {
    Ok(Json(state.fleet.routes().await?))
}
