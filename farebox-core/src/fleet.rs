use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransportKind {
    Bus,
    Ferry,
}

/// A coach or vessel in service. Seats are never persisted per vehicle;
/// they are derived on demand from `total_seats` and `layout_pattern` so
/// that seat identifiers stay stable across requests.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Vehicle {
    pub id: Uuid,
    pub operator: String,
    pub vehicle_type: String,
    /// Columns per side group, e.g. "2-2" or "2-1".
    pub layout_pattern: String,
    pub total_seats: i32,
    pub amenities: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Route {
    pub id: Uuid,
    pub origin: String,
    pub destination: String,
    pub distance_km: u32,
    pub duration: String,
    pub transport: TransportKind,
    pub base_price_cents: i32,
    pub vehicle_id: Uuid,
}
