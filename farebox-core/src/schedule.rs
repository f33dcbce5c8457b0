use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identifies one departure instance against which seats are sold.
///
/// Rendered canonically as `{route_id}:{YYYY-MM-DD}` with an optional
/// `:{trip_slot}` suffix. Colons are used as separators because route ids
/// are UUIDs and already contain hyphens. The same encoding is used in
/// URLs, storage keys and JSON.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ScheduleKey {
    pub route_id: Uuid,
    pub travel_date: NaiveDate,
    pub trip_slot: Option<u16>,
}

impl ScheduleKey {
    pub fn new(route_id: Uuid, travel_date: NaiveDate) -> Self {
        Self {
            route_id,
            travel_date,
            trip_slot: None,
        }
    }

    pub fn with_slot(route_id: Uuid, travel_date: NaiveDate, trip_slot: u16) -> Self {
        Self {
            route_id,
            travel_date,
            trip_slot: Some(trip_slot),
        }
    }
}

impl fmt::Display for ScheduleKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.trip_slot {
            Some(slot) => write!(f, "{}:{}:{}", self.route_id, self.travel_date, slot),
            None => write!(f, "{}:{}", self.route_id, self.travel_date),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ParseScheduleKeyError {
    #[error("expected '{{route_id}}:{{date}}[:{{slot}}]', got: {0}")]
    Malformed(String),

    #[error("invalid route id in schedule key: {0}")]
    RouteId(#[from] uuid::Error),

    #[error("invalid travel date in schedule key: {0}")]
    Date(#[from] chrono::ParseError),

    #[error("invalid trip slot in schedule key: {0}")]
    TripSlot(#[from] std::num::ParseIntError),
}

impl FromStr for ScheduleKey {
    type Err = ParseScheduleKeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split(':').collect();
        if parts.len() < 2 || parts.len() > 3 {
            return Err(ParseScheduleKeyError::Malformed(s.to_string()));
        }

        let route_id = Uuid::parse_str(parts[0])?;
        let travel_date = NaiveDate::parse_from_str(parts[1], "%Y-%m-%d")?;
        let trip_slot = match parts.get(2) {
            Some(raw) => Some(raw.parse::<u16>()?),
            None => None,
        };

        Ok(Self {
            route_id,
            travel_date,
            trip_slot,
        })
    }
}

impl TryFrom<String> for ScheduleKey {
    type Error = ParseScheduleKeyError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ScheduleKey> for String {
    fn from(key: ScheduleKey) -> Self {
        key.to_string()
    }
}
