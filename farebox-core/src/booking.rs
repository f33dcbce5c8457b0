use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::schedule::ScheduleKey;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    Pending,
    Paid,
    Cancelled,
    Expired,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Passenger {
    pub first_name: String,
    pub last_name: String,
    pub phone: Option<String>,
}

/// One reservation against a departure. Bookings are never deleted, only
/// status-transitioned, so the ledger keeps a full audit history.
///
/// Invariant: across all bookings with status pending or paid for the same
/// [`ScheduleKey`], the `seats` sets are pairwise disjoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Booking {
    pub id: Uuid,
    /// Human-facing unique code, printed on tickets.
    pub reference: String,
    pub user_id: String,
    pub schedule: ScheduleKey,
    pub seats: Vec<String>,
    pub passengers: Vec<Passenger>,
    pub total_cents: i32,
    pub status: BookingStatus,
    /// Set when the booking transitions to paid; points at the completed
    /// [`crate::Payment`].
    pub payment_reference: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

impl Booking {
    /// Whether the booking still holds its seats against the schedule.
    pub fn is_active(&self) -> bool {
        matches!(self.status, BookingStatus::Pending | BookingStatus::Paid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn booking_with_status(status: BookingStatus) -> Booking {
        Booking {
            id: Uuid::new_v4(),
            reference: "BT202609010000001A2B".to_string(),
            user_id: "user-1".to_string(),
            schedule: ScheduleKey::new(
                Uuid::new_v4(),
                NaiveDate::from_ymd_opt(2026, 9, 1).unwrap(),
            ),
            seats: vec!["1A".to_string()],
            passengers: vec![Passenger {
                first_name: "Sok".to_string(),
                last_name: "Chan".to_string(),
                phone: None,
            }],
            total_cents: 1500,
            status,
            payment_reference: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_active_statuses_hold_seats() {
        assert!(booking_with_status(BookingStatus::Pending).is_active());
        assert!(booking_with_status(BookingStatus::Paid).is_active());
        assert!(!booking_with_status(BookingStatus::Cancelled).is_active());
        assert!(!booking_with_status(BookingStatus::Expired).is_active());
    }

    #[test]
    fn test_status_serializes_lowercase() {
        let json = serde_json::to_string(&BookingStatus::Pending).unwrap();
        assert_eq!(json, "\"pending\"");
        let json = serde_json::to_string(&BookingStatus::Paid).unwrap();
        assert_eq!(json, "\"paid\"");
    }
}
