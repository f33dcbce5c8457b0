use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use farebox_core::booking::{Booking, BookingStatus};

use crate::layout::Seat;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SeatState {
    Available,
    /// Attached to a pending (unpaid) booking, temporarily unavailable.
    Held,
    Booked,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeatAvailability {
    #[serde(flatten)]
    pub seat: Seat,
    pub state: SeatState,
}

/// Fold the active bookings for one schedule over the seat list.
///
/// A seat is booked if any paid booking includes it, held if any pending
/// booking does, otherwise available. Output order matches the input seat
/// list so UIs can render rows stably. The result is only as fresh as the
/// booking snapshot passed in; reading it straight from the store after a
/// commit therefore reflects that commit.
pub fn compute_availability(seats: &[Seat], active: &[Booking]) -> Vec<SeatAvailability> {
    let mut booked: HashSet<&str> = HashSet::new();
    let mut held: HashSet<&str> = HashSet::new();

    for booking in active {
        let bucket = match booking.status {
            BookingStatus::Paid => &mut booked,
            BookingStatus::Pending => &mut held,
            // Terminal bookings hold nothing; tolerate them in the input.
            BookingStatus::Cancelled | BookingStatus::Expired => continue,
        };
        for seat_id in &booking.seats {
            bucket.insert(seat_id.as_str());
        }
    }

    seats
        .iter()
        .map(|seat| {
            let state = if booked.contains(seat.id.as_str()) {
                SeatState::Booked
            } else if held.contains(seat.id.as_str()) {
                SeatState::Held
            } else {
                SeatState::Available
            };
            SeatAvailability {
                seat: seat.clone(),
                state,
            }
        })
        .collect()
}

/// Count of seats still open for sale.
pub fn remaining_seats(seats: &[Seat], active: &[Booking]) -> usize {
    compute_availability(seats, active)
        .iter()
        .filter(|s| s.state == SeatState::Available)
        .count()
}
