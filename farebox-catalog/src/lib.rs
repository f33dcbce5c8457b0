pub mod availability;
pub mod layout;
pub mod pricing;

pub use availability::{compute_availability, remaining_seats, SeatAvailability, SeatState};
pub use layout::{generate_layout, LayoutError, Seat, SeatCategory};
