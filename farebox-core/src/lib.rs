pub mod booking;
pub mod fleet;
pub mod gateway;
pub mod payment;
pub mod schedule;
pub mod store;

pub use booking::{Booking, BookingStatus, Passenger};
pub use fleet::{Route, TransportKind, Vehicle};
pub use payment::{Payment, PaymentStatus};
pub use schedule::ScheduleKey;
