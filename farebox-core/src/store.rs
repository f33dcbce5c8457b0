use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::booking::{Booking, BookingStatus};
use crate::fleet::{Route, Vehicle};
use crate::payment::Payment;
use crate::schedule::ScheduleKey;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// One or more requested seats are already attached to an active
    /// booking for the same schedule. Carries exactly the conflicting ids.
    #[error("seats already held or booked: {}", .0.join(", "))]
    SeatConflict(Vec<String>),

    #[error("booking reference already in use: {0}")]
    DuplicateReference(String),

    #[error("booking not found: {0}")]
    BookingNotFound(Uuid),

    #[error("booking {id} is not pending (status: {status:?})")]
    NotPending { id: Uuid, status: BookingStatus },

    #[error("storage backend failure: {0}")]
    Backend(String),
}

/// Transactional home of all bookings. Implementations must make each
/// mutating operation a single atomic unit: `reserve` spans the conflict
/// check and the insert, `mark_paid` and `expire_pending` are
/// compare-and-swap on the pending status against the same state, so a
/// booking can never be both expired and paid.
#[async_trait]
pub trait BookingStore: Send + Sync {
    /// Atomically check the booking's seats against every active booking
    /// for its schedule and insert it. Fails fast with
    /// [`StoreError::SeatConflict`] or [`StoreError::DuplicateReference`];
    /// never waits or retries.
    async fn reserve(&self, booking: Booking) -> Result<Booking, StoreError>;

    async fn get(&self, id: Uuid) -> Result<Option<Booking>, StoreError>;

    /// All bookings with status pending or paid for the schedule.
    async fn active_for_schedule(&self, key: &ScheduleKey) -> Result<Vec<Booking>, StoreError>;

    /// A user's bookings, newest first.
    async fn for_user(&self, user_id: &str) -> Result<Vec<Booking>, StoreError>;

    async fn all(&self) -> Result<Vec<Booking>, StoreError>;

    /// Transition pending -> paid, set the payment reference and persist
    /// the completed payment record, all in one atomic unit.
    async fn mark_paid(&self, booking_id: Uuid, payment: Payment) -> Result<Booking, StoreError>;

    /// Transition pending -> cancelled, releasing the booking's seats.
    async fn cancel(&self, booking_id: Uuid) -> Result<Booking, StoreError>;

    /// Transition every pending booking created before `cutoff` (optionally
    /// restricted to one schedule) to expired. Returns the expired set.
    async fn expire_pending(
        &self,
        key: Option<&ScheduleKey>,
        cutoff: DateTime<Utc>,
    ) -> Result<Vec<Booking>, StoreError>;
}

#[async_trait]
pub trait PaymentStore: Send + Sync {
    /// Append a payment attempt to the audit log.
    async fn record(&self, payment: Payment) -> Result<(), StoreError>;

    async fn for_booking(&self, booking_id: Uuid) -> Result<Vec<Payment>, StoreError>;

    async fn all(&self) -> Result<Vec<Payment>, StoreError>;
}

/// Read side of the vehicle/route management subsystem. The booking core
/// only ever consumes it.
#[async_trait]
pub trait FleetStore: Send + Sync {
    async fn route(&self, id: Uuid) -> Result<Option<Route>, StoreError>;

    async fn vehicle(&self, id: Uuid) -> Result<Option<Vehicle>, StoreError>;

    async fn routes(&self) -> Result<Vec<Route>, StoreError>;
}
