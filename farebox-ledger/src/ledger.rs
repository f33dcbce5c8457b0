use std::collections::HashSet;
use std::sync::Arc;

use chrono::Utc;
use rand::{distributions::Alphanumeric, Rng};
use uuid::Uuid;

use farebox_catalog::availability::{compute_availability, SeatAvailability};
use farebox_catalog::layout::{generate_layout, LayoutError, Seat};
use farebox_catalog::pricing::quote_total;
use farebox_core::booking::{Booking, BookingStatus, Passenger};
use farebox_core::fleet::{Route, Vehicle};
use farebox_core::schedule::ScheduleKey;
use farebox_core::store::{BookingStore, FleetStore, StoreError};

/// How many fresh references to try before giving up on a reserve that
/// keeps colliding. Collisions need a same-second, same-suffix clash, so
/// one retry is already rare.
const REFERENCE_ATTEMPTS: usize = 5;

#[derive(Debug, thiserror::Error)]
pub enum LedgerError {
    /// Malformed request, rejected before touching the store.
    #[error("validation failed: {0}")]
    Validation(String),

    /// Seat ids that are not part of the vehicle's layout.
    #[error("unknown seats for this vehicle: {}", .0.join(", "))]
    InvalidSeat(Vec<String>),

    /// Seats already attached to an active booking. Carries exactly the
    /// conflicting ids so callers can re-offer alternatives.
    #[error("seats already held or booked: {}", .0.join(", "))]
    SeatConflict(Vec<String>),

    #[error("booking not found: {0}")]
    BookingNotFound(Uuid),

    /// Cancellation attempted on a booking that no longer holds its
    /// seats as pending.
    #[error("booking {id} cannot be cancelled (status: {status:?})")]
    NotCancellable { id: Uuid, status: BookingStatus },

    #[error("route not found: {0}")]
    RouteNotFound(Uuid),

    #[error("vehicle not found: {0}")]
    VehicleNotFound(Uuid),

    #[error(transparent)]
    Layout(#[from] LayoutError),

    #[error(transparent)]
    Store(StoreError),
}

impl From<StoreError> for LedgerError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::SeatConflict(seats) => LedgerError::SeatConflict(seats),
            other => LedgerError::Store(other),
        }
    }
}

/// Everything a seat-picker UI needs for one departure: the route, the
/// vehicle serving it and the per-seat availability in layout order.
#[derive(Debug, Clone)]
pub struct ScheduleSnapshot {
    pub schedule: ScheduleKey,
    pub route: Route,
    pub vehicle: Vehicle,
    pub seats: Vec<SeatAvailability>,
}

/// The transactional core. Validates booking requests and hands the
/// store a fully-priced booking to reserve as one atomic unit; never
/// retries a seat conflict and never substitutes seats.
pub struct BookingLedger {
    bookings: Arc<dyn BookingStore>,
    fleet: Arc<dyn FleetStore>,
    reference_prefix: String,
}

impl BookingLedger {
    pub fn new(bookings: Arc<dyn BookingStore>, fleet: Arc<dyn FleetStore>) -> Self {
        Self::with_prefix(bookings, fleet, "BT")
    }

    pub fn with_prefix(
        bookings: Arc<dyn BookingStore>,
        fleet: Arc<dyn FleetStore>,
        reference_prefix: &str,
    ) -> Self {
        Self {
            bookings,
            fleet,
            reference_prefix: reference_prefix.to_string(),
        }
    }

    /// Reserve `seat_ids` on a departure for `user_id`.
    ///
    /// Guarantees at most one winner per (schedule, seat): the conflict
    /// check and the insert happen inside the store's atomic `reserve`,
    /// so two concurrent calls over an overlapping seat set can never
    /// both succeed. Fails fast on conflict; retry policy belongs to the
    /// caller.
    pub async fn create_booking(
        &self,
        user_id: &str,
        schedule: ScheduleKey,
        seat_ids: Vec<String>,
        passengers: Vec<Passenger>,
    ) -> Result<Booking, LedgerError> {
        if seat_ids.is_empty() {
            return Err(LedgerError::Validation(
                "a booking needs at least one seat".to_string(),
            ));
        }
        let unique: HashSet<&str> = seat_ids.iter().map(String::as_str).collect();
        if unique.len() != seat_ids.len() {
            return Err(LedgerError::Validation(
                "seat ids must be unique within a booking".to_string(),
            ));
        }
        if passengers.len() != seat_ids.len() {
            return Err(LedgerError::Validation(format!(
                "expected {} passenger details, got {}",
                seat_ids.len(),
                passengers.len()
            )));
        }

        let (route, vehicle) = self.route_and_vehicle(&schedule).await?;
        let layout = generate_layout(vehicle.total_seats, &vehicle.layout_pattern)?;

        let selected = match select_seats(&layout, &seat_ids) {
            Ok(selected) => selected,
            Err(unknown) => return Err(LedgerError::InvalidSeat(unknown)),
        };
        let total_cents = quote_total(route.base_price_cents, &selected);

        for _ in 0..REFERENCE_ATTEMPTS {
            let booking = Booking {
                id: Uuid::new_v4(),
                reference: self.new_reference(),
                user_id: user_id.to_string(),
                schedule: schedule.clone(),
                seats: seat_ids.clone(),
                passengers: passengers.clone(),
                total_cents,
                status: BookingStatus::Pending,
                payment_reference: None,
                created_at: Utc::now(),
            };

            match self.bookings.reserve(booking).await {
                Ok(booking) => {
                    tracing::info!(
                        booking_id = %booking.id,
                        reference = %booking.reference,
                        schedule = %booking.schedule,
                        seats = ?booking.seats,
                        "booking reserved"
                    );
                    return Ok(booking);
                }
                // Reference clash is internal; retry with a fresh one.
                Err(StoreError::DuplicateReference(reference)) => {
                    tracing::warn!(%reference, "booking reference collision, regenerating");
                }
                Err(err) => return Err(err.into()),
            }
        }

        Err(LedgerError::Store(StoreError::Backend(
            "could not allocate a unique booking reference".to_string(),
        )))
    }

    /// Release a pending booking's seats at the customer's request.
    /// Paid and already-terminal bookings are refused; refunds are a
    /// separate concern.
    pub async fn cancel_booking(&self, id: Uuid) -> Result<Booking, LedgerError> {
        match self.bookings.cancel(id).await {
            Ok(booking) => {
                tracing::info!(
                    booking_id = %booking.id,
                    schedule = %booking.schedule,
                    seats = ?booking.seats,
                    "booking cancelled"
                );
                Ok(booking)
            }
            Err(StoreError::BookingNotFound(id)) => Err(LedgerError::BookingNotFound(id)),
            Err(StoreError::NotPending { id, status }) => {
                Err(LedgerError::NotCancellable { id, status })
            }
            Err(err) => Err(err.into()),
        }
    }

    pub async fn booking(&self, id: Uuid) -> Result<Option<Booking>, LedgerError> {
        Ok(self.bookings.get(id).await?)
    }

    pub async fn bookings_for_user(&self, user_id: &str) -> Result<Vec<Booking>, LedgerError> {
        Ok(self.bookings.for_user(user_id).await?)
    }

    /// Current availability for one departure, derived from the same
    /// store `create_booking` writes through, so a committed booking is
    /// visible to the very next snapshot.
    pub async fn snapshot(&self, schedule: &ScheduleKey) -> Result<ScheduleSnapshot, LedgerError> {
        let (route, vehicle) = self.route_and_vehicle(schedule).await?;
        let layout = generate_layout(vehicle.total_seats, &vehicle.layout_pattern)?;
        let active = self.bookings.active_for_schedule(schedule).await?;
        let seats = compute_availability(&layout, &active);
        Ok(ScheduleSnapshot {
            schedule: schedule.clone(),
            route,
            vehicle,
            seats,
        })
    }

    async fn route_and_vehicle(
        &self,
        schedule: &ScheduleKey,
    ) -> Result<(Route, Vehicle), LedgerError> {
        let route = self
            .fleet
            .route(schedule.route_id)
            .await?
            .ok_or(LedgerError::RouteNotFound(schedule.route_id))?;
        let vehicle = self
            .fleet
            .vehicle(route.vehicle_id)
            .await?
            .ok_or(LedgerError::VehicleNotFound(route.vehicle_id))?;
        Ok((route, vehicle))
    }

    fn new_reference(&self) -> String {
        let suffix: String = rand::thread_rng()
            .sample_iter(&Alphanumeric)
            .take(4)
            .map(|c| (c as char).to_ascii_uppercase())
            .collect();
        format!(
            "{}{}{}",
            self.reference_prefix,
            Utc::now().format("%Y%m%d%H%M%S"),
            suffix
        )
    }
}

/// Resolve requested ids against the layout, or report the unknown ones.
fn select_seats<'a>(layout: &'a [Seat], seat_ids: &[String]) -> Result<Vec<&'a Seat>, Vec<String>> {
    let mut selected = Vec::with_capacity(seat_ids.len());
    let mut unknown = Vec::new();
    for id in seat_ids {
        match layout.iter().find(|s| &s.id == id) {
            Some(seat) => selected.push(seat),
            None => unknown.push(id.clone()),
        }
    }
    if unknown.is_empty() {
        Ok(selected)
    } else {
        unknown.sort();
        Err(unknown)
    }
}
