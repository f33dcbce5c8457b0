use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use farebox_core::booking::{Booking, BookingStatus};
use farebox_core::fleet::{Route, Vehicle};
use farebox_core::payment::Payment;
use farebox_core::schedule::ScheduleKey;
use farebox_core::store::{BookingStore, FleetStore, PaymentStore, StoreError};

#[derive(Default)]
struct Inner {
    bookings: HashMap<Uuid, Booking>,
    references: HashSet<String>,
    payments: Vec<Payment>,
    routes: HashMap<Uuid, Route>,
    vehicles: HashMap<Uuid, Vehicle>,
}

/// In-memory store backing all repositories. One `RwLock` guards the
/// whole state; every mutating operation holds the write guard across its
/// entire check-and-mutate span, so `reserve` can never interleave with a
/// competing `reserve`, and `mark_paid` can never interleave with
/// `expire_pending`. That single guard is the in-process equivalent of
/// the transaction a SQL-backed implementation would open.
pub struct MemoryStore {
    inner: RwLock<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(Inner::default()),
        }
    }

    pub async fn insert_vehicle(&self, vehicle: Vehicle) {
        self.inner.write().await.vehicles.insert(vehicle.id, vehicle);
    }

    pub async fn insert_route(&self, route: Route) {
        self.inner.write().await.routes.insert(route.id, route);
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BookingStore for MemoryStore {
    async fn reserve(&self, booking: Booking) -> Result<Booking, StoreError> {
        let mut inner = self.inner.write().await;

        if inner.references.contains(&booking.reference) {
            return Err(StoreError::DuplicateReference(booking.reference));
        }

        let mut conflicts: Vec<String> = Vec::new();
        for existing in inner.bookings.values() {
            if existing.schedule != booking.schedule || !existing.is_active() {
                continue;
            }
            for seat in &booking.seats {
                if existing.seats.contains(seat) {
                    conflicts.push(seat.clone());
                }
            }
        }
        if !conflicts.is_empty() {
            conflicts.sort();
            conflicts.dedup();
            return Err(StoreError::SeatConflict(conflicts));
        }

        inner.references.insert(booking.reference.clone());
        inner.bookings.insert(booking.id, booking.clone());
        Ok(booking)
    }

    async fn get(&self, id: Uuid) -> Result<Option<Booking>, StoreError> {
        Ok(self.inner.read().await.bookings.get(&id).cloned())
    }

    async fn active_for_schedule(&self, key: &ScheduleKey) -> Result<Vec<Booking>, StoreError> {
        let inner = self.inner.read().await;
        Ok(inner
            .bookings
            .values()
            .filter(|b| b.schedule == *key && b.is_active())
            .cloned()
            .collect())
    }

    async fn for_user(&self, user_id: &str) -> Result<Vec<Booking>, StoreError> {
        let inner = self.inner.read().await;
        let mut bookings: Vec<Booking> = inner
            .bookings
            .values()
            .filter(|b| b.user_id == user_id)
            .cloned()
            .collect();
        bookings.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(bookings)
    }

    async fn all(&self) -> Result<Vec<Booking>, StoreError> {
        Ok(self.inner.read().await.bookings.values().cloned().collect())
    }

    async fn mark_paid(&self, booking_id: Uuid, payment: Payment) -> Result<Booking, StoreError> {
        let mut inner = self.inner.write().await;

        let booking = inner
            .bookings
            .get_mut(&booking_id)
            .ok_or(StoreError::BookingNotFound(booking_id))?;
        if booking.status != BookingStatus::Pending {
            return Err(StoreError::NotPending {
                id: booking_id,
                status: booking.status,
            });
        }

        booking.status = BookingStatus::Paid;
        booking.payment_reference = Some(payment.id);
        let paid = booking.clone();
        inner.payments.push(payment);
        Ok(paid)
    }

    async fn cancel(&self, booking_id: Uuid) -> Result<Booking, StoreError> {
        let mut inner = self.inner.write().await;

        let booking = inner
            .bookings
            .get_mut(&booking_id)
            .ok_or(StoreError::BookingNotFound(booking_id))?;
        if booking.status != BookingStatus::Pending {
            return Err(StoreError::NotPending {
                id: booking_id,
                status: booking.status,
            });
        }

        booking.status = BookingStatus::Cancelled;
        Ok(booking.clone())
    }

    async fn expire_pending(
        &self,
        key: Option<&ScheduleKey>,
        cutoff: DateTime<Utc>,
    ) -> Result<Vec<Booking>, StoreError> {
        let mut inner = self.inner.write().await;

        let mut expired = Vec::new();
        for booking in inner.bookings.values_mut() {
            if booking.status != BookingStatus::Pending || booking.created_at >= cutoff {
                continue;
            }
            if let Some(key) = key {
                if booking.schedule != *key {
                    continue;
                }
            }
            booking.status = BookingStatus::Expired;
            expired.push(booking.clone());
        }
        Ok(expired)
    }
}

#[async_trait]
impl PaymentStore for MemoryStore {
    async fn record(&self, payment: Payment) -> Result<(), StoreError> {
        self.inner.write().await.payments.push(payment);
        Ok(())
    }

    async fn for_booking(&self, booking_id: Uuid) -> Result<Vec<Payment>, StoreError> {
        let inner = self.inner.read().await;
        Ok(inner
            .payments
            .iter()
            .filter(|p| p.booking_id == booking_id)
            .cloned()
            .collect())
    }

    async fn all(&self) -> Result<Vec<Payment>, StoreError> {
        Ok(self.inner.read().await.payments.clone())
    }
}

#[async_trait]
impl FleetStore for MemoryStore {
    async fn route(&self, id: Uuid) -> Result<Option<Route>, StoreError> {
        Ok(self.inner.read().await.routes.get(&id).cloned())
    }

    async fn vehicle(&self, id: Uuid) -> Result<Option<Vehicle>, StoreError> {
        Ok(self.inner.read().await.vehicles.get(&id).cloned())
    }

    async fn routes(&self) -> Result<Vec<Route>, StoreError> {
        let inner = self.inner.read().await;
        let mut routes: Vec<Route> = inner.routes.values().cloned().collect();
        routes.sort_by(|a, b| (&a.origin, &a.destination).cmp(&(&b.origin, &b.destination)));
        Ok(routes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, NaiveDate};
    use farebox_core::booking::Passenger;
    use farebox_core::payment::PaymentStatus;

    fn schedule() -> ScheduleKey {
        ScheduleKey::new(
            Uuid::new_v4(),
            NaiveDate::from_ymd_opt(2026, 9, 1).unwrap(),
        )
    }

    fn pending_booking(key: &ScheduleKey, seats: &[&str], reference: &str) -> Booking {
        Booking {
            id: Uuid::new_v4(),
            reference: reference.to_string(),
            user_id: "user-1".to_string(),
            schedule: key.clone(),
            seats: seats.iter().map(|s| s.to_string()).collect(),
            passengers: seats
                .iter()
                .map(|_| Passenger {
                    first_name: "Sok".to_string(),
                    last_name: "Chan".to_string(),
                    phone: None,
                })
                .collect(),
            total_cents: 1500,
            status: BookingStatus::Pending,
            payment_reference: None,
            created_at: Utc::now(),
        }
    }

    fn payment_for(booking: &Booking) -> Payment {
        Payment {
            id: Uuid::new_v4(),
            booking_id: booking.id,
            amount_cents: booking.total_cents,
            method: "card".to_string(),
            status: PaymentStatus::Completed,
            transaction_id: "TXN20260901000000".to_string(),
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_reserve_reports_exact_conflicts() {
        let store = MemoryStore::new();
        let key = schedule();

        store
            .reserve(pending_booking(&key, &["1A", "1B"], "BT-1"))
            .await
            .unwrap();

        let err = store
            .reserve(pending_booking(&key, &["1B", "1C"], "BT-2"))
            .await
            .unwrap_err();
        match err {
            StoreError::SeatConflict(seats) => assert_eq!(seats, vec!["1B".to_string()]),
            other => panic!("expected seat conflict, got {other:?}"),
        }

        // Non-overlapping seats on the same schedule still go through.
        store
            .reserve(pending_booking(&key, &["1C"], "BT-3"))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_reserve_is_scoped_to_the_schedule() {
        let store = MemoryStore::new();
        let key_a = schedule();
        let key_b = schedule();

        store
            .reserve(pending_booking(&key_a, &["1A"], "BT-1"))
            .await
            .unwrap();
        store
            .reserve(pending_booking(&key_b, &["1A"], "BT-2"))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_duplicate_reference_rejected() {
        let store = MemoryStore::new();
        let key = schedule();

        store
            .reserve(pending_booking(&key, &["1A"], "BT-1"))
            .await
            .unwrap();
        let err = store
            .reserve(pending_booking(&key, &["1B"], "BT-1"))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::DuplicateReference(_)));
    }

    #[tokio::test]
    async fn test_mark_paid_is_compare_and_swap() {
        let store = MemoryStore::new();
        let key = schedule();
        let booking = store
            .reserve(pending_booking(&key, &["1A"], "BT-1"))
            .await
            .unwrap();

        let paid = store
            .mark_paid(booking.id, payment_for(&booking))
            .await
            .unwrap();
        assert_eq!(paid.status, BookingStatus::Paid);
        assert!(paid.payment_reference.is_some());
        assert_eq!(store.for_booking(booking.id).await.unwrap().len(), 1);

        // Second attempt sees the paid status, not pending.
        let err = store
            .mark_paid(booking.id, payment_for(&booking))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            StoreError::NotPending {
                status: BookingStatus::Paid,
                ..
            }
        ));
        assert_eq!(store.for_booking(booking.id).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_expiry_skips_paid_and_fresh_bookings() {
        let store = MemoryStore::new();
        let key = schedule();

        let mut stale = pending_booking(&key, &["1A"], "BT-1");
        stale.created_at = Utc::now() - Duration::hours(2);
        let stale = store.reserve(stale).await.unwrap();

        let fresh = store
            .reserve(pending_booking(&key, &["1B"], "BT-2"))
            .await
            .unwrap();

        let mut paid_old = pending_booking(&key, &["1C"], "BT-3");
        paid_old.created_at = Utc::now() - Duration::hours(2);
        let paid_old = store.reserve(paid_old).await.unwrap();
        store
            .mark_paid(paid_old.id, payment_for(&paid_old))
            .await
            .unwrap();

        let cutoff = Utc::now() - Duration::minutes(15);
        let expired = store.expire_pending(Some(&key), cutoff).await.unwrap();
        assert_eq!(expired.len(), 1);
        assert_eq!(expired[0].id, stale.id);

        let active = store.active_for_schedule(&key).await.unwrap();
        let active_ids: Vec<Uuid> = active.iter().map(|b| b.id).collect();
        assert!(active_ids.contains(&fresh.id));
        assert!(active_ids.contains(&paid_old.id));
        assert!(!active_ids.contains(&stale.id));
    }

    #[tokio::test]
    async fn test_cancel_releases_only_pending() {
        let store = MemoryStore::new();
        let key = schedule();
        let booking = store
            .reserve(pending_booking(&key, &["1A"], "BT-1"))
            .await
            .unwrap();

        let cancelled = store.cancel(booking.id).await.unwrap();
        assert_eq!(cancelled.status, BookingStatus::Cancelled);
        assert!(store.active_for_schedule(&key).await.unwrap().is_empty());

        let err = store.cancel(booking.id).await.unwrap_err();
        assert!(matches!(err, StoreError::NotPending { .. }));
    }
}
