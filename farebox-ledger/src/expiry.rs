use std::sync::Arc;

use chrono::{Duration, Utc};

use farebox_core::booking::Booking;
use farebox_core::schedule::ScheduleKey;
use farebox_core::store::{BookingStore, StoreError};

/// Housekeeping sweep that releases seats locked by abandoned bookings:
/// any pending booking older than the configured time-to-live transitions
/// to expired, after which its seats read as available again.
///
/// The store performs the transition as a compare-and-swap on the pending
/// status, so a sweep can never expire a booking a concurrent payment has
/// just marked paid.
pub struct ExpirySweeper {
    bookings: Arc<dyn BookingStore>,
    ttl: Duration,
}

impl ExpirySweeper {
    pub fn new(bookings: Arc<dyn BookingStore>, ttl_seconds: u64) -> Self {
        Self {
            bookings,
            ttl: Duration::seconds(ttl_seconds as i64),
        }
    }

    /// Expire stale pending bookings across all schedules.
    pub async fn sweep(&self) -> Result<Vec<Booking>, StoreError> {
        self.run(None).await
    }

    /// Expire stale pending bookings for one schedule only.
    pub async fn sweep_schedule(&self, key: &ScheduleKey) -> Result<Vec<Booking>, StoreError> {
        self.run(Some(key)).await
    }

    async fn run(&self, key: Option<&ScheduleKey>) -> Result<Vec<Booking>, StoreError> {
        let cutoff = Utc::now() - self.ttl;
        let expired = self.bookings.expire_pending(key, cutoff).await?;
        if expired.is_empty() {
            tracing::debug!("expiry sweep found nothing to release");
        } else {
            tracing::info!(released = expired.len(), "expired stale pending bookings");
        }
        Ok(expired)
    }
}
