use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use rand::Rng;
use serde_json::Value;
use uuid::Uuid;

use farebox_core::booking::{Booking, BookingStatus};
use farebox_core::gateway::{ChargeRequest, GatewayError, PaymentGateway};
use farebox_core::payment::{Payment, PaymentStatus};
use farebox_core::store::{BookingStore, PaymentStore, StoreError};

#[derive(Debug, thiserror::Error)]
pub enum PaymentError {
    #[error("booking not found: {0}")]
    BookingNotFound(Uuid),

    /// Payment attempted on a booking that is not pending.
    #[error("booking {id} is not pending payment (status: {status:?})")]
    InvalidState { id: Uuid, status: BookingStatus },

    #[error("payment gateway unavailable: {0}")]
    GatewayUnavailable(String),

    #[error(transparent)]
    Store(StoreError),
}

/// Result of a payment attempt. `payment.status` distinguishes success
/// from a decline; on a decline the booking is returned unchanged (still
/// pending — seats are released by the expiry sweep, not by the failure).
#[derive(Debug, Clone)]
pub struct PaymentOutcome {
    pub booking: Booking,
    pub payment: Payment,
}

impl PaymentOutcome {
    pub fn succeeded(&self) -> bool {
        self.payment.status == PaymentStatus::Completed
    }
}

/// Drives the pending -> paid/failed transitions.
///
/// Approval is committed through the store's `mark_paid`, which
/// compare-and-swaps the pending status and persists the payment in the
/// same atomic unit — a booking can never end up both expired and paid,
/// and an already-paid booking can never gain a second completed payment.
pub struct PaymentProcessor {
    bookings: Arc<dyn BookingStore>,
    payments: Arc<dyn PaymentStore>,
    gateway: Arc<dyn PaymentGateway>,
}

impl PaymentProcessor {
    pub fn new(
        bookings: Arc<dyn BookingStore>,
        payments: Arc<dyn PaymentStore>,
        gateway: Arc<dyn PaymentGateway>,
    ) -> Self {
        Self {
            bookings,
            payments,
            gateway,
        }
    }

    pub async fn process_payment(
        &self,
        booking_id: Uuid,
        method: &str,
        payload: Value,
    ) -> Result<PaymentOutcome, PaymentError> {
        let booking = self
            .bookings
            .get(booking_id)
            .await
            .map_err(PaymentError::Store)?
            .ok_or(PaymentError::BookingNotFound(booking_id))?;
        if booking.status != BookingStatus::Pending {
            return Err(PaymentError::InvalidState {
                id: booking_id,
                status: booking.status,
            });
        }

        let request = ChargeRequest {
            booking_id,
            amount_cents: booking.total_cents,
            method: method.to_string(),
            payload,
        };

        match self.gateway.charge(&request).await {
            Ok(transaction_id) => {
                let payment = Payment {
                    id: Uuid::new_v4(),
                    booking_id,
                    amount_cents: booking.total_cents,
                    method: method.to_string(),
                    status: PaymentStatus::Completed,
                    transaction_id,
                    created_at: Utc::now(),
                };
                match self.bookings.mark_paid(booking_id, payment.clone()).await {
                    Ok(booking) => {
                        tracing::info!(
                            booking_id = %booking.id,
                            transaction_id = %payment.transaction_id,
                            "payment completed"
                        );
                        Ok(PaymentOutcome { booking, payment })
                    }
                    // The booking changed state under us (expiry sweep or a
                    // racing payment won); the charge is simulated, so
                    // nothing needs refunding.
                    Err(StoreError::NotPending { id, status }) => {
                        Err(PaymentError::InvalidState { id, status })
                    }
                    Err(err) => Err(PaymentError::Store(err)),
                }
            }
            Err(GatewayError::Declined(reason)) => {
                let payment = Payment {
                    id: Uuid::new_v4(),
                    booking_id,
                    amount_cents: booking.total_cents,
                    method: method.to_string(),
                    status: PaymentStatus::Failed,
                    transaction_id: new_transaction_id(),
                    created_at: Utc::now(),
                };
                self.payments
                    .record(payment.clone())
                    .await
                    .map_err(PaymentError::Store)?;
                tracing::warn!(%booking_id, %reason, "payment declined");
                Ok(PaymentOutcome { booking, payment })
            }
            Err(GatewayError::Unavailable(reason)) => {
                Err(PaymentError::GatewayUnavailable(reason))
            }
        }
    }
}

fn new_transaction_id() -> String {
    format!(
        "TXN{}{:04}",
        Utc::now().format("%Y%m%d%H%M%S"),
        rand::thread_rng().gen_range(0..10_000)
    )
}

/// Stand-in for a real provider: approves every charge unless the payload
/// asks for a decline (`{"fail": true}`) or the amount is non-positive.
pub struct SimulatedGateway;

#[async_trait]
impl PaymentGateway for SimulatedGateway {
    async fn charge(&self, request: &ChargeRequest) -> Result<String, GatewayError> {
        if request.amount_cents <= 0 {
            return Err(GatewayError::Declined(
                "charge amount must be positive".to_string(),
            ));
        }
        if request
            .payload
            .get("fail")
            .and_then(Value::as_bool)
            .unwrap_or(false)
        {
            return Err(GatewayError::Declined("simulated decline".to_string()));
        }
        Ok(new_transaction_id())
    }
}
