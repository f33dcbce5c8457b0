use axum::{extract::State, routing::post, Json, Router};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use farebox_core::booking::BookingStatus;

use crate::error::ApiError;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/api/payments/process", post(process_payment))
}

#[derive(Debug, Deserialize)]
struct ProcessPaymentRequest {
    booking_id: Uuid,
    method: String,
    /// Provider-specific details, forwarded opaquely to the gateway.
    #[serde(default)]
    details: Value,
}

#[derive(Debug, Serialize)]
struct PaymentResponse {
    status: &'static str,
    message: String,
    booking_id: Uuid,
    booking_status: BookingStatus,
    transaction_id: String,
    amount_cents: i32,
}

/// Charge a pending booking. Succeeds into paid, or reports the decline
/// while the booking stays pending until the expiry sweep releases it.
async fn process_payment(
    State(state): State<AppState>,
    Json(request): Json<ProcessPaymentRequest>,
) -> Result<Json<PaymentResponse>, ApiError> {
    let outcome = state
        .payments
        .process_payment(request.booking_id, &request.method, request.details)
        .await?;

    let response = if outcome.succeeded() {
        PaymentResponse {
            status: "success",
            message: "Payment processed successfully".to_string(),
            booking_id: outcome.booking.id,
            booking_status: outcome.booking.status,
            transaction_id: outcome.payment.transaction_id,
            amount_cents: outcome.payment.amount_cents,
        }
    } else {
        PaymentResponse {
            status: "failed",
            message: "Payment processing failed".to_string(),
            booking_id: outcome.booking.id,
            booking_status: outcome.booking.status,
            transaction_id: outcome.payment.transaction_id,
            amount_cents: outcome.payment.amount_cents,
        }
    };
    Ok(Json(response))
}
