use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use farebox_core::schedule::ParseScheduleKeyError;
use farebox_core::store::StoreError;
use farebox_ledger::{LedgerError, PaymentError};

#[derive(Debug)]
pub enum ApiError {
    Validation(String),
    NotFound(String),
    /// 409 carrying exactly the seats the caller must re-pick.
    SeatConflict(Vec<String>),
    InvalidState(String),
    Internal(anyhow::Error),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Validation(msg) => {
                (StatusCode::BAD_REQUEST, Json(json!({ "error": msg }))).into_response()
            }
            ApiError::NotFound(msg) => {
                (StatusCode::NOT_FOUND, Json(json!({ "error": msg }))).into_response()
            }
            ApiError::SeatConflict(seats) => (
                StatusCode::CONFLICT,
                Json(json!({
                    "error": "some seats are already held or booked",
                    "conflicting_seats": seats,
                })),
            )
                .into_response(),
            ApiError::InvalidState(msg) => {
                (StatusCode::CONFLICT, Json(json!({ "error": msg }))).into_response()
            }
            ApiError::Internal(err) => {
                tracing::error!("Internal Server Error: {err:#}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "error": "Internal Server Error" })),
                )
                    .into_response()
            }
        }
    }
}

impl From<LedgerError> for ApiError {
    fn from(err: LedgerError) -> Self {
        match err {
            LedgerError::Validation(_) | LedgerError::InvalidSeat(_) => {
                ApiError::Validation(err.to_string())
            }
            LedgerError::SeatConflict(seats) => ApiError::SeatConflict(seats),
            LedgerError::BookingNotFound(_)
            | LedgerError::RouteNotFound(_)
            | LedgerError::VehicleNotFound(_) => ApiError::NotFound(err.to_string()),
            LedgerError::NotCancellable { .. } => ApiError::InvalidState(err.to_string()),
            LedgerError::Layout(err) => ApiError::Internal(anyhow::Error::new(err)),
            LedgerError::Store(err) => ApiError::Internal(anyhow::Error::new(err)),
        }
    }
}

impl From<PaymentError> for ApiError {
    fn from(err: PaymentError) -> Self {
        match err {
            PaymentError::BookingNotFound(_) => ApiError::NotFound(err.to_string()),
            PaymentError::InvalidState { .. } => ApiError::InvalidState(err.to_string()),
            PaymentError::GatewayUnavailable(_) => ApiError::Internal(anyhow::Error::new(err)),
            PaymentError::Store(err) => ApiError::Internal(anyhow::Error::new(err)),
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        ApiError::Internal(anyhow::Error::new(err))
    }
}

impl From<ParseScheduleKeyError> for ApiError {
    fn from(err: ParseScheduleKeyError) -> Self {
        ApiError::Validation(err.to_string())
    }
}
