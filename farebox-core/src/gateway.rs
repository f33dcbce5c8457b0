use async_trait::async_trait;
use serde_json::Value;
use uuid::Uuid;

/// Charge instruction handed to a payment provider.
#[derive(Debug, Clone)]
pub struct ChargeRequest {
    pub booking_id: Uuid,
    pub amount_cents: i32,
    pub method: String,
    /// Provider-specific details (card fields etc.), passed through opaquely.
    pub payload: Value,
}

#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    #[error("payment declined: {0}")]
    Declined(String),

    #[error("payment gateway unavailable: {0}")]
    Unavailable(String),
}

/// Seam for the payment provider. The bundled implementation simulates a
/// gateway; a real integration would live behind this same trait.
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Attempt the charge, returning the provider's transaction id.
    async fn charge(&self, request: &ChargeRequest) -> Result<String, GatewayError>;
}
