//! Payment storage trait and types.

use thiserror::Error;

use super::Payment;

/// Error type for payment operations.
#[derive(Debug, Error)]
pub enum PaymentError {
    /// Payment not found.
    #[error("Payment not found: {0}")]
    NotFound(String),
    /// Database error.
    #[error("Database error: {0}")]
    Database(String),
}

/// Request to create a pending payment row.
#[derive(Debug, Clone)]
pub struct CreatePaymentRequest {
    pub user_id: String,
    pub ticket_id: String,
    /// The referenced ticket's price, copied at creation.
    pub amount: i64,
    pub method: String,
    pub transaction_id: String,
}

/// Trait for payment storage backends.
///
/// `complete` and `fail` synchronize the payment with its ticket in one
/// transaction; a payment can never end up settled while its ticket keeps
/// the pre-settlement status.
pub trait PaymentStore: Send + Sync {
    /// Insert a pending payment.
    fn create(&self, request: CreatePaymentRequest) -> Result<Payment, PaymentError>;

    /// Get a payment by ID.
    fn get(&self, id: &str) -> Result<Option<Payment>, PaymentError>;

    /// Payments made by a user, in creation order.
    fn list_for_user(&self, user_id: &str) -> Result<Vec<Payment>, PaymentError>;

    /// Settle: payment `completed`, ticket `active` with its QR code.
    fn complete(
        &self,
        payment_id: &str,
        ticket_id: &str,
        qr_code: &str,
    ) -> Result<Payment, PaymentError>;

    /// Decline: payment `failed`, ticket `cancelled`. No QR code is set.
    fn fail(&self, payment_id: &str, ticket_id: &str) -> Result<Payment, PaymentError>;
}
