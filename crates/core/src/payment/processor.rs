//! Payment processing against the ticket lifecycle.

use std::sync::Arc;

use rand::Rng;
use thiserror::Error;
use tracing::info;

use crate::notify::{NotificationEvent, Notifier};
use crate::ticket::TicketStore;

use super::{
    CreatePaymentRequest, Payment, PaymentStore, SettlementOutcome, SettlementProvider,
};

/// Character set for transaction identifiers.
const TXN_CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";
const TXN_LEN: usize = 12;

/// Failures resolving the ticket for a payment.
///
/// A declined settlement is not among these: it is a normal business
/// outcome, reported through the returned payment's status.
#[derive(Debug, Error)]
pub enum PayError {
    #[error("Ticket not found: {0}")]
    NotFound(String),

    #[error("Ticket {0} belongs to another user")]
    Forbidden(String),

    #[error("Database error: {0}")]
    Database(String),
}

/// Coordinates settlement with the payment and ticket stores.
pub struct PaymentProcessor {
    tickets: Arc<dyn TicketStore>,
    payments: Arc<dyn PaymentStore>,
    gateway: Arc<dyn SettlementProvider>,
    notifier: Notifier,
}

impl PaymentProcessor {
    pub fn new(
        tickets: Arc<dyn TicketStore>,
        payments: Arc<dyn PaymentStore>,
        gateway: Arc<dyn SettlementProvider>,
        notifier: Notifier,
    ) -> Self {
        Self {
            tickets,
            payments,
            gateway,
            notifier,
        }
    }

    /// Generate a caller-unguessable transaction identifier.
    ///
    /// Collisions across 36^12 values are treated as negligible and not
    /// checked against existing rows.
    fn transaction_id() -> String {
        let mut rng = rand::thread_rng();
        let suffix: String = (0..TXN_LEN)
            .map(|_| TXN_CHARSET[rng.gen_range(0..TXN_CHARSET.len())] as char)
            .collect();
        format!("TXN_{suffix}")
    }

    /// Take payment for a ticket.
    ///
    /// The pending payment row is persisted before the gateway is asked;
    /// the outcome is then applied to payment and ticket in one
    /// transaction. Only a successful settlement emits a notification
    /// event.
    pub fn pay(&self, user_id: &str, ticket_id: &str, method: &str) -> Result<Payment, PayError> {
        let ticket = self
            .tickets
            .get(ticket_id)
            .map_err(|e| PayError::Database(e.to_string()))?
            .ok_or_else(|| PayError::NotFound(ticket_id.to_string()))?;

        if ticket.user_id != user_id {
            return Err(PayError::Forbidden(ticket_id.to_string()));
        }

        let transaction_id = Self::transaction_id();
        let pending = self
            .payments
            .create(CreatePaymentRequest {
                user_id: user_id.to_string(),
                ticket_id: ticket.id.clone(),
                amount: ticket.price,
                method: method.to_string(),
                transaction_id: transaction_id.clone(),
            })
            .map_err(|e| PayError::Database(e.to_string()))?;

        match self.gateway.settle(pending.amount, method) {
            SettlementOutcome::Approved => {
                let qr_code = format!("QR_{}_{}", ticket.id, transaction_id);
                let payment = self
                    .payments
                    .complete(&pending.id, &ticket.id, &qr_code)
                    .map_err(|e| PayError::Database(e.to_string()))?;

                self.notifier.publish(NotificationEvent::PaymentSucceeded {
                    user_id: user_id.to_string(),
                    payment_id: payment.id.clone(),
                });

                info!(payment_id = %payment.id, ticket_id = %ticket.id, "Payment completed");
                Ok(payment)
            }
            SettlementOutcome::Declined => {
                let payment = self
                    .payments
                    .fail(&pending.id, &ticket.id)
                    .map_err(|e| PayError::Database(e.to_string()))?;

                info!(payment_id = %payment.id, ticket_id = %ticket.id, "Payment declined");
                Ok(payment)
            }
        }
    }
}
