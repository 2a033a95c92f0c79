//! Core payment data types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Settlement status of a payment attempt.
///
/// `pending` is transient: every processed payment ends `completed` or
/// `failed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    Pending,
    Completed,
    Failed,
}

impl PaymentStatus {
    /// Storage representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Completed => "completed",
            Self::Failed => "failed",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(Self::Pending),
            "completed" => Some(Self::Completed),
            "failed" => Some(Self::Failed),
            _ => None,
        }
    }
}

/// A record of an attempt to settle a ticket's price.
#[derive(Debug, Clone, Serialize)]
pub struct Payment {
    pub id: String,
    pub user_id: String,
    pub ticket_id: String,
    /// Copied from the ticket's price when the payment is created.
    pub amount: i64,
    pub status: PaymentStatus,
    pub method: String,
    /// Generated before the settlement outcome is known.
    pub transaction_id: String,
    pub created_at: DateTime<Utc>,
}
