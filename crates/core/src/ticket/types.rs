//! Core ticket data types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Lifecycle status of a ticket.
///
/// Transitions: `pending -> active` via successful payment,
/// `pending -> cancelled` via failed payment, `active -> used` via
/// validation (once), `active -> expired` lazily when validation finds the
/// validity window elapsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TicketStatus {
    /// Created, awaiting payment.
    Pending,
    /// Paid for and usable.
    Active,
    /// Consumed at a gate.
    Used,
    /// Validity window elapsed before use.
    Expired,
    /// Payment failed.
    Cancelled,
}

impl TicketStatus {
    /// Storage representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Active => "active",
            Self::Used => "used",
            Self::Expired => "expired",
            Self::Cancelled => "cancelled",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(Self::Pending),
            "active" => Some(Self::Active),
            "used" => Some(Self::Used),
            "expired" => Some(Self::Expired),
            "cancelled" => Some(Self::Cancelled),
            _ => None,
        }
    }
}

/// A purchased (or not-yet-paid) right to travel.
#[derive(Debug, Clone, Serialize)]
pub struct Ticket {
    pub id: String,
    pub user_id: String,
    pub ticket_type: String,
    pub route: String,
    /// Copied from the fare quote at creation; never recomputed.
    pub price: i64,
    pub status: TicketStatus,
    /// Set exactly once, when payment activates the ticket.
    pub qr_code: Option<String>,
    pub created_at: DateTime<Utc>,
    /// Fixed at creation from the fare policy; never recomputed.
    pub valid_until: DateTime<Utc>,
}

/// Outcome of validating a ticket at a gate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Validation {
    pub valid: bool,
    pub reason: Option<String>,
}

impl Validation {
    pub fn accepted() -> Self {
        Self {
            valid: true,
            reason: None,
        }
    }

    pub fn rejected(reason: impl Into<String>) -> Self {
        Self {
            valid: false,
            reason: Some(reason.into()),
        }
    }
}
