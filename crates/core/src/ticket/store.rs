//! Ticket storage trait and types.

use chrono::{DateTime, Utc};
use thiserror::Error;

use super::{Ticket, TicketStatus, Validation};

/// Error type for ticket operations.
#[derive(Debug, Error)]
pub enum TicketError {
    /// Ticket not found.
    #[error("Ticket not found: {0}")]
    NotFound(String),
    /// Database error.
    #[error("Database error: {0}")]
    Database(String),
}

/// Request to create a new ticket.
///
/// Price and validity are not part of the request; the store derives them
/// from the fare policy at creation time.
#[derive(Debug, Clone)]
pub struct CreateTicketRequest {
    pub user_id: String,
    pub ticket_type: String,
    pub route: String,
}

/// Filter for listing a user's tickets.
#[derive(Debug, Clone)]
pub struct TicketFilter {
    /// Restrict to a single status.
    pub status: Option<TicketStatus>,
    /// Maximum number of results.
    pub limit: i64,
    /// Offset for pagination.
    pub offset: i64,
}

impl Default for TicketFilter {
    fn default() -> Self {
        Self::new()
    }
}

impl TicketFilter {
    /// Create a new filter with defaults.
    pub fn new() -> Self {
        Self {
            status: None,
            limit: 100,
            offset: 0,
        }
    }

    /// Filter by status.
    pub fn with_status(mut self, status: TicketStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// Set limit.
    pub fn with_limit(mut self, limit: i64) -> Self {
        self.limit = limit;
        self
    }

    /// Set offset.
    pub fn with_offset(mut self, offset: i64) -> Self {
        self.offset = offset;
        self
    }
}

/// Trait for ticket storage backends.
pub trait TicketStore: Send + Sync {
    /// Create a pending ticket, priced by the fare policy at `now`.
    fn create(&self, request: CreateTicketRequest, now: DateTime<Utc>)
        -> Result<Ticket, TicketError>;

    /// Get a ticket by ID.
    fn get(&self, id: &str) -> Result<Option<Ticket>, TicketError>;

    /// Tickets owned by a user matching the filter, in creation order.
    fn list_for_user(&self, user_id: &str, filter: &TicketFilter)
        -> Result<Vec<Ticket>, TicketError>;

    /// Consume a ticket at a gate.
    ///
    /// The whole check-then-act sequence runs as one atomic unit: of two
    /// concurrent validations on the same active ticket, exactly one is
    /// accepted. A non-active ticket is rejected without mutation; an
    /// active ticket past its validity window transitions to expired.
    fn validate(&self, id: &str, now: DateTime<Utc>) -> Result<Validation, TicketError>;
}
