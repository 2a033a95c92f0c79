//! Settlement gateway capability.

use rand::Rng;

/// Outcome of a settlement attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettlementOutcome {
    Approved,
    Declined,
}

/// The external gateway deciding whether a payment settles.
///
/// Implementations must be side-effect-free with respect to ticket and
/// payment state; the processor applies the outcome.
pub trait SettlementProvider: Send + Sync {
    fn settle(&self, amount: i64, method: &str) -> SettlementOutcome;
}

/// Simulated gateway approving a fixed fraction of payments.
///
/// Stands in for a real acquirer integration; production swaps this for a
/// provider that talks to an actual gateway.
pub struct RandomGateway {
    success_rate: f64,
}

impl RandomGateway {
    pub fn new(success_rate: f64) -> Self {
        Self { success_rate }
    }
}

impl Default for RandomGateway {
    fn default() -> Self {
        Self::new(0.8)
    }
}

impl SettlementProvider for RandomGateway {
    fn settle(&self, _amount: i64, _method: &str) -> SettlementOutcome {
        if rand::thread_rng().gen::<f64>() < self.success_rate {
            SettlementOutcome::Approved
        } else {
            SettlementOutcome::Declined
        }
    }
}
