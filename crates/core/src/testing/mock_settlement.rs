//! Deterministic settlement provider for tests.

use std::sync::atomic::{AtomicUsize, Ordering};

use crate::payment::{SettlementOutcome, SettlementProvider};

/// Settlement provider returning a fixed outcome, replacing the random
/// gateway so tests can force either settlement branch.
pub struct FixedSettlement {
    outcome: SettlementOutcome,
    calls: AtomicUsize,
}

impl FixedSettlement {
    pub fn approving() -> Self {
        Self {
            outcome: SettlementOutcome::Approved,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn declining() -> Self {
        Self {
            outcome: SettlementOutcome::Declined,
            calls: AtomicUsize::new(0),
        }
    }

    /// Number of settlement attempts seen.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl SettlementProvider for FixedSettlement {
    fn settle(&self, _amount: i64, _method: &str) -> SettlementOutcome {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.outcome
    }
}
