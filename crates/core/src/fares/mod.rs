//! Fare pricing and validity policy.
//!
//! Pure mapping from ticket type to price and validity window. Unknown
//! types fall back to the single-ride fare; the published fare schedule
//! treats them as single rides rather than rejecting them.

use chrono::{DateTime, Duration, Utc};

/// Price in fare units for a ticket type.
pub fn price_of(ticket_type: &str) -> i64 {
    match ticket_type {
        "single" => 50,
        "daily" => 150,
        "weekly" => 500,
        "monthly" => 1500,
        _ => 50,
    }
}

/// Validity window for a ticket type, measured from purchase.
pub fn validity_of(ticket_type: &str) -> Duration {
    match ticket_type {
        "single" => Duration::hours(2),
        "daily" => Duration::days(1),
        "weekly" => Duration::days(7),
        "monthly" => Duration::days(30),
        _ => Duration::hours(2),
    }
}

/// A priced fare, fixed at purchase time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FareQuote {
    pub price: i64,
    pub valid_until: DateTime<Utc>,
}

/// Quote a ticket type at a given instant.
///
/// Called exactly once, when the ticket is created; `valid_until` is
/// persisted and never recomputed on later operations.
pub fn quote(ticket_type: &str, now: DateTime<Utc>) -> FareQuote {
    FareQuote {
        price: price_of(ticket_type),
        valid_until: now + validity_of(ticket_type),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_price_table() {
        assert_eq!(price_of("single"), 50);
        assert_eq!(price_of("daily"), 150);
        assert_eq!(price_of("weekly"), 500);
        assert_eq!(price_of("monthly"), 1500);
    }

    #[test]
    fn test_unknown_type_priced_as_single() {
        assert_eq!(price_of("annual"), 50);
        assert_eq!(price_of(""), 50);
        assert_eq!(price_of("SINGLE"), 50);
    }

    #[test]
    fn test_validity_table() {
        assert_eq!(validity_of("single"), Duration::hours(2));
        assert_eq!(validity_of("daily"), Duration::days(1));
        assert_eq!(validity_of("weekly"), Duration::days(7));
        assert_eq!(validity_of("monthly"), Duration::days(30));
    }

    #[test]
    fn test_unknown_type_valid_two_hours() {
        assert_eq!(validity_of("annual"), Duration::hours(2));
    }

    #[test]
    fn test_quote_is_deterministic() {
        let now = Utc::now();
        assert_eq!(quote("weekly", now), quote("weekly", now));
    }

    #[test]
    fn test_quote_anchored_at_purchase_instant() {
        let now = Utc::now();
        let fare = quote("daily", now);
        assert_eq!(fare.price, 150);
        assert_eq!(fare.valid_until, now + Duration::days(1));
    }
}
