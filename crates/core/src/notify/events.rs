//! Notification events and their wire encoding.

/// A lifecycle event published to the notification queue.
///
/// Serialized as `<event_type>:<user_id>:<resource_id>`. The consumer
/// tolerates extra trailing fields and drops anything with fewer than two.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotificationEvent {
    TicketCreated {
        user_id: String,
        ticket_id: String,
    },
    PaymentSucceeded {
        user_id: String,
        payment_id: String,
    },
    /// Reserved: no producer path currently emits this.
    TicketExpired {
        user_id: String,
        ticket_id: String,
    },
}

impl NotificationEvent {
    /// Wire name of the event.
    pub fn event_type(&self) -> &'static str {
        match self {
            Self::TicketCreated { .. } => "ticket_created",
            Self::PaymentSucceeded { .. } => "payment_success",
            Self::TicketExpired { .. } => "ticket_expired",
        }
    }

    pub fn user_id(&self) -> &str {
        match self {
            Self::TicketCreated { user_id, .. }
            | Self::PaymentSucceeded { user_id, .. }
            | Self::TicketExpired { user_id, .. } => user_id,
        }
    }

    pub fn resource_id(&self) -> &str {
        match self {
            Self::TicketCreated { ticket_id, .. } | Self::TicketExpired { ticket_id, .. } => {
                ticket_id
            }
            Self::PaymentSucceeded { payment_id, .. } => payment_id,
        }
    }

    /// Wire encoding pushed onto the queue.
    pub fn encode(&self) -> String {
        format!(
            "{}:{}:{}",
            self.event_type(),
            self.user_id(),
            self.resource_id()
        )
    }
}

/// A record popped off the queue, before interpretation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueuedNotification {
    pub event_type: String,
    pub user_id: String,
    pub resource_id: Option<String>,
}

impl QueuedNotification {
    /// Parse a raw queue record.
    ///
    /// Records need at least an event type and a user id; anything
    /// shorter is malformed and `None`.
    pub fn parse(raw: &str) -> Option<Self> {
        let mut parts = raw.split(':');
        let event_type = parts.next()?.to_string();
        let user_id = parts.next()?.to_string();
        let resource_id = parts.next().map(str::to_string);
        Some(Self {
            event_type,
            user_id,
            resource_id,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_ticket_created() {
        let event = NotificationEvent::TicketCreated {
            user_id: "u-1".to_string(),
            ticket_id: "t-9".to_string(),
        };
        assert_eq!(event.encode(), "ticket_created:u-1:t-9");
    }

    #[test]
    fn test_encode_payment_success() {
        let event = NotificationEvent::PaymentSucceeded {
            user_id: "u-1".to_string(),
            payment_id: "p-3".to_string(),
        };
        assert_eq!(event.encode(), "payment_success:u-1:p-3");
    }

    #[test]
    fn test_parse_three_fields() {
        let parsed = QueuedNotification::parse("ticket_created:u-1:t-9").unwrap();
        assert_eq!(parsed.event_type, "ticket_created");
        assert_eq!(parsed.user_id, "u-1");
        assert_eq!(parsed.resource_id.as_deref(), Some("t-9"));
    }

    #[test]
    fn test_parse_two_fields() {
        let parsed = QueuedNotification::parse("ticket_created:u-1").unwrap();
        assert_eq!(parsed.event_type, "ticket_created");
        assert_eq!(parsed.user_id, "u-1");
        assert!(parsed.resource_id.is_none());
    }

    #[test]
    fn test_parse_single_field_is_malformed() {
        assert!(QueuedNotification::parse("ticket_created").is_none());
        assert!(QueuedNotification::parse("").is_none());
    }

    #[test]
    fn test_parse_ignores_extra_fields() {
        let parsed = QueuedNotification::parse("a:b:c:d:e").unwrap();
        assert_eq!(parsed.event_type, "a");
        assert_eq!(parsed.user_id, "b");
        assert_eq!(parsed.resource_id.as_deref(), Some("c"));
    }

    #[test]
    fn test_encode_parse_roundtrip() {
        let event = NotificationEvent::PaymentSucceeded {
            user_id: "user-42".to_string(),
            payment_id: "payment-7".to_string(),
        };
        let parsed = QueuedNotification::parse(&event.encode()).unwrap();
        assert_eq!(parsed.event_type, "payment_success");
        assert_eq!(parsed.user_id, "user-42");
        assert_eq!(parsed.resource_id.as_deref(), Some("payment-7"));
    }
}
