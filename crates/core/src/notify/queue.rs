//! Notification queue trait.

use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum QueueError {
    #[error("Queue backend error: {0}")]
    Backend(String),
}

/// At-least-once queue shared by request handlers (producers) and the
/// single notification consumer.
///
/// Records are opaque UTF-8 strings; malformed payloads are safe to drop
/// on the consumer side.
#[async_trait]
pub trait NotificationQueue: Send + Sync {
    /// Append a raw record.
    async fn push(&self, record: &str) -> Result<(), QueueError>;

    /// Pop the oldest record, waiting up to `timeout`. `Ok(None)` on
    /// timeout; the bounded wait keeps the consumer responsive to
    /// shutdown.
    async fn pop(&self, timeout: Duration) -> Result<Option<String>, QueueError>;
}
