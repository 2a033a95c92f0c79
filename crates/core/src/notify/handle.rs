//! Producer side: the notifier handle and the queue pump.

use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{error, info, warn};

use super::{NotificationEvent, NotificationQueue};

/// Handle for publishing notification events.
///
/// Cheaply cloneable; share one per component. Publishing is
/// fire-and-forget: the business transaction that triggered the event has
/// already committed, so a full or closed channel is logged and the event
/// dropped, never surfaced to the caller.
#[derive(Clone)]
pub struct Notifier {
    tx: mpsc::Sender<NotificationEvent>,
}

impl Notifier {
    pub fn new(tx: mpsc::Sender<NotificationEvent>) -> Self {
        Self { tx }
    }

    /// Queue an event for delivery.
    pub fn publish(&self, event: NotificationEvent) {
        if let Err(e) = self.tx.try_send(event) {
            error!("Failed to queue notification event: {}", e);
        }
    }
}

/// Background task that drains published events into the queue backend.
pub struct QueuePump {
    rx: mpsc::Receiver<NotificationEvent>,
    queue: Arc<dyn NotificationQueue>,
}

impl QueuePump {
    pub fn new(rx: mpsc::Receiver<NotificationEvent>, queue: Arc<dyn NotificationQueue>) -> Self {
        Self { rx, queue }
    }

    /// Run the pump, consuming events until every [`Notifier`] clone is
    /// dropped.
    ///
    /// This should be spawned as a background task. A failed push is
    /// logged and the record lost; there is no retry ledger.
    pub async fn run(mut self) {
        info!("Notification pump started");

        while let Some(event) = self.rx.recv().await {
            let record = event.encode();
            if let Err(e) = self.queue.push(&record).await {
                warn!(record = %record, "Failed to push notification: {}", e);
            }
        }

        info!("Notification pump shutting down");
    }
}

/// Create the producer side of the notification system.
///
/// Returns:
/// - `Notifier` - for publishing events (clone this to share across tasks)
/// - `QueuePump` - spawn as a background task with `tokio::spawn(pump.run())`
pub fn create_notifier(
    queue: Arc<dyn NotificationQueue>,
    buffer_size: usize,
) -> (Notifier, QueuePump) {
    let (tx, rx) = mpsc::channel(buffer_size);
    (Notifier::new(tx), QueuePump::new(rx, queue))
}
