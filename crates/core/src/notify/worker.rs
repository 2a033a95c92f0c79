//! Notification delivery worker.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tracing::{debug, error, info, warn};

use super::{NotificationQueue, QueuedNotification};

/// How long a single pop waits before re-checking for shutdown.
const DEFAULT_POP_TIMEOUT: Duration = Duration::from_secs(5);

/// Pause after an unexpected queue failure before resuming the loop.
const BACKOFF: Duration = Duration::from_secs(1);

/// Long-lived consumer loop draining the notification queue.
///
/// Delivery is simulated: recognized events are logged. The loop never
/// terminates on a single bad message — malformed records are dropped
/// with a warning and queue failures back off briefly before the loop
/// resumes. It exits only on the shutdown signal.
pub struct NotificationWorker {
    queue: Arc<dyn NotificationQueue>,
    shutdown: watch::Receiver<bool>,
    pop_timeout: Duration,
}

impl NotificationWorker {
    pub fn new(queue: Arc<dyn NotificationQueue>, shutdown: watch::Receiver<bool>) -> Self {
        Self {
            queue,
            shutdown,
            pop_timeout: DEFAULT_POP_TIMEOUT,
        }
    }

    pub fn with_pop_timeout(mut self, timeout: Duration) -> Self {
        self.pop_timeout = timeout;
        self
    }

    /// Run the worker until shutdown fires.
    ///
    /// This should be spawned as a background task.
    pub async fn run(mut self) {
        info!("Notification worker started. Listening for notifications...");

        loop {
            tokio::select! {
                changed = self.shutdown.changed() => {
                    if changed.is_err() || *self.shutdown.borrow() {
                        break;
                    }
                }
                popped = self.queue.pop(self.pop_timeout) => match popped {
                    Ok(Some(record)) => self.deliver(&record),
                    // Idle timeout; loop again so shutdown stays observable.
                    Ok(None) => {}
                    Err(e) => {
                        error!("Error popping notification: {}", e);
                        tokio::time::sleep(BACKOFF).await;
                    }
                },
            }
        }

        info!("Notification worker shutting down");
    }

    /// Interpret one record. Unrecognized event types are accepted and
    /// dropped.
    fn deliver(&self, record: &str) {
        let Some(notification) = QueuedNotification::parse(record) else {
            warn!(record = %record, "Dropping malformed notification record");
            return;
        };

        match notification.event_type.as_str() {
            "ticket_created" => {
                info!(user_id = %notification.user_id, "Sending 'Ticket Created' email");
            }
            "payment_success" => {
                info!(user_id = %notification.user_id, "Sending 'Payment Successful' email");
            }
            "ticket_expired" => {
                info!(user_id = %notification.user_id, "Sending 'Ticket Expired' notification");
            }
            other => {
                debug!(event_type = %other, "Ignoring unrecognized notification type");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::testing::MemoryQueue;

    use super::*;

    fn spawn_worker(
        queue: Arc<MemoryQueue>,
    ) -> (watch::Sender<bool>, tokio::task::JoinHandle<()>) {
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let worker = NotificationWorker::new(queue as Arc<dyn NotificationQueue>, shutdown_rx)
            .with_pop_timeout(Duration::from_millis(20));
        let handle = tokio::spawn(worker.run());
        (shutdown_tx, handle)
    }

    #[tokio::test]
    async fn test_worker_drains_queue() {
        let queue = Arc::new(MemoryQueue::new());
        queue.push("ticket_created:u-1:t-1").await.unwrap();
        queue.push("payment_success:u-1:p-1").await.unwrap();

        let (shutdown_tx, handle) = spawn_worker(Arc::clone(&queue));

        tokio::time::sleep(Duration::from_millis(100)).await;
        assert!(queue.is_empty());

        shutdown_tx.send(true).unwrap();
        tokio::time::timeout(Duration::from_secs(1), handle)
            .await
            .expect("worker should exit after shutdown")
            .unwrap();
    }

    #[tokio::test]
    async fn test_worker_survives_malformed_record() {
        let queue = Arc::new(MemoryQueue::new());
        queue.push("not-a-notification").await.unwrap();
        queue.push("ticket_created:u-1:t-1").await.unwrap();

        let (shutdown_tx, handle) = spawn_worker(Arc::clone(&queue));

        // Both records are consumed; the malformed one is dropped without
        // killing the loop.
        tokio::time::sleep(Duration::from_millis(100)).await;
        assert!(queue.is_empty());
        assert!(!handle.is_finished());

        shutdown_tx.send(true).unwrap();
        handle.await.unwrap();
    }

    #[tokio::test]
    async fn test_worker_accepts_unrecognized_event_type() {
        let queue = Arc::new(MemoryQueue::new());
        queue.push("refund_issued:u-1:r-1").await.unwrap();

        let (shutdown_tx, handle) = spawn_worker(Arc::clone(&queue));

        tokio::time::sleep(Duration::from_millis(100)).await;
        assert!(queue.is_empty());
        assert!(!handle.is_finished());

        shutdown_tx.send(true).unwrap();
        handle.await.unwrap();
    }

    #[tokio::test]
    async fn test_worker_observes_shutdown_while_idle() {
        let queue = Arc::new(MemoryQueue::new());
        let (shutdown_tx, handle) = spawn_worker(queue);

        shutdown_tx.send(true).unwrap();
        tokio::time::timeout(Duration::from_secs(1), handle)
            .await
            .expect("worker should exit promptly when idle")
            .unwrap();
    }

    #[tokio::test]
    async fn test_worker_exits_when_shutdown_sender_dropped() {
        let queue = Arc::new(MemoryQueue::new());
        let (shutdown_tx, handle) = spawn_worker(queue);

        drop(shutdown_tx);
        tokio::time::timeout(Duration::from_secs(1), handle)
            .await
            .expect("worker should exit when the shutdown channel closes")
            .unwrap();
    }
}
