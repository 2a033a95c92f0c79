//! In-memory notification queue for tests.

use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Notify;

use crate::notify::{NotificationQueue, QueueError};

/// In-process queue with the same blocking-pop contract as the Redis
/// backend.
#[derive(Default)]
pub struct MemoryQueue {
    records: Mutex<VecDeque<String>>,
    available: Notify,
}

impl MemoryQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of queued records, oldest first.
    pub fn records(&self) -> Vec<String> {
        self.records.lock().unwrap().iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.records.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl NotificationQueue for MemoryQueue {
    async fn push(&self, record: &str) -> Result<(), QueueError> {
        self.records.lock().unwrap().push_back(record.to_string());
        self.available.notify_one();
        Ok(())
    }

    async fn pop(&self, timeout: Duration) -> Result<Option<String>, QueueError> {
        let deadline = tokio::time::Instant::now() + timeout;
        loop {
            if let Some(record) = self.records.lock().unwrap().pop_front() {
                return Ok(Some(record));
            }
            let notified = self.available.notified();
            if tokio::time::timeout_at(deadline, notified).await.is_err() {
                return Ok(None);
            }
        }
    }
}
