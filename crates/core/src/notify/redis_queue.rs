//! Redis-backed notification queue.

use std::time::Duration;

use async_trait::async_trait;
use redis::AsyncCommands;
use tokio::sync::Mutex;

use crate::config::QueueConfig;

use super::{NotificationQueue, QueueError};

/// Notification queue backed by a Redis list.
///
/// Producers LPUSH and the consumer BRPOP, so delivery is oldest-first.
/// Each instance holds its own connection: the consumer's blocking pop
/// must not share one with producers.
pub struct RedisQueue {
    conn: Mutex<redis::aio::MultiplexedConnection>,
    key: String,
}

impl RedisQueue {
    /// Connect to the Redis instance named by the config.
    pub async fn connect(config: &QueueConfig) -> Result<Self, QueueError> {
        let client = redis::Client::open(config.url.as_str())
            .map_err(|e| QueueError::Backend(e.to_string()))?;
        let conn = client
            .get_multiplexed_async_connection()
            .await
            .map_err(|e| QueueError::Backend(e.to_string()))?;
        Ok(Self {
            conn: Mutex::new(conn),
            key: config.key.clone(),
        })
    }
}

#[async_trait]
impl NotificationQueue for RedisQueue {
    async fn push(&self, record: &str) -> Result<(), QueueError> {
        let mut conn = self.conn.lock().await;
        conn.lpush::<_, _, ()>(&self.key, record)
            .await
            .map_err(|e| QueueError::Backend(e.to_string()))
    }

    async fn pop(&self, timeout: Duration) -> Result<Option<String>, QueueError> {
        let mut conn = self.conn.lock().await;
        let reply: Option<(String, String)> = conn
            .brpop(&self.key, timeout.as_secs_f64())
            .await
            .map_err(|e| QueueError::Backend(e.to_string()))?;
        Ok(reply.map(|(_, record)| record))
    }
}
