//! Asynchronous notification hand-off.
//!
//! Producer side: handlers publish lifecycle events through a cloneable
//! [`Notifier`]; a background [`QueuePump`] pushes the wire records onto
//! the shared queue. Consumer side: a single long-lived
//! [`NotificationWorker`] pops records with a bounded wait and simulates
//! delivery. Notifications are best-effort; business state is
//! authoritative and a lost record is never retried.

mod events;
mod handle;
mod queue;
mod redis_queue;
mod worker;

pub use events::{NotificationEvent, QueuedNotification};
pub use handle::{create_notifier, Notifier, QueuePump};
pub use queue::{NotificationQueue, QueueError};
pub use redis_queue::RedisQueue;
pub use worker::NotificationWorker;
