//! Synchronized Bounded Queue
//!
//! A [`FifoBuffer`] behind one mutex with "not full" / "not empty" condition
//! variables. `push` and `pop` block without timeout; the only way to release a
//! waiter is for the other side to make progress.

use crate::error::BufferError;
use crate::fifo::FifoBuffer;
use parking_lot::{Condvar, Mutex};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::{debug, warn};

/// Behaviour of `push` when the queue is full
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QueuePolicy {
    /// Wait until the consumer frees a slot
    #[default]
    Block,
    /// Discard the incoming item and count the drop
    DropNewest,
}

/// Result of a push
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use]
pub enum PushOutcome<T> {
    /// The item was queued
    Enqueued,
    /// The queue was full and the item was discarded (drop-on-full only)
    Dropped(T),
}

impl<T> PushOutcome<T> {
    /// Whether the item was discarded
    pub fn is_dropped(&self) -> bool {
        matches!(self, PushOutcome::Dropped(_))
    }
}

/// Bounded FIFO queue for producer/consumer handoff
pub struct SynchronizedQueue<T> {
    /// Buffer state, only touched under the lock
    buffer: Mutex<FifoBuffer<T>>,
    /// Signalled after every pop
    not_full: Condvar,
    /// Signalled after every successful push
    not_empty: Condvar,
    /// Full-queue behaviour
    policy: QueuePolicy,
    /// Items discarded under `DropNewest`
    dropped: AtomicU64,
}

impl<T> SynchronizedQueue<T> {
    /// Create a queue with the given capacity and full-queue policy
    ///
    /// # Panics
    /// Panics if `capacity` is zero.
    pub fn new(capacity: usize, policy: QueuePolicy) -> Self {
        match Self::try_new(capacity, policy) {
            Ok(queue) => queue,
            Err(e) => panic!("{e}"),
        }
    }

    /// Create a queue, rejecting a zero capacity
    pub fn try_new(capacity: usize, policy: QueuePolicy) -> Result<Self, BufferError> {
        Ok(Self {
            buffer: Mutex::new(FifoBuffer::try_new(capacity)?),
            not_full: Condvar::new(),
            not_empty: Condvar::new(),
            policy,
            dropped: AtomicU64::new(0),
        })
    }

    /// Blocking queue (never loses items)
    pub fn blocking(capacity: usize) -> Self {
        Self::new(capacity, QueuePolicy::Block)
    }

    /// Drop-on-full queue (producer never waits)
    pub fn drop_on_full(capacity: usize) -> Self {
        Self::new(capacity, QueuePolicy::DropNewest)
    }

    /// Enqueue an item according to the queue policy.
    ///
    /// Under [`QueuePolicy::Block`] this waits while the queue is full and
    /// always returns [`PushOutcome::Enqueued`].
    pub fn push(&self, item: T) -> PushOutcome<T> {
        self.push_with(item, self.policy)
    }

    /// Enqueue an item, waiting for space whatever the queue policy.
    ///
    /// Used for control items (e.g. end-of-stream markers) that must not be
    /// discarded by a drop-on-full queue.
    pub fn push_blocking(&self, item: T) {
        let _ = self.push_with(item, QueuePolicy::Block);
    }

    fn push_with(&self, item: T, policy: QueuePolicy) -> PushOutcome<T> {
        let mut buffer = self.buffer.lock();
        let mut item = item;
        loop {
            match buffer.try_push(item) {
                Ok(()) => {
                    self.not_empty.notify_one();
                    return PushOutcome::Enqueued;
                }
                Err(rejected) => match policy {
                    QueuePolicy::Block => {
                        item = rejected;
                        debug!("Queue full ({} items), producer waiting", buffer.len());
                        self.not_full.wait(&mut buffer);
                    }
                    QueuePolicy::DropNewest => {
                        let dropped = self.dropped.fetch_add(1, Ordering::Relaxed) + 1;
                        metrics::counter!("telemetry_queue_dropped_total").increment(1);
                        warn!(
                            "Queue full (capacity {}), sample dropped ({} dropped so far)",
                            buffer.capacity(),
                            dropped
                        );
                        return PushOutcome::Dropped(rejected);
                    }
                },
            }
        }
    }

    /// Dequeue the oldest item, waiting while the queue is empty
    pub fn pop(&self) -> T {
        let mut buffer = self.buffer.lock();
        loop {
            if let Some(item) = buffer.pop() {
                self.not_full.notify_one();
                return item;
            }
            self.not_empty.wait(&mut buffer);
        }
    }

    /// Dequeue the oldest item without waiting
    pub fn try_pop(&self) -> Option<T> {
        let mut buffer = self.buffer.lock();
        let item = buffer.pop();
        if item.is_some() {
            self.not_full.notify_one();
        }
        item
    }

    /// Number of queued items
    pub fn len(&self) -> usize {
        self.buffer.lock().len()
    }

    /// Check if the queue is empty
    pub fn is_empty(&self) -> bool {
        self.buffer.lock().is_empty()
    }

    /// Queue capacity
    pub fn capacity(&self) -> usize {
        self.buffer.lock().capacity()
    }

    /// Full-queue policy
    pub fn policy(&self) -> QueuePolicy {
        self.policy
    }

    /// Number of items discarded so far
    pub fn dropped(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed)
    }
}
