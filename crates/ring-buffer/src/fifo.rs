//! Head/Tail FIFO Ring Buffer

use crate::error::BufferError;

/// Fixed-capacity FIFO that never overwrites.
///
/// Every pushed item is popped exactly once. A push into a full buffer is
/// refused and the item handed back.
#[derive(Debug)]
pub struct FifoBuffer<T> {
    /// Pre-allocated slots, `None` when free
    slots: Box<[Option<T>]>,
    /// Head position (write pointer)
    head: usize,
    /// Tail position (read pointer)
    tail: usize,
    /// Number of occupied slots
    count: usize,
}

impl<T> FifoBuffer<T> {
    /// Create a new FIFO with the given capacity
    ///
    /// # Panics
    /// Panics if `capacity` is zero.
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "fifo capacity must be > 0");
        let slots: Vec<Option<T>> = (0..capacity).map(|_| None).collect();
        Self {
            slots: slots.into_boxed_slice(),
            head: 0,
            tail: 0,
            count: 0,
        }
    }

    /// Create a FIFO, rejecting a zero capacity
    pub fn try_new(capacity: usize) -> Result<Self, BufferError> {
        if capacity == 0 {
            return Err(BufferError::ZeroCapacity);
        }
        Ok(Self::new(capacity))
    }

    /// Append an item, or hand it back if the buffer is full
    pub fn try_push(&mut self, item: T) -> Result<(), T> {
        if self.is_full() {
            return Err(item);
        }
        self.slots[self.head] = Some(item);
        self.head = (self.head + 1) % self.slots.len();
        self.count += 1;
        Ok(())
    }

    /// Remove the oldest item
    pub fn pop(&mut self) -> Option<T> {
        if self.is_empty() {
            return None;
        }
        let item = self.slots[self.tail].take();
        self.tail = (self.tail + 1) % self.slots.len();
        self.count -= 1;
        item
    }

    /// Get the number of queued items
    pub fn len(&self) -> usize {
        self.count
    }

    /// Check if buffer is empty
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Check if buffer is full
    pub fn is_full(&self) -> bool {
        self.count == self.slots.len()
    }

    /// Get the buffer capacity
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }
}
