//! Overwrite-Oldest Ring Buffer

use crate::error::BufferError;

/// Default buffer capacity (50 samples = ~50 s at 1 Hz)
pub const DEFAULT_CAPACITY: usize = 50;

/// Fixed-capacity ring buffer that keeps the newest samples.
///
/// Pushing into a full buffer silently evicts the oldest sample. The buffer
/// carries no internal locking; it is mutated through `&mut self` only.
#[derive(Debug, Clone)]
pub struct RingBuffer<T> {
    /// Storage, grows up to `capacity` then is overwritten in place
    storage: Vec<T>,
    /// Capacity of the buffer
    capacity: usize,
    /// Head position (next slot to write)
    head: usize,
    /// Total values written (for statistics)
    total_written: u64,
}

impl<T: Clone> RingBuffer<T> {
    /// Create a new ring buffer with given capacity
    ///
    /// # Panics
    /// Panics if `capacity` is zero.
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "ring buffer capacity must be > 0");
        Self {
            storage: Vec::with_capacity(capacity),
            capacity,
            head: 0,
            total_written: 0,
        }
    }

    /// Create a ring buffer, rejecting a zero capacity
    pub fn try_new(capacity: usize) -> Result<Self, BufferError> {
        if capacity == 0 {
            return Err(BufferError::ZeroCapacity);
        }
        Ok(Self::new(capacity))
    }

    /// Push a value into the buffer (overwrites oldest if full)
    pub fn push(&mut self, value: T) {
        if self.storage.len() < self.capacity {
            self.storage.push(value);
        } else {
            self.storage[self.head] = value;
        }
        self.head = (self.head + 1) % self.capacity;
        self.total_written += 1;
    }

    /// Copy out all stored values, oldest first
    pub fn get_all(&self) -> Vec<T> {
        self.iter().cloned().collect()
    }

    /// Iterate over stored values, oldest first
    pub fn iter(&self) -> impl Iterator<Item = &T> + '_ {
        let count = self.len();
        let start = (self.head + self.capacity - count) % self.capacity;
        (0..count).map(move |i| &self.storage[(start + i) % self.capacity])
    }

    /// Most recently pushed value
    pub fn latest(&self) -> Option<&T> {
        if self.is_empty() {
            return None;
        }
        let idx = (self.head + self.capacity - 1) % self.capacity;
        self.storage.get(idx)
    }

    /// Get the number of values currently in the buffer
    pub fn len(&self) -> usize {
        self.storage.len()
    }

    /// Check if buffer is empty
    pub fn is_empty(&self) -> bool {
        self.storage.is_empty()
    }

    /// Check if buffer is full
    pub fn is_full(&self) -> bool {
        self.storage.len() == self.capacity
    }

    /// Get the buffer capacity
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Get fill ratio (0.0 to 1.0)
    pub fn fill_ratio(&self) -> f64 {
        self.len() as f64 / self.capacity as f64
    }

    /// Get total values written (for statistics)
    pub fn total_written(&self) -> u64 {
        self.total_written
    }

    /// Clear the buffer
    pub fn clear(&mut self) {
        self.storage.clear();
        self.head = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_push_and_read() {
        let mut buffer = RingBuffer::new(10);

        for i in 0..5 {
            buffer.push(i as f64 * 1.5);
        }

        assert_eq!(buffer.len(), 5);
        assert_eq!(buffer.get_all(), vec![0.0, 1.5, 3.0, 4.5, 6.0]);
        assert_eq!(buffer.latest(), Some(&6.0));
    }

    #[test]
    fn test_overwrite_oldest() {
        let mut buffer = RingBuffer::new(5);

        // Fill beyond capacity
        for i in 0..12 {
            buffer.push(i);
        }

        // Full capacity is usable, oldest values are gone
        assert_eq!(buffer.len(), 5);
        assert!(buffer.is_full());
        assert_eq!(buffer.get_all(), vec![7, 8, 9, 10, 11]);
        assert_eq!(buffer.total_written(), 12);
    }

    #[test]
    fn test_exact_capacity_keeps_order() {
        let mut buffer = RingBuffer::new(4);
        for i in 1..=4 {
            buffer.push(i);
        }
        assert_eq!(buffer.get_all(), vec![1, 2, 3, 4]);
        buffer.push(5);
        assert_eq!(buffer.get_all(), vec![2, 3, 4, 5]);
    }

    #[test]
    fn test_get_all_is_repeatable() {
        let mut buffer = RingBuffer::new(3);
        for i in 0..7 {
            buffer.push(i);
        }
        let first = buffer.get_all();
        let second = buffer.get_all();
        assert_eq!(first, second);
        assert_eq!(buffer.len(), 3);
    }

    #[test]
    fn test_fill_ratio() {
        let mut buffer = RingBuffer::new(100);
        assert_eq!(buffer.fill_ratio(), 0.0);

        for _ in 0..50 {
            buffer.push(0.0);
        }

        assert!((buffer.fill_ratio() - 0.5).abs() < 0.01);
    }

    #[test]
    fn test_clear() {
        let mut buffer = RingBuffer::new(3);
        for i in 0..5 {
            buffer.push(i);
        }
        buffer.clear();
        assert!(buffer.is_empty());
        assert_eq!(buffer.latest(), None);
        buffer.push(42);
        assert_eq!(buffer.get_all(), vec![42]);
    }

    #[test]
    fn test_zero_capacity_rejected() {
        assert_eq!(
            RingBuffer::<f64>::try_new(0).err(),
            Some(BufferError::ZeroCapacity)
        );
    }

    #[test]
    #[should_panic(expected = "capacity must be > 0")]
    fn test_zero_capacity_panics() {
        let _ = RingBuffer::<f64>::new(0);
    }

    proptest! {
        #[test]
        fn prop_keeps_last_capacity_in_order(capacity in 1usize..32, pushes in 0usize..200) {
            let mut buffer = RingBuffer::new(capacity);
            for i in 0..pushes {
                buffer.push(i);
            }
            let expected: Vec<usize> = (pushes.saturating_sub(capacity)..pushes).collect();
            prop_assert_eq!(buffer.get_all(), expected);
        }
    }
}
