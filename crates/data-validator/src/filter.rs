//! Median Filter for Noise Reduction

use crate::error::ValidationError;
use heapless::Vec as BoundedVec;
use stats_engine::{median_of_sorted, sort_samples};

/// Largest supported median window
pub const MAX_WINDOW_SIZE: usize = 11;

/// Sliding window median filter for noise reduction
///
/// Holds the last `size` samples. Until the window fills, the median is taken
/// over the samples seen so far.
#[derive(Debug, Clone)]
pub struct MedianFilter {
    window: BoundedVec<f64, MAX_WINDOW_SIZE>,
    size: usize,
    position: usize,
}

impl MedianFilter {
    /// Create a new median filter with given window size
    ///
    /// # Panics
    /// Panics unless `1 <= size <= MAX_WINDOW_SIZE`.
    pub fn new(size: usize) -> Self {
        assert!(
            size > 0 && size <= MAX_WINDOW_SIZE,
            "Window size must be between 1 and {MAX_WINDOW_SIZE}"
        );
        Self {
            window: BoundedVec::new(),
            size,
            position: 0,
        }
    }

    /// Create a median filter, rejecting unsupported window sizes
    pub fn try_new(size: usize) -> Result<Self, ValidationError> {
        if size == 0 || size > MAX_WINDOW_SIZE {
            return Err(ValidationError::InvalidWindow {
                size,
                max: MAX_WINDOW_SIZE,
            });
        }
        Ok(Self::new(size))
    }

    /// Add a value and get the filtered output
    pub fn apply(&mut self, value: f64) -> f64 {
        if self.window.len() < self.size {
            let pushed = self.window.push(value);
            debug_assert!(pushed.is_ok(), "window is bounded by MAX_WINDOW_SIZE");
        } else {
            self.window[self.position] = value;
        }
        self.position = (self.position + 1) % self.size;

        // Sort a copy and return median
        let mut sorted = self.window.clone();
        sort_samples(&mut sorted);
        median_of_sorted(&sorted)
    }

    /// Number of samples currently in the window
    pub fn len(&self) -> usize {
        self.window.len()
    }

    /// Check if no sample has been applied yet
    pub fn is_empty(&self) -> bool {
        self.window.is_empty()
    }

    /// Configured window size
    pub fn window_size(&self) -> usize {
        self.size
    }

    /// Reset the filter
    pub fn reset(&mut self) {
        self.window.clear();
        self.position = 0;
    }
}
