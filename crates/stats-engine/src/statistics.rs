//! Summary Statistics Computation

use crate::numeric::{median_of_sorted, sort_samples};
use serde::{Deserialize, Serialize};

/// Summary statistics over one window snapshot
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Statistics {
    /// Minimum value
    pub min: f64,
    /// Maximum value
    pub max: f64,
    /// Arithmetic mean
    pub mean: f64,
    /// Population standard deviation (divisor = count)
    pub std_dev: f64,
    /// Median (mean of the two central values for even counts)
    pub median: f64,
}

impl Statistics {
    /// Compute statistics over a window, oldest sample first.
    ///
    /// # Panics
    /// Panics if `values` is empty. Callers must never summarise an empty window.
    pub fn compute(values: &[f64]) -> Self {
        assert!(!values.is_empty(), "statistics over an empty window are undefined");

        let n = values.len() as f64;

        // Min/Max/Sum
        let mut min = values[0];
        let mut max = values[0];
        let mut sum = 0.0;
        for &v in values {
            if v < min {
                min = v;
            }
            if v > max {
                max = v;
            }
            sum += v;
        }
        let mean = sum / n;

        // Population variance
        let m2: f64 = values
            .iter()
            .map(|&v| {
                let d = v - mean;
                d * d
            })
            .sum();
        let std_dev = (m2 / n).sqrt();

        let mut sorted = values.to_vec();
        sort_samples(&mut sorted);
        let median = median_of_sorted(&sorted);

        Self {
            min,
            max,
            mean,
            std_dev,
            median,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_one_to_five() {
        let stats = Statistics::compute(&[1.0, 2.0, 3.0, 4.0, 5.0]);
        assert_eq!(stats.min, 1.0);
        assert_eq!(stats.max, 5.0);
        assert!((stats.mean - 3.0).abs() < 1e-12);
        assert_eq!(stats.median, 3.0);
        assert!((stats.std_dev - 2.0_f64.sqrt()).abs() < 1e-9);
    }

    #[test]
    fn test_population_std_dev() {
        let values = vec![2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        let stats = Statistics::compute(&values);
        // Population std dev is exactly 2 for this dataset
        assert!((stats.std_dev - 2.0).abs() < 1e-12);
        assert_eq!(stats.median, 4.5);
    }

    #[test]
    fn test_single_sample() {
        let stats = Statistics::compute(&[21.5]);
        assert_eq!(stats.min, 21.5);
        assert_eq!(stats.max, 21.5);
        assert_eq!(stats.median, 21.5);
        assert_eq!(stats.std_dev, 0.0);
    }

    #[test]
    fn test_input_order_irrelevant() {
        let a = Statistics::compute(&[5.0, 1.0, 4.0, 2.0, 3.0]);
        let b = Statistics::compute(&[1.0, 2.0, 3.0, 4.0, 5.0]);
        assert_eq!(a.median, b.median);
        assert_eq!(a.min, b.min);
        assert_eq!(a.max, b.max);
    }

    #[test]
    fn test_repeated_compute_is_identical() {
        let values = [18.2, 19.7, 18.9, 20.4];
        assert_eq!(Statistics::compute(&values), Statistics::compute(&values));
    }

    #[test]
    #[should_panic(expected = "empty window")]
    fn test_empty_window_panics() {
        Statistics::compute(&[]);
    }

    proptest! {
        #[test]
        fn prop_bounds_hold(values in prop::collection::vec(-1000.0f64..1000.0, 1..64)) {
            let stats = Statistics::compute(&values);
            prop_assert!(stats.min <= stats.median && stats.median <= stats.max);
            prop_assert!(stats.min <= stats.mean + 1e-9 && stats.mean <= stats.max + 1e-9);
            prop_assert!(stats.std_dev >= 0.0);
        }
    }
}
