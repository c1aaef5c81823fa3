//! Shared numeric helpers

/// Sort samples in ascending order.
///
/// Samples are expected to be NaN free; `total_cmp` keeps the order total
/// regardless.
pub fn sort_samples(values: &mut [f64]) {
    values.sort_by(|a, b| a.total_cmp(b));
}

/// Median of an already sorted, non-empty slice.
///
/// Odd lengths take the midpoint, even lengths average the two central values.
///
/// # Panics
/// Panics if `sorted` is empty.
pub fn median_of_sorted(sorted: &[f64]) -> f64 {
    assert!(!sorted.is_empty(), "median of an empty window is undefined");
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 1 {
        sorted[mid]
    } else {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    }
}

/// Median of an unsorted, non-empty slice (sorts a copy).
///
/// # Panics
/// Panics if `values` is empty.
pub fn median(values: &[f64]) -> f64 {
    let mut sorted = values.to_vec();
    sort_samples(&mut sorted);
    median_of_sorted(&sorted)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_odd_median() {
        assert_eq!(median(&[3.0, 1.0, 2.0]), 2.0);
    }

    #[test]
    fn test_even_median() {
        assert_eq!(median(&[4.0, 1.0, 3.0, 2.0]), 2.5);
    }

    #[test]
    fn test_single_value() {
        assert_eq!(median(&[7.5]), 7.5);
    }

    #[test]
    #[should_panic(expected = "empty window")]
    fn test_empty_panics() {
        median(&[]);
    }

    #[test]
    fn test_sort_handles_negatives() {
        let mut values = [0.5, -3.0, 2.0, -0.25];
        sort_samples(&mut values);
        assert_eq!(values, [-3.0, -0.25, 0.5, 2.0]);
    }
}
