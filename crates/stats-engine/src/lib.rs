//! Windowed Statistics Engine
//!
//! Computes the rolling summary published for every sensor channel, along with
//! the median rule shared by the sliding median filter.

pub mod numeric;
mod statistics;

pub use numeric::{median, median_of_sorted, sort_samples};
pub use statistics::Statistics;
