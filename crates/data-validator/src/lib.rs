//! Data Validation and Smoothing
//!
//! Provides plausibility checking and sliding-window median filtering for
//! temperature, humidity and CO₂ readings.

mod error;
mod filter;
mod validator;

pub use error::ValidationError;
pub use filter::{MedianFilter, MAX_WINDOW_SIZE};
pub use validator::{ValidationConfig, Validator};
