//! Data Validator for Range Checking

use crate::error::ValidationError;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Validation configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationConfig {
    /// Temperature valid range (°C)
    pub temperature_range: (f64, f64),
    /// Relative humidity valid range (%)
    pub humidity_range: (f64, f64),
    /// CO₂ valid range (ppm)
    pub co2_range: (f64, f64),
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            temperature_range: (-40.0, 85.0),
            humidity_range: (0.0, 100.0),
            co2_range: (0.0, 10_000.0),
        }
    }
}

/// Plausibility checker for raw sensor readings
#[derive(Debug, Clone)]
pub struct Validator {
    config: ValidationConfig,
}

impl Validator {
    /// Create a new validator with given config
    pub fn new(config: ValidationConfig) -> Self {
        Self { config }
    }

    /// Validate a single value against a range
    pub fn validate_range(
        &self,
        field: &'static str,
        value: f64,
        range: (f64, f64),
    ) -> Result<(), ValidationError> {
        if !value.is_finite() {
            debug!("Rejecting non-finite {} reading", field);
            return Err(ValidationError::NotFinite { field });
        }
        if value < range.0 || value > range.1 {
            debug!("Rejecting {} reading {} outside [{}, {}]", field, value, range.0, range.1);
            Err(ValidationError::OutOfRange {
                field,
                value,
                min: range.0,
                max: range.1,
            })
        } else {
            Ok(())
        }
    }

    /// Validate temperature
    pub fn validate_temperature(&self, value: f64) -> Result<(), ValidationError> {
        self.validate_range("temperature", value, self.config.temperature_range)
    }

    /// Validate humidity
    pub fn validate_humidity(&self, value: f64) -> Result<(), ValidationError> {
        self.validate_range("humidity", value, self.config.humidity_range)
    }

    /// Validate CO₂ concentration
    pub fn validate_co2(&self, value: f64) -> Result<(), ValidationError> {
        self.validate_range("co2", value, self.config.co2_range)
    }

    /// Active configuration
    pub fn config(&self) -> &ValidationConfig {
        &self.config
    }
}

impl Default for Validator {
    fn default() -> Self {
        Self::new(ValidationConfig::default())
    }
}
