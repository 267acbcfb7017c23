//! Dashboard input form and reading validation.
//!
//! The form holds raw text exactly as typed. [`validate`] turns it into a
//! [`Reading`] or reports the first field that is not a finite number, in
//! the fixed order energy, temperature, humidity.

use thiserror::Error;

/// Raw, unvalidated form contents.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormInput {
    pub energy: String,
    pub temperature: String,
    pub humidity: String,
    /// Optional free text, sent through as-is.
    pub timestamp: String,
}

impl FormInput {
    pub fn new(
        energy: impl Into<String>,
        temperature: impl Into<String>,
        humidity: impl Into<String>,
    ) -> Self {
        Self {
            energy: energy.into(),
            temperature: temperature.into(),
            humidity: humidity.into(),
            timestamp: String::new(),
        }
    }

    pub fn with_timestamp(mut self, timestamp: impl Into<String>) -> Self {
        self.timestamp = timestamp.into();
        self
    }

    /// Blank every field.
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

/// One validated observation.
#[derive(Debug, Clone, PartialEq)]
pub struct Reading {
    pub energy: f64,
    pub temperature: f64,
    pub humidity: f64,
    pub timestamp: Option<String>,
}

/// A form field that failed to parse. Only the first failure is reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Enter energy usage.")]
    Energy,
    #[error("Enter temperature.")]
    Temperature,
    #[error("Enter humidity.")]
    Humidity,
}

/// Validate the form into a [`Reading`].
pub fn validate(input: &FormInput) -> Result<Reading, ValidationError> {
    let energy = parse_number(&input.energy).ok_or(ValidationError::Energy)?;
    let temperature = parse_number(&input.temperature).ok_or(ValidationError::Temperature)?;
    let humidity = parse_number(&input.humidity).ok_or(ValidationError::Humidity)?;

    let timestamp = match input.timestamp.trim() {
        "" => None,
        ts => Some(ts.to_string()),
    };

    Ok(Reading {
        energy,
        temperature,
        humidity,
        timestamp,
    })
}

/// Parse a finite `f64`, ignoring surrounding whitespace.
fn parse_number(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
