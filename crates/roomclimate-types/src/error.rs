//! Validation errors for roomclimate-types.

use thiserror::Error;

/// Errors raised when a value fails boundary validation.
///
/// This enum is marked `#[non_exhaustive]` to allow adding new error variants
/// in future versions without breaking downstream code.
#[derive(Debug, Clone, PartialEq, Error)]
#[non_exhaustive]
pub enum ValidationError {
    /// A numeric field is NaN or infinite.
    #[error("{field} must be a finite number, got {value}")]
    NotFinite { field: &'static str, value: f64 },

    /// The min/ideal/max triple of a parameter is out of order.
    #[error("{parameter}: expected min <= ideal <= max, got {min} / {ideal} / {max}")]
    RangeOrder {
        parameter: &'static str,
        min: f64,
        ideal: f64,
        max: f64,
    },

    /// Productivity norm outside 0..=100.
    #[error("productivity_norm must be within 0..=100, got {0}")]
    NormOutOfRange(f64),

    /// Monitoring interval of zero seconds.
    #[error("monitoring interval must be greater than zero")]
    ZeroInterval,

    /// Time window whose start lies after its end.
    #[error("time window start {start} is after end {end}")]
    InvertedWindow { start: String, end: String },

    /// String is not a MAC address.
    #[error("invalid MAC address format: {0}")]
    InvalidMacAddress(String),
}

/// Result type alias using roomclimate-types' ValidationError type.
pub type ValidationResult<T> = std::result::Result<T, ValidationError>;
