//! Error types for roomclimate-core.
//!
//! # Error Handling Strategies
//!
//! | Error Type | Strategy | Rationale |
//! |------------|----------|-----------|
//! | [`Error::ConfigNotFound`] | Report as "not found" | Scoring needs a target envelope |
//! | [`Error::InvalidInput`] | Reject the request | Bad numbers never reach the math |
//! | [`Error::InvalidConfig`] | Reject the request | Fix the config and resubmit |
//! | [`Error::StoreFailure`] | Caller decides on retry | The core never retries |
//! | [`Error::DegenerateStatistic`] | Skip that device | Statistics batches never abort |
//!
//! A scoring failure aborts only that scoring call. A statistics failure for
//! one device drops that device's summary and the rest of the batch is
//! still returned.

use thiserror::Error;

use roomclimate_types::{DeviceId, ValidationError};

/// Errors produced by the scoring and statistics engines.
///
/// This enum is marked `#[non_exhaustive]` to allow adding new error variants
/// in future versions without breaking downstream code.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// No target configuration is stored for the device.
    #[error("No target configuration found for {0}")]
    ConfigNotFound(DeviceId),

    /// Malformed numeric input (NaN, infinity).
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Target configuration failed validation.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(#[from] ValidationError),

    /// The backing store failed or rejected a transaction.
    #[error("Store failure: {0}")]
    StoreFailure(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// Statistics for one device could not be computed.
    #[error("Cannot compute statistics for {device}: {reason}")]
    DegenerateStatistic {
        /// The device whose series was rejected.
        device: DeviceId,
        /// What made the series unusable.
        reason: String,
    },
}

impl Error {
    /// Wrap any store-side error as [`Error::StoreFailure`].
    pub fn store<E>(err: E) -> Self
    where
        E: Into<Box<dyn std::error::Error + Send + Sync>>,
    {
        Error::StoreFailure(err.into())
    }

    /// Whether the error should be surfaced as a "not found" condition.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::ConfigNotFound(_))
    }
}

/// Result type alias using roomclimate-core's Error type.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::ConfigNotFound(DeviceId(4));
        assert_eq!(err.to_string(), "No target configuration found for device_4");

        let err = Error::InvalidInput("temperature must be a finite number".to_string());
        assert!(err.to_string().starts_with("Invalid input"));

        let err = Error::DegenerateStatistic {
            device: DeviceId(1),
            reason: "no samples".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Cannot compute statistics for device_1: no samples"
        );
    }

    #[test]
    fn test_store_wraps_source() {
        let io = std::io::Error::other("disk full");
        let err = Error::store(io);

        assert!(matches!(err, Error::StoreFailure(_)));
        assert!(err.to_string().contains("disk full"));
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_store_from_message() {
        let err = Error::store("connection closed");
        assert_eq!(err.to_string(), "Store failure: connection closed");
    }

    #[test]
    fn test_is_not_found() {
        assert!(Error::ConfigNotFound(DeviceId(1)).is_not_found());
        assert!(!Error::InvalidInput("x".into()).is_not_found());
    }

    #[test]
    fn test_validation_error_converts() {
        let err: Error = ValidationError::ZeroInterval.into();
        assert!(matches!(err, Error::InvalidConfig(_)));
    }
}
