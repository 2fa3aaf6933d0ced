//! Shared data model for indoor-climate monitoring.
//!
//! This crate holds the types passed between the scoring/statistics core
//! (roomclimate-core), the SQLite store (roomclimate-store) and the CLI.
//!
//! # Features
//!
//! - Device and room identifiers, MAC address parsing
//! - Per-device target configuration with boundary validation
//! - Readings, scoring results and statistics summaries
//! - Validation error types
//!
//! # Example
//!
//! ```
//! use roomclimate_types::{ConfigUpdate, DeviceTargetConfig, SensorValues, MonitoringSettings};
//!
//! let config = DeviceTargetConfig {
//!     ideal_values: SensorValues::new(22.0, 45.0, 500.0),
//!     min_values: SensorValues::new(15.0, 20.0, 0.0),
//!     max_values: SensorValues::new(29.0, 80.0, 1000.0),
//!     monitoring_settings: MonitoringSettings::default(),
//!     productivity_norm: 80.0,
//! };
//!
//! let update = ConfigUpdate { productivity_norm: Some(70.0), ..Default::default() };
//! let updated = config.apply(&update).unwrap();
//! assert_eq!(updated.productivity_norm, 70.0);
//! ```

pub mod error;
pub mod stats;
pub mod types;

pub use error::{ValidationError, ValidationResult};
pub use stats::{HourlyTrends, ParameterStats, StatisticsSummary, TimeStats};
pub use types::{
    ConfigUpdate, DEFAULT_PRODUCTIVITY_NORM, DeviceId, DeviceTargetConfig, MacAddress,
    MonitoringSettings, Parameter, Reading, RoomId, Sample, ScoreResult, SensorValues,
    SensorValuesPatch, TimeWindow,
};
