//! Productivity scoring and statistics for indoor-climate sensors.
//!
//! This crate turns temperature, humidity and CO2 samples into a productivity
//! score with recommendations, and summarizes logged readings per device.
//!
//! # Features
//!
//! - **Scoring**: weighted geometric mean of per-parameter comfort sub-scores
//! - **Recommendations**: actionable hints when a score falls below the norm
//! - **Statistics**: descriptive statistics per device over a time window
//! - **Hourly trends**: UTC hour buckets of per-parameter means
//! - **Pluggable storage**: engines borrow any [`ConfigStore`] / [`MeasurementLog`]
//!
//! # Scoring Weights
//!
//! | Parameter | Weight | Sub-score |
//! |-----------|--------|-----------|
//! | Temperature | 5 | `exp(-(t - ideal)² / 50)` |
//! | Humidity | 3 | `exp(-(h - ideal)² / 100)` |
//! | CO2 | 1 | `1 - ln(1 + excess / span) / ln 3` above ideal |
//!
//! A value outside its configured `[min, max]` range zeroes its sub-score and
//! therefore the whole score.
//!
//! # Quick Start
//!
//! ```
//! use roomclimate_core::{MemoryStore, ScoringEngine, StatisticsEngine};
//! use roomclimate_types::{DeviceId, DeviceTargetConfig, Sample, SensorValues, TimeWindow};
//! use time::macros::datetime;
//!
//! let config = DeviceTargetConfig::new(
//!     SensorValues::new(22.0, 45.0, 500.0),
//!     SensorValues::new(15.0, 20.0, 0.0),
//!     SensorValues::new(29.0, 80.0, 1000.0),
//! );
//! let store = MemoryStore::builder().config(DeviceId(1), config).build();
//!
//! let at = datetime!(2024-03-01 09:00 UTC);
//! let result = ScoringEngine::new(&store)
//!     .score_at(DeviceId(1), Sample::new(27.0, 62.0, 800.0), at)
//!     .unwrap();
//! assert!(result.score < 80);
//! assert!(!result.recommendations.is_empty());
//!
//! let window = TimeWindow::new(at, at).unwrap();
//! let summaries = StatisticsEngine::new(&store).statistics(&window, None).unwrap();
//! assert_eq!(summaries[0].device_id, "device_1");
//! ```

pub mod engine;
pub mod error;
pub mod mock;
pub mod scoring;
pub mod statistics;
pub mod traits;
pub mod trends;

// Re-export the data model for convenience
pub use roomclimate_types::types;

// Core exports
pub use engine::{ScoringEngine, StatisticsEngine};
pub use error::{Error, Result};
pub use mock::{MemoryStore, MemoryStoreBuilder};
pub use scoring::{SubScores, evaluate};
pub use statistics::{describe, summarize};
pub use traits::{ConfigStore, MeasurementLog};

pub use roomclimate_types::{
    DeviceId, DeviceTargetConfig, Reading, RoomId, Sample, ScoreResult, StatisticsSummary,
    TimeWindow,
};
