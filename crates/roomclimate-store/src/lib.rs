//! Local data persistence for room climate monitoring.
//!
//! This crate provides SQLite-based storage for rooms, registered devices,
//! per-device target configurations and timestamped measurements. The
//! [`Store`] implements the `ConfigStore` and `MeasurementLog` seams from
//! roomclimate-core so the scoring and statistics engines can run against it
//! directly.
//!
//! # Features
//!
//! - Rooms with unique names and device assignment
//! - Devices keyed by normalized MAC address
//! - Validated target configurations stored as JSON documents
//! - Measurements queried by device, room, time range, with pagination
//! - Savepoint-backed transactions for the engines' atomic writes
//!
//! # Example
//!
//! ```
//! use roomclimate_core::ScoringEngine;
//! use roomclimate_store::Store;
//! use roomclimate_types::{DeviceTargetConfig, Sample, SensorValues};
//!
//! let store = Store::open_in_memory()?;
//! let device = store.register_device(&"AA:BB:CC:DD:EE:01".parse()?)?;
//! store.put_config(
//!     device.id,
//!     &DeviceTargetConfig::new(
//!         SensorValues::new(22.0, 45.0, 500.0),
//!         SensorValues::new(15.0, 20.0, 0.0),
//!         SensorValues::new(29.0, 80.0, 1000.0),
//!     ),
//! )?;
//!
//! let result = ScoringEngine::new(&store).score(device.id, Sample::new(22.0, 45.0, 500.0))?;
//! assert_eq!(result.score, 100);
//! assert_eq!(store.count_readings(Some(device.id))?, 1);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod error;
mod models;
mod queries;
mod schema;
mod store;

pub use error::{Error, Result};
pub use models::{ConfigUpdateOutcome, StoredConfig, StoredDevice, StoredRoom};
pub use queries::MeasurementQuery;
pub use store::Store;

/// Default database path following platform conventions.
///
/// - Linux: `~/.local/share/roomclimate/data.db`
/// - macOS: `~/Library/Application Support/roomclimate/data.db`
/// - Windows: `C:\Users\<user>\AppData\Local\roomclimate\data.db`
pub fn default_db_path() -> std::path::PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| std::path::PathBuf::from("."))
        .join("roomclimate")
        .join("data.db")
}
