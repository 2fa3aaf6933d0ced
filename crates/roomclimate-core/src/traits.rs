//! Store seams used by the engines.
//!
//! The engines never own storage. They borrow something implementing
//! [`ConfigStore`] and/or [`MeasurementLog`], which may be the SQLite store
//! from roomclimate-store or the in-memory [`MemoryStore`](crate::MemoryStore).
//!
//! # Example
//!
//! ```
//! use roomclimate_core::{ConfigStore, Result};
//! use roomclimate_types::DeviceId;
//!
//! fn has_targets<S: ConfigStore>(store: &S, device: DeviceId) -> Result<bool> {
//!     Ok(store.get_config(device)?.is_some())
//! }
//! ```

use roomclimate_types::{DeviceId, DeviceTargetConfig, Reading, RoomId, TimeWindow};

use crate::error::Result;

/// Read access to per-device target configuration.
pub trait ConfigStore {
    /// Look up the target configuration for a device.
    ///
    /// Returns `Ok(None)` when the device has no configuration.
    fn get_config(&self, device: DeviceId) -> Result<Option<DeviceTargetConfig>>;
}

/// Append-only log of timestamped readings.
pub trait MeasurementLog {
    /// Persist a reading and return it as committed.
    fn append_reading(&self, reading: &Reading) -> Result<Reading>;

    /// All readings with `window.start() <= timestamp <= window.end()`.
    ///
    /// With `room` set, only readings from devices assigned to that room.
    fn query_readings(&self, window: &TimeWindow, room: Option<RoomId>) -> Result<Vec<Reading>>;

    /// Run `f` so that every write it performs commits or rolls back as a unit.
    ///
    /// The default implementation simply calls `f`; stores with real
    /// transactions override it.
    fn transaction<T, F>(&self, f: F) -> Result<T>
    where
        F: FnOnce() -> Result<T>,
    {
        f()
    }
}
