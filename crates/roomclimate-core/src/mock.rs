//! In-memory store for testing and embedding.
//!
//! [`MemoryStore`] implements both [`ConfigStore`] and [`MeasurementLog`]
//! without SQLite, so engines can be exercised in unit tests or embedded in
//! tools that never persist anything.
//!
//! # Features
//!
//! - **Room assignment**: devices can be placed in rooms for filtered queries
//! - **Failure injection**: appends can be made to fail on demand
//! - **Rollback**: writes inside a failed [`MeasurementLog::transaction`] are undone

use std::cell::{Cell, RefCell};
use std::collections::HashMap;

use roomclimate_types::{DeviceId, DeviceTargetConfig, Reading, RoomId, TimeWindow};

use crate::error::{Error, Result};
use crate::traits::{ConfigStore, MeasurementLog};

/// An in-memory implementation of the store seams.
///
/// Interior mutability makes it single-threaded (`!Sync`).
///
/// # Example
///
/// ```
/// use roomclimate_core::{MeasurementLog, MemoryStore};
/// use roomclimate_types::{DeviceId, Reading, RoomId, Sample, TimeWindow};
/// use time::macros::datetime;
///
/// let store = MemoryStore::builder().room(DeviceId(1), RoomId(3)).build();
/// let at = datetime!(2024-03-01 09:00 UTC);
/// store
///     .append_reading(&Reading::new(DeviceId(1), at, Sample::new(21.0, 40.0, 500.0), None))
///     .unwrap();
///
/// let window = TimeWindow::new(at, at).unwrap();
/// assert_eq!(store.query_readings(&window, Some(RoomId(3))).unwrap().len(), 1);
/// assert!(store.query_readings(&window, Some(RoomId(4))).unwrap().is_empty());
/// ```
#[derive(Debug, Default)]
pub struct MemoryStore {
    configs: RefCell<HashMap<DeviceId, DeviceTargetConfig>>,
    rooms: RefCell<HashMap<DeviceId, RoomId>>,
    readings: RefCell<Vec<Reading>>,
    fail_appends: Cell<bool>,
    append_count: Cell<u32>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Start building a store with preset configs and rooms.
    pub fn builder() -> MemoryStoreBuilder {
        MemoryStoreBuilder::new()
    }

    /// Set or replace a device's target configuration.
    pub fn set_config(&self, device: DeviceId, config: DeviceTargetConfig) {
        self.configs.borrow_mut().insert(device, config);
    }

    /// Assign a device to a room, or unassign it with `None`.
    pub fn assign_room(&self, device: DeviceId, room: Option<RoomId>) {
        let mut rooms = self.rooms.borrow_mut();
        match room {
            Some(room) => {
                rooms.insert(device, room);
            }
            None => {
                rooms.remove(&device);
            }
        }
    }

    /// Make subsequent appends fail (or succeed again).
    pub fn fail_appends(&self, fail: bool) {
        self.fail_appends.set(fail);
    }

    /// Snapshot of every committed reading, in append order.
    pub fn readings(&self) -> Vec<Reading> {
        self.readings.borrow().clone()
    }

    /// Number of append attempts, including failed ones.
    pub fn append_count(&self) -> u32 {
        self.append_count.get()
    }
}

impl ConfigStore for MemoryStore {
    fn get_config(&self, device: DeviceId) -> Result<Option<DeviceTargetConfig>> {
        Ok(self.configs.borrow().get(&device).cloned())
    }
}

impl MeasurementLog for MemoryStore {
    fn append_reading(&self, reading: &Reading) -> Result<Reading> {
        self.append_count.set(self.append_count.get() + 1);

        if self.fail_appends.get() {
            return Err(Error::store(format!(
                "append rejected for {}",
                reading.device_id
            )));
        }

        self.readings.borrow_mut().push(reading.clone());
        Ok(reading.clone())
    }

    fn query_readings(&self, window: &TimeWindow, room: Option<RoomId>) -> Result<Vec<Reading>> {
        let rooms = self.rooms.borrow();
        let readings = self
            .readings
            .borrow()
            .iter()
            .filter(|r| window.contains(r.timestamp))
            .filter(|r| room.is_none_or(|room| rooms.get(&r.device_id) == Some(&room)))
            .cloned()
            .collect();
        Ok(readings)
    }

    fn transaction<T, F>(&self, f: F) -> Result<T>
    where
        F: FnOnce() -> Result<T>,
    {
        let mark = self.readings.borrow().len();
        let result = f();
        if result.is_err() {
            self.readings.borrow_mut().truncate(mark);
        }
        result
    }
}

/// Builder for [`MemoryStore`].
#[derive(Debug, Default)]
pub struct MemoryStoreBuilder {
    configs: HashMap<DeviceId, DeviceTargetConfig>,
    rooms: HashMap<DeviceId, RoomId>,
    readings: Vec<Reading>,
}

impl MemoryStoreBuilder {
    /// Create a new builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Preset a device's target configuration.
    #[must_use]
    pub fn config(mut self, device: DeviceId, config: DeviceTargetConfig) -> Self {
        self.configs.insert(device, config);
        self
    }

    /// Assign a device to a room.
    #[must_use]
    pub fn room(mut self, device: DeviceId, room: RoomId) -> Self {
        self.rooms.insert(device, room);
        self
    }

    /// Preload readings.
    #[must_use]
    pub fn readings(mut self, readings: impl IntoIterator<Item = Reading>) -> Self {
        self.readings.extend(readings);
        self
    }

    /// Build the store.
    #[must_use]
    pub fn build(self) -> MemoryStore {
        MemoryStore {
            configs: RefCell::new(self.configs),
            rooms: RefCell::new(self.rooms),
            readings: RefCell::new(self.readings),
            ..MemoryStore::default()
        }
    }
}
