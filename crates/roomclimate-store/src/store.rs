//! Main store implementation.

use std::path::Path;

use rusqlite::types::Type;
use rusqlite::{Connection, OptionalExtension, Row, params};
use time::{OffsetDateTime, UtcOffset};
use tracing::{debug, info, warn};

use roomclimate_core::{ConfigStore, MeasurementLog};
use roomclimate_types::{
    ConfigUpdate, DeviceId, DeviceTargetConfig, MacAddress, Reading, RoomId, Sample, TimeWindow,
};

use crate::error::{Error, Result};
use crate::models::{ConfigUpdateOutcome, StoredConfig, StoredDevice, StoredRoom};
use crate::queries::MeasurementQuery;
use crate::schema;

const SAVEPOINT: &str = "roomclimate_op";

/// SQLite-based store for rooms, devices, target configs and measurements.
///
/// One handle owns one connection. It is `Send` but not `Sync`; open a
/// separate handle per thread.
#[derive(Debug)]
pub struct Store {
    conn: Connection,
}

fn now_secs() -> i64 {
    OffsetDateTime::now_utc().unix_timestamp()
}

fn timestamp(secs: i64, column: usize) -> rusqlite::Result<OffsetDateTime> {
    OffsetDateTime::from_unix_timestamp(secs)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(column, Type::Integer, Box::new(e)))
}

fn room_from_row(row: &Row<'_>) -> rusqlite::Result<StoredRoom> {
    Ok(StoredRoom {
        id: RoomId(row.get(0)?),
        name: row.get(1)?,
        created_at: timestamp(row.get(2)?, 2)?,
    })
}

fn device_from_row(row: &Row<'_>) -> rusqlite::Result<StoredDevice> {
    let mac: String = row.get(1)?;
    Ok(StoredDevice {
        id: DeviceId(row.get(0)?),
        mac_address: mac
            .parse::<MacAddress>()
            .map_err(|e| rusqlite::Error::FromSqlConversionFailure(1, Type::Text, Box::new(e)))?,
        room_id: row.get::<_, Option<i64>>(2)?.map(RoomId),
        registered_at: timestamp(row.get(3)?, 3)?,
    })
}

fn reading_from_row(row: &Row<'_>) -> rusqlite::Result<Reading> {
    let productivity = row
        .get::<_, Option<i64>>(5)?
        .map(u8::try_from)
        .transpose()
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(5, Type::Integer, Box::new(e)))?;

    Ok(Reading::new(
        DeviceId(row.get(0)?),
        timestamp(row.get(1)?, 1)?,
        Sample::new(row.get(2)?, row.get(3)?, row.get(4)?),
        productivity,
    ))
}

const ROOM_COLUMNS: &str = "id, name, created_at";
const DEVICE_COLUMNS: &str = "id, mac_address, room_id, registered_at";

impl Store {
    /// Open or create a database at the given path.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent).map_err(|e| Error::CreateDirectory {
                    path: parent.to_path_buf(),
                    source: e,
                })?;
            }
        }

        info!("Opening database at {}", path.display());
        let conn = Connection::open(path)?;

        // Foreign keys drive the room/device cascades.
        conn.execute_batch(
            "PRAGMA foreign_keys = ON;
             PRAGMA journal_mode = WAL;
             PRAGMA synchronous = NORMAL;",
        )?;

        schema::initialize(&conn)?;

        Ok(Self { conn })
    }

    /// Open the default database location.
    pub fn open_default() -> Result<Self> {
        Self::open(crate::default_db_path())
    }

    /// Open an in-memory database (for testing).
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        schema::initialize(&conn)?;
        Ok(Self { conn })
    }

    /// Run `f` inside a savepoint, rolling back everything it wrote on error.
    ///
    /// Savepoints nest, so this is safe to call from code already running
    /// inside one.
    fn with_savepoint<T, E, F>(&self, f: F) -> std::result::Result<T, E>
    where
        E: From<Error>,
        F: FnOnce() -> std::result::Result<T, E>,
    {
        self.conn
            .execute_batch(&format!("SAVEPOINT {}", SAVEPOINT))
            .map_err(|e| E::from(Error::from(e)))?;

        match f() {
            Ok(value) => {
                self.conn
                    .execute_batch(&format!("RELEASE {}", SAVEPOINT))
                    .map_err(|e| E::from(Error::from(e)))?;
                Ok(value)
            }
            Err(err) => {
                let rollback = format!("ROLLBACK TO {0}; RELEASE {0}", SAVEPOINT);
                if let Err(e) = self.conn.execute_batch(&rollback) {
                    warn!("Failed to roll back savepoint: {}", e);
                }
                Err(err)
            }
        }
    }
}

// Room operations
impl Store {
    /// Create a room and assign the given registered devices to it.
    ///
    /// Fails with [`Error::DuplicateRoom`] if the name is taken and with
    /// [`Error::DeviceNotFound`] if any MAC is not registered. Nothing is
    /// written on failure.
    pub fn create_room(&self, name: &str, device_macs: &[MacAddress]) -> Result<StoredRoom> {
        self.with_savepoint(|| -> Result<StoredRoom> {
            if self.room_by_name(name)?.is_some() {
                return Err(Error::DuplicateRoom(name.to_string()));
            }

            let devices = device_macs
                .iter()
                .map(|mac| {
                    self.device_by_mac(mac)?
                        .ok_or_else(|| Error::DeviceNotFound(mac.to_string()))
                })
                .collect::<Result<Vec<_>>>()?;

            self.conn.execute(
                "INSERT INTO rooms (name, created_at) VALUES (?1, ?2)",
                params![name, now_secs()],
            )?;
            let id = RoomId(self.conn.last_insert_rowid());

            for device in &devices {
                self.conn.execute(
                    "UPDATE devices SET room_id = ?1 WHERE id = ?2",
                    params![id.0, device.id.0],
                )?;
            }

            info!(
                "Created room '{}' ({}) with {} devices",
                name,
                id,
                devices.len()
            );
            self.get_room(id)?.ok_or(Error::RoomNotFound(id))
        })
    }

    /// Get a room by ID.
    pub fn get_room(&self, id: RoomId) -> Result<Option<StoredRoom>> {
        let room = self
            .conn
            .query_row(
                &format!("SELECT {} FROM rooms WHERE id = ?", ROOM_COLUMNS),
                [id.0],
                room_from_row,
            )
            .optional()?;
        Ok(room)
    }

    fn room_by_name(&self, name: &str) -> Result<Option<StoredRoom>> {
        let room = self
            .conn
            .query_row(
                &format!("SELECT {} FROM rooms WHERE name = ?", ROOM_COLUMNS),
                [name],
                room_from_row,
            )
            .optional()?;
        Ok(room)
    }

    /// List all rooms, ordered by ID.
    pub fn list_rooms(&self) -> Result<Vec<StoredRoom>> {
        let mut stmt = self
            .conn
            .prepare(&format!("SELECT {} FROM rooms ORDER BY id", ROOM_COLUMNS))?;
        let rooms = stmt
            .query_map([], room_from_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(rooms)
    }

    /// Delete a room. Its devices stay registered but become unassigned.
    pub fn delete_room(&self, id: RoomId) -> Result<()> {
        let deleted = self.conn.execute("DELETE FROM rooms WHERE id = ?", [id.0])?;
        if deleted == 0 {
            return Err(Error::RoomNotFound(id));
        }
        info!("Deleted {}", id);
        Ok(())
    }

    /// Devices assigned to a room, ordered by ID.
    pub fn room_devices(&self, id: RoomId) -> Result<Vec<StoredDevice>> {
        if self.get_room(id)?.is_none() {
            return Err(Error::RoomNotFound(id));
        }

        let mut stmt = self.conn.prepare(&format!(
            "SELECT {} FROM devices WHERE room_id = ? ORDER BY id",
            DEVICE_COLUMNS
        ))?;
        let devices = stmt
            .query_map([id.0], device_from_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(devices)
    }
}

// Device operations
impl Store {
    /// Register a new device. Duplicate MAC addresses are rejected.
    pub fn register_device(&self, mac: &MacAddress) -> Result<StoredDevice> {
        if self.device_by_mac(mac)?.is_some() {
            return Err(Error::DuplicateDevice(mac.clone()));
        }

        self.conn.execute(
            "INSERT INTO devices (mac_address, registered_at) VALUES (?1, ?2)",
            params![mac.as_str(), now_secs()],
        )?;
        let id = DeviceId(self.conn.last_insert_rowid());
        info!("Registered {} as {}", mac, id);

        self.get_device(id)?
            .ok_or_else(|| Error::DeviceNotFound(id.to_string()))
    }

    /// Get a device by ID.
    pub fn get_device(&self, id: DeviceId) -> Result<Option<StoredDevice>> {
        let device = self
            .conn
            .query_row(
                &format!("SELECT {} FROM devices WHERE id = ?", DEVICE_COLUMNS),
                [id.0],
                device_from_row,
            )
            .optional()?;
        Ok(device)
    }

    /// Get a device by MAC address.
    pub fn device_by_mac(&self, mac: &MacAddress) -> Result<Option<StoredDevice>> {
        let device = self
            .conn
            .query_row(
                &format!("SELECT {} FROM devices WHERE mac_address = ?", DEVICE_COLUMNS),
                [mac.as_str()],
                device_from_row,
            )
            .optional()?;
        Ok(device)
    }

    /// List all devices, ordered by ID.
    pub fn list_devices(&self) -> Result<Vec<StoredDevice>> {
        let mut stmt = self
            .conn
            .prepare(&format!("SELECT {} FROM devices ORDER BY id", DEVICE_COLUMNS))?;
        let devices = stmt
            .query_map([], device_from_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(devices)
    }

    /// Assign a device to a room, or unassign it with `None`.
    pub fn assign_room(&self, device: DeviceId, room: Option<RoomId>) -> Result<()> {
        if let Some(room) = room {
            if self.get_room(room)?.is_none() {
                return Err(Error::RoomNotFound(room));
            }
        }

        let updated = self.conn.execute(
            "UPDATE devices SET room_id = ?1 WHERE id = ?2",
            params![room.map(|r| r.0), device.0],
        )?;
        if updated == 0 {
            return Err(Error::DeviceNotFound(device.to_string()));
        }

        debug!("Assigned {} to {:?}", device, room);
        Ok(())
    }

    /// Remove a device together with its config and measurements.
    pub fn delete_device_by_mac(&self, mac: &MacAddress) -> Result<()> {
        let deleted = self
            .conn
            .execute("DELETE FROM devices WHERE mac_address = ?", [mac.as_str()])?;
        if deleted == 0 {
            return Err(Error::DeviceNotFound(mac.to_string()));
        }
        info!("Removed device {}", mac);
        Ok(())
    }

    fn require_device(&self, id: DeviceId) -> Result<()> {
        match self.get_device(id)? {
            Some(_) => Ok(()),
            None => Err(Error::DeviceNotFound(id.to_string())),
        }
    }
}

// Config operations
impl Store {
    /// Validate and store a device's full target configuration.
    pub fn put_config(&self, device: DeviceId, config: &DeviceTargetConfig) -> Result<()> {
        config.validate()?;
        self.require_device(device)?;

        let data = serde_json::to_string(config)?;
        self.conn.execute(
            "INSERT INTO device_configs (device_id, config_data, updated_at) VALUES (?1, ?2, ?3)
             ON CONFLICT(device_id) DO UPDATE SET
                config_data = excluded.config_data,
                updated_at = excluded.updated_at",
            params![device.0, data, now_secs()],
        )?;

        info!("Stored target configuration for {}", device);
        Ok(())
    }

    /// Get a device's target configuration.
    ///
    /// A stored document that no longer validates is reported as an error.
    pub fn get_config(&self, device: DeviceId) -> Result<Option<DeviceTargetConfig>> {
        let data: Option<String> = self
            .conn
            .query_row(
                "SELECT config_data FROM device_configs WHERE device_id = ?",
                [device.0],
                |row| row.get(0),
            )
            .optional()?;

        let Some(data) = data else {
            return Ok(None);
        };

        let config: DeviceTargetConfig = serde_json::from_str(&data)?;
        config.validate()?;
        Ok(Some(config))
    }

    /// Merge a partial update into a device's stored configuration.
    ///
    /// The write is skipped when the merge leaves the configuration unchanged.
    pub fn update_config(
        &self,
        device: DeviceId,
        update: &ConfigUpdate,
    ) -> Result<ConfigUpdateOutcome> {
        let current = self
            .get_config(device)?
            .ok_or(Error::ConfigNotFound(device))?;
        let merged = current.apply(update)?;

        if merged == current {
            debug!("Configuration for {} unchanged, skipping write", device);
            return Ok(ConfigUpdateOutcome {
                config: current,
                changed: false,
            });
        }

        self.put_config(device, &merged)?;
        Ok(ConfigUpdateOutcome {
            config: merged,
            changed: true,
        })
    }

    /// List every stored configuration, ordered by device ID.
    pub fn list_configs(&self) -> Result<Vec<StoredConfig>> {
        let mut stmt = self.conn.prepare(
            "SELECT device_id, config_data, updated_at FROM device_configs ORDER BY device_id",
        )?;
        let rows = stmt
            .query_map([], |row| {
                Ok((
                    DeviceId(row.get(0)?),
                    row.get::<_, String>(1)?,
                    timestamp(row.get(2)?, 2)?,
                ))
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        rows.into_iter()
            .map(|(device_id, data, updated_at)| {
                Ok(StoredConfig {
                    device_id,
                    config: serde_json::from_str(&data)?,
                    updated_at,
                })
            })
            .collect()
    }
}

// Measurement operations
impl Store {
    /// Insert a reading for a registered device and return its row ID.
    ///
    /// Timestamps are stored at second resolution.
    pub fn insert_reading(&self, reading: &Reading) -> Result<i64> {
        reading.sample().validate()?;
        self.require_device(reading.device_id)?;

        self.conn.execute(
            "INSERT INTO measurements (device_id, timestamp, temperature, humidity, co2, productivity)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                reading.device_id.0,
                reading.timestamp.unix_timestamp(),
                reading.temperature,
                reading.humidity,
                reading.co2,
                reading.productivity,
            ],
        )?;

        debug!(
            "Inserted reading for {} at {}",
            reading.device_id, reading.timestamp
        );
        Ok(self.conn.last_insert_rowid())
    }

    /// Query readings with filters.
    pub fn query_readings(&self, query: &MeasurementQuery) -> Result<Vec<Reading>> {
        let sql = query.build_sql();
        let (_, params) = query.build_where();

        debug!("Executing query: {}", sql);

        let params_ref: Vec<&dyn rusqlite::ToSql> = params.iter().map(|p| p.as_ref()).collect();

        let mut stmt = self.conn.prepare(&sql)?;
        let readings = stmt
            .query_map(params_ref.as_slice(), reading_from_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(readings)
    }

    /// Count readings, optionally for a single device.
    pub fn count_readings(&self, device: Option<DeviceId>) -> Result<u64> {
        let count: i64 = match device {
            Some(id) => self.conn.query_row(
                "SELECT COUNT(*) FROM measurements WHERE device_id = ?",
                [id.0],
                |row| row.get(0),
            )?,
            None => self
                .conn
                .query_row("SELECT COUNT(*) FROM measurements", [], |row| row.get(0))?,
        };

        Ok(count as u64)
    }
}

// Engine seams
impl ConfigStore for Store {
    fn get_config(&self, device: DeviceId) -> roomclimate_core::Result<Option<DeviceTargetConfig>> {
        Ok(Store::get_config(self, device)?)
    }
}

impl MeasurementLog for Store {
    fn append_reading(&self, reading: &Reading) -> roomclimate_core::Result<Reading> {
        self.insert_reading(reading)?;

        let committed = reading
            .timestamp
            .to_offset(UtcOffset::UTC)
            .replace_nanosecond(0)
            .map_err(roomclimate_core::Error::store)?;
        Ok(Reading {
            timestamp: committed,
            ..reading.clone()
        })
    }

    fn query_readings(
        &self,
        window: &TimeWindow,
        room: Option<RoomId>,
    ) -> roomclimate_core::Result<Vec<Reading>> {
        let mut query = MeasurementQuery::new().window(window).oldest_first();
        if let Some(room) = room {
            query = query.room(room);
        }
        Ok(Store::query_readings(self, &query)?)
    }

    fn transaction<T, F>(&self, f: F) -> roomclimate_core::Result<T>
    where
        F: FnOnce() -> roomclimate_core::Result<T>,
    {
        self.with_savepoint(f)
    }
}
