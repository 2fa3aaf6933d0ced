//! Data models for stored data.

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use roomclimate_types::{DeviceId, DeviceTargetConfig, MacAddress, RoomId};

/// A room stored in the database.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredRoom {
    /// Database row ID.
    pub id: RoomId,
    /// Unique room name.
    pub name: String,
    /// When the room was created.
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

/// A device stored in the database.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredDevice {
    /// Database row ID.
    pub id: DeviceId,
    /// Normalized MAC address.
    pub mac_address: MacAddress,
    /// Room the device is assigned to, if any.
    pub room_id: Option<RoomId>,
    /// When the device was registered.
    #[serde(with = "time::serde::rfc3339")]
    pub registered_at: OffsetDateTime,
}

/// A device's target configuration as stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredConfig {
    pub device_id: DeviceId,
    pub config: DeviceTargetConfig,
    /// When the configuration was last written.
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

/// Result of a partial configuration update.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigUpdateOutcome {
    /// The configuration after the update.
    pub config: DeviceTargetConfig,
    /// Whether anything was written. `false` when the merge changed nothing.
    pub changed: bool,
}
