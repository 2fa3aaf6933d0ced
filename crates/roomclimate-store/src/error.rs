//! Error types for roomclimate-store.

use std::path::PathBuf;

use roomclimate_types::{DeviceId, MacAddress, RoomId, ValidationError};

/// Result type for roomclimate-store operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in roomclimate-store.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Database error from SQLite.
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Failed to create database directory.
    #[error("Failed to create database directory {path}: {source}")]
    CreateDirectory {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Device not found in database.
    #[error("Device not found: {0}")]
    DeviceNotFound(String),

    /// Room not found in database.
    #[error("Room not found: {0}")]
    RoomNotFound(RoomId),

    /// Device has no stored target configuration.
    #[error("No target configuration stored for {0}")]
    ConfigNotFound(DeviceId),

    /// A device with this MAC address is already registered.
    #[error("Device {0} is already registered")]
    DuplicateDevice(MacAddress),

    /// A room with this name already exists.
    #[error("Room '{0}' already exists")]
    DuplicateRoom(String),

    /// Stored or supplied data failed validation.
    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationError),

    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<Error> for roomclimate_core::Error {
    fn from(err: Error) -> Self {
        match err {
            Error::ConfigNotFound(device) => roomclimate_core::Error::ConfigNotFound(device),
            other => roomclimate_core::Error::store(other),
        }
    }
}
