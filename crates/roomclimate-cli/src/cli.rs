//! CLI argument definitions using clap.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};

use roomclimate_types::{
    ConfigUpdate, MacAddress, MonitoringSettings, Sample, SensorValuesPatch,
};

/// Output format for commands
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Parser)]
#[command(name = "roomclimate")]
#[command(author, version, about = "Indoor climate productivity scoring and statistics", long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Output as JSON (shorthand for --format json)
    #[arg(long, global = true)]
    pub json: bool,

    /// Output format (defaults to the config file, then text)
    #[arg(long, global = true, value_enum)]
    pub format: Option<OutputFormat>,

    /// Config file to load instead of the default location
    #[arg(long, global = true, env = "ROOMCLIMATE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Database file (overrides the config file)
    #[arg(long, global = true, env = "ROOMCLIMATE_DB")]
    pub db: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Manage rooms
    Room {
        #[command(subcommand)]
        action: RoomAction,
    },

    /// Manage registered devices
    Device {
        #[command(subcommand)]
        action: DeviceAction,
    },

    /// Manage per-device target configurations
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Score a reading against the device's targets and store it
    Predict {
        /// Device MAC address
        #[arg(value_parser = parse_mac)]
        mac: MacAddress,

        #[command(flatten)]
        sample: SampleArgs,
    },

    /// Store a reading without scoring it
    Record {
        /// Device MAC address
        #[arg(value_parser = parse_mac)]
        mac: MacAddress,

        #[command(flatten)]
        sample: SampleArgs,
    },

    /// Per-device statistics over a time window
    Stats {
        /// Window start (RFC3339 or YYYY-MM-DD)
        #[arg(long)]
        from: String,

        /// Window end, inclusive (RFC3339 or YYYY-MM-DD)
        #[arg(long)]
        to: String,

        /// Only include devices assigned to this room
        #[arg(long)]
        room: Option<i64>,
    },
}

/// Room subcommands
#[derive(Debug, Clone, Subcommand)]
pub enum RoomAction {
    /// Create a room, optionally assigning registered devices to it
    Create {
        /// Unique room name
        name: String,

        /// MAC address of a device to assign (repeatable)
        #[arg(short, long = "device", value_parser = parse_mac)]
        devices: Vec<MacAddress>,
    },

    /// List all rooms
    List,

    /// Delete a room (its devices stay registered)
    #[command(alias = "rm")]
    Delete {
        /// Room ID
        id: i64,
    },

    /// List the devices assigned to a room
    Devices {
        /// Room ID
        id: i64,
    },
}

/// Device subcommands
#[derive(Debug, Clone, Subcommand)]
pub enum DeviceAction {
    /// Register a device by MAC address
    Add {
        #[arg(value_parser = parse_mac)]
        mac: MacAddress,
    },

    /// List registered devices
    List,

    /// Remove a device with its configuration and readings
    #[command(alias = "rm")]
    Remove {
        #[arg(value_parser = parse_mac)]
        mac: MacAddress,
    },
}

/// Target configuration subcommands
#[derive(Debug, Clone, Subcommand)]
pub enum ConfigAction {
    /// Store a full configuration from a JSON file
    Set {
        #[arg(value_parser = parse_mac)]
        mac: MacAddress,

        /// JSON document with ideal_values, min_values, max_values, ...
        #[arg(short, long)]
        file: PathBuf,
    },

    /// Change selected fields of a stored configuration
    Update {
        #[arg(value_parser = parse_mac)]
        mac: MacAddress,

        #[command(flatten)]
        fields: ConfigUpdateArgs,
    },

    /// Show a device's configuration
    Show {
        #[arg(value_parser = parse_mac)]
        mac: MacAddress,
    },

    /// List every stored configuration
    #[command(alias = "ls")]
    List,
}

/// One environmental sample
#[derive(Debug, Clone, Args)]
pub struct SampleArgs {
    /// Temperature in °C
    #[arg(short, long, allow_negative_numbers = true)]
    pub temperature: f64,

    /// Relative humidity in %
    #[arg(short = 'H', long)]
    pub humidity: f64,

    /// CO2 concentration in ppm
    #[arg(short, long)]
    pub co2: f64,
}

impl SampleArgs {
    pub fn sample(&self) -> Sample {
        Sample::new(self.temperature, self.humidity, self.co2)
    }
}

/// Fields accepted by `config update`
#[derive(Debug, Clone, Default, Args)]
pub struct ConfigUpdateArgs {
    #[arg(long, allow_negative_numbers = true)]
    pub ideal_temperature: Option<f64>,
    #[arg(long)]
    pub ideal_humidity: Option<f64>,
    #[arg(long)]
    pub ideal_co2: Option<f64>,

    #[arg(long, allow_negative_numbers = true)]
    pub min_temperature: Option<f64>,
    #[arg(long)]
    pub min_humidity: Option<f64>,
    #[arg(long)]
    pub min_co2: Option<f64>,

    #[arg(long, allow_negative_numbers = true)]
    pub max_temperature: Option<f64>,
    #[arg(long)]
    pub max_humidity: Option<f64>,
    #[arg(long)]
    pub max_co2: Option<f64>,

    /// Monitoring interval in seconds
    #[arg(long)]
    pub interval: Option<u32>,

    /// Productivity norm (0-100); lower scores get recommendations
    #[arg(long)]
    pub norm: Option<f64>,
}

fn patch(
    temperature: Option<f64>,
    humidity: Option<f64>,
    co2: Option<f64>,
) -> Option<SensorValuesPatch> {
    let patch = SensorValuesPatch {
        temperature,
        humidity,
        co2,
    };
    (!patch.is_empty()).then_some(patch)
}

impl ConfigUpdateArgs {
    /// Convert the flags into a partial update.
    pub fn to_update(&self) -> ConfigUpdate {
        ConfigUpdate {
            ideal_values: patch(self.ideal_temperature, self.ideal_humidity, self.ideal_co2),
            min_values: patch(self.min_temperature, self.min_humidity, self.min_co2),
            max_values: patch(self.max_temperature, self.max_humidity, self.max_co2),
            monitoring_settings: self
                .interval
                .map(|interval| MonitoringSettings { interval }),
            productivity_norm: self.norm,
        }
    }
}

/// Parse and normalize a MAC address argument
fn parse_mac(s: &str) -> Result<MacAddress, String> {
    s.parse().map_err(|e| format!("{}", e))
}
