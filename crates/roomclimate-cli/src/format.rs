//! Output formatting utilities for text and JSON output.

use std::collections::HashMap;
use std::fmt::Write as _;

use anyhow::Result;
use serde::Serialize;
use tabled::builder::Builder;
use tabled::settings::Style;
use tabled::{Table, Tabled};
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

use roomclimate_store::{StoredConfig, StoredDevice, StoredRoom};
use roomclimate_types::{
    DeviceId, DeviceTargetConfig, MacAddress, Parameter, ParameterStats, Reading, ScoreResult,
    StatisticsSummary,
};

use crate::cli::OutputFormat;

/// Formatting options for output.
#[derive(Debug, Clone, Copy, Default)]
pub struct FormatOptions {
    pub format: OutputFormat,
    /// Use compact JSON output (no pretty-printing).
    pub compact: bool,
}

impl FormatOptions {
    pub fn new(format: OutputFormat, compact: bool) -> Self {
        Self { format, compact }
    }

    pub fn is_json(&self) -> bool {
        self.format == OutputFormat::Json
    }

    /// Serialize to JSON, respecting the compact option.
    pub fn as_json<T: Serialize>(&self, value: &T) -> Result<String> {
        let json = if self.compact {
            serde_json::to_string(value)?
        } else {
            serde_json::to_string_pretty(value)?
        };
        Ok(json + "\n")
    }
}

fn format_time(time: OffsetDateTime) -> String {
    time.format(&Rfc3339)
        .unwrap_or_else(|_| time.unix_timestamp().to_string())
}

fn format_opt(value: Option<f64>) -> String {
    value.map_or_else(|| "-".to_string(), |v| format!("{:.2}", v))
}

fn render(mut table: Table) -> String {
    table.with(Style::rounded());
    format!("{}\n", table)
}

// ============================================================================
// Rooms and devices
// ============================================================================

#[must_use]
pub fn format_rooms_text(rooms: &[StoredRoom]) -> String {
    #[derive(Tabled)]
    struct RoomRow {
        #[tabled(rename = "ID")]
        id: i64,
        #[tabled(rename = "Name")]
        name: String,
        #[tabled(rename = "Created")]
        created: String,
    }

    if rooms.is_empty() {
        return "No rooms.\n".to_string();
    }

    let rows: Vec<RoomRow> = rooms
        .iter()
        .map(|room| RoomRow {
            id: room.id.0,
            name: room.name.clone(),
            created: format_time(room.created_at),
        })
        .collect();
    render(Table::new(rows))
}

#[must_use]
pub fn format_room_created_text(room: &StoredRoom, devices: usize) -> String {
    format!(
        "Created room '{}' (id {}) with {} device{}\n",
        room.name,
        room.id.0,
        devices,
        if devices == 1 { "" } else { "s" }
    )
}

#[must_use]
pub fn format_devices_text(devices: &[StoredDevice]) -> String {
    #[derive(Tabled)]
    struct DeviceRow {
        #[tabled(rename = "ID")]
        id: i64,
        #[tabled(rename = "MAC")]
        mac: String,
        #[tabled(rename = "Room")]
        room: String,
        #[tabled(rename = "Registered")]
        registered: String,
    }

    if devices.is_empty() {
        return "No devices.\n".to_string();
    }

    let rows: Vec<DeviceRow> = devices
        .iter()
        .map(|device| DeviceRow {
            id: device.id.0,
            mac: device.mac_address.to_string(),
            room: device
                .room_id
                .map_or_else(|| "-".to_string(), |id| id.0.to_string()),
            registered: format_time(device.registered_at),
        })
        .collect();
    render(Table::new(rows))
}

// ============================================================================
// Target configurations
// ============================================================================

fn with_unit(value: f64, parameter: Parameter) -> String {
    format!("{:.1}{}", value, parameter.unit())
}

#[must_use]
pub fn format_config_text(device: &StoredDevice, config: &DeviceTargetConfig) -> String {
    let mut builder = Builder::default();
    builder.push_record(["Parameter", "Min", "Ideal", "Max"]);
    for parameter in Parameter::ALL {
        builder.push_record([
            parameter.to_string(),
            with_unit(config.min_values.get(parameter), parameter),
            with_unit(config.ideal_values.get(parameter), parameter),
            with_unit(config.max_values.get(parameter), parameter),
        ]);
    }

    format!(
        "Targets for {} ({})\n{}Interval: {}s, productivity norm: {}\n",
        device.mac_address,
        device.id,
        render(builder.build()),
        config.monitoring_settings.interval,
        config.productivity_norm
    )
}

/// Table of every stored configuration; `macs` maps device IDs to addresses.
#[must_use]
pub fn format_configs_text(
    configs: &[StoredConfig],
    macs: &HashMap<DeviceId, MacAddress>,
) -> String {
    if configs.is_empty() {
        return "No configurations.\n".to_string();
    }

    let mut builder = Builder::default();
    builder.push_record([
        "Device",
        "MAC",
        "Ideal temperature",
        "Ideal humidity",
        "Ideal CO2",
        "Norm",
        "Interval",
        "Updated",
    ]);
    for stored in configs {
        let ideal = &stored.config.ideal_values;
        builder.push_record([
            stored.device_id.to_string(),
            macs.get(&stored.device_id)
                .map_or_else(|| "-".to_string(), ToString::to_string),
            with_unit(ideal.temperature, Parameter::Temperature),
            with_unit(ideal.humidity, Parameter::Humidity),
            with_unit(ideal.co2, Parameter::Co2),
            stored.config.productivity_norm.to_string(),
            format!("{}s", stored.config.monitoring_settings.interval),
            format_time(stored.updated_at),
        ]);
    }
    render(builder.build())
}

// ============================================================================
// Scores and readings
// ============================================================================

#[must_use]
pub fn format_score_text(result: &ScoreResult) -> String {
    let mut out = format!("Productivity: {}/100\n", result.score);
    for recommendation in &result.recommendations {
        let _ = writeln!(out, "  - {}", recommendation);
    }
    out
}

#[must_use]
pub fn format_reading_text(reading: &Reading) -> String {
    format!(
        "Recorded {:.1}°C, {:.1}%, {:.0} ppm for {} at {}\n",
        reading.temperature,
        reading.humidity,
        reading.co2,
        reading.device_id,
        format_time(reading.timestamp)
    )
}

// ============================================================================
// Statistics
// ============================================================================

fn push_parameter(builder: &mut Builder, name: &str, stats: Option<&ParameterStats>) {
    let stats = stats.cloned().unwrap_or_default();
    builder.push_record([
        name.to_string(),
        format_opt(stats.mean),
        format_opt(stats.median),
        format_opt(stats.std),
        format_opt(stats.min),
        format_opt(stats.max),
        format_opt(stats.iqr),
    ]);
}

#[must_use]
pub fn format_statistics_text(summaries: &[StatisticsSummary]) -> String {
    if summaries.is_empty() {
        return "No readings in the selected window.\n".to_string();
    }

    let mut out = String::new();
    for summary in summaries {
        let _ = writeln!(out, "{}", summary.device_id);
        if let Some(time_stats) = &summary.time_stats {
            let _ = writeln!(
                out,
                "{} .. {} ({} h, {} hourly buckets)",
                time_stats.start_time,
                time_stats.end_time,
                format_opt(time_stats.duration_hours),
                time_stats.hourly_trends.len()
            );
        }

        let mut builder = Builder::default();
        builder.push_record(["", "Mean", "Median", "Std", "Min", "Max", "IQR"]);
        push_parameter(&mut builder, "temperature", summary.temperature.as_ref());
        push_parameter(&mut builder, "humidity", summary.humidity.as_ref());
        push_parameter(&mut builder, "co2", summary.co2.as_ref());
        push_parameter(&mut builder, "productivity", summary.productivity.as_ref());
        out.push_str(&render(builder.build()));
    }
    out
}
