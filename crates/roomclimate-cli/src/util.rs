//! Utility functions for CLI operations.

use anyhow::{Result, bail};
use time::format_description::well_known::Rfc3339;
use time::macros::format_description;
use time::{Date, OffsetDateTime, Time};

use roomclimate_store::{StoredDevice, Store};
use roomclimate_types::{MacAddress, TimeWindow};

/// Parse a window bound: RFC3339, or YYYY-MM-DD at `time_of_day` in UTC.
fn parse_datetime_at(s: &str, time_of_day: Time) -> Result<OffsetDateTime> {
    // Try RFC3339 first (e.g., "2024-01-15T10:30:00Z")
    if let Ok(dt) = OffsetDateTime::parse(s, &Rfc3339) {
        return Ok(dt);
    }

    if let Ok(date) = Date::parse(s, format_description!("[year]-[month]-[day]")) {
        return Ok(date.with_time(time_of_day).assume_utc());
    }

    bail!(
        "Invalid date format '{}'. Use RFC3339 (e.g., 2024-01-15T10:30:00Z) or YYYY-MM-DD",
        s
    )
}

/// Parse a start time; a bare date means the start of that day in UTC.
pub fn parse_datetime(s: &str) -> Result<OffsetDateTime> {
    parse_datetime_at(s, Time::MIDNIGHT)
}

/// Parse an inclusive end time; a bare date covers that whole day in UTC.
pub fn parse_end_datetime(s: &str) -> Result<OffsetDateTime> {
    let end_of_day = Time::from_hms_nano(23, 59, 59, 999_999_999)?;
    parse_datetime_at(s, end_of_day)
}

/// Build the inclusive statistics window from `--from`/`--to` arguments.
pub fn parse_window(from: &str, to: &str) -> Result<TimeWindow> {
    let start = parse_datetime(from)?;
    let end = parse_end_datetime(to)?;
    Ok(TimeWindow::new(start, end)?)
}

/// Look up a registered device by MAC, with a helpful error message.
pub fn require_device(store: &Store, mac: &MacAddress) -> Result<StoredDevice> {
    match store.device_by_mac(mac)? {
        Some(device) => Ok(device),
        None => bail!(
            "Device {} is not registered. Run 'roomclimate device add {}' first.",
            mac,
            mac
        ),
    }
}
