//! Core types for indoor-climate data.

use core::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::error::{ValidationError, ValidationResult};

/// Default productivity norm applied when a config does not carry one.
pub const DEFAULT_PRODUCTIVITY_NORM: f64 = 80.0;

/// Identifier of a registered sensor device.
///
/// Displays as `device_<n>`, the form used in statistics output.
///
/// ```
/// use roomclimate_types::DeviceId;
///
/// assert_eq!(DeviceId(7).to_string(), "device_7");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DeviceId(pub i64);

impl fmt::Display for DeviceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "device_{}", self.0)
    }
}

/// Identifier of a room.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoomId(pub i64);

impl fmt::Display for RoomId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "room_{}", self.0)
    }
}

/// A device MAC address, normalized to upper case with `:` separators.
///
/// Accepts six hex octets separated by either `:` or `-`.
///
/// ```
/// use roomclimate_types::MacAddress;
///
/// let mac: MacAddress = "aa-bb-cc-dd-ee-0f".parse().unwrap();
/// assert_eq!(mac.as_str(), "AA:BB:CC:DD:EE:0F");
/// assert!("AA:BB:CC".parse::<MacAddress>().is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct MacAddress(String);

impl MacAddress {
    /// The normalized textual form.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for MacAddress {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ValidationError::InvalidMacAddress(s.to_string());
        let trimmed = s.trim();

        // Mixed separators are rejected, matching the usual `xx:xx:..` / `xx-xx-..` forms.
        let sep = if trimmed.contains(':') { ':' } else { '-' };
        let octets: Vec<&str> = trimmed.split(sep).collect();
        if octets.len() != 6 {
            return Err(invalid());
        }
        if octets
            .iter()
            .any(|o| o.len() != 2 || !o.chars().all(|c| c.is_ascii_hexdigit()))
        {
            return Err(invalid());
        }

        Ok(Self(octets.join(":").to_ascii_uppercase()))
    }
}

impl TryFrom<String> for MacAddress {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<MacAddress> for String {
    fn from(mac: MacAddress) -> Self {
        mac.0
    }
}

impl fmt::Display for MacAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A monitored environmental parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Parameter {
    /// Air temperature in °C.
    Temperature,
    /// Relative humidity in %.
    Humidity,
    /// CO2 concentration in ppm.
    Co2,
}

impl Parameter {
    /// All parameters in scoring order.
    pub const ALL: [Parameter; 3] = [Parameter::Temperature, Parameter::Humidity, Parameter::Co2];

    /// Lower-case field name.
    pub fn name(&self) -> &'static str {
        match self {
            Parameter::Temperature => "temperature",
            Parameter::Humidity => "humidity",
            Parameter::Co2 => "co2",
        }
    }

    /// Display unit.
    pub fn unit(&self) -> &'static str {
        match self {
            Parameter::Temperature => "°C",
            Parameter::Humidity => "%",
            Parameter::Co2 => " ppm",
        }
    }
}

impl fmt::Display for Parameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Parameter::Temperature => write!(f, "temperature"),
            Parameter::Humidity => write!(f, "humidity"),
            Parameter::Co2 => write!(f, "CO2"),
        }
    }
}

/// One value per monitored parameter.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SensorValues {
    /// Temperature in °C.
    #[serde(rename = "Temperature")]
    pub temperature: f64,
    /// Relative humidity in %.
    #[serde(rename = "Humidity")]
    pub humidity: f64,
    /// CO2 concentration in ppm.
    #[serde(rename = "CO2")]
    pub co2: f64,
}

impl SensorValues {
    /// Create a new set of values.
    pub fn new(temperature: f64, humidity: f64, co2: f64) -> Self {
        Self {
            temperature,
            humidity,
            co2,
        }
    }

    /// Value for a single parameter.
    pub fn get(&self, parameter: Parameter) -> f64 {
        match parameter {
            Parameter::Temperature => self.temperature,
            Parameter::Humidity => self.humidity,
            Parameter::Co2 => self.co2,
        }
    }

    fn apply(&mut self, patch: &SensorValuesPatch) {
        if let Some(t) = patch.temperature {
            self.temperature = t;
        }
        if let Some(h) = patch.humidity {
            self.humidity = h;
        }
        if let Some(c) = patch.co2 {
            self.co2 = c;
        }
    }
}

/// Partial [`SensorValues`] used by [`ConfigUpdate`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SensorValuesPatch {
    #[serde(rename = "Temperature", default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
    #[serde(rename = "Humidity", default, skip_serializing_if = "Option::is_none")]
    pub humidity: Option<f64>,
    #[serde(rename = "CO2", default, skip_serializing_if = "Option::is_none")]
    pub co2: Option<f64>,
}

impl SensorValuesPatch {
    /// True when no field is set.
    pub fn is_empty(&self) -> bool {
        self.temperature.is_none() && self.humidity.is_none() && self.co2.is_none()
    }
}

/// How often a device reports, in seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonitoringSettings {
    #[serde(rename = "Interval")]
    pub interval: u32,
}

impl Default for MonitoringSettings {
    fn default() -> Self {
        Self { interval: 300 }
    }
}

fn default_productivity_norm() -> f64 {
    DEFAULT_PRODUCTIVITY_NORM
}

/// Per-device comfort envelope and productivity norm.
///
/// The wire shape matches the JSON stored alongside each device:
///
/// ```
/// use roomclimate_types::DeviceTargetConfig;
///
/// let json = r#"{
///     "ideal_values": {"Temperature": 22, "Humidity": 45, "CO2": 500},
///     "min_values":   {"Temperature": 15, "Humidity": 20, "CO2": 0},
///     "max_values":   {"Temperature": 29, "Humidity": 80, "CO2": 1000},
///     "monitoring_settings": {"Interval": 60}
/// }"#;
/// let config: DeviceTargetConfig = serde_json::from_str(json).unwrap();
/// assert_eq!(config.productivity_norm, 80.0);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeviceTargetConfig {
    pub ideal_values: SensorValues,
    pub min_values: SensorValues,
    pub max_values: SensorValues,
    #[serde(default)]
    pub monitoring_settings: MonitoringSettings,
    /// Scores below this threshold produce recommendations.
    #[serde(default = "default_productivity_norm")]
    pub productivity_norm: f64,
}

impl DeviceTargetConfig {
    /// Build a config with default monitoring settings and productivity norm.
    pub fn new(ideal_values: SensorValues, min_values: SensorValues, max_values: SensorValues) -> Self {
        Self {
            ideal_values,
            min_values,
            max_values,
            monitoring_settings: MonitoringSettings::default(),
            productivity_norm: DEFAULT_PRODUCTIVITY_NORM,
        }
    }

    /// Check that every value is finite, ranges are ordered and the norm is sane.
    pub fn validate(&self) -> ValidationResult<()> {
        for parameter in Parameter::ALL {
            let min = self.min_values.get(parameter);
            let ideal = self.ideal_values.get(parameter);
            let max = self.max_values.get(parameter);

            for value in [min, ideal, max] {
                if !value.is_finite() {
                    return Err(ValidationError::NotFinite {
                        field: parameter.name(),
                        value,
                    });
                }
            }

            if min > ideal || ideal > max {
                return Err(ValidationError::RangeOrder {
                    parameter: parameter.name(),
                    min,
                    ideal,
                    max,
                });
            }
        }

        if !self.productivity_norm.is_finite() || !(0.0..=100.0).contains(&self.productivity_norm)
        {
            return Err(ValidationError::NormOutOfRange(self.productivity_norm));
        }

        if self.monitoring_settings.interval == 0 {
            return Err(ValidationError::ZeroInterval);
        }

        Ok(())
    }

    /// Merge a partial update into a copy of this config and validate the result.
    pub fn apply(&self, update: &ConfigUpdate) -> ValidationResult<Self> {
        let mut merged = self.clone();

        if let Some(ref patch) = update.ideal_values {
            merged.ideal_values.apply(patch);
        }
        if let Some(ref patch) = update.min_values {
            merged.min_values.apply(patch);
        }
        if let Some(ref patch) = update.max_values {
            merged.max_values.apply(patch);
        }
        if let Some(settings) = update.monitoring_settings {
            merged.monitoring_settings = settings;
        }
        if let Some(norm) = update.productivity_norm {
            merged.productivity_norm = norm;
        }

        merged.validate()?;
        Ok(merged)
    }
}

/// Partial update to a [`DeviceTargetConfig`]. Unknown fields are rejected.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ideal_values: Option<SensorValuesPatch>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_values: Option<SensorValuesPatch>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_values: Option<SensorValuesPatch>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub monitoring_settings: Option<MonitoringSettings>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub productivity_norm: Option<f64>,
}

impl ConfigUpdate {
    /// True when the update carries nothing to change.
    pub fn is_empty(&self) -> bool {
        self.ideal_values.is_none_or(|p| p.is_empty())
            && self.min_values.is_none_or(|p| p.is_empty())
            && self.max_values.is_none_or(|p| p.is_empty())
            && self.monitoring_settings.is_none()
            && self.productivity_norm.is_none()
    }
}

/// A raw sensor sample before it is stored.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    /// Temperature in °C.
    pub temperature: f64,
    /// Relative humidity in %.
    pub humidity: f64,
    /// CO2 concentration in ppm.
    pub co2: f64,
}

impl Sample {
    /// Create a new sample.
    pub fn new(temperature: f64, humidity: f64, co2: f64) -> Self {
        Self {
            temperature,
            humidity,
            co2,
        }
    }

    /// Value for a single parameter.
    pub fn get(&self, parameter: Parameter) -> f64 {
        match parameter {
            Parameter::Temperature => self.temperature,
            Parameter::Humidity => self.humidity,
            Parameter::Co2 => self.co2,
        }
    }

    /// Reject NaN and infinite values.
    pub fn validate(&self) -> ValidationResult<()> {
        for parameter in Parameter::ALL {
            let value = self.get(parameter);
            if !value.is_finite() {
                return Err(ValidationError::NotFinite {
                    field: parameter.name(),
                    value,
                });
            }
        }
        Ok(())
    }
}

/// A timestamped sample belonging to a device.
///
/// `productivity` is set exactly when the sample went through scoring.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reading {
    pub device_id: DeviceId,
    #[serde(with = "time::serde::rfc3339")]
    pub timestamp: OffsetDateTime,
    pub temperature: f64,
    pub humidity: f64,
    pub co2: f64,
    pub productivity: Option<u8>,
}

impl Reading {
    /// Build a reading from a sample.
    pub fn new(
        device_id: DeviceId,
        timestamp: OffsetDateTime,
        sample: Sample,
        productivity: Option<u8>,
    ) -> Self {
        Self {
            device_id,
            timestamp,
            temperature: sample.temperature,
            humidity: sample.humidity,
            co2: sample.co2,
            productivity,
        }
    }

    /// The raw sample part of this reading.
    pub fn sample(&self) -> Sample {
        Sample::new(self.temperature, self.humidity, self.co2)
    }
}

/// Productivity score and recommendations for one sample.
///
/// Serialized as `{"prediction": .., "recommendations": [..]}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreResult {
    /// Score in `0..=100`.
    #[serde(rename = "prediction")]
    pub score: u8,
    /// Ordered: warning, temperature, humidity, CO2.
    pub recommendations: Vec<String>,
}

/// Inclusive time range used to select readings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeWindow {
    #[serde(with = "time::serde::rfc3339")]
    start: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    end: OffsetDateTime,
}

impl TimeWindow {
    /// Create a window; fails when `start` is after `end`.
    pub fn new(start: OffsetDateTime, end: OffsetDateTime) -> ValidationResult<Self> {
        if start > end {
            return Err(ValidationError::InvertedWindow {
                start: start.to_string(),
                end: end.to_string(),
            });
        }
        Ok(Self { start, end })
    }

    /// Window start (inclusive).
    pub fn start(&self) -> OffsetDateTime {
        self.start
    }

    /// Window end (inclusive).
    pub fn end(&self) -> OffsetDateTime {
        self.end
    }

    /// Whether `timestamp` falls inside the window.
    pub fn contains(&self, timestamp: OffsetDateTime) -> bool {
        self.start <= timestamp && timestamp <= self.end
    }
}
