//! Statistics output types.
//!
//! Every numeric field is optional: a statistic that is undefined for the
//! input (too few samples, zero variance) or not finite is reported as
//! absent and serializes as `null`.

use serde::{Deserialize, Serialize};

/// Descriptive statistics over one numeric series.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParameterStats {
    pub mean: Option<f64>,
    pub median: Option<f64>,
    /// Sample standard deviation (ddof = 1).
    pub std: Option<f64>,
    pub min: Option<f64>,
    pub max: Option<f64>,
    /// Q1, Q2 and Q3 with linear interpolation.
    pub quartiles: Option<[Option<f64>; 3]>,
    pub iqr: Option<f64>,
    pub skewness: Option<f64>,
    /// Excess kurtosis.
    pub kurtosis: Option<f64>,
}

impl ParameterStats {
    /// True when no statistic could be computed.
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

/// Per-hour means of each parameter, oldest bucket first.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HourlyTrends {
    pub temperature: Vec<Option<f64>>,
    pub humidity: Vec<Option<f64>>,
    pub co2: Vec<Option<f64>>,
    pub productivity: Vec<Option<f64>>,
}

impl HourlyTrends {
    /// Number of hour buckets.
    pub fn len(&self) -> usize {
        self.temperature.len()
    }

    /// True when there are no buckets.
    pub fn is_empty(&self) -> bool {
        self.temperature.is_empty()
    }
}

/// Time span covered by a device's readings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeStats {
    /// Earliest reading, RFC 3339.
    pub start_time: String,
    /// Latest reading, RFC 3339.
    pub end_time: String,
    pub duration_hours: Option<f64>,
    pub hourly_trends: HourlyTrends,
}

/// Statistics for one device over a query window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatisticsSummary {
    /// `device_<id>`.
    pub device_id: String,
    pub temperature: Option<ParameterStats>,
    pub humidity: Option<ParameterStats>,
    pub co2: Option<ParameterStats>,
    pub productivity: Option<ParameterStats>,
    pub time_stats: Option<TimeStats>,
}
