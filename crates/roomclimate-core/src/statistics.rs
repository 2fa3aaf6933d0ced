//! Descriptive statistics over stored readings.
//!
//! Conventions, fixed so results are reproducible:
//!
//! - `std` is the sample standard deviation (ddof = 1), absent for n < 2.
//! - Quantiles interpolate linearly between order statistics at position
//!   `q * (n - 1)`; the median is the 0.5 quantile.
//! - `skewness` is the adjusted Fisher-Pearson coefficient
//!   `G1 = n * sqrt(n - 1) / (n - 2) * m3 / m2^1.5` (sums of deviations),
//!   absent for n < 3.
//! - `kurtosis` is the bias-corrected excess kurtosis
//!   `G2 = n (n+1) (n-1) m4 / ((n-2) (n-3) m2²) - 3 (n-1)² / ((n-2) (n-3))`,
//!   absent for n < 4.
//! - Skewness and kurtosis are absent for a constant series.
//! - Any NaN or infinite result is reported as absent.
//!
//! # Example
//!
//! ```
//! use roomclimate_core::statistics::describe;
//!
//! let stats = describe(&[1.0, 2.0, 3.0, 4.0, 10.0]);
//! assert_eq!(stats.mean, Some(4.0));
//! assert_eq!(stats.median, Some(3.0));
//! assert_eq!(stats.quartiles, Some([Some(2.0), Some(3.0), Some(4.0)]));
//! assert_eq!(stats.iqr, Some(2.0));
//! ```

use std::collections::BTreeMap;

use tracing::{debug, warn};

use roomclimate_types::{DeviceId, ParameterStats, Reading, StatisticsSummary, TimeWindow};

use crate::error::{Error, Result};
use crate::trends;

/// Quantile levels reported as quartiles.
pub const QUARTILE_LEVELS: [f64; 3] = [0.25, 0.5, 0.75];

/// Drop NaN and infinite values.
fn clean(value: f64) -> Option<f64> {
    value.is_finite().then_some(value)
}

/// Linear-interpolated quantile of an already sorted, non-empty slice.
fn quantile(sorted: &[f64], q: f64) -> f64 {
    let pos = q * (sorted.len() - 1) as f64;
    let lower = pos.floor() as usize;
    let upper = (lower + 1).min(sorted.len() - 1);
    let fraction = pos - lower as f64;
    sorted[lower] + (sorted[upper] - sorted[lower]) * fraction
}

/// Sums of the 2nd, 3rd and 4th powers of deviations from the mean.
fn central_sums(values: &[f64], mean: f64) -> (f64, f64, f64) {
    values.iter().fold((0.0, 0.0, 0.0), |(m2, m3, m4), v| {
        let d = v - mean;
        let d2 = d * d;
        (m2 + d2, m3 + d2 * d, m4 + d2 * d2)
    })
}

/// Compute [`ParameterStats`] for a series.
///
/// An empty series yields stats with every field absent.
pub fn describe(values: &[f64]) -> ParameterStats {
    if values.is_empty() {
        return ParameterStats::default();
    }

    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);

    let n = sorted.len() as f64;
    let min = sorted[0];
    let max = sorted[sorted.len() - 1];
    let constant = min == max;
    // A constant series has its value as the exact mean.
    let mean = if constant {
        min
    } else {
        sorted.iter().sum::<f64>() / n
    };
    let (m2, m3, m4) = central_sums(&sorted, mean);

    let std = (sorted.len() >= 2).then(|| {
        if constant {
            0.0
        } else {
            (m2 / (n - 1.0)).sqrt()
        }
    });

    let quartiles = QUARTILE_LEVELS.map(|q| quantile(&sorted, q));
    let iqr = quartiles[2] - quartiles[0];

    let skewness = (sorted.len() >= 3 && !constant)
        .then(|| n * (n - 1.0).sqrt() / (n - 2.0) * m3 / m2.powf(1.5));

    let kurtosis = (sorted.len() >= 4 && !constant).then(|| {
        let denominator = (n - 2.0) * (n - 3.0);
        n * (n + 1.0) * (n - 1.0) * m4 / (denominator * m2 * m2)
            - 3.0 * (n - 1.0).powi(2) / denominator
    });

    ParameterStats {
        mean: clean(mean),
        median: clean(quartiles[1]),
        std: std.and_then(clean),
        min: clean(min),
        max: clean(max),
        quartiles: Some(quartiles.map(clean)),
        iqr: clean(iqr),
        skewness: skewness.and_then(clean),
        kurtosis: kurtosis.and_then(clean),
    }
}

/// Collect one parameter of a device's readings, rejecting malformed samples.
fn required_series(
    device: DeviceId,
    readings: &[&Reading],
    name: &str,
    field: impl Fn(&Reading) -> f64,
) -> Result<Vec<f64>> {
    readings
        .iter()
        .map(|r| {
            let value = field(r);
            if value.is_finite() {
                Ok(value)
            } else {
                Err(Error::DegenerateStatistic {
                    device,
                    reason: format!("non-finite {} value {} at {}", name, value, r.timestamp),
                })
            }
        })
        .collect()
}

/// Summarize the readings of a single device.
///
/// Fails when a stored temperature, humidity or CO2 value is not finite.
pub fn summarize_device(device: DeviceId, readings: &[&Reading]) -> Result<StatisticsSummary> {
    let temperature = required_series(device, readings, "temperature", |r| r.temperature)?;
    let humidity = required_series(device, readings, "humidity", |r| r.humidity)?;
    let co2 = required_series(device, readings, "co2", |r| r.co2)?;
    let productivity: Vec<f64> = readings
        .iter()
        .filter_map(|r| r.productivity.map(f64::from))
        .collect();

    let time_stats = trends::time_stats(device, readings)?;

    Ok(StatisticsSummary {
        device_id: device.to_string(),
        temperature: Some(describe(&temperature)),
        humidity: Some(describe(&humidity)),
        co2: Some(describe(&co2)),
        productivity: Some(describe(&productivity)),
        time_stats,
    })
}

/// Per-device statistics for the readings inside `window`.
///
/// Summaries are ordered by device id. A device whose series cannot be
/// summarized is logged and left out; the call itself never fails.
pub fn summarize(readings: &[Reading], window: &TimeWindow) -> Vec<StatisticsSummary> {
    let mut groups: BTreeMap<DeviceId, Vec<&Reading>> = BTreeMap::new();
    for reading in readings.iter().filter(|r| window.contains(r.timestamp)) {
        groups.entry(reading.device_id).or_default().push(reading);
    }

    if groups.is_empty() {
        debug!("No readings inside the statistics window");
        return Vec::new();
    }

    groups
        .into_iter()
        .filter_map(|(device, group)| match summarize_device(device, &group) {
            Ok(summary) => Some(summary),
            Err(e) => {
                warn!("Skipping statistics for {}: {}", device, e);
                None
            }
        })
        .collect()
}
