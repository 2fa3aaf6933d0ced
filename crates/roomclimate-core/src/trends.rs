//! Hourly trend series for a device's readings.
//!
//! Readings are bucketed by flooring their UTC timestamp to the hour. Buckets
//! are left-inclusive (`[h, h + 1h)`) and run from the bucket of the earliest
//! reading to the bucket of the latest one, so hours without readings appear
//! as absent entries.

use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

use roomclimate_types::{DeviceId, HourlyTrends, Reading, TimeStats};

use crate::error::{Error, Result};

const SECONDS_PER_HOUR: i64 = 3600;

/// Start of the UTC hour containing `timestamp`, in Unix seconds.
pub fn floor_to_hour(timestamp: OffsetDateTime) -> i64 {
    timestamp
        .unix_timestamp()
        .div_euclid(SECONDS_PER_HOUR)
        * SECONDS_PER_HOUR
}

#[derive(Debug, Clone, Copy, Default)]
struct Accumulator {
    sum: f64,
    count: u32,
}

impl Accumulator {
    fn add(&mut self, value: f64) {
        self.sum += value;
        self.count += 1;
    }

    fn mean(&self) -> Option<f64> {
        if self.count == 0 {
            return None;
        }
        let mean = self.sum / f64::from(self.count);
        mean.is_finite().then_some(mean)
    }
}

#[derive(Debug, Clone, Copy, Default)]
struct Bucket {
    temperature: Accumulator,
    humidity: Accumulator,
    co2: Accumulator,
    productivity: Accumulator,
}

/// Per-hour means for each parameter between the first and last reading.
pub fn hourly_trends(readings: &[&Reading]) -> HourlyTrends {
    let Some(first) = readings.iter().map(|r| floor_to_hour(r.timestamp)).min() else {
        return HourlyTrends::default();
    };
    let last = readings
        .iter()
        .map(|r| floor_to_hour(r.timestamp))
        .max()
        .unwrap_or(first);

    let span = ((last - first) / SECONDS_PER_HOUR) as usize + 1;
    let mut buckets = vec![Bucket::default(); span];
    for reading in readings {
        let index = ((floor_to_hour(reading.timestamp) - first) / SECONDS_PER_HOUR) as usize;
        let bucket = &mut buckets[index];
        bucket.temperature.add(reading.temperature);
        bucket.humidity.add(reading.humidity);
        bucket.co2.add(reading.co2);
        if let Some(p) = reading.productivity {
            bucket.productivity.add(f64::from(p));
        }
    }

    HourlyTrends {
        temperature: buckets.iter().map(|b| b.temperature.mean()).collect(),
        humidity: buckets.iter().map(|b| b.humidity.mean()).collect(),
        co2: buckets.iter().map(|b| b.co2.mean()).collect(),
        productivity: buckets.iter().map(|b| b.productivity.mean()).collect(),
    }
}

/// Time span and hourly trends for a device, `None` without readings.
pub fn time_stats(device: DeviceId, readings: &[&Reading]) -> Result<Option<TimeStats>> {
    let (Some(start), Some(end)) = (
        readings.iter().map(|r| r.timestamp).min(),
        readings.iter().map(|r| r.timestamp).max(),
    ) else {
        return Ok(None);
    };

    let format = |ts: OffsetDateTime| {
        ts.format(&Rfc3339).map_err(|e| Error::DegenerateStatistic {
            device,
            reason: format!("cannot format timestamp {}: {}", ts, e),
        })
    };

    let duration_hours = (end - start).as_seconds_f64() / SECONDS_PER_HOUR as f64;

    Ok(Some(TimeStats {
        start_time: format(start)?,
        end_time: format(end)?,
        duration_hours: duration_hours.is_finite().then_some(duration_hours),
        hourly_trends: hourly_trends(readings),
    }))
}
