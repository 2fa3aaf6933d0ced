//! Store-backed scoring and statistics engines.
//!
//! Both engines borrow an injected store for their whole lifetime; there is
//! no global connection. The pure math lives in [`crate::scoring`] and
//! [`crate::statistics`].

use time::OffsetDateTime;
use tracing::{debug, info};

use roomclimate_types::{DeviceId, Reading, RoomId, Sample, ScoreResult, StatisticsSummary, TimeWindow};

use crate::error::{Error, Result};
use crate::scoring;
use crate::statistics;
use crate::traits::{ConfigStore, MeasurementLog};

fn check_sample(sample: &Sample) -> Result<()> {
    sample
        .validate()
        .map_err(|e| Error::InvalidInput(e.to_string()))
}

/// Scores samples against a device's targets and logs them.
///
/// # Example
///
/// ```
/// use roomclimate_core::{MemoryStore, ScoringEngine};
/// use roomclimate_types::{DeviceId, DeviceTargetConfig, Sample, SensorValues};
///
/// let config = DeviceTargetConfig::new(
///     SensorValues::new(22.0, 45.0, 600.0),
///     SensorValues::new(18.0, 30.0, 400.0),
///     SensorValues::new(26.0, 60.0, 1200.0),
/// );
/// let store = MemoryStore::builder().config(DeviceId(1), config).build();
/// let engine = ScoringEngine::new(&store);
///
/// let result = engine.score(DeviceId(1), Sample::new(22.0, 45.0, 600.0)).unwrap();
/// assert_eq!(result.score, 100);
/// assert!(result.recommendations.is_empty());
/// assert_eq!(store.readings().len(), 1);
/// ```
#[derive(Debug)]
pub struct ScoringEngine<'a, S> {
    store: &'a S,
}

impl<'a, S> ScoringEngine<'a, S>
where
    S: ConfigStore + MeasurementLog,
{
    /// Create an engine backed by `store`.
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// Score a sample taken now.
    pub fn score(&self, device: DeviceId, sample: Sample) -> Result<ScoreResult> {
        self.score_at(device, sample, OffsetDateTime::now_utc())
    }

    /// Score a sample taken at `timestamp` and append it with its score.
    ///
    /// The config read and the append share one store transaction. If the
    /// append fails the error is returned and no reading is left behind.
    pub fn score_at(
        &self,
        device: DeviceId,
        sample: Sample,
        timestamp: OffsetDateTime,
    ) -> Result<ScoreResult> {
        check_sample(&sample)?;

        let result = self.store.transaction(|| {
            let config = self
                .store
                .get_config(device)?
                .ok_or(Error::ConfigNotFound(device))?;

            let result = scoring::evaluate(&sample, &config);
            let reading = Reading::new(device, timestamp, sample, Some(result.score));
            self.store.append_reading(&reading)?;
            Ok(result)
        })?;

        debug!(
            "Scored {} at {}: {} ({} recommendations)",
            device,
            timestamp,
            result.score,
            result.recommendations.len()
        );
        Ok(result)
    }

    /// Record a raw sample taken now, without scoring it.
    pub fn record(&self, device: DeviceId, sample: Sample) -> Result<Reading> {
        self.record_at(device, sample, OffsetDateTime::now_utc())
    }

    /// Record a raw sample taken at `timestamp`.
    ///
    /// The stored reading carries no productivity score.
    pub fn record_at(
        &self,
        device: DeviceId,
        sample: Sample,
        timestamp: OffsetDateTime,
    ) -> Result<Reading> {
        check_sample(&sample)?;

        let reading = Reading::new(device, timestamp, sample, None);
        let stored = self.store.transaction(|| self.store.append_reading(&reading))?;

        info!("Recorded environment for {} at {}", device, timestamp);
        Ok(stored)
    }
}

/// Summarizes logged readings per device over a time window.
#[derive(Debug)]
pub struct StatisticsEngine<'a, S> {
    store: &'a S,
}

impl<'a, S> StatisticsEngine<'a, S>
where
    S: MeasurementLog,
{
    /// Create an engine backed by `store`.
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// Per-device summaries of readings inside `window`, sorted by device id.
    ///
    /// With `room` set, only devices assigned to that room are included.
    /// An empty selection yields an empty vector.
    pub fn statistics(
        &self,
        window: &TimeWindow,
        room: Option<RoomId>,
    ) -> Result<Vec<StatisticsSummary>> {
        let readings = self.store.query_readings(window, room)?;
        debug!(
            "Summarizing {} readings between {} and {}{}",
            readings.len(),
            window.start(),
            window.end(),
            room.map(|r| format!(" for {}", r)).unwrap_or_default()
        );
        Ok(statistics::summarize(&readings, window))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MemoryStore;
    use roomclimate_types::{DeviceTargetConfig, SensorValues};
    use time::Duration;
    use time::macros::datetime;

    fn office() -> DeviceTargetConfig {
        DeviceTargetConfig::new(
            SensorValues::new(22.0, 45.0, 600.0),
            SensorValues::new(18.0, 30.0, 400.0),
            SensorValues::new(26.0, 60.0, 1200.0),
        )
    }

    fn store() -> MemoryStore {
        MemoryStore::builder()
            .config(DeviceId(1), office())
            .config(DeviceId(2), office())
            .room(DeviceId(1), RoomId(10))
            .build()
    }

    #[test]
    fn test_score_appends_scored_reading() {
        let store = store();
        let engine = ScoringEngine::new(&store);
        let at = datetime!(2024-03-01 09:00 UTC);

        let result = engine
            .score_at(DeviceId(1), Sample::new(25.0, 45.0, 600.0), at)
            .unwrap();
        assert_eq!(result.score, 90);

        let readings = store.readings();
        assert_eq!(readings.len(), 1);
        assert_eq!(readings[0].device_id, DeviceId(1));
        assert_eq!(readings[0].timestamp, at);
        assert_eq!(readings[0].productivity, Some(90));
    }

    #[test]
    fn test_score_without_config() {
        let store = store();
        let engine = ScoringEngine::new(&store);

        let err = engine
            .score(DeviceId(99), Sample::new(22.0, 45.0, 600.0))
            .unwrap_err();
        assert!(matches!(err, Error::ConfigNotFound(DeviceId(99))));
        assert!(store.readings().is_empty());
    }

    #[test]
    fn test_score_rejects_non_finite_sample() {
        let store = store();
        let engine = ScoringEngine::new(&store);

        let err = engine
            .score(DeviceId(1), Sample::new(f64::NAN, 45.0, 600.0))
            .unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));

        let err = engine
            .record(DeviceId(1), Sample::new(22.0, 45.0, f64::INFINITY))
            .unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
        assert!(store.readings().is_empty());
    }

    #[test]
    fn test_failed_append_leaves_nothing() {
        let store = store();
        store.fail_appends(true);
        let engine = ScoringEngine::new(&store);

        let err = engine
            .score(DeviceId(1), Sample::new(22.0, 45.0, 600.0))
            .unwrap_err();
        assert!(matches!(err, Error::StoreFailure(_)));
        assert!(store.readings().is_empty());

        store.fail_appends(false);
        assert!(engine.score(DeviceId(1), Sample::new(22.0, 45.0, 600.0)).is_ok());
        assert_eq!(store.readings().len(), 1);
    }

    #[test]
    fn test_record_is_unscored() {
        let store = store();
        let engine = ScoringEngine::new(&store);

        // Raw recording does not need a config.
        let reading = engine
            .record(DeviceId(7), Sample::new(21.0, 40.0, 700.0))
            .unwrap();
        assert_eq!(reading.productivity, None);
        assert_eq!(store.readings(), vec![reading]);
    }

    #[test]
    fn test_statistics_round_trip() {
        let store = store();
        let scoring = ScoringEngine::new(&store);
        let base = datetime!(2024-03-01 09:00 UTC);

        for (i, t) in [21.0, 22.0, 23.0].into_iter().enumerate() {
            let at = base + Duration::minutes(20 * i as i64);
            scoring
                .score_at(DeviceId(2), Sample::new(t, 45.0, 600.0), at)
                .unwrap();
            scoring
                .record_at(DeviceId(1), Sample::new(t + 1.0, 50.0, 800.0), at)
                .unwrap();
        }

        let window = TimeWindow::new(base, base + Duration::hours(1)).unwrap();
        let summaries = StatisticsEngine::new(&store)
            .statistics(&window, None)
            .unwrap();

        assert_eq!(summaries.len(), 2);
        assert_eq!(summaries[0].device_id, "device_1");
        assert_eq!(summaries[1].device_id, "device_2");

        let unscored = summaries[0].productivity.as_ref().unwrap();
        assert!(unscored.is_empty());

        let temperature = summaries[1].temperature.as_ref().unwrap();
        assert_eq!(temperature.mean, Some(22.0));
        assert_eq!(temperature.std, Some(1.0));
        let productivity = summaries[1].productivity.as_ref().unwrap();
        assert_eq!(productivity.max, Some(100.0));
    }

    #[test]
    fn test_statistics_room_filter() {
        let store = store();
        let scoring = ScoringEngine::new(&store);
        let at = datetime!(2024-03-01 09:00 UTC);

        scoring
            .record_at(DeviceId(1), Sample::new(21.0, 40.0, 500.0), at)
            .unwrap();
        scoring
            .record_at(DeviceId(2), Sample::new(23.0, 40.0, 500.0), at)
            .unwrap();

        let window = TimeWindow::new(at, at).unwrap();
        let engine = StatisticsEngine::new(&store);

        let summaries = engine.statistics(&window, Some(RoomId(10))).unwrap();
        assert_eq!(summaries.len(), 1);
        assert_eq!(summaries[0].device_id, "device_1");

        assert!(engine.statistics(&window, Some(RoomId(11))).unwrap().is_empty());
    }
}
