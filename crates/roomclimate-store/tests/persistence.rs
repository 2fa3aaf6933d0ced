//! On-disk persistence tests for roomclimate-store.

use roomclimate_core::{Error as CoreError, ScoringEngine, StatisticsEngine};
use roomclimate_store::{MeasurementQuery, Store};
use roomclimate_types::{
    DeviceTargetConfig, MacAddress, MonitoringSettings, Sample, SensorValues, TimeWindow,
};
use tempfile::TempDir;
use time::Duration;
use time::macros::datetime;

fn office() -> DeviceTargetConfig {
    DeviceTargetConfig {
        ideal_values: SensorValues::new(22.0, 45.0, 500.0),
        min_values: SensorValues::new(15.0, 20.0, 0.0),
        max_values: SensorValues::new(29.0, 80.0, 1000.0),
        monitoring_settings: MonitoringSettings { interval: 300 },
        productivity_norm: 80.0,
    }
}

fn mac(s: &str) -> MacAddress {
    s.parse().unwrap()
}

#[test]
fn test_data_survives_reopen() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("nested").join("climate.db");

    let device_id = {
        let store = Store::open(&path).unwrap();
        let device = store.register_device(&mac("AA:BB:CC:DD:EE:01")).unwrap();
        store.create_room("Office", &[device.mac_address.clone()]).unwrap();
        store.put_config(device.id, &office()).unwrap();

        ScoringEngine::new(&store)
            .score_at(
                device.id,
                Sample::new(24.0, 50.0, 700.0),
                datetime!(2024-03-01 09:00 UTC),
            )
            .unwrap();
        device.id
    };

    assert!(path.exists());

    let store = Store::open(&path).unwrap();
    assert_eq!(store.list_rooms().unwrap().len(), 1);
    assert_eq!(store.get_config(device_id).unwrap(), Some(office()));

    let readings = store
        .query_readings(&MeasurementQuery::new().device(device_id))
        .unwrap();
    assert_eq!(readings.len(), 1);
    assert!(readings[0].productivity.is_some());
}

#[test]
fn test_scoring_without_config_writes_nothing() {
    let dir = TempDir::new().unwrap();
    let store = Store::open(dir.path().join("climate.db")).unwrap();
    let device = store.register_device(&mac("AA:BB:CC:DD:EE:01")).unwrap();

    let err = ScoringEngine::new(&store)
        .score(device.id, Sample::new(22.0, 45.0, 500.0))
        .unwrap_err();

    assert!(matches!(err, CoreError::ConfigNotFound(id) if id == device.id));
    assert_eq!(store.count_readings(None).unwrap(), 0);
}

#[test]
fn test_scoring_unregistered_device_rolls_back() {
    let store = Store::open_in_memory().unwrap();
    let device = store.register_device(&mac("AA:BB:CC:DD:EE:01")).unwrap();
    store.put_config(device.id, &office()).unwrap();
    store.delete_device_by_mac(&device.mac_address).unwrap();

    // The config went with the device, so scoring reports it missing.
    let err = ScoringEngine::new(&store)
        .score(device.id, Sample::new(22.0, 45.0, 500.0))
        .unwrap_err();
    assert!(err.is_not_found());

    // Raw recording for a device that no longer exists is a store failure.
    let err = ScoringEngine::new(&store)
        .record(device.id, Sample::new(22.0, 45.0, 500.0))
        .unwrap_err();
    assert!(matches!(err, CoreError::StoreFailure(_)));
    assert_eq!(store.count_readings(None).unwrap(), 0);
}

#[test]
fn test_room_statistics_from_disk() {
    let dir = TempDir::new().unwrap();
    let store = Store::open(dir.path().join("climate.db")).unwrap();

    let office_a = store.register_device(&mac("AA:BB:CC:DD:EE:01")).unwrap();
    let office_b = store.register_device(&mac("AA:BB:CC:DD:EE:02")).unwrap();
    let lab = store.register_device(&mac("AA:BB:CC:DD:EE:03")).unwrap();
    let room = store
        .create_room(
            "Office",
            &[office_a.mac_address.clone(), office_b.mac_address.clone()],
        )
        .unwrap();

    let engine = ScoringEngine::new(&store);
    let start = datetime!(2024-03-01 08:00 UTC);
    for minutes in [0, 30, 60, 90] {
        let at = start + Duration::minutes(minutes);
        for device in [&office_a, &office_b, &lab] {
            engine
                .record_at(device.id, Sample::new(21.0, 40.0, 600.0), at)
                .unwrap();
        }
    }

    let window = TimeWindow::new(start, start + Duration::hours(2)).unwrap();
    let stats = StatisticsEngine::new(&store);

    let all = stats.statistics(&window, None).unwrap();
    assert_eq!(all.len(), 3);

    let in_room = stats.statistics(&window, Some(room.id)).unwrap();
    let ids: Vec<_> = in_room.iter().map(|s| s.device_id.clone()).collect();
    assert_eq!(ids, [office_a.id.to_string(), office_b.id.to_string()]);

    let time_stats = in_room[0].time_stats.as_ref().unwrap();
    assert_eq!(time_stats.duration_hours, Some(1.5));
    assert_eq!(time_stats.hourly_trends.temperature, vec![Some(21.0), Some(21.0)]);
    assert_eq!(time_stats.hourly_trends.productivity, vec![None, None]);
}
