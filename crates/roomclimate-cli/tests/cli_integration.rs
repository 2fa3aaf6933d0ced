//! CLI Integration Tests
//!
//! These tests run the `roomclimate` binary against a throwaway database
//! and check its output formats and exit codes.
//!
//! ```
//! cargo test --package roomclimate-cli --test cli_integration
//! ```

use std::fs;
use std::path::PathBuf;
use std::process::{Command, Output};

use serde_json::Value;
use tempfile::TempDir;

const OFFICE: &str = r#"{
    "ideal_values": {"Temperature": 22, "Humidity": 45, "CO2": 500},
    "min_values":   {"Temperature": 15, "Humidity": 20, "CO2": 0},
    "max_values":   {"Temperature": 29, "Humidity": 80, "CO2": 1000},
    "monitoring_settings": {"Interval": 60}
}"#;

const MAC_A: &str = "AA:BB:CC:DD:EE:01";
const MAC_B: &str = "AA:BB:CC:DD:EE:02";

/// A temporary database plus an isolated config location.
struct Sandbox {
    dir: TempDir,
}

impl Sandbox {
    fn new() -> Self {
        Self {
            dir: TempDir::new().expect("Failed to create temp dir"),
        }
    }

    fn db(&self) -> PathBuf {
        self.dir.path().join("data").join("climate.db")
    }

    fn config(&self) -> PathBuf {
        self.dir.path().join("config.toml")
    }

    fn write_file(&self, name: &str, content: &str) -> PathBuf {
        let path = self.dir.path().join(name);
        fs::write(&path, content).expect("Failed to write file");
        path
    }

    /// Run roomclimate and return its output
    fn run(&self, args: &[&str]) -> Output {
        Command::new(env!("CARGO_BIN_EXE_roomclimate"))
            .arg("--db")
            .arg(self.db())
            .arg("--config")
            .arg(self.config())
            .args(args)
            .env_remove("ROOMCLIMATE_DB")
            .env_remove("ROOMCLIMATE_CONFIG")
            .env_remove("RUST_LOG")
            .output()
            .expect("Failed to run roomclimate binary")
    }

    /// Run with `--json`, assert success and parse stdout
    fn json(&self, args: &[&str]) -> Value {
        let mut full = vec!["--json"];
        full.extend_from_slice(args);
        let output = self.run(&full);
        assert!(
            output.status.success(),
            "{:?} failed: {}",
            args,
            String::from_utf8_lossy(&output.stderr)
        );
        serde_json::from_slice(&output.stdout).expect("stdout should be JSON")
    }

    /// Register a device and give it the office targets
    fn configured_device(&self, mac: &str) {
        let config = self.write_file("office.json", OFFICE);
        self.json(&["device", "add", mac]);
        self.json(&["config", "set", mac, "--file", config.to_str().unwrap()]);
    }
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

// =============================================================================
// Help and version
// =============================================================================

#[test]
fn test_help_lists_commands() {
    let sandbox = Sandbox::new();
    let output = sandbox.run(&["--help"]);
    assert!(output.status.success());

    let text = stdout(&output);
    for command in ["room", "device", "config", "predict", "record", "stats"] {
        assert!(text.contains(command), "help should list {}", command);
    }
}

#[test]
fn test_version() {
    let sandbox = Sandbox::new();
    let output = sandbox.run(&["--version"]);
    assert!(output.status.success());
    assert!(stdout(&output).contains("roomclimate"));
}

#[test]
fn test_invalid_mac_is_rejected() {
    let sandbox = Sandbox::new();
    let output = sandbox.run(&["device", "add", "not-a-mac"]);
    assert!(!output.status.success());
}

// =============================================================================
// Devices and rooms
// =============================================================================

#[test]
fn test_device_add_normalizes_mac() {
    let sandbox = Sandbox::new();
    let device = sandbox.json(&["device", "add", "aa-bb-cc-dd-ee-01"]);
    assert_eq!(device["mac_address"], MAC_A);
    assert!(device["room_id"].is_null());

    let devices = sandbox.json(&["device", "list"]);
    assert_eq!(devices.as_array().unwrap().len(), 1);
}

#[test]
fn test_duplicate_device_fails() {
    let sandbox = Sandbox::new();
    sandbox.json(&["device", "add", MAC_A]);

    let output = sandbox.run(&["device", "add", MAC_A]);
    assert!(!output.status.success());
    assert!(stderr(&output).contains(MAC_A));
}

#[test]
fn test_room_create_and_devices() {
    let sandbox = Sandbox::new();
    sandbox.json(&["device", "add", MAC_A]);
    sandbox.json(&["device", "add", MAC_B]);

    let room = sandbox.json(&["room", "create", "Office", "--device", MAC_A]);
    assert_eq!(room["name"], "Office");
    let room_id = room["id"].as_i64().unwrap().to_string();

    let devices = sandbox.json(&["room", "devices", &room_id]);
    let devices = devices.as_array().unwrap();
    assert_eq!(devices.len(), 1);
    assert_eq!(devices[0]["mac_address"], MAC_A);

    let output = sandbox.run(&["room", "create", "Office"]);
    assert!(!output.status.success(), "room names are unique");
}

#[test]
fn test_room_create_with_unknown_device_writes_nothing() {
    let sandbox = Sandbox::new();
    let output = sandbox.run(&["room", "create", "Lab", "--device", MAC_A]);
    assert!(!output.status.success());

    let rooms = sandbox.json(&["room", "list"]);
    assert!(rooms.as_array().unwrap().is_empty());
}

#[test]
fn test_room_delete_keeps_devices() {
    let sandbox = Sandbox::new();
    sandbox.json(&["device", "add", MAC_A]);
    let room = sandbox.json(&["room", "create", "Office", "-d", MAC_A]);
    let room_id = room["id"].as_i64().unwrap().to_string();

    sandbox.json(&["room", "delete", &room_id]);

    let devices = sandbox.json(&["device", "list"]);
    assert!(devices[0]["room_id"].is_null());
    assert!(!sandbox.run(&["room", "delete", &room_id]).status.success());
}

// =============================================================================
// Configuration
// =============================================================================

#[test]
fn test_config_set_and_show() {
    let sandbox = Sandbox::new();
    sandbox.configured_device(MAC_A);

    let config = sandbox.json(&["config", "show", MAC_A]);
    assert_eq!(config["ideal_values"]["Temperature"], 22.0);
    assert_eq!(config["productivity_norm"], 80.0);

    let text = stdout(&sandbox.run(&["config", "show", MAC_A]));
    assert!(text.contains("Targets for AA:BB:CC:DD:EE:01"));
}

#[test]
fn test_config_file_supplies_default_norm() {
    let sandbox = Sandbox::new();
    fs::write(sandbox.config(), "productivity_norm = 65.0\n").unwrap();
    sandbox.configured_device(MAC_A);

    let config = sandbox.json(&["config", "show", MAC_A]);
    assert_eq!(config["productivity_norm"], 65.0);
}

#[test]
fn test_config_set_rejects_unordered_ranges() {
    let sandbox = Sandbox::new();
    sandbox.json(&["device", "add", MAC_A]);
    let bad = OFFICE.replace(r#""Temperature": 29"#, r#""Temperature": 10"#);
    let path = sandbox.write_file("bad.json", &bad);

    let output = sandbox.run(&["config", "set", MAC_A, "--file", path.to_str().unwrap()]);
    assert!(!output.status.success());
    assert!(!sandbox.run(&["config", "show", MAC_A]).status.success());
}

#[test]
fn test_config_update() {
    let sandbox = Sandbox::new();
    sandbox.configured_device(MAC_A);

    let outcome = sandbox.json(&["config", "update", MAC_A, "--ideal-temperature", "21"]);
    assert_eq!(outcome["changed"], true);
    assert_eq!(outcome["config"]["ideal_values"]["Temperature"], 21.0);

    let outcome = sandbox.json(&["config", "update", MAC_A, "--ideal-temperature", "21"]);
    assert_eq!(outcome["changed"], false);

    let output = sandbox.run(&["config", "update", MAC_A]);
    assert!(!output.status.success());
    assert!(stderr(&output).contains("Nothing to update"));
}

#[test]
fn test_config_list() {
    let sandbox = Sandbox::new();
    assert_eq!(sandbox.json(&["config", "list"]), serde_json::json!({}));
    assert_eq!(
        stdout(&sandbox.run(&["config", "list"])),
        "No configurations.\n"
    );

    sandbox.configured_device(MAC_A);
    sandbox.json(&["device", "add", MAC_B]);

    let configs = sandbox.json(&["config", "list"]);
    let map = configs.as_object().expect("config list should be a map");
    assert_eq!(map.len(), 1);
    assert_eq!(configs["device_1"]["ideal_values"]["CO2"], 500.0);
    assert_eq!(configs["device_1"]["monitoring_settings"]["Interval"], 60);

    let text = stdout(&sandbox.run(&["config", "list"]));
    assert!(text.contains("device_1"));
    assert!(text.contains(MAC_A));
    assert!(!text.contains(MAC_B));
}

// =============================================================================
// Scoring and statistics
// =============================================================================

#[test]
fn test_predict_ideal_reading() {
    let sandbox = Sandbox::new();
    sandbox.configured_device(MAC_A);

    let result = sandbox.json(&[
        "predict", MAC_A, "--temperature", "22", "--humidity", "45", "--co2", "500",
    ]);
    assert_eq!(result["prediction"], 100);
    assert!(result["recommendations"].as_array().unwrap().is_empty());
}

#[test]
fn test_predict_poor_reading_recommends() {
    let sandbox = Sandbox::new();
    sandbox.configured_device(MAC_A);

    let result = sandbox.json(&[
        "predict", MAC_A, "--temperature", "27", "--humidity", "62", "--co2", "800",
    ]);
    assert!(result["prediction"].as_u64().unwrap() < 80);
    assert_eq!(result["recommendations"].as_array().unwrap().len(), 4);

    let text = stdout(&sandbox.run(&[
        "predict", MAC_A, "-t", "27", "-H", "62", "-c", "800",
    ]));
    assert!(text.starts_with("Productivity: "));
    assert!(text.contains("  - "));
}

#[test]
fn test_predict_without_config_fails() {
    let sandbox = Sandbox::new();
    sandbox.json(&["device", "add", MAC_A]);

    let output = sandbox.run(&[
        "predict", MAC_A, "--temperature", "22", "--humidity", "45", "--co2", "500",
    ]);
    assert!(!output.status.success());
    assert!(stderr(&output).contains("No target configuration"));
}

#[test]
fn test_predict_unregistered_device_fails() {
    let sandbox = Sandbox::new();
    let output = sandbox.run(&[
        "predict", MAC_A, "--temperature", "22", "--humidity", "45", "--co2", "500",
    ]);
    assert!(!output.status.success());
    assert!(stderr(&output).contains("not registered"));
}

#[test]
fn test_record_then_stats() {
    let sandbox = Sandbox::new();
    sandbox.configured_device(MAC_A);

    let reading = sandbox.json(&[
        "record", MAC_A, "--temperature", "21", "--humidity", "40", "--co2", "600",
    ]);
    assert!(reading["productivity"].is_null());
    sandbox.json(&[
        "predict", MAC_A, "--temperature", "23", "--humidity", "40", "--co2", "600",
    ]);

    let summaries = sandbox.json(&["stats", "--from", "2000-01-01", "--to", "2999-12-31"]);
    let summaries = summaries.as_array().unwrap();
    assert_eq!(summaries.len(), 1);

    let summary = &summaries[0];
    assert_eq!(summary["device_id"], "device_1");
    assert_eq!(summary["temperature"]["mean"], 22.0);
    assert_eq!(summary["temperature"]["min"], 21.0);
    // Only the scored reading carries a productivity value.
    assert!(summary["productivity"]["std"].is_null());
    assert!(summary["time_stats"]["start_time"].is_string());
}

#[test]
fn test_stats_empty_window() {
    let sandbox = Sandbox::new();
    sandbox.configured_device(MAC_A);
    sandbox.json(&[
        "record", MAC_A, "--temperature", "21", "--humidity", "40", "--co2", "600",
    ]);

    let summaries = sandbox.json(&["stats", "--from", "2001-01-01", "--to", "2001-01-02"]);
    assert!(summaries.as_array().unwrap().is_empty());

    let text = stdout(&sandbox.run(&["stats", "--from", "2001-01-01", "--to", "2001-01-02"]));
    assert_eq!(text, "No readings in the selected window.\n");
}

#[test]
fn test_stats_room_filter() {
    let sandbox = Sandbox::new();
    sandbox.configured_device(MAC_A);
    sandbox.configured_device(MAC_B);
    let room = sandbox.json(&["room", "create", "Office", "-d", MAC_B]);
    let room_id = room["id"].as_i64().unwrap().to_string();

    for mac in [MAC_A, MAC_B] {
        sandbox.json(&[
            "record", mac, "--temperature", "21", "--humidity", "40", "--co2", "600",
        ]);
    }

    let summaries = sandbox.json(&[
        "stats", "--from", "2000-01-01", "--to", "2999-12-31", "--room", &room_id,
    ]);
    let summaries = summaries.as_array().unwrap();
    assert_eq!(summaries.len(), 1);
    assert_eq!(summaries[0]["device_id"], "device_2");

    let output = sandbox.run(&["stats", "--from", "2000-01-01", "--to", "2999-12-31", "--room", "99"]);
    assert!(!output.status.success());
}

#[test]
fn test_stats_rejects_bad_dates() {
    let sandbox = Sandbox::new();
    let output = sandbox.run(&["stats", "--from", "yesterday", "--to", "2024-01-01"]);
    assert!(!output.status.success());
    assert!(stderr(&output).contains("Invalid date format"));

    let output = sandbox.run(&["stats", "--from", "2024-01-02", "--to", "2024-01-01"]);
    assert!(!output.status.success());
}

#[test]
fn test_device_remove_drops_readings() {
    let sandbox = Sandbox::new();
    sandbox.configured_device(MAC_A);
    sandbox.json(&[
        "record", MAC_A, "--temperature", "21", "--humidity", "40", "--co2", "600",
    ]);

    sandbox.json(&["device", "remove", MAC_A]);

    let summaries = sandbox.json(&["stats", "--from", "2000-01-01", "--to", "2999-12-31"]);
    assert!(summaries.as_array().unwrap().is_empty());
}
