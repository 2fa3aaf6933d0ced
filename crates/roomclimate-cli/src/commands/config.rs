//! Target configuration command implementation.

use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::Path;

use anyhow::{Context, Result, bail};
use serde_json::{Value, json};

use roomclimate_store::Store;
use roomclimate_types::DeviceTargetConfig;

use crate::cli::ConfigAction;
use crate::format::{FormatOptions, format_config_text, format_configs_text};
use crate::util::require_device;

/// Parse a target configuration document.
///
/// When the document omits `productivity_norm`, `default_norm` is used if set.
fn parse_target_config(content: &str, default_norm: Option<f64>) -> Result<DeviceTargetConfig> {
    let mut value: Value = serde_json::from_str(content).context("Invalid JSON")?;
    let Some(object) = value.as_object_mut() else {
        bail!("Configuration must be a JSON object");
    };
    if let Some(norm) = default_norm {
        object
            .entry("productivity_norm")
            .or_insert_with(|| json!(norm));
    }
    serde_json::from_value(value).context("Invalid target configuration")
}

fn read_target_config(path: &Path, default_norm: Option<f64>) -> Result<DeviceTargetConfig> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    parse_target_config(&content, default_norm)
        .with_context(|| format!("Failed to load {}", path.display()))
}

pub fn cmd_config(
    store: &Store,
    action: ConfigAction,
    default_norm: Option<f64>,
    opts: &FormatOptions,
    quiet: bool,
) -> Result<()> {
    match action {
        ConfigAction::Set { mac, file } => {
            let device = require_device(store, &mac)?;
            let config = read_target_config(&file, default_norm)?;
            store
                .put_config(device.id, &config)
                .with_context(|| format!("Failed to store configuration for {}", mac))?;

            if opts.is_json() {
                print!("{}", opts.as_json(&config)?);
            } else if !quiet {
                println!("Stored configuration for {}", mac);
            }
        }
        ConfigAction::Update { mac, fields } => {
            let update = fields.to_update();
            if update.is_empty() {
                bail!("Nothing to update. Pass at least one field, e.g. --ideal-temperature 21");
            }

            let device = require_device(store, &mac)?;
            let outcome = store
                .update_config(device.id, &update)
                .with_context(|| format!("Failed to update configuration for {}", mac))?;

            if opts.is_json() {
                let body = json!({ "changed": outcome.changed, "config": outcome.config });
                print!("{}", opts.as_json(&body)?);
            } else if !quiet {
                if outcome.changed {
                    println!("Updated configuration for {}", mac);
                } else {
                    println!("Configuration for {} already up to date", mac);
                }
            }
        }
        ConfigAction::Show { mac } => {
            let device = require_device(store, &mac)?;
            let Some(config) = store.get_config(device.id)? else {
                bail!(
                    "No configuration for {}. Set one with 'roomclimate config set {} --file <json>'",
                    mac,
                    mac
                );
            };

            if opts.is_json() {
                print!("{}", opts.as_json(&config)?);
            } else {
                print!("{}", format_config_text(&device, &config));
            }
        }
        ConfigAction::List => {
            let configs = store.list_configs().context("Failed to list configurations")?;

            if opts.is_json() {
                let body: BTreeMap<String, &DeviceTargetConfig> = configs
                    .iter()
                    .map(|stored| (stored.device_id.to_string(), &stored.config))
                    .collect();
                print!("{}", opts.as_json(&body)?);
            } else {
                let macs: HashMap<_, _> = store
                    .list_devices()?
                    .into_iter()
                    .map(|device| (device.id, device.mac_address))
                    .collect();
                print!("{}", format_configs_text(&configs, &macs));
            }
        }
    }
    Ok(())
}
