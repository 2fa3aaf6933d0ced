//! Device command implementation.

use anyhow::{Context, Result};
use serde_json::json;

use roomclimate_store::Store;

use crate::cli::DeviceAction;
use crate::format::{FormatOptions, format_devices_text};

pub fn cmd_device(
    store: &Store,
    action: DeviceAction,
    opts: &FormatOptions,
    quiet: bool,
) -> Result<()> {
    match action {
        DeviceAction::Add { mac } => {
            let device = store
                .register_device(&mac)
                .with_context(|| format!("Failed to register {}", mac))?;
            if opts.is_json() {
                print!("{}", opts.as_json(&device)?);
            } else if !quiet {
                println!("Registered {} as {}", device.mac_address, device.id);
            }
        }
        DeviceAction::List => {
            let devices = store.list_devices().context("Failed to list devices")?;
            if opts.is_json() {
                print!("{}", opts.as_json(&devices)?);
            } else {
                print!("{}", format_devices_text(&devices));
            }
        }
        DeviceAction::Remove { mac } => {
            store
                .delete_device_by_mac(&mac)
                .with_context(|| format!("Failed to remove {}", mac))?;
            if opts.is_json() {
                print!("{}", opts.as_json(&json!({ "removed": mac }))?);
            } else if !quiet {
                println!("Removed {} with its configuration and readings", mac);
            }
        }
    }
    Ok(())
}
