//! Room command implementation.
//!
//! Rooms group devices so statistics can be filtered to one space.

use anyhow::{Context, Result};
use serde_json::json;

use roomclimate_store::Store;
use roomclimate_types::RoomId;

use crate::cli::RoomAction;
use crate::format::{
    FormatOptions, format_devices_text, format_room_created_text, format_rooms_text,
};

pub fn cmd_room(
    store: &Store,
    action: RoomAction,
    opts: &FormatOptions,
    quiet: bool,
) -> Result<()> {
    match action {
        RoomAction::Create { name, devices } => {
            let room = store
                .create_room(&name, &devices)
                .with_context(|| format!("Failed to create room '{}'", name))?;
            if opts.is_json() {
                print!("{}", opts.as_json(&room)?);
            } else if !quiet {
                print!("{}", format_room_created_text(&room, devices.len()));
            }
        }
        RoomAction::List => {
            let rooms = store.list_rooms().context("Failed to list rooms")?;
            if opts.is_json() {
                print!("{}", opts.as_json(&rooms)?);
            } else {
                print!("{}", format_rooms_text(&rooms));
            }
        }
        RoomAction::Delete { id } => {
            let id = RoomId(id);
            store
                .delete_room(id)
                .with_context(|| format!("Failed to delete {}", id))?;
            if opts.is_json() {
                print!("{}", opts.as_json(&json!({ "deleted_room": id }))?);
            } else if !quiet {
                println!("Deleted {}", id);
            }
        }
        RoomAction::Devices { id } => {
            let id = RoomId(id);
            let devices = store
                .room_devices(id)
                .with_context(|| format!("Failed to list devices in {}", id))?;
            if opts.is_json() {
                print!("{}", opts.as_json(&devices)?);
            } else {
                print!("{}", format_devices_text(&devices));
            }
        }
    }
    Ok(())
}
