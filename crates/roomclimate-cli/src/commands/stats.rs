//! Stats command: per-device statistics over a time window.

use anyhow::{Context, Result};

use roomclimate_core::StatisticsEngine;
use roomclimate_store::Store;
use roomclimate_types::RoomId;

use crate::format::{FormatOptions, format_statistics_text};
use crate::util::parse_window;

pub fn cmd_stats(
    store: &Store,
    from: &str,
    to: &str,
    room: Option<i64>,
    opts: &FormatOptions,
) -> Result<()> {
    let window = parse_window(from, to)?;
    let room = room.map(RoomId);

    if let Some(room) = room
        && store.get_room(room)?.is_none()
    {
        anyhow::bail!("{} does not exist", room);
    }

    let summaries = StatisticsEngine::new(store)
        .statistics(&window, room)
        .context("Failed to compute statistics")?;

    if opts.is_json() {
        print!("{}", opts.as_json(&summaries)?);
    } else {
        print!("{}", format_statistics_text(&summaries));
    }
    Ok(())
}
