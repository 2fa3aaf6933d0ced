//! Record command: store a raw sample without scoring it.

use anyhow::{Context, Result};

use roomclimate_core::ScoringEngine;
use roomclimate_store::Store;
use roomclimate_types::{MacAddress, Sample};

use crate::format::{FormatOptions, format_reading_text};
use crate::util::require_device;

pub fn cmd_record(
    store: &Store,
    mac: &MacAddress,
    sample: Sample,
    opts: &FormatOptions,
    quiet: bool,
) -> Result<()> {
    let device = require_device(store, mac)?;
    let reading = ScoringEngine::new(store)
        .record(device.id, sample)
        .with_context(|| format!("Failed to record reading for {}", mac))?;

    if opts.is_json() {
        print!("{}", opts.as_json(&reading)?);
    } else if !quiet {
        print!("{}", format_reading_text(&reading));
    }
    Ok(())
}
