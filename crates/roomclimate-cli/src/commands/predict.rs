//! Predict command: score one sample and store it.

use anyhow::{Context, Result};

use roomclimate_core::ScoringEngine;
use roomclimate_store::Store;
use roomclimate_types::{MacAddress, Sample};

use crate::format::{FormatOptions, format_score_text};
use crate::util::require_device;

pub fn cmd_predict(
    store: &Store,
    mac: &MacAddress,
    sample: Sample,
    opts: &FormatOptions,
) -> Result<()> {
    let device = require_device(store, mac)?;
    let result = ScoringEngine::new(store)
        .score(device.id, sample)
        .with_context(|| format!("Failed to score reading for {}", mac))?;

    if opts.is_json() {
        print!("{}", opts.as_json(&result)?);
    } else {
        print!("{}", format_score_text(&result));
    }
    Ok(())
}
