//! Productivity scoring from a sample and a device's target envelope.
//!
//! Each parameter gets a sub-score in `[0, 1]`:
//!
//! | Parameter | Sub-score |
//! |-----------|-----------|
//! | Temperature | `exp(-(t - ideal)² / 50)` |
//! | Humidity | `exp(-(h - ideal)² / 100)` |
//! | CO2 | `1` up to ideal, then `1 - ln(1 + (c - ideal) / (max - ideal)) / ln 3` |
//!
//! A raw value outside its `[min, max]` range forces that sub-score to 0.
//! The overall score is the weighted geometric mean (temperature 5,
//! humidity 3, CO2 1) scaled to 0..=100 and rounded half to even, so any
//! zero sub-score drives the whole score to 0.
//!
//! # Example
//!
//! ```
//! use roomclimate_core::scoring;
//! use roomclimate_types::{DeviceTargetConfig, MonitoringSettings, Sample, SensorValues};
//!
//! let config = DeviceTargetConfig {
//!     ideal_values: SensorValues::new(22.0, 45.0, 500.0),
//!     min_values: SensorValues::new(15.0, 20.0, 0.0),
//!     max_values: SensorValues::new(29.0, 80.0, 1000.0),
//!     monitoring_settings: MonitoringSettings::default(),
//!     productivity_norm: 80.0,
//! };
//!
//! let result = scoring::evaluate(&Sample::new(22.0, 45.0, 500.0), &config);
//! assert_eq!(result.score, 100);
//! assert!(result.recommendations.is_empty());
//!
//! let result = scoring::evaluate(&Sample::new(35.0, 45.0, 500.0), &config);
//! assert_eq!(result.score, 0);
//! assert!(result.recommendations[1].starts_with("Lower the temperature"));
//! ```

use roomclimate_types::{DeviceTargetConfig, Parameter, Sample, ScoreResult};

/// Weight of the temperature sub-score in the geometric mean.
pub const TEMPERATURE_WEIGHT: i32 = 5;
/// Weight of the humidity sub-score in the geometric mean.
pub const HUMIDITY_WEIGHT: i32 = 3;
/// Weight of the CO2 sub-score in the geometric mean.
pub const CO2_WEIGHT: i32 = 1;

/// Gaussian spread of the temperature sub-score (°C²).
const TEMPERATURE_SPREAD: f64 = 50.0;
/// Gaussian spread of the humidity sub-score (%²).
const HUMIDITY_SPREAD: f64 = 100.0;

/// Temperature deviation (°C) beyond which a recommendation is given.
pub const TEMPERATURE_TOLERANCE: f64 = 2.0;
/// Humidity deviation (%) beyond which a recommendation is given.
pub const HUMIDITY_TOLERANCE: f64 = 10.0;
/// CO2 excess over ideal (ppm) beyond which a recommendation is given.
pub const CO2_TOLERANCE: f64 = 100.0;

/// Per-parameter sub-scores in `[0, 1]`, after the range gate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SubScores {
    pub temperature: f64,
    pub humidity: f64,
    pub co2: f64,
}

impl SubScores {
    /// Weighted geometric mean scaled to 0..=100, rounded half to even.
    pub fn combine(&self) -> u8 {
        let weight_sum = f64::from(TEMPERATURE_WEIGHT + HUMIDITY_WEIGHT + CO2_WEIGHT);
        let product = self.temperature.powi(TEMPERATURE_WEIGHT)
            * self.humidity.powi(HUMIDITY_WEIGHT)
            * self.co2.powi(CO2_WEIGHT);
        let score = (product.powf(1.0 / weight_sum) * 100.0).round_ties_even();

        if score.is_finite() {
            score.clamp(0.0, 100.0) as u8
        } else {
            0
        }
    }
}

/// Temperature sub-score before gating.
pub fn temperature_score(temperature: f64, ideal: f64) -> f64 {
    (-(temperature - ideal).powi(2) / TEMPERATURE_SPREAD).exp()
}

/// Humidity sub-score before gating.
pub fn humidity_score(humidity: f64, ideal: f64) -> f64 {
    (-(humidity - ideal).powi(2) / HUMIDITY_SPREAD).exp()
}

/// CO2 sub-score before gating.
///
/// Calibrated so that `co2 == max` scores 0. A zero or negative span
/// between ideal and max scores 0 for anything above ideal instead of
/// dividing by zero.
pub fn co2_score(co2: f64, ideal: f64, max: f64) -> f64 {
    if co2 <= ideal {
        return 1.0;
    }

    let span = max - ideal;
    if span <= 0.0 {
        return 0.0;
    }

    let score = 1.0 - (1.0 + (co2 - ideal) / span).ln() / 3f64.ln();
    score.clamp(0.0, 1.0)
}

fn within_range(config: &DeviceTargetConfig, sample: &Sample, parameter: Parameter) -> bool {
    let value = sample.get(parameter);
    config.min_values.get(parameter) <= value && value <= config.max_values.get(parameter)
}

/// Compute the gated sub-scores for a sample.
pub fn sub_scores(sample: &Sample, config: &DeviceTargetConfig) -> SubScores {
    let ideal = &config.ideal_values;
    let gate = |parameter: Parameter, score: f64| {
        if within_range(config, sample, parameter) {
            score
        } else {
            0.0
        }
    };

    SubScores {
        temperature: gate(
            Parameter::Temperature,
            temperature_score(sample.temperature, ideal.temperature),
        ),
        humidity: gate(
            Parameter::Humidity,
            humidity_score(sample.humidity, ideal.humidity),
        ),
        co2: gate(
            Parameter::Co2,
            co2_score(sample.co2, ideal.co2, config.max_values.co2),
        ),
    }
}

/// Overall productivity score in 0..=100.
pub fn productivity_score(sample: &Sample, config: &DeviceTargetConfig) -> u8 {
    sub_scores(sample, config).combine()
}

/// Direction in which a parameter should move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Adjustment {
    Raise,
    Lower,
}

impl Adjustment {
    fn toward(value: f64, ideal: f64) -> Self {
        if value < ideal {
            Adjustment::Raise
        } else {
            Adjustment::Lower
        }
    }

    fn verb(&self) -> &'static str {
        match self {
            Adjustment::Raise => "Raise",
            Adjustment::Lower => "Lower",
        }
    }
}

/// Recommendations for a sample that scored `score`.
///
/// Empty when `score` meets the config's productivity norm. Otherwise the
/// order is fixed: warning, temperature, humidity, CO2.
pub fn recommendations(sample: &Sample, config: &DeviceTargetConfig, score: u8) -> Vec<String> {
    if f64::from(score) >= config.productivity_norm {
        return Vec::new();
    }

    let ideal = &config.ideal_values;
    let mut out = vec![format!(
        "Productivity may be too low: around {}%.",
        score
    )];

    if (sample.temperature - ideal.temperature).abs() > TEMPERATURE_TOLERANCE {
        let direction = Adjustment::toward(sample.temperature, ideal.temperature);
        out.push(format!(
            "{} the temperature closer to {}°C.",
            direction.verb(),
            ideal.temperature
        ));
    }

    if (sample.humidity - ideal.humidity).abs() > HUMIDITY_TOLERANCE {
        let direction = Adjustment::toward(sample.humidity, ideal.humidity);
        out.push(format!(
            "{} the humidity closer to {}%.",
            direction.verb(),
            ideal.humidity
        ));
    }

    if sample.co2 > ideal.co2 + CO2_TOLERANCE {
        out.push(format!(
            "Reduce the CO2 level closer to {} ppm.",
            ideal.co2
        ));
    }

    out
}

/// Score a sample and build its recommendations.
pub fn evaluate(sample: &Sample, config: &DeviceTargetConfig) -> ScoreResult {
    let score = productivity_score(sample, config);
    ScoreResult {
        score,
        recommendations: recommendations(sample, config, score),
    }
}
