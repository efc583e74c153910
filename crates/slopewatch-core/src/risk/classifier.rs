//! Weighted landslide-risk scoring.
//!
//! Each factor is an ordered band table evaluated top to bottom; the first
//! matching band contributes its weight and the rest of that table is
//! skipped. Factors are scored independently from the parsed readings and
//! summed into a fractional score, which is then mapped onto a tier.

use super::{RiskLabel, RiskLevel};
use crate::observation::Observation;

/// `value >= min` contributes `weight`.
struct Band {
    min: f64,
    weight: f64,
}

/// `value > above || value < below` contributes `weight`.
struct ExtremeBand {
    above: f64,
    below: f64,
    weight: f64,
}

const HUMIDITY_BANDS: [Band; 3] = [
    Band { min: 70.0, weight: 3.0 },
    Band { min: 50.0, weight: 2.0 },
    Band { min: 30.0, weight: 1.0 },
];

const INCLINATION_BANDS: [Band; 3] = [
    Band { min: 25.0, weight: 3.0 },
    Band { min: 15.0, weight: 2.0 },
    Band { min: 5.0, weight: 1.0 },
];

/// Stricter band first.
const TEMPERATURE_BANDS: [ExtremeBand; 2] = [
    ExtremeBand { above: 35.0, below: 5.0, weight: 1.0 },
    ExtremeBand { above: 28.0, below: 10.0, weight: 0.5 },
];

const RAIN_WEIGHT: f64 = 4.0;
/// Extra weight for rain on soil that is already at least this humid.
const SATURATED_RAIN_BONUS: f64 = 2.0;
const SATURATION_HUMIDITY: f64 = 50.0;

/// Score floors, highest first. Below the last floor the level is `Low`.
const TIERS: [(f64, RiskLabel); 3] = [
    (9.0, RiskLabel::Critical),
    (6.0, RiskLabel::Elevated),
    (3.0, RiskLabel::Moderate),
];

fn first_band(bands: &[Band], value: f64) -> f64 {
    bands
        .iter()
        .find(|b| value >= b.min)
        .map_or(0.0, |b| b.weight)
}

pub(crate) fn humidity_score(humidity: f64) -> f64 {
    first_band(&HUMIDITY_BANDS, humidity)
}

pub(crate) fn inclination_score(inclination: f64) -> f64 {
    first_band(&INCLINATION_BANDS, inclination)
}

pub(crate) fn rain_score(rained_last_week: bool, humidity: f64) -> f64 {
    if !rained_last_week {
        return 0.0;
    }
    if humidity >= SATURATION_HUMIDITY {
        RAIN_WEIGHT + SATURATED_RAIN_BONUS
    } else {
        RAIN_WEIGHT
    }
}

pub(crate) fn temperature_score(temperature: f64) -> f64 {
    TEMPERATURE_BANDS
        .iter()
        .find(|b| temperature > b.above || temperature < b.below)
        .map_or(0.0, |b| b.weight)
}

/// Map an accumulated score onto a tier. Floors are inclusive.
pub(crate) fn level_for_score(score: f64) -> RiskLevel {
    let label = TIERS
        .iter()
        .find(|(floor, _)| score >= *floor)
        .map_or(RiskLabel::Low, |&(_, label)| label);
    RiskLevel::for_label(label)
}

/// Classify one observation.
///
/// Returns `InvalidData` if humidity, inclination or temperature does not
/// parse as a number. Location and timestamp are not inspected.
pub fn classify(observation: &Observation) -> RiskLevel {
    let (Some(humidity), Some(inclination), Some(temperature)) = (
        observation.soil_humidity_percent().value(),
        observation.inclination_degrees().value(),
        observation.ambient_temperature_celsius().value(),
    ) else {
        return RiskLevel::for_label(RiskLabel::InvalidData);
    };

    let score = humidity_score(humidity)
        + inclination_score(inclination)
        + rain_score(observation.rained_last_week(), humidity)
        + temperature_score(temperature);

    level_for_score(score)
}
