//! Sound pressure level at the listener.
//!
//! Paths of one speaker add coherently (plain sum of gains); speakers add
//! incoherently (root of summed squares).

use std::collections::BTreeMap;

use glam::DVec3;

use crate::constants::DB_EPSILON;
use crate::speaker::Speaker;
use crate::tracer::AcousticPath;

/// Per-channel and overall SPL in dB.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListenerLevels {
    pub per_speaker_db: BTreeMap<String, f64>,
    pub overall_db: f64,
}

/// Pressure proxy → dB re `reference_pressure`. The ε inside the log keeps
/// silence finite and biases near-zero pressures slightly downwards.
pub fn pressure_to_db(pressure: f64, reference_pressure: f64) -> f64 {
    20.0 * (pressure / reference_pressure + DB_EPSILON).log10()
}

/// Level in dB → linear gain, with `db_ref` mapping to 1.0.
pub fn db_to_linear(db: f64, db_ref: f64) -> f64 {
    10f64.powf((db - db_ref) / 20.0)
}

/// Combine `paths` into per-speaker and overall levels.
///
/// Each path contributes amplitude × directivity(listener) × mean reflection
/// coefficient. Every speaker in `speakers` gets an entry, including ones
/// with no paths (which report the silence floor).
pub fn listener_levels(
    paths: &[AcousticPath<'_>],
    speakers: &[Speaker],
    listener: DVec3,
    reference_pressure: f64,
) -> ListenerLevels {
    let mut gains: BTreeMap<&str, f64> = speakers.iter().map(|s| (s.channel.as_str(), 0.0)).collect();

    for path in paths {
        let reflection = path
            .reflection_coefficients()
            .filter(|c| !c.is_empty())
            .map_or(1.0, |c| c.iter().sum::<f64>() / c.len() as f64);
        let gain = path.amplitude * path.speaker.directivity_gain(listener) * reflection;
        *gains.entry(path.speaker.channel.as_str()).or_insert(0.0) += gain;
    }

    let mut per_speaker_db = BTreeMap::new();
    let mut energy = 0.0;
    for speaker in speakers {
        let gain = gains.get(speaker.channel.as_str()).copied().unwrap_or(0.0);
        let pressure = gain * speaker.base_level;
        energy += pressure * pressure;
        per_speaker_db.insert(
            speaker.channel.clone(),
            pressure_to_db(pressure, reference_pressure),
        );
    }

    ListenerLevels {
        per_speaker_db,
        overall_db: pressure_to_db(energy.sqrt(), reference_pressure),
    }
}
