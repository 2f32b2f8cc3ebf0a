/// Speed of sound used when no temperature is given (m/s).
pub const SPEED_OF_SOUND: f64 = 343.0;

/// Reference pressure for SPL, 20 µPa.
pub const REFERENCE_PRESSURE: f64 = 20e-6;

/// Smallest distance used for 1/r spreading, in metres.
pub const MIN_DISTANCE: f64 = 1e-3;

/// Added inside the dB log argument so silence maps to a finite level.
pub const DB_EPSILON: f64 = 1e-12;

/// Smallest room volume in m³.
pub const MIN_VOLUME: f64 = 1e-4;

/// Sabine constant in s/m.
pub const SABINE_CONSTANT: f64 = 0.161;

/// Reported T60 when the room has (almost) no absorption.
pub const T60_SENTINEL: f64 = 999.0;

/// Total absorption (m² sabins) at or below which T60 is the sentinel.
pub const MIN_TOTAL_ABSORPTION: f64 = 1e-6;

/// Octave band centres for 6-band materials (Hz).
pub const BANDS_6: [f64; 6] = [125.0, 250.0, 500.0, 1000.0, 2000.0, 4000.0];

/// Octave band centres for 8-band materials (Hz).
pub const BANDS_8: [f64; 8] = [63.0, 125.0, 250.0, 500.0, 1000.0, 2000.0, 4000.0, 8000.0];

/// Speed of sound in dry air (m/s) at `temperature_c` °C, ideal gas.
pub fn speed_of_sound_at(temperature_c: f64) -> f64 {
    331.3 * ((temperature_c + 273.15) / 273.15).sqrt()
}

/// Band centre frequencies for a material with `band_count` bands, if the
/// layout is one of the canonical octave layouts.
pub fn band_centres(band_count: usize) -> Option<&'static [f64]> {
    match band_count {
        6 => Some(&BANDS_6),
        8 => Some(&BANDS_8),
        _ => None,
    }
}
