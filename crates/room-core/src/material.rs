//! Frequency-dependent surface absorption.
//!
//! A material stores one absorption coefficient α per octave band. The
//! canonical layouts are 6 bands (125 Hz–4 kHz) and 8 bands (63 Hz–8 kHz);
//! other band counts are accepted but only get an approximate frequency
//! lookup.

use crate::constants::band_centres;

/// Acoustic material with per-band absorption coefficients.
#[derive(Debug, Clone, PartialEq)]
pub struct AcousticMaterial {
    /// Material name.
    pub name: String,
    absorption: Vec<f64>,
}

impl AcousticMaterial {
    /// Create a material. Every coefficient is clamped to [0, 1].
    pub fn new(name: impl Into<String>, absorption: impl Into<Vec<f64>>) -> Self {
        let mut absorption = absorption.into();
        for a in &mut absorption {
            *a = clamp01(*a);
        }
        Self {
            name: name.into(),
            absorption,
        }
    }

    /// Same absorption in every one of `band_count` bands.
    pub fn uniform(name: impl Into<String>, absorption: f64, band_count: usize) -> Self {
        Self::new(name, vec![absorption; band_count])
    }

    /// Absorption coefficients, one per band.
    pub fn bands(&self) -> &[f64] {
        &self.absorption
    }

    pub fn band_count(&self) -> usize {
        self.absorption.len()
    }

    /// Average absorption over all bands (0 with no bands).
    pub fn mean_absorption(&self) -> f64 {
        if self.absorption.is_empty() {
            return 0.0;
        }
        self.absorption.iter().sum::<f64>() / self.absorption.len() as f64
    }

    /// Absorption of band `band`, clamped into the valid band range.
    /// Returns 0 when the material has no bands.
    pub fn absorption_at_band(&self, band: usize) -> f64 {
        match self.absorption.len() {
            0 => 0.0,
            n => self.absorption[band.min(n - 1)],
        }
    }

    /// Absorption at an arbitrary frequency, see [`interpolate_bands`].
    pub fn absorption_at_frequency(&self, freq_hz: f64) -> f64 {
        interpolate_bands(&self.absorption, freq_hz)
    }

    /// Pressure reflection coefficient R = √(1 − α) of band `band`.
    pub fn reflection_at_band(&self, band: usize) -> f64 {
        reflection_from_absorption(self.absorption_at_band(band))
    }

    /// Pressure reflection coefficient at an arbitrary frequency.
    pub fn reflection_at_frequency(&self, freq_hz: f64) -> f64 {
        reflection_from_absorption(self.absorption_at_frequency(freq_hz))
    }

    /// Reflection coefficient of every band, in band order.
    pub fn reflection_bands(&self) -> Vec<f64> {
        (0..self.band_count())
            .map(|i| self.reflection_at_band(i))
            .collect()
    }

    /// Preset: concrete (very reflective).
    pub fn concrete() -> Self {
        Self::new("concrete", [0.01, 0.01, 0.02, 0.02, 0.02, 0.03])
    }

    /// Preset: plaster on brick.
    pub fn plaster() -> Self {
        Self::new("plaster", [0.01, 0.02, 0.02, 0.03, 0.04, 0.05])
    }

    /// Preset: wood panel.
    pub fn wood() -> Self {
        Self::new("wood", [0.10, 0.08, 0.08, 0.08, 0.08, 0.08])
    }

    /// Preset: glass window.
    pub fn glass() -> Self {
        Self::new("glass", [0.18, 0.06, 0.04, 0.03, 0.02, 0.02])
    }

    /// Preset: heavy carpet.
    pub fn carpet() -> Self {
        Self::new("carpet", [0.02, 0.06, 0.15, 0.40, 0.60, 0.60])
    }

    /// Preset: acoustic foam.
    pub fn acoustic_foam() -> Self {
        Self::new("acoustic_foam", [0.08, 0.25, 0.65, 0.90, 0.95, 0.95])
    }

    /// Preset: heavy curtain.
    pub fn curtain() -> Self {
        Self::new("curtain", [0.07, 0.30, 0.50, 0.70, 0.70, 0.65])
    }

    /// Preset: audience (occupied seats).
    pub fn audience() -> Self {
        Self::new("audience", [0.25, 0.35, 0.42, 0.46, 0.50, 0.50])
    }
}

impl Default for AcousticMaterial {
    fn default() -> Self {
        Self::uniform("default", 0.1, 6)
    }
}

/// R = √(clamp01(1 − α)).
pub fn reflection_from_absorption(absorption: f64) -> f64 {
    clamp01(1.0 - absorption).sqrt()
}

/// Look up a per-band value at `freq_hz`.
///
/// For the canonical 6- and 8-band layouts the value is linearly
/// interpolated (in linear frequency) between the two bracketing band
/// centres, and clamped to the end bands outside the covered range.
///
/// Any other band count falls back to the nearest index
/// `round((n − 1) · ln f / ln 2000)`, halves to even. That estimate is rough
/// and meaningless for `f <= 1`.
///
/// A non-finite frequency maps to band 0 for every layout.
pub fn interpolate_bands(values: &[f64], freq_hz: f64) -> f64 {
    let n = values.len();
    if n == 0 {
        return 0.0;
    }
    if !freq_hz.is_finite() {
        return values[0];
    }

    let Some(centres) = band_centres(n) else {
        let estimate = (n - 1) as f64 * (freq_hz.ln() / 2000f64.ln());
        return values[nearest_band(estimate, n)];
    };

    if freq_hz <= centres[0] {
        return values[0];
    }
    if freq_hz >= centres[n - 1] {
        return values[n - 1];
    }

    for i in 0..n - 1 {
        let (f0, f1) = (centres[i], centres[i + 1]);
        if freq_hz >= f0 && freq_hz <= f1 {
            let t = (freq_hz - f0) / (f1 - f0);
            return values[i] + (values[i + 1] - values[i]) * t;
        }
    }

    values[n - 1]
}

/// Round a fractional band index to the nearest band, halves to even.
fn nearest_band(estimate: f64, n: usize) -> usize {
    // `as` saturates; NaN (from f <= 0) becomes 0.
    (estimate.round_ties_even() as i64).clamp(0, n as i64 - 1) as usize
}

fn clamp01(x: f64) -> f64 {
    x.clamp(0.0, 1.0)
}
