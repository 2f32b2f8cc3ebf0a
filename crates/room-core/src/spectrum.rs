use num_complex::Complex64;
use std::f64::consts::PI;

use crate::material::interpolate_bands;
use crate::tracer::AcousticPath;

/// How a reflected path's per-band coefficients enter the transfer function.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ReflectionMode {
    /// One representative band (nearest 1 kHz) scales the path at every
    /// frequency bin.
    #[default]
    FixedBand,
    /// The coefficient is interpolated at each bin's own frequency.
    PerBin,
}

/// Discrete transfer function H(f): `fft_size` complex bins spanning
/// 0..sample_rate.
#[derive(Debug, Clone, PartialEq)]
pub struct TransferFunction {
    pub bins: Vec<Complex64>,
    pub sample_rate: f64,
}

impl TransferFunction {
    pub fn len(&self) -> usize {
        self.bins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bins.is_empty()
    }

    pub fn real(&self) -> Vec<f64> {
        self.bins.iter().map(|c| c.re).collect()
    }

    pub fn imag(&self) -> Vec<f64> {
        self.bins.iter().map(|c| c.im).collect()
    }

    /// Bin spacing in Hz.
    pub fn bin_width(&self) -> f64 {
        if self.bins.is_empty() {
            return 0.0;
        }
        self.sample_rate / self.bins.len() as f64
    }

    /// Centre frequency of every bin in Hz.
    pub fn frequencies(&self) -> Vec<f64> {
        let width = self.bin_width();
        (0..self.bins.len()).map(|k| k as f64 * width).collect()
    }

    /// 20·log10|H| per bin, floored at −300 dB.
    pub fn magnitude_db(&self) -> Vec<f64> {
        self.bins
            .iter()
            .map(|c| 20.0 * c.norm().max(1e-15).log10())
            .collect()
    }
}

/// Index of the band used by [`ReflectionMode::FixedBand`]: the 1 kHz band of
/// the canonical layouts, otherwise band 3. Materials with fewer than four
/// bands have no representative band and reflect without loss.
pub fn representative_band(band_count: usize) -> Option<usize> {
    match band_count {
        6 => Some(3),
        8 => Some(4),
        n if n > 3 => Some(3),
        _ => None,
    }
}

/// Build H(f) by summing every path as a delayed, attenuated impulse:
/// H(f_k) = Σ A·e^(−2πi·f_k·τ), f_k = k·sample_rate/fft_size.
///
/// A is the path amplitude times the speaker's directivity towards the path
/// end point, times the reflection coefficient for reflected paths.
pub fn synthesize(
    paths: &[AcousticPath<'_>],
    fft_size: usize,
    sample_rate: f64,
    mode: ReflectionMode,
) -> TransferFunction {
    let bin_width = sample_rate / fft_size as f64;

    // Frequency-independent part of each path's gain.
    let weighted: Vec<(&AcousticPath<'_>, f64)> = paths
        .iter()
        .map(|p| (p, p.amplitude * p.speaker.directivity_gain(p.end)))
        .collect();

    let bins: Vec<Complex64> = (0..fft_size)
        .map(|k| {
            let freq = k as f64 * bin_width;
            let omega = 2.0 * PI * freq;
            weighted
                .iter()
                .map(|&(path, gain)| {
                    let a = gain * reflection_factor(path, freq, mode);
                    Complex64::from_polar(a, -omega * path.delay)
                })
                .sum::<Complex64>()
        })
        .collect();

    TransferFunction { bins, sample_rate }
}

fn reflection_factor(path: &AcousticPath<'_>, freq: f64, mode: ReflectionMode) -> f64 {
    let Some(coeffs) = path.reflection_coefficients() else {
        return 1.0;
    };
    if coeffs.is_empty() {
        return 1.0;
    }
    match mode {
        ReflectionMode::FixedBand => representative_band(coeffs.len()).map_or(1.0, |b| coeffs[b]),
        ReflectionMode::PerBin => interpolate_bands(coeffs, freq),
    }
}
