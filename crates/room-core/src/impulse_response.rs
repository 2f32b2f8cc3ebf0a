use num_complex::Complex64;
use realfft::RealFftPlanner;

use crate::error::{Error, Result};
use crate::fourier;
use crate::spectrum::TransferFunction;

/// Convert a full-length transfer function H(f) into an impulse response
/// h(t) of the same length by inverse FFT, keeping the real part.
///
/// The discarded imaginary part is only negligible when H is
/// conjugate-symmetric; that is the caller's responsibility.
pub fn generate(transfer_function: &TransferFunction) -> Result<Vec<f64>> {
    let mut buf = transfer_function.bins.clone();
    fourier::ifft(&mut buf)?;
    Ok(buf.into_iter().map(|c| c.re).collect())
}

/// Real impulse response from the lower half of H(f) (bins 0..=N/2) using an
/// inverse real FFT. The upper half is implied by conjugate symmetry, so the
/// result is real whatever the path model produced.
pub fn generate_hermitian(transfer_function: &TransferFunction) -> Result<Vec<f64>> {
    let fft_size = transfer_function.len();
    if fft_size < 2 || !fft_size.is_power_of_two() {
        return Err(Error::NotPowerOfTwo(fft_size));
    }

    let mut planner = RealFftPlanner::<f64>::new();
    let ifft = planner.plan_fft_inverse(fft_size);

    let mut spectrum: Vec<_> = transfer_function.bins[..=fft_size / 2]
        .iter()
        .map(|&c: &Complex64| realfft::num_complex::Complex { re: c.re, im: c.im })
        .collect();

    // realfft requires DC and Nyquist bins to be purely real.
    spectrum[0].im = 0.0;
    let last = spectrum.len() - 1;
    spectrum[last].im = 0.0;

    let mut output = vec![0.0f64; fft_size];
    ifft.process(&mut spectrum, &mut output)
        .map_err(|e| Error::Transform(e.to_string()))?;

    // Normalize by fft_size (realfft convention)
    let norm = 1.0 / fft_size as f64;
    for s in &mut output {
        *s *= norm;
    }

    Ok(output)
}

/// Schroeder energy decay curve in dB, 0 dB at t = 0.
///
/// Silent responses give an all-zero curve.
pub fn energy_decay_curve(impulse_response: &[f64]) -> Vec<f64> {
    let mut tail: Vec<f64> = impulse_response.iter().map(|h| h * h).collect();
    for i in (0..tail.len().saturating_sub(1)).rev() {
        tail[i] += tail[i + 1];
    }
    let total = tail.first().copied().unwrap_or(0.0);
    if total <= 0.0 {
        return vec![0.0; tail.len()];
    }
    tail.iter()
        .map(|&e| 10.0 * (e / total).max(1e-30).log10())
        .collect()
}
