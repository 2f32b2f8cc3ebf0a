//! Recursive radix-2 discrete Fourier transform.
//!
//! Each level allocates its even/odd halves; depth is log2(n). Fine for the
//! transform sizes used here. An in-place iterative butterfly would give the
//! same values.

use num_complex::Complex64;
use std::f64::consts::PI;

use crate::error::{Error, Result};

/// Forward DFT in place: X[k] = Σ x[n]·e^(−2πi·kn/N).
///
/// Lengths 0 and 1 are left unchanged; any other length must be a power of
/// two.
pub fn fft(buf: &mut [Complex64]) -> Result<()> {
    check_len(buf.len())?;
    fft_recursive(buf);
    Ok(())
}

/// Inverse DFT in place, scaled by 1/N, computed by conjugating around the
/// forward transform.
pub fn ifft(buf: &mut [Complex64]) -> Result<()> {
    check_len(buf.len())?;
    let n = buf.len();
    if n == 0 {
        return Ok(());
    }
    for x in buf.iter_mut() {
        *x = x.conj();
    }
    fft_recursive(buf);
    let scale = 1.0 / n as f64;
    for x in buf.iter_mut() {
        *x = x.conj() * scale;
    }
    Ok(())
}

fn check_len(n: usize) -> Result<()> {
    if n > 1 && !n.is_power_of_two() {
        return Err(Error::NotPowerOfTwo(n));
    }
    Ok(())
}

fn fft_recursive(buf: &mut [Complex64]) {
    let n = buf.len();
    if n <= 1 {
        return;
    }

    let half = n / 2;
    let mut even: Vec<Complex64> = buf.iter().step_by(2).copied().collect();
    let mut odd: Vec<Complex64> = buf.iter().skip(1).step_by(2).copied().collect();

    fft_recursive(&mut even);
    fft_recursive(&mut odd);

    for k in 0..half {
        let twiddle = Complex64::from_polar(1.0, -2.0 * PI * k as f64 / n as f64);
        let t = twiddle * odd[k];
        buf[k] = even[k] + t;
        buf[k + half] = even[k] - t;
    }
}
