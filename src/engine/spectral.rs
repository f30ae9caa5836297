//! Spectral (Fourier) differentiation on periodic grids
//!
//! The derivative of order `n` is computed as `IFFT((i k)^n * FFT(f))`. For
//! band-limited periodic signals this is exact up to the Nyquist wavenumber,
//! which is what makes it a useful reference next to finite differences.

use crate::engine::backend::{default_backend, ComputeBackend};
use crate::error::{ensure_positive, Result, WaveError};
use ndarray::{Array1, Array2, ArrayView1, Axis, Zip};
use num_complex::Complex;
use once_cell::sync::Lazy;
use std::f64::consts::PI;
use std::sync::Arc;

// Global backend instance (thread-safe, initialized once)
static BACKEND: Lazy<Arc<Box<dyn ComputeBackend>>> = Lazy::new(|| Arc::new(default_backend()));

/// Relative size of the imaginary residue above which the inverse transform
/// is considered suspicious
const IMAGINARY_RESIDUE_TOLERANCE: f64 = 1e-8;

/// Wavenumbers in FFT order for `n` samples at spacing `dx`.
///
/// `k_max = pi/dx` and `dk = 2 pi / (n dx)`. The first half holds
/// `0, dk, 2 dk, ...`; the second half is the negative branch
/// `-k_max, ..., -dk`. For even `n` the entry at `n/2` is `-k_max`.
pub fn wavenumbers(n: usize, dx: f64) -> Array1<f64> {
    if n == 0 {
        return Array1::zeros(0);
    }
    let dk = 2.0 * PI / (n as f64 * dx);
    let split = (n + 1) / 2;
    Array1::from_iter((0..n).map(|i| {
        if i < split {
            i as f64 * dk
        } else {
            (i as f64 - n as f64) * dk
        }
    }))
}

/// Precomputed `(i k)^order` multiplier for one axis.
#[derive(Debug, Clone, PartialEq)]
pub struct SpectralOperator {
    order: usize,
    spacing: f64,
    wavenumbers: Array1<f64>,
    multiplier: Array1<Complex<f64>>,
}

impl SpectralOperator {
    /// Build the operator for signals of `len` samples at `spacing`
    pub fn new(len: usize, spacing: f64, order: usize) -> Result<Self> {
        if len == 0 {
            return Err(WaveError::config("len", "spectral operator needs at least one sample"));
        }
        ensure_positive("spacing", spacing)?;

        let wavenumbers = wavenumbers(len, spacing);
        let nyquist = if len % 2 == 0 { Some(len / 2) } else { None };
        let multiplier = Array1::from_iter(wavenumbers.iter().enumerate().map(|(i, &k)| {
            // The Nyquist mode has no sign for odd derivatives of a real signal
            if order % 2 == 1 && Some(i) == nyquist {
                Complex::new(0.0, 0.0)
            } else {
                Complex::new(0.0, k).powu(order as u32)
            }
        }));

        Ok(Self {
            order,
            spacing,
            wavenumbers,
            multiplier,
        })
    }

    pub fn order(&self) -> usize {
        self.order
    }

    pub fn len(&self) -> usize {
        self.wavenumbers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.wavenumbers.is_empty()
    }

    pub fn spacing(&self) -> f64 {
        self.spacing
    }

    pub fn wavenumbers(&self) -> &Array1<f64> {
        &self.wavenumbers
    }

    /// Differentiate a single periodic signal
    pub fn apply(&self, signal: ArrayView1<'_, f64>) -> Result<Array1<f64>> {
        if signal.len() != self.len() {
            return Err(WaveError::config(
                "signal",
                format!(
                    "length {} does not match operator length {}",
                    signal.len(),
                    self.len()
                ),
            ));
        }

        let mut spectrum: Vec<Complex<f64>> =
            signal.iter().map(|&v| Complex::new(v, 0.0)).collect();
        BACKEND.fft_1d(&mut spectrum);
        for (val, m) in spectrum.iter_mut().zip(self.multiplier.iter()) {
            *val *= *m;
        }
        BACKEND.ifft_1d(&mut spectrum);

        check_residue(spectrum.iter(), signal.iter());
        Ok(spectrum.iter().map(|c| c.re).collect())
    }

    /// Differentiate every lane of `field` along `axis`, overwriting `out`.
    ///
    /// Lanes are treated as periodic, so every entry of `out` is written.
    pub fn apply_along(&self, field: &Array2<f64>, axis: Axis, out: &mut Array2<f64>) {
        debug_assert_eq!(field.len_of(axis), self.len());
        debug_assert_eq!(field.dim(), out.dim());

        let mut spectrum = field.mapv(|v| Complex::new(v, 0.0));
        BACKEND.fft_lanes(&mut spectrum, axis);
        for mut lane in spectrum.lanes_mut(axis) {
            Zip::from(&mut lane)
                .and(&self.multiplier)
                .for_each(|val, &m| *val *= m);
        }
        BACKEND.ifft_lanes(&mut spectrum, axis);

        check_residue(spectrum.iter(), field.iter());
        Zip::from(out).and(&spectrum).for_each(|o, c| *o = c.re);
    }
}

/// Log a large imaginary part left after the inverse transform.
fn check_residue<'a, 'b>(
    result: impl Iterator<Item = &'a Complex<f64>>,
    input: impl Iterator<Item = &'b f64>,
) {
    let residue = result.fold(0.0_f64, |acc, c| acc.max(c.im.abs()));
    let scale = input.fold(0.0_f64, |acc, v| acc.max(v.abs()));
    if residue > IMAGINARY_RESIDUE_TOLERANCE * scale.max(f64::MIN_POSITIVE) {
        log::debug!(
            "spectral derivative left an imaginary residue of {:e} (signal peak {:e})",
            residue,
            scale
        );
    }
}

/// `order`-th derivative of a periodic signal sampled at spacing `dx`
pub fn derivative(signal: ArrayView1<'_, f64>, dx: f64, order: usize) -> Result<Array1<f64>> {
    SpectralOperator::new(signal.len(), dx, order)?.apply(signal)
}

/// First derivative of a periodic signal
pub fn first_derivative(signal: ArrayView1<'_, f64>, dx: f64) -> Result<Array1<f64>> {
    derivative(signal, dx, 1)
}

/// Second derivative of a periodic signal
pub fn second_derivative(signal: ArrayView1<'_, f64>, dx: f64) -> Result<Array1<f64>> {
    derivative(signal, dx, 2)
}
