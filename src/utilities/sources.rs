//! Source time functions and spatial injection footprints

use crate::domain::grid::{Grid1D, Grid2D};
use crate::error::{ensure_positive, Result, WaveError};
use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// Shape of the source time function
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WaveletKind {
    /// First derivative of a Gaussian, zero mean
    #[default]
    GaussianDerivative,
    /// Second derivative of a Gaussian (Ricker / Mexican hat)
    Ricker,
    /// Plain Gaussian bell
    Gaussian,
}

/// Band-limited pulse with dominant frequency `f0` centered at `t0`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SourceWavelet {
    kind: WaveletKind,
    f0: f64,
    t0: f64,
}

impl SourceWavelet {
    /// Default delay in dominant periods, far enough that the pulse starts
    /// from numerical zero at `t = 0`
    pub const DEFAULT_DELAY_PERIODS: f64 = 1.5;

    /// Derivative-of-Gaussian pulse with the default delay
    pub fn new(f0: f64) -> Result<Self> {
        ensure_positive("f0", f0)?;
        Ok(Self {
            kind: WaveletKind::GaussianDerivative,
            f0,
            t0: Self::DEFAULT_DELAY_PERIODS / f0,
        })
    }

    pub fn with_delay(mut self, t0: f64) -> Result<Self> {
        if !t0.is_finite() || t0 < 0.0 {
            return Err(WaveError::config("t0", format!("must be non-negative, got {t0}")));
        }
        self.t0 = t0;
        Ok(self)
    }

    pub fn with_kind(mut self, kind: WaveletKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn kind(&self) -> WaveletKind {
        self.kind
    }

    pub fn f0(&self) -> f64 {
        self.f0
    }

    pub fn t0(&self) -> f64 {
        self.t0
    }

    /// Amplitude at time `t`
    pub fn sample(&self, t: f64) -> f64 {
        let tau = t - self.t0;
        match self.kind {
            WaveletKind::GaussianDerivative => {
                // a = 4 / T0 with T0 = 1 / f0
                let a = 4.0 * self.f0;
                -2.0 * a * tau * (-(a * tau).powi(2)).exp()
            }
            WaveletKind::Ricker => {
                let arg = (PI * self.f0 * tau).powi(2);
                (1.0 - 2.0 * arg) * (-arg).exp()
            }
            WaveletKind::Gaussian => {
                let a = 4.0 * self.f0;
                (-(a * tau).powi(2)).exp()
            }
        }
    }

    /// One sample per time step, `t = it * dt` for `it = 0 .. nt`.
    ///
    /// The delay must fall inside the recorded window `[0, nt * dt)`.
    pub fn time_series(&self, nt: usize, dt: f64) -> Result<Array1<f64>> {
        if nt == 0 {
            return Err(WaveError::config("nt", "need at least one time step"));
        }
        ensure_positive("dt", dt)?;
        let duration = nt as f64 * dt;
        if self.t0 >= duration {
            return Err(WaveError::config(
                "t0",
                format!("pulse center {} s lies beyond the {} s run", self.t0, duration),
            ));
        }
        Ok(Array1::from_iter((0..nt).map(|it| self.sample(it as f64 * dt))))
    }
}

/// Derivative-of-Gaussian time series `-2 a tau exp(-(a tau)^2)`.
pub fn gaussian_derivative(nt: usize, dt: f64, f0: f64, t0: f64) -> Result<Array1<f64>> {
    SourceWavelet::new(f0)?.with_delay(t0)?.time_series(nt, dt)
}

fn gaussian_footprint(r2: f64, sigma: f64) -> f64 {
    (-r2 / (sigma * sigma)).exp()
}

fn peak(values: impl Iterator<Item = f64>) -> f64 {
    values.fold(0.0_f64, f64::max)
}

/// Gaussian footprint `exp(-(x - x0)^2 / sigma^2)` on a 1D grid, unit peak.
pub fn spatial_weight_1d(grid: &Grid1D, x0: f64, sigma: f64) -> Result<Array1<f64>> {
    ensure_positive("sigma", sigma)?;
    if !x0.is_finite() {
        return Err(WaveError::config("x0", "source position must be finite"));
    }
    let mut weight = grid
        .coordinates()
        .mapv(|x| gaussian_footprint((x - x0).powi(2), sigma));
    let max = peak(weight.iter().copied());
    if max > 0.0 {
        weight /= max;
    }
    Ok(weight)
}

/// Gaussian footprint `exp(-|r - r0|^2 / sigma^2)` on a 2D grid, unit peak.
///
/// With `sigma` around one grid spacing the footprint is effectively a
/// single cell; larger values give a smoother injection.
pub fn spatial_weight_2d(grid: &Grid2D, x0: f64, z0: f64, sigma: f64) -> Result<Array2<f64>> {
    ensure_positive("sigma", sigma)?;
    if !x0.is_finite() || !z0.is_finite() {
        return Err(WaveError::config("x0", "source position must be finite"));
    }
    let mut weight = Array2::from_shape_fn(grid.shape(), |(i, k)| {
        let r2 = (grid.x_coord(i) - x0).powi(2) + (grid.z_coord(k) - z0).powi(2);
        gaussian_footprint(r2, sigma)
    });
    let max = peak(weight.iter().copied());
    if max > 0.0 {
        weight /= max;
    }
    Ok(weight)
}
