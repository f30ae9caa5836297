//! 2D constant-density acoustic solver with a pluggable Laplacian
//!
//! Second-order leapfrog in time:
//!
//! ```text
//! p_next = 2 p - p_prev + dt^2 c^2 (d2p/dx2 + d2p/dz2) + dt^2 w src(t)
//! ```
//!
//! The Laplacian is one pass along x plus one pass along z with the same
//! [`DerivativeMethod`]. A finite-difference Laplacian is zero within
//! `half_width` points of every edge; the spectral one treats the grid as
//! periodic. The time update runs over the whole grid either way.

use crate::config::Acoustic2DConfig;
use crate::domain::grid::Grid2D;
use crate::domain::receivers::Receivers;
use crate::engine::field::{max_abs, Field2D, TimeLevels};
use crate::engine::operator::{DerivativeMethod, DerivativeOperator};
use crate::error::{ensure_positive, Result, WaveError};
use crate::utilities::sources::spatial_weight_2d;
use crate::utilities::stability::courant_number;
use ndarray::{Array1, Array2, ArrayView2, Axis, Ix2, Zip};

/// Leapfrog extrapolator for the 2D acoustic wave equation
#[derive(Debug, Clone)]
pub struct Acoustic2D {
    grid: Grid2D,
    method: DerivativeMethod,
    x_operator: DerivativeOperator,
    z_operator: DerivativeOperator,
    velocity: Field2D,
    dt: f64,
    source_weight: Field2D,
    source: Array1<f64>,
    pressure: TimeLevels<Ix2>,
    next: Field2D,
    laplacian: Field2D,
    scratch: Field2D,
    receivers: Receivers<(usize, usize)>,
    step: usize,
}

impl Acoustic2D {
    /// Build an engine that runs `source.len()` steps.
    ///
    /// `velocity` and `source_weight` are `[nx, nz]`.
    pub fn new(
        grid: Grid2D,
        velocity: Array2<f64>,
        method: DerivativeMethod,
        dt: f64,
        source_weight: Array2<f64>,
        source: Array1<f64>,
    ) -> Result<Self> {
        let shape = grid.shape();
        if velocity.dim() != shape {
            return Err(WaveError::config(
                "velocity",
                format!("shape {:?} does not match grid {:?}", velocity.dim(), shape),
            ));
        }
        if source_weight.dim() != shape {
            return Err(WaveError::config(
                "source_weight",
                format!(
                    "shape {:?} does not match grid {:?}",
                    source_weight.dim(),
                    shape
                ),
            ));
        }
        if velocity.iter().any(|&c| !(c.is_finite() && c > 0.0)) {
            return Err(WaveError::config("velocity", "must be finite and positive everywhere"));
        }
        ensure_positive("dt", dt)?;
        if source.is_empty() {
            return Err(WaveError::config("nt", "need at least one time step"));
        }

        let c_max = max_abs(&velocity);
        let courant = courant_number(dt, grid.min_spacing(), c_max);
        if courant > 1.0 {
            return Err(WaveError::CflViolation {
                dt,
                dt_max: grid.min_spacing() / c_max,
            });
        }

        let x_operator = DerivativeOperator::new(method, grid.nx(), grid.dx(), 2)?;
        let z_operator = DerivativeOperator::new(method, grid.nz(), grid.dz(), 2)?;

        log::info!(
            "acoustic 2D ({}): {}x{} dx={} dz={} dt={:e} nt={} courant={:.3}",
            method.name(),
            grid.nx(),
            grid.nz(),
            grid.dx(),
            grid.dz(),
            dt,
            source.len(),
            courant
        );

        let nt = source.len();
        Ok(Self {
            grid,
            method,
            x_operator,
            z_operator,
            velocity,
            dt,
            source_weight,
            source,
            pressure: TimeLevels::zeros(shape),
            next: Field2D::zeros(shape),
            laplacian: Field2D::zeros(shape),
            scratch: Field2D::zeros(shape),
            receivers: Receivers::new(Vec::new(), nt),
            step: 0,
        })
    }

    /// Homogeneous medium with a Gaussian source footprint
    pub fn from_config(config: &Acoustic2DConfig, method: DerivativeMethod) -> Result<Self> {
        config.validate()?;
        let grid = config.grid()?;
        let velocity = Array2::from_elem(grid.shape(), config.velocity);
        let dt = config.dt()?;
        let weight = spatial_weight_2d(
            &grid,
            config.source_x,
            config.source_z,
            config.source_sigma(),
        )?;
        let source = config.source.wavelet()?.time_series(config.nt, dt)?;
        let receivers = config
            .receivers
            .iter()
            .map(|&[x, z]| grid.index_of(x, z))
            .collect::<Result<Vec<_>>>()?;

        Self::new(grid, velocity, method, dt, weight, source)?.with_receivers(receivers)
    }

    /// Record the pressure at these `(i, k)` grid indices every step
    pub fn with_receivers(mut self, indices: Vec<(usize, usize)>) -> Result<Self> {
        if let Some(&(i, k)) = indices.iter().find(|&&(i, k)| !self.grid.in_bounds(i, k)) {
            return Err(WaveError::config(
                "receivers",
                format!("index ({i}, {k}) is outside the grid"),
            ));
        }
        self.receivers = Receivers::new(indices, self.nt());
        Ok(self)
    }

    pub fn grid(&self) -> &Grid2D {
        &self.grid
    }

    pub fn method(&self) -> DerivativeMethod {
        self.method
    }

    pub fn dt(&self) -> f64 {
        self.dt
    }

    pub fn nt(&self) -> usize {
        self.source.len()
    }

    pub fn current_step(&self) -> usize {
        self.step
    }

    pub fn time(&self) -> f64 {
        self.step as f64 * self.dt
    }

    pub fn is_finished(&self) -> bool {
        self.step >= self.nt()
    }

    pub fn pressure(&self) -> ArrayView2<'_, f64> {
        self.pressure.current().view()
    }

    pub fn previous_pressure(&self) -> ArrayView2<'_, f64> {
        self.pressure.previous().view()
    }

    pub fn receivers(&self) -> &Receivers<(usize, usize)> {
        &self.receivers
    }

    /// Laplacian of the current pressure into `self.laplacian`
    fn compute_laplacian(&mut self) {
        // FD passes leave the edges alone, so stale values must not survive
        self.laplacian.fill(0.0);
        self.scratch.fill(0.0);
        self.x_operator
            .apply_along(self.pressure.current(), Axis(0), &mut self.laplacian);
        self.z_operator
            .apply_along(self.pressure.current(), Axis(1), &mut self.scratch);
        self.laplacian += &self.scratch;
    }

    /// Advance one time step. Returns `false` once all steps are done.
    pub fn step(&mut self) -> bool {
        if self.is_finished() {
            return false;
        }
        let it = self.step;
        self.compute_laplacian();

        let dt2 = self.dt * self.dt;
        let src = self.source[it];
        Zip::from(&mut self.next)
            .and(self.pressure.current())
            .and(self.pressure.previous())
            .and(&self.velocity)
            .and(&self.laplacian)
            .and(&self.source_weight)
            .for_each(|next, &p, &p_prev, &c, &lap, &w| {
                *next = 2.0 * p - p_prev + dt2 * c * c * lap + dt2 * w * src;
            });
        self.pressure.advance(&mut self.next);

        let pressure = self.pressure.current();
        self.receivers.record(it, |(i, k)| pressure[[i, k]]);

        self.step += 1;
        log::trace!("acoustic 2D ({}) step {}/{}", self.method.name(), self.step, self.nt());
        true
    }

    /// Step to the end, calling `observer` after every step
    pub fn run<F>(&mut self, mut observer: F)
    where
        F: FnMut(usize, &Self),
    {
        while self.step() {
            observer(self.step, self);
        }
        log::debug!(
            "acoustic 2D ({}) finished after {} steps, max |p| = {:e}",
            self.method.name(),
            self.step,
            max_abs(self.pressure.current())
        );
    }
}

/// A spectral and a finite-difference run of one configuration, stepped
/// together so their wavefields can be compared at any time.
#[derive(Debug, Clone)]
pub struct DispersionComparison {
    spectral: Acoustic2D,
    finite_difference: Acoustic2D,
}

impl DispersionComparison {
    /// Spectral run plus a run with the configured `fd_points` stencil
    pub fn from_config(config: &Acoustic2DConfig) -> Result<Self> {
        Ok(Self {
            spectral: Acoustic2D::from_config(config, DerivativeMethod::Spectral)?,
            finite_difference: Acoustic2D::from_config(config, config.finite_difference())?,
        })
    }

    pub fn spectral(&self) -> &Acoustic2D {
        &self.spectral
    }

    pub fn finite_difference(&self) -> &Acoustic2D {
        &self.finite_difference
    }

    pub fn current_step(&self) -> usize {
        self.spectral.current_step()
    }

    pub fn is_finished(&self) -> bool {
        self.spectral.is_finished()
    }

    /// Advance both runs one step
    pub fn step(&mut self) -> bool {
        let spectral = self.spectral.step();
        let finite_difference = self.finite_difference.step();
        spectral && finite_difference
    }

    pub fn run<F>(&mut self, mut observer: F)
    where
        F: FnMut(usize, &Self),
    {
        while self.step() {
            observer(self.current_step(), self);
        }
    }

    /// `spectral - finite_difference` for the current pressure
    pub fn difference(&self) -> Array2<f64> {
        &self.spectral.pressure() - &self.finite_difference.pressure()
    }

    pub fn max_abs_difference(&self) -> f64 {
        max_abs(&self.difference())
    }

    pub fn rms_difference(&self) -> f64 {
        let diff = self.difference();
        let n = diff.len() as f64;
        (diff.iter().map(|d| d * d).sum::<f64>() / n).sqrt()
    }
}
