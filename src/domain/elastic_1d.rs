//! 1D elastic velocity-stress solver on a staggered grid
//!
//! Solves
//!
//! ```text
//! rho dv/dt = ds/dx + f
//!     ds/dt = mu dv/dx
//! ```
//!
//! Velocity `v[i]` lives at `x_i`, stress `s[i]` at `x_i - dx/2`. The
//! staggering is expressed by how the first-derivative stencil indexes its
//! input ([`StaggeredStencil::forward`] / [`StaggeredStencil::backward`]);
//! both fields are plain arrays of the same length.
//!
//! The engine does not detect instability. A `dt` above the stability bound
//! makes the fields grow without limit.

use crate::config::Elastic1DConfig;
use crate::domain::grid::Grid1D;
use crate::domain::receivers::Receivers;
use crate::engine::field::Field1D;
use crate::engine::stencil::StaggeredStencil;
use crate::error::{ensure_positive, Result, WaveError};
use crate::utilities::stability::courant_number;
use ndarray::{Array1, ArrayView1, Zip};

/// Density and shear modulus at every grid point
#[derive(Debug, Clone, PartialEq)]
pub struct ElasticModel {
    density: Array1<f64>,
    shear_modulus: Array1<f64>,
}

impl ElasticModel {
    pub fn new(density: Array1<f64>, shear_modulus: Array1<f64>) -> Result<Self> {
        if density.len() != shear_modulus.len() {
            return Err(WaveError::config(
                "shear_modulus",
                format!(
                    "length {} does not match density length {}",
                    shear_modulus.len(),
                    density.len()
                ),
            ));
        }
        if density.iter().any(|&rho| !(rho.is_finite() && rho > 0.0)) {
            return Err(WaveError::config("density", "must be finite and positive everywhere"));
        }
        if shear_modulus.iter().any(|&mu| !(mu.is_finite() && mu > 0.0)) {
            return Err(WaveError::config(
                "shear_modulus",
                "must be finite and positive everywhere",
            ));
        }
        Ok(Self {
            density,
            shear_modulus,
        })
    }

    /// `mu = rho c^2` from a velocity and a density profile
    pub fn from_velocity(velocity: &Array1<f64>, density: Array1<f64>) -> Result<Self> {
        if velocity.len() != density.len() {
            return Err(WaveError::config(
                "velocity",
                format!(
                    "length {} does not match density length {}",
                    velocity.len(),
                    density.len()
                ),
            ));
        }
        let shear_modulus = &density * &velocity.mapv(|c| c * c);
        Self::new(density, shear_modulus)
    }

    pub fn homogeneous(nx: usize, velocity: f64, density: f64) -> Result<Self> {
        ensure_positive("velocity", velocity)?;
        ensure_positive("density", density)?;
        Self::from_velocity(&Array1::from_elem(nx, velocity), Array1::from_elem(nx, density))
    }

    pub fn len(&self) -> usize {
        self.density.len()
    }

    pub fn is_empty(&self) -> bool {
        self.density.is_empty()
    }

    pub fn density(&self) -> &Array1<f64> {
        &self.density
    }

    pub fn shear_modulus(&self) -> &Array1<f64> {
        &self.shear_modulus
    }

    /// Largest wave speed `sqrt(mu / rho)` in the model
    pub fn max_velocity(&self) -> f64 {
        Zip::from(&self.shear_modulus)
            .and(&self.density)
            .fold(0.0_f64, |acc, &mu, &rho| acc.max((mu / rho).sqrt()))
    }
}

/// Staggered-grid leapfrog extrapolator for the 1D elastic system
#[derive(Debug, Clone)]
pub struct Elastic1D {
    grid: Grid1D,
    model: ElasticModel,
    operator: StaggeredStencil,
    dt: f64,
    source_index: usize,
    source: Array1<f64>,
    velocity: Field1D,
    stress: Field1D,
    stress_derivative: Field1D,
    velocity_derivative: Field1D,
    receivers: Receivers<usize>,
    step: usize,
}

impl Elastic1D {
    /// Build an engine that runs `source.len()` steps.
    ///
    /// `source` holds one sample per step, injected into the velocity at
    /// `source_index`.
    pub fn new(
        grid: Grid1D,
        model: ElasticModel,
        operator: StaggeredStencil,
        dt: f64,
        source_index: usize,
        source: Array1<f64>,
    ) -> Result<Self> {
        let nx = grid.nx();
        if model.len() != nx {
            return Err(WaveError::config(
                "model",
                format!("length {} does not match grid size {}", model.len(), nx),
            ));
        }
        ensure_positive("dt", dt)?;
        if source.is_empty() {
            return Err(WaveError::config("nt", "need at least one time step"));
        }
        if source_index >= nx {
            return Err(WaveError::config(
                "source_index",
                format!("{source_index} is outside a grid of {nx} points"),
            ));
        }
        let courant = courant_number(dt, grid.dx(), model.max_velocity());
        if courant > 1.0 {
            return Err(WaveError::CflViolation {
                dt,
                dt_max: grid.dx() / model.max_velocity(),
            });
        }

        log::info!(
            "elastic 1D: nx={} dx={} dt={:e} nt={} courant={:.3} operator={} points",
            nx,
            grid.dx(),
            dt,
            source.len(),
            courant,
            operator.len()
        );

        let nt = source.len();
        Ok(Self {
            grid,
            model,
            operator,
            dt,
            source_index,
            source,
            velocity: Field1D::zeros(nx),
            stress: Field1D::zeros(nx),
            stress_derivative: Field1D::zeros(nx),
            velocity_derivative: Field1D::zeros(nx),
            receivers: Receivers::new(Vec::new(), nt),
            step: 0,
        })
    }

    /// Homogeneous medium, source and receivers from a configuration
    pub fn from_config(config: &Elastic1DConfig) -> Result<Self> {
        config.validate()?;
        let grid = config.grid()?;
        let model = ElasticModel::homogeneous(grid.nx(), config.velocity, config.density)?;
        let operator = StaggeredStencil::first_derivative(config.operator_points)?;
        let dt = config.dt()?;
        let source = config.source.wavelet()?.time_series(config.nt, dt)?;
        let source_index = grid.index_of(config.source_x)?;
        let receivers = config
            .receivers
            .iter()
            .map(|&x| grid.index_of(x))
            .collect::<Result<Vec<_>>>()?;

        Self::new(grid, model, operator, dt, source_index, source)?.with_receivers(receivers)
    }

    /// Record the velocity at these grid indices every step
    pub fn with_receivers(mut self, indices: Vec<usize>) -> Result<Self> {
        if let Some(&bad) = indices.iter().find(|&&i| i >= self.grid.nx()) {
            return Err(WaveError::config(
                "receivers",
                format!("index {bad} is outside a grid of {} points", self.grid.nx()),
            ));
        }
        self.receivers = Receivers::new(indices, self.nt());
        Ok(self)
    }

    pub fn grid(&self) -> &Grid1D {
        &self.grid
    }

    pub fn model(&self) -> &ElasticModel {
        &self.model
    }

    pub fn dt(&self) -> f64 {
        self.dt
    }

    pub fn nt(&self) -> usize {
        self.source.len()
    }

    pub fn source_index(&self) -> usize {
        self.source_index
    }

    /// Number of steps taken so far
    pub fn current_step(&self) -> usize {
        self.step
    }

    pub fn time(&self) -> f64 {
        self.step as f64 * self.dt
    }

    pub fn is_finished(&self) -> bool {
        self.step >= self.nt()
    }

    pub fn velocity(&self) -> ArrayView1<'_, f64> {
        self.velocity.view()
    }

    pub fn stress(&self) -> ArrayView1<'_, f64> {
        self.stress.view()
    }

    pub fn receivers(&self) -> &Receivers<usize> {
        &self.receivers
    }

    /// Advance one time step. Returns `false` once all steps are done.
    pub fn step(&mut self) -> bool {
        if self.is_finished() {
            return false;
        }
        let it = self.step;
        let dt = self.dt;
        let dx = self.grid.dx();

        // Stress derivative at velocity points
        self.operator
            .forward(self.stress.view(), dx, self.stress_derivative.view_mut());
        Zip::from(&mut self.velocity)
            .and(&self.stress_derivative)
            .and(self.model.density())
            .for_each(|v, &ds, &rho| *v += dt * ds / rho);

        // The dt factors cancel: the source amplitude is normalized by the same
        // dt that scales the update.
        let isx = self.source_index;
        self.velocity[isx] += dt * self.source[it] / (dt * self.model.density()[isx]);

        // Velocity derivative at stress points
        self.operator
            .backward(self.velocity.view(), dx, self.velocity_derivative.view_mut());
        Zip::from(&mut self.stress)
            .and(&self.velocity_derivative)
            .and(self.model.shear_modulus())
            .for_each(|s, &dv, &mu| *s += dt * mu * dv);

        let velocity = &self.velocity;
        self.receivers.record(it, |i| velocity[i]);

        self.step += 1;
        log::trace!("elastic 1D step {}/{}", self.step, self.nt());
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
        log::debug!("elastic 1D run finished after {} steps", self.step);
    }
}
