//! Run configuration for the 1D elastic and 2D acoustic engines
//!
//! Every field is a plain scalar. `validate()` checks positivity, positions
//! and the stability bound; engines call it again when built from a config,
//! so an invalid configuration never reaches the time loop.

use crate::domain::grid::{Grid1D, Grid2D};
use crate::engine::operator::DerivativeMethod;
use crate::error::{ensure_positive, Result, WaveError};
use crate::utilities::sources::{SourceWavelet, WaveletKind};
use crate::utilities::stability::{check_cfl, stable_time_step};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

fn default_eps() -> f64 {
    0.5
}

fn default_staggered_points() -> usize {
    4
}

fn default_fd_points() -> usize {
    5
}

fn parse_toml<T: DeserializeOwned>(content: &str) -> Result<T> {
    toml::from_str(content).map_err(|e| WaveError::ConfigParse(e.to_string()))
}

fn resolve_dt(dt: Option<f64>, eps: f64, spacing: f64, max_velocity: f64) -> Result<f64> {
    match dt {
        Some(dt) => {
            check_cfl(dt, spacing, max_velocity, eps)?;
            Ok(dt)
        }
        None => stable_time_step(eps, spacing, max_velocity),
    }
}

/// Source time function settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceConfig {
    /// Dominant frequency (Hz)
    pub f0: f64,
    /// Pulse center (s); defaults to 1.5 dominant periods
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub t0: Option<f64>,
    #[serde(default)]
    pub wavelet: WaveletKind,
}

impl SourceConfig {
    pub fn new(f0: f64) -> Self {
        Self {
            f0,
            t0: None,
            wavelet: WaveletKind::default(),
        }
    }

    pub fn wavelet(&self) -> Result<SourceWavelet> {
        let wavelet = SourceWavelet::new(self.f0)?.with_kind(self.wavelet);
        match self.t0 {
            Some(t0) => wavelet.with_delay(t0),
            None => Ok(wavelet),
        }
    }
}

/// Staggered-grid velocity-stress run in a homogeneous 1D medium
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Elastic1DConfig {
    pub nx: usize,
    /// Grid spacing (m)
    pub dx: f64,
    pub nt: usize,
    /// Stability factor, `dt = eps * dx / c` unless `dt` is given
    #[serde(default = "default_eps")]
    pub eps: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dt: Option<f64>,
    /// Shear velocity (m/s)
    pub velocity: f64,
    /// Density (kg/m³)
    pub density: f64,
    /// Source position (m)
    pub source_x: f64,
    /// Receiver positions (m)
    #[serde(default)]
    pub receivers: Vec<f64>,
    /// Points of the staggered first-derivative operator (2 or 4)
    #[serde(default = "default_staggered_points")]
    pub operator_points: usize,
    pub source: SourceConfig,
}

impl Default for Elastic1DConfig {
    fn default() -> Self {
        Self {
            nx: 1000,
            dx: 1.0,
            nt: 1300,
            eps: default_eps(),
            dt: None,
            velocity: 4500.0,
            density: 2500.0,
            source_x: 500.0,
            receivers: Vec::new(),
            operator_points: default_staggered_points(),
            source: SourceConfig::new(40.0),
        }
    }
}

impl Elastic1DConfig {
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Self = parse_toml(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn grid(&self) -> Result<Grid1D> {
        Grid1D::new(self.nx, self.dx)
    }

    /// Shear modulus `mu = rho c^2`
    pub fn shear_modulus(&self) -> f64 {
        self.density * self.velocity * self.velocity
    }

    /// Time step, either given or derived from `eps`
    pub fn dt(&self) -> Result<f64> {
        ensure_positive("velocity", self.velocity)?;
        resolve_dt(self.dt, self.eps, self.dx, self.velocity)
    }

    pub fn validate(&self) -> Result<()> {
        let grid = self.grid()?;
        if self.nt == 0 {
            return Err(WaveError::config("nt", "need at least one time step"));
        }
        ensure_positive("density", self.density)?;
        let dt = self.dt()?;
        grid.index_of(self.source_x)?;
        for &x in &self.receivers {
            grid.index_of(x)?;
        }
        if self.operator_points == 0 || self.operator_points % 2 == 1 {
            return Err(WaveError::config(
                "operator_points",
                format!("must be a positive even number, got {}", self.operator_points),
            ));
        }
        // Builds the full series so a late pulse is caught here
        self.source.wavelet()?.time_series(self.nt, dt)?;
        Ok(())
    }
}

/// Collocated-grid pressure run in a homogeneous 2D medium
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Acoustic2DConfig {
    pub nx: usize,
    pub nz: usize,
    pub dx: f64,
    pub dz: f64,
    pub nt: usize,
    #[serde(default = "default_eps")]
    pub eps: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dt: Option<f64>,
    /// Acoustic velocity (m/s)
    pub velocity: f64,
    /// Source position (m)
    pub source_x: f64,
    pub source_z: f64,
    /// Width of the Gaussian source footprint (m); defaults to 1.5 cells
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_sigma: Option<f64>,
    /// Points of the centered second-derivative stencil
    #[serde(default = "default_fd_points")]
    pub fd_points: usize,
    /// Receiver positions `[x, z]` (m)
    #[serde(default)]
    pub receivers: Vec<[f64; 2]>,
    pub source: SourceConfig,
}

impl Default for Acoustic2DConfig {
    fn default() -> Self {
        Self {
            nx: 128,
            nz: 128,
            dx: 10.0,
            dz: 10.0,
            nt: 600,
            eps: 0.2,
            dt: None,
            velocity: 3000.0,
            source_x: 640.0,
            source_z: 640.0,
            source_sigma: None,
            fd_points: default_fd_points(),
            receivers: Vec::new(),
            source: SourceConfig::new(15.0),
        }
    }
}

impl Acoustic2DConfig {
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Self = parse_toml(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn grid(&self) -> Result<Grid2D> {
        Grid2D::new(self.nx, self.nz, self.dx, self.dz)
    }

    pub fn dt(&self) -> Result<f64> {
        ensure_positive("velocity", self.velocity)?;
        resolve_dt(self.dt, self.eps, self.dx.min(self.dz), self.velocity)
    }

    pub fn source_sigma(&self) -> f64 {
        self.source_sigma.unwrap_or(1.5 * self.dx.min(self.dz))
    }

    /// The finite-difference half of a dispersion comparison
    pub fn finite_difference(&self) -> DerivativeMethod {
        DerivativeMethod::FiniteDifference {
            points: self.fd_points,
        }
    }

    pub fn validate(&self) -> Result<()> {
        let grid = self.grid()?;
        if self.nt == 0 {
            return Err(WaveError::config("nt", "need at least one time step"));
        }
        let dt = self.dt()?;
        grid.index_of(self.source_x, self.source_z)?;
        for &[x, z] in &self.receivers {
            grid.index_of(x, z)?;
        }
        ensure_positive("source_sigma", self.source_sigma())?;
        if self.fd_points < 3 || self.fd_points % 2 == 0 {
            return Err(WaveError::config(
                "fd_points",
                format!("must be odd and at least 3, got {}", self.fd_points),
            ));
        }
        self.source.wavelet()?.time_series(self.nt, dt)?;
        Ok(())
    }
}
