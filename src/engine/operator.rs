//! Interchangeable spatial-derivative operators
//!
//! The finite-difference and spectral operators have different validity
//! domains: the stencil is only evaluated where it fits inside the grid, the
//! spectral operator assumes periodicity and covers every point. Both
//! variants carry their grid spacing so callers only pick an axis.

use crate::engine::spectral::SpectralOperator;
use crate::engine::stencil::Stencil;
use crate::error::{ensure_positive, Result};
use ndarray::{Array1, Array2, Axis};

/// Choice of spatial derivative strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DerivativeMethod {
    /// Centered stencil with the given odd number of points
    FiniteDifference { points: usize },
    /// Fourier differentiation (periodic)
    Spectral,
}

impl DerivativeMethod {
    pub fn name(&self) -> &'static str {
        match self {
            DerivativeMethod::FiniteDifference { .. } => "finite-difference",
            DerivativeMethod::Spectral => "spectral",
        }
    }
}

/// A derivative operator bound to one grid axis
#[derive(Debug, Clone, PartialEq)]
pub enum DerivativeOperator {
    FiniteDifference { stencil: Stencil, spacing: f64 },
    Spectral(SpectralOperator),
}

impl DerivativeOperator {
    /// Build the operator for an axis of `len` samples at `spacing`
    pub fn new(method: DerivativeMethod, len: usize, spacing: f64, order: usize) -> Result<Self> {
        ensure_positive("spacing", spacing)?;
        match method {
            DerivativeMethod::FiniteDifference { points } => Ok(Self::FiniteDifference {
                stencil: Stencil::centered(points, order)?,
                spacing,
            }),
            DerivativeMethod::Spectral => Ok(Self::Spectral(SpectralOperator::new(
                len, spacing, order,
            )?)),
        }
    }

    /// Number of edge points on each side left unevaluated
    pub fn boundary_width(&self) -> usize {
        match self {
            Self::FiniteDifference { stencil, .. } => stencil.half_width(),
            Self::Spectral(_) => 0,
        }
    }

    pub fn order(&self) -> usize {
        match self {
            Self::FiniteDifference { stencil, .. } => stencil.order(),
            Self::Spectral(op) => op.order(),
        }
    }

    /// Differentiate a 1D field into `out`
    pub fn apply(&self, field: &Array1<f64>, out: &mut Array1<f64>) -> Result<()> {
        match self {
            Self::FiniteDifference { stencil, spacing } => {
                stencil.apply(field.view(), *spacing, out.view_mut());
            }
            Self::Spectral(op) => {
                let derivative = op.apply(field.view())?;
                out.assign(&derivative);
            }
        }
        Ok(())
    }

    /// Differentiate every lane of a 2D field along `axis` into `out`
    pub fn apply_along(&self, field: &Array2<f64>, axis: Axis, out: &mut Array2<f64>) {
        match self {
            Self::FiniteDifference { stencil, spacing } => {
                stencil.apply_along(field, axis, *spacing, out)
            }
            Self::Spectral(op) => op.apply_along(field, axis, out),
        }
    }
}
